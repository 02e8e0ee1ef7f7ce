//! Configuration settings structure
//!
//! Defines the settings tree, its TOML form and the environment overrides.

use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};
use url::Url;

use crate::{
    Error, Result,
    identity::{Browser, ClientIdentity, Platform},
};

/// Environment lookup used when merging overrides
pub type EnvLookup = fn(&str) -> Option<String>;

/// Reads the process environment
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

/// Generic proxy variables consulted when no proxy is configured, in priority order
pub const PROXY_ENV_FALLBACKS: [&str; 3] = ["HTTPS_PROXY", "HTTP_PROXY", "ALL_PROXY"];

/// Main configuration settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Service endpoint configuration
    pub api: ApiSettings,
    /// Outbound network configuration
    pub network: NetworkSettings,
    /// Identity seed
    pub identity: IdentitySettings,
    /// Logging configuration
    pub logging: LoggingSettings,
}

/// Service endpoint configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiSettings {
    /// Origin the API is served from, without the `/api` suffix
    pub base_url: String,
    /// API version segment, e.g. `v9`
    pub api_version: String,
    /// Send client properties as `x-track` instead of `x-super-properties`
    pub registering: bool,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

/// Outbound network configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NetworkSettings {
    /// Proxy every request goes through
    pub proxy: Option<String>,
}

/// Values the emulated client identity is built from
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IdentitySettings {
    pub platform: Platform,
    pub browser: Browser,
    pub browser_version: String,
    /// Overrides the user agent derived from platform and browser
    pub user_agent: Option<String>,
    /// Account token sent as `authorization`
    pub authorization: Option<String>,
    /// Generate an `x-fingerprint`
    pub fingerprint: bool,
    /// Describe the environment in a client properties blob
    pub super_properties: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSettings {
    /// Log level
    pub level: String,
    /// Enable verbose logging
    pub verbose: bool,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://discord.com".to_string(),
            api_version: "v9".to_string(),
            registering: false,
            timeout_secs: 30,
        }
    }
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for IdentitySettings {
    fn default() -> Self {
        Self {
            platform: Platform::default(),
            browser: Browser::default(),
            browser_version: "109.0".to_string(),
            user_agent: None,
            authorization: None,
            fingerprint: true,
            super_properties: true,
        }
    }
}

impl std::fmt::Debug for IdentitySettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentitySettings")
            .field("platform", &self.platform)
            .field("browser", &self.browser)
            .field("browser_version", &self.browser_version)
            .field("user_agent", &self.user_agent)
            .field("authorization", &self.authorization.as_ref().map(|_| "<redacted>"))
            .field("fingerprint", &self.fingerprint)
            .field("super_properties", &self.super_properties)
            .finish()
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            verbose: false,
        }
    }
}

impl Settings {
    /// Create new settings with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from a TOML file; missing sections keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| Error::config(format!("Invalid TOML: {}", e)))
    }

    /// Load settings from environment variables
    pub fn from_env() -> Result<Self> {
        Self::default().merge_with_env()
    }

    /// Apply overrides from the process environment
    pub fn merge_with_env(self) -> Result<Self> {
        self.merge_with(process_env)
    }

    /// Apply overrides read through `lookup`
    ///
    /// `DISGUISE_PROXY` always wins; the generic proxy variables only fill
    /// in when no proxy is configured at all.
    pub fn merge_with(mut self, lookup: EnvLookup) -> Result<Self> {
        if let Some(base_url) = lookup("DISGUISE_BASE_URL") {
            self.api.base_url = base_url;
        }

        if let Some(version) = lookup("DISGUISE_API_VERSION") {
            self.api.api_version = version;
        }

        if let Some(flag) = lookup("DISGUISE_REGISTERING") {
            self.api.registering = parse_flag(&flag).ok_or_else(|| {
                Error::config(format!("Invalid DISGUISE_REGISTERING value: {}", flag))
            })?;
        }

        if let Some(proxy) = lookup("DISGUISE_PROXY") {
            self.network.proxy = Some(proxy);
        } else if self.network.proxy.is_none() {
            self.network.proxy = PROXY_ENV_FALLBACKS.iter().find_map(|key| lookup(key));
        }

        if let Some(token) = lookup("DISGUISE_TOKEN") {
            self.identity.authorization = Some(token);
        }

        Ok(self)
    }

    /// Check that every URL parses and the numeric limits make sense
    pub fn validate(&self) -> Result<()> {
        self.origin()?;
        self.proxy_url()?;

        if self.api.api_version.trim().is_empty() {
            return Err(Error::config("API version must not be empty"));
        }

        if self.api.timeout_secs == 0 {
            return Err(Error::config("Timeout must be greater than 0"));
        }

        if self.identity.browser_version.trim().is_empty() {
            return Err(Error::config("Browser version must not be empty"));
        }

        match self.logging.level.to_ascii_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            other => Err(Error::config(format!("Unknown log level: {}", other))),
        }
    }

    /// Parsed API origin
    pub fn origin(&self) -> Result<Url> {
        let url = Url::parse(&self.api.base_url)
            .map_err(|e| Error::config(format!("Invalid base URL {}: {}", self.api.base_url, e)))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(Error::config(format!(
                "Base URL must be http or https, got {}",
                scheme
            ))),
        }
    }

    /// Parsed proxy endpoint, if one is configured
    pub fn proxy_url(&self) -> Result<Option<Url>> {
        match self.network.proxy.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => Url::parse(raw)
                .map(Some)
                .map_err(|e| Error::proxy(format!("{}: {}", raw, e))),
        }
    }

    /// Build a fresh identity from the identity seed
    pub fn build_identity(&self) -> ClientIdentity {
        let seed = &self.identity;
        let mut builder = ClientIdentity::builder()
            .platform(seed.platform)
            .browser(seed.browser)
            .browser_version(seed.browser_version.clone());

        if let Some(user_agent) = &seed.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        if let Some(token) = &seed.authorization {
            builder = builder.authorization(token.clone());
        }
        if !seed.fingerprint {
            builder = builder.without_fingerprint();
        }
        if seed.super_properties {
            builder = builder.with_client_properties();
        }

        builder.build()
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
