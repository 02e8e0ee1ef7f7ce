//! Client properties blob
//!
//! The web client describes its environment in a JSON object that travels
//! base64-encoded in the `x-super-properties` header (or `x-track` while
//! registering).

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use serde::{Deserialize, Serialize};

use super::profile::{Browser, Platform, full_version};
use crate::Result;

/// Build number of the web client the defaults were captured from
pub const DEFAULT_CLIENT_BUILD_NUMBER: u64 = 193906;

/// Environment description sent with every request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientProperties {
    pub os: String,
    pub browser: String,
    pub device: String,
    pub system_locale: String,
    pub browser_user_agent: String,
    pub browser_version: String,
    pub os_version: String,
    pub referrer: String,
    pub referring_domain: String,
    pub referrer_current: String,
    pub referring_domain_current: String,
    pub release_channel: String,
    pub client_build_number: u64,
    pub client_event_source: Option<String>,
    pub design_id: u32,
}

impl ClientProperties {
    /// Describe the given platform, browser and user agent
    pub fn describe(
        platform: Platform,
        browser: Browser,
        browser_version: &str,
        user_agent: &str,
    ) -> Self {
        Self {
            os: platform.label().to_string(),
            browser: browser.label().to_string(),
            device: String::new(),
            system_locale: "en-US".to_string(),
            browser_user_agent: user_agent.to_string(),
            browser_version: full_version(browser_version),
            os_version: platform.os_version().to_string(),
            referrer: String::new(),
            referring_domain: String::new(),
            referrer_current: String::new(),
            referring_domain_current: String::new(),
            release_channel: "stable".to_string(),
            client_build_number: DEFAULT_CLIENT_BUILD_NUMBER,
            client_event_source: None,
            design_id: 0,
        }
    }

    /// Override the client build number
    pub fn with_build_number(mut self, build_number: u64) -> Self {
        self.client_build_number = build_number;
        self
    }

    /// Base64 of the JSON encoding
    pub fn encode(&self) -> Result<String> {
        let json = serde_json::to_string(self)?;
        Ok(BASE64.encode(json))
    }

    /// Decode a header value produced by [`ClientProperties::encode`] or a real client
    pub fn decode(blob: &str) -> Result<Self> {
        let raw = BASE64
            .decode(blob)
            .map_err(|e| crate::Error::config(format!("Invalid client properties: {}", e)))?;
        Ok(serde_json::from_slice(&raw)?)
    }
}
