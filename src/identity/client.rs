//! Client identity aggregate
//!
//! A [`ClientIdentity`] is the synthetic browser/device profile one session
//! presents to the remote service. It is built once and never mutated; the
//! only late-bound value is the session cookie, which lives in a one-shot
//! cell owned by the identity.

use std::fmt;
use tokio::sync::OnceCell;

use super::profile::{Browser, Platform, major_version};
use super::properties::ClientProperties;
use super::tokens::{Fingerprint, SessionUid};

/// Browser version the web client was captured with
pub const DEFAULT_BROWSER_VERSION: &str = "109.0";

/// Synthetic browser/device profile for one logical session
pub struct ClientIdentity {
    platform: Platform,
    browser: Browser,
    browser_version: String,
    user_agent: String,
    fingerprint: Option<Fingerprint>,
    session_uid: SessionUid,
    authorization: Option<String>,
    client_properties: Option<String>,
    cookie: OnceCell<String>,
}

impl ClientIdentity {
    /// Start building an identity
    pub fn builder() -> ClientIdentityBuilder {
        ClientIdentityBuilder::new()
    }

    /// Identity with generated tokens for the given labels
    pub fn new(platform: Platform, browser: Browser, browser_version: impl Into<String>) -> Self {
        Self::builder()
            .platform(platform)
            .browser(browser)
            .browser_version(browser_version)
            .build()
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn browser(&self) -> Browser {
        self.browser
    }

    pub fn browser_version(&self) -> &str {
        &self.browser_version
    }

    /// Resolved user agent (derived from the labels unless overridden)
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn fingerprint(&self) -> Option<&Fingerprint> {
        self.fingerprint.as_ref()
    }

    pub fn session_uid(&self) -> SessionUid {
        self.session_uid
    }

    pub fn authorization(&self) -> Option<&str> {
        self.authorization.as_deref()
    }

    /// Base64 client-properties blob, when the identity carries one
    pub fn client_properties(&self) -> Option<&str> {
        self.client_properties.as_deref()
    }

    /// `sec-ch-ua` brand list matching the claimed browser
    pub fn client_hints(&self) -> String {
        self.browser.client_hint(major_version(&self.browser_version))
    }

    /// Session cookie, if it has already been derived
    pub fn cached_cookie(&self) -> Option<&str> {
        self.cookie.get().map(String::as_str)
    }

    pub(crate) fn cookie_cell(&self) -> &OnceCell<String> {
        &self.cookie
    }
}

impl fmt::Debug for ClientIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientIdentity")
            .field("platform", &self.platform)
            .field("browser", &self.browser)
            .field("browser_version", &self.browser_version)
            .field("user_agent", &self.user_agent)
            .field("fingerprint", &self.fingerprint)
            .field("session_uid", &self.session_uid)
            .field(
                "authorization",
                &self.authorization.as_ref().map(|_| "<redacted>"),
            )
            .field("client_properties", &self.client_properties.is_some())
            .field("cookie_resolved", &self.cookie.initialized())
            .finish()
    }
}

/// How the fingerprint token is obtained
#[derive(Debug, Clone)]
enum FingerprintSeed {
    Generate,
    Given(Fingerprint),
    Omit,
}

/// How the client-properties blob is obtained
#[derive(Debug, Clone)]
enum PropertiesSeed {
    Omit,
    Describe { build_number: Option<u64> },
    Given(String),
}

/// Builder for [`ClientIdentity`]
#[derive(Debug, Clone)]
pub struct ClientIdentityBuilder {
    platform: Platform,
    browser: Browser,
    browser_version: String,
    user_agent: Option<String>,
    fingerprint: FingerprintSeed,
    authorization: Option<String>,
    properties: PropertiesSeed,
}

impl ClientIdentityBuilder {
    /// Windows/Chromium 109 with a generated fingerprint and no properties blob
    pub fn new() -> Self {
        Self {
            platform: Platform::default(),
            browser: Browser::default(),
            browser_version: DEFAULT_BROWSER_VERSION.to_string(),
            user_agent: None,
            fingerprint: FingerprintSeed::Generate,
            authorization: None,
            properties: PropertiesSeed::Omit,
        }
    }

    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn browser(mut self, browser: Browser) -> Self {
        self.browser = browser;
        self
    }

    pub fn browser_version(mut self, version: impl Into<String>) -> Self {
        self.browser_version = version.into();
        self
    }

    /// Override the derived user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Reuse a fingerprint issued by the service
    pub fn fingerprint(mut self, fingerprint: Fingerprint) -> Self {
        self.fingerprint = FingerprintSeed::Given(fingerprint);
        self
    }

    /// Send no `x-fingerprint` header
    pub fn without_fingerprint(mut self) -> Self {
        self.fingerprint = FingerprintSeed::Omit;
        self
    }

    pub fn authorization(mut self, token: impl Into<String>) -> Self {
        self.authorization = Some(token.into());
        self
    }

    /// Describe the emulated environment in a client-properties blob
    pub fn with_client_properties(mut self) -> Self {
        self.properties = PropertiesSeed::Describe { build_number: None };
        self
    }

    /// Like [`with_client_properties`](Self::with_client_properties) with a specific build number
    pub fn with_client_build(mut self, build_number: u64) -> Self {
        self.properties = PropertiesSeed::Describe {
            build_number: Some(build_number),
        };
        self
    }

    /// Use a pre-encoded blob captured from a real client
    pub fn client_properties_blob(mut self, blob: impl Into<String>) -> Self {
        self.properties = PropertiesSeed::Given(blob.into());
        self
    }

    /// Freeze the identity, generating its tokens
    pub fn build(self) -> ClientIdentity {
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| self.browser.user_agent(self.platform, &self.browser_version));

        let fingerprint = match self.fingerprint {
            FingerprintSeed::Generate => Some(Fingerprint::generate()),
            FingerprintSeed::Given(fingerprint) => Some(fingerprint),
            FingerprintSeed::Omit => None,
        };

        let client_properties = match self.properties {
            PropertiesSeed::Omit => None,
            PropertiesSeed::Given(blob) => Some(blob),
            PropertiesSeed::Describe { build_number } => {
                let mut props = ClientProperties::describe(
                    self.platform,
                    self.browser,
                    &self.browser_version,
                    &user_agent,
                );
                if let Some(build_number) = build_number {
                    props = props.with_build_number(build_number);
                }
                match props.encode() {
                    Ok(blob) => Some(blob),
                    Err(e) => {
                        tracing::warn!("Failed to encode client properties: {}", e);
                        None
                    }
                }
            }
        };

        ClientIdentity {
            platform: self.platform,
            browser: self.browser,
            browser_version: self.browser_version,
            user_agent,
            fingerprint,
            session_uid: SessionUid::generate(),
            authorization: self.authorization,
            client_properties,
            cookie: OnceCell::new(),
        }
    }
}

impl Default for ClientIdentityBuilder {
    fn default() -> Self {
        Self::new()
    }
}
