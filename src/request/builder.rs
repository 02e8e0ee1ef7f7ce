//! Request construction
//!
//! [`RequestBuilder`] turns an action body and a [`ClientIdentity`] into a
//! [`RequestDescriptor`] carrying the header set a genuine browser session
//! sends to the service.

use reqwest::{
    Method,
    header::{HeaderName, HeaderValue},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;
use url::Url;

use crate::{
    Error, Result,
    identity::ClientIdentity,
    payload::ActionBody,
    session::SessionCookieProvider,
};

/// Extra headers merged over the computed set; names are case-insensitive
pub type HeaderOverrides = BTreeMap<String, String>;

/// HTTP verbs the service is driven with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verb {
    /// GET
    Read,
    /// POST
    Create,
    /// PATCH
    Modify,
}

impl Verb {
    pub fn method(&self) -> Method {
        match self {
            Verb::Read => Method::GET,
            Verb::Create => Method::POST,
            Verb::Modify => Method::PATCH,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Read => "GET",
            Verb::Create => "POST",
            Verb::Modify => "PATCH",
        }
    }

    /// Mutating verbs carry an object body
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Verb::Read)
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verb {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "get" | "read" => Ok(Verb::Read),
            "post" | "create" => Ok(Verb::Create),
            "patch" | "modify" => Ok(Verb::Modify),
            other => Err(Error::config(format!("Unsupported method: {}", other))),
        }
    }
}

/// Fully formed outgoing request
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub url: Url,
    pub verb: Verb,
    /// Lower-cased header names
    pub headers: BTreeMap<String, String>,
    /// Always `None` for reads
    pub body: Option<ActionBody>,
    /// Proxy the transport must route through
    pub proxy: Option<Url>,
}

impl RequestDescriptor {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn json_body(&self) -> Option<&Value> {
        self.body.as_ref().and_then(ActionBody::as_json)
    }

    /// Headers safe to log
    pub fn redacted_headers(&self) -> BTreeMap<&str, &str> {
        self.headers
            .iter()
            .map(|(name, value)| match name.as_str() {
                "authorization" | "cookie" => (name.as_str(), "<redacted>"),
                _ => (name.as_str(), value.as_str()),
            })
            .collect()
    }
}

/// Builds descriptors for one target service
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    origin: Url,
    api_version: String,
    registering: bool,
    proxy: Option<Url>,
    cookies: SessionCookieProvider,
}

impl RequestBuilder {
    /// Builder for `origin` (e.g. `https://discord.com`) and API version (e.g. `v9`)
    pub fn new(origin: Url, api_version: impl Into<String>, cookies: SessionCookieProvider) -> Self {
        Self {
            origin,
            api_version: api_version.into(),
            registering: false,
            proxy: None,
            cookies,
        }
    }

    /// Registration mode sends client properties as `x-track`
    pub fn registering(mut self, registering: bool) -> Self {
        self.registering = registering;
        self
    }

    /// Route every descriptor through `proxy`
    pub fn with_proxy(mut self, proxy: Option<Url>) -> Self {
        self.proxy = proxy;
        self
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn is_registering(&self) -> bool {
        self.registering
    }

    pub fn proxy(&self) -> Option<&Url> {
        self.proxy.as_ref()
    }

    pub fn cookies(&self) -> &SessionCookieProvider {
        &self.cookies
    }

    /// `{origin}/api/{version}/{path}`
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        let raw = format!(
            "{}/api/{}/{}",
            self.origin_str(),
            self.api_version,
            path.trim_start_matches('/')
        );
        Ok(Url::parse(&raw)?)
    }

    /// Assemble a request for `path`
    ///
    /// The body is validated before any network activity. The first call for
    /// an identity derives its session cookie.
    pub async fn build(
        &self,
        path: &str,
        body: Option<ActionBody>,
        identity: &ClientIdentity,
        verb: Verb,
        extra_headers: &HeaderOverrides,
    ) -> Result<RequestDescriptor> {
        let url = self.endpoint(path)?;
        let body = normalize_body(verb, body)?;
        validate_extra_headers(extra_headers)?;
        let cookie = self.cookies.resolve(identity).await?;

        let multipart = body.as_ref().is_some_and(ActionBody::is_multipart);
        let mut headers = self.canonical_headers(identity, cookie, multipart);
        for (name, value) in extra_headers {
            headers.insert(name.to_ascii_lowercase(), value.clone());
        }

        let descriptor = RequestDescriptor {
            url,
            verb,
            headers,
            body,
            proxy: self.proxy.clone(),
        };
        debug!(
            "Built {} {} headers={:?}",
            descriptor.verb,
            descriptor.url,
            descriptor.redacted_headers()
        );

        Ok(descriptor)
    }

    fn canonical_headers(
        &self,
        identity: &ClientIdentity,
        cookie: &str,
        multipart: bool,
    ) -> BTreeMap<String, String> {
        let origin = self.origin_str();
        let mut headers: BTreeMap<String, String> = [
            ("accept", "*/*".to_string()),
            ("accept-language", "en-US,en;q=0.9".to_string()),
            ("sec-ch-ua", identity.client_hints()),
            ("sec-ch-ua-mobile", "?0".to_string()),
            (
                "sec-ch-ua-platform",
                identity.platform().client_hint().to_string(),
            ),
            ("sec-fetch-dest", "empty".to_string()),
            ("sec-fetch-mode", "cors".to_string()),
            ("sec-fetch-site", "same-origin".to_string()),
            ("cookie", cookie.to_string()),
            ("referer", format!("{}/", origin)),
            (
                "referrer-policy",
                "strict-origin-when-cross-origin".to_string(),
            ),
            ("dnt", "1".to_string()),
            ("origin", origin.to_string()),
            ("user-agent", identity.user_agent().to_string()),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect();

        // Multipart bodies get their boundary content type from the transport
        if !multipart {
            headers.insert("content-type".into(), "application/json".into());
        }
        if let Some(fingerprint) = identity.fingerprint() {
            headers.insert("x-fingerprint".into(), fingerprint.to_string());
        }
        if let Some(properties) = identity.client_properties() {
            let name = if self.registering {
                "x-track"
            } else {
                "x-super-properties"
            };
            headers.insert(name.into(), properties.to_string());
        }
        if let Some(token) = identity.authorization() {
            headers.insert("authorization".into(), token.to_string());
        }

        headers
    }

    fn origin_str(&self) -> &str {
        self.origin.as_str().trim_end_matches('/')
    }
}

/// Reads drop the body; mutating verbs require an object or a multipart form
fn normalize_body(verb: Verb, body: Option<ActionBody>) -> Result<Option<ActionBody>> {
    if !verb.is_mutating() {
        if body.is_some() {
            debug!("Ignoring body passed to a {} request", verb);
        }
        return Ok(None);
    }

    match body {
        Some(ActionBody::Json(value)) if value.is_object() => Ok(Some(ActionBody::Json(value))),
        Some(ActionBody::Json(value)) => Err(Error::invalid_body(verb.as_str(), json_kind(&value))),
        Some(form @ ActionBody::Multipart(_)) => Ok(Some(form)),
        None => Err(Error::invalid_body(verb.as_str(), "no body")),
    }
}

/// Reject caller headers the transport could never send
fn validate_extra_headers(extra_headers: &HeaderOverrides) -> Result<()> {
    for (name, value) in extra_headers {
        HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| Error::config(format!("Invalid header name: {:?}", name)))?;
        HeaderValue::from_str(value)
            .map_err(|_| Error::config(format!("Invalid value for header {}", name)))?;
    }
    Ok(())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
