//! Request execution
//!
//! [`Transport`] never fails past its boundary: every outcome, including
//! transport-level failures, comes back as a [`NormalizedResult`].

use reqwest::{
    Client,
    multipart::{Form, Part},
};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::RequestDescriptor;
use crate::{
    Error, Result,
    payload::{ActionBody, MultipartForm},
};

/// Outcome of one request
#[derive(Debug)]
pub enum NormalizedResult {
    /// Response body parsed as JSON
    Json(Value),
    /// Status code of a response whose body was not JSON
    Status(u16),
    /// The request did not complete
    NetworkError(NetworkFailure),
}

impl NormalizedResult {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status(code) => Some(*code),
            _ => None,
        }
    }

    pub fn is_network_error(&self) -> bool {
        matches!(self, Self::NetworkError(_))
    }

    /// JSON rendering; network failures use the `internalError` envelope
    pub fn to_json(&self) -> Value {
        match self {
            Self::Json(value) => value.clone(),
            Self::Status(code) => json!(code),
            Self::NetworkError(failure) => json!({
                "internalError": true,
                "error": failure.to_string(),
            }),
        }
    }
}

/// Transport-level failure with its underlying cause
#[derive(Debug)]
pub struct NetworkFailure {
    source: Error,
}

impl NetworkFailure {
    pub fn new(source: impl Into<Error>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// The target or proxy refused or dropped the connection
    pub fn is_connect(&self) -> bool {
        matches!(&self.source, Error::Network(e) if e.is_connect())
    }

    pub fn source(&self) -> &Error {
        &self.source
    }
}

impl std::fmt::Display for NetworkFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl From<Error> for NormalizedResult {
    fn from(error: Error) -> Self {
        Self::NetworkError(NetworkFailure::new(error))
    }
}

impl From<reqwest::Error> for NormalizedResult {
    fn from(error: reqwest::Error) -> Self {
        Self::NetworkError(NetworkFailure::new(error))
    }
}

/// Executes request descriptors
///
/// Holds a direct client and, when configured, one client bound to the
/// session proxy. Both are shared read-only across requests.
#[derive(Debug, Clone)]
pub struct Transport {
    direct: Client,
    proxied: Option<(Url, Client)>,
    timeout: Duration,
}

impl Transport {
    pub fn new(timeout: Duration, proxy: Option<&Url>) -> Result<Self> {
        let direct = build_client(timeout, None)?;
        let proxied = match proxy {
            Some(url) => Some((url.clone(), build_client(timeout, Some(url))?)),
            None => None,
        };

        Ok(Self {
            direct,
            proxied,
            timeout,
        })
    }

    /// Client routing through `proxy`, or the direct client
    pub fn client_for(&self, proxy: Option<&Url>) -> Result<Client> {
        match (proxy, &self.proxied) {
            (None, _) => Ok(self.direct.clone()),
            (Some(wanted), Some((url, client))) if wanted == url => Ok(client.clone()),
            (Some(wanted), _) => build_client(self.timeout, Some(wanted)),
        }
    }

    /// Perform the request and normalize the outcome
    pub async fn execute(&self, descriptor: RequestDescriptor) -> NormalizedResult {
        let RequestDescriptor {
            url,
            verb,
            headers,
            body,
            proxy,
        } = descriptor;

        let client = match self.client_for(proxy.as_ref()) {
            Ok(client) => client,
            Err(e) => {
                warn!("Could not prepare client for {}: {}", url, e);
                return e.into();
            }
        };

        let mut request = client.request(verb.method(), url.clone());
        for (name, value) in &headers {
            request = request.header(name.as_str(), value.as_str());
        }
        request = match body {
            None => request,
            Some(ActionBody::Json(value)) => request.body(value.to_string()),
            Some(ActionBody::Multipart(form)) => match into_reqwest_form(form) {
                Ok(form) => request.multipart(form),
                Err(e) => return e.into(),
            },
        };

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("{} {} failed: {}", verb, url, e);
                return e.into();
            }
        };

        let status = response.status().as_u16();
        match response.bytes().await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(value) => NormalizedResult::Json(value),
                Err(_) => {
                    debug!("{} {} answered {} without a JSON body", verb, url, status);
                    NormalizedResult::Status(status)
                }
            },
            Err(e) => e.into(),
        }
    }
}

fn build_client(timeout: Duration, proxy: Option<&Url>) -> Result<Client> {
    let mut builder = Client::builder().timeout(timeout);
    // Routing follows the configured proxy only; environment proxies are
    // folded into the settings before this point.
    builder = match proxy {
        Some(url) => {
            let proxy = reqwest::Proxy::all(url.as_str())
                .map_err(|e| Error::proxy(format!("{}: {}", url, e)))?;
            builder.proxy(proxy)
        }
        None => builder.no_proxy(),
    };
    Ok(builder.build()?)
}

fn into_reqwest_form(form: MultipartForm) -> std::result::Result<Form, reqwest::Error> {
    let mut out = Form::new();
    for part in form.into_parts() {
        let mut field = Part::bytes(part.data).mime_str(&part.content_type)?;
        if let Some(filename) = part.filename {
            field = field.file_name(filename);
        }
        out = out.part(part.name, field);
    }
    Ok(out)
}
