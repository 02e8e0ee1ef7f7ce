//! Session cookie derivation
//!
//! The service expects the cookies its web origin sets on first visit. They
//! are obtained once per identity through a bootstrap exchange and memoized
//! in the identity's one-shot cell. Concurrent resolvers wait for the single
//! in-flight exchange; a failed exchange leaves the cell empty so the next
//! request retries.

use async_trait::async_trait;
use reqwest::{Client, header};
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

use crate::{Error, Result, identity::ClientIdentity};

/// Locale cookie the web client always adds
pub const LOCALE_COOKIE: &str = "locale=en-US";

/// Performs the bootstrap exchange that yields a cookie header value
#[async_trait]
pub trait CookieSource: Send + Sync + std::fmt::Debug {
    async fn bootstrap(&self, identity: &ClientIdentity) -> Result<String>;
}

/// Bootstrap by visiting the service's web origin and collecting `Set-Cookie`
#[derive(Debug, Clone)]
pub struct HttpCookieSource {
    client: Client,
    origin: Url,
}

impl HttpCookieSource {
    /// `client` should already route through the session's proxy
    pub fn new(client: Client, origin: Url) -> Self {
        Self { client, origin }
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }
}

#[async_trait]
impl CookieSource for HttpCookieSource {
    async fn bootstrap(&self, identity: &ClientIdentity) -> Result<String> {
        let response = self
            .client
            .get(self.origin.clone())
            .header(header::USER_AGENT, identity.user_agent())
            .header(header::ACCEPT, "text/html,application/xhtml+xml")
            .send()
            .await
            .map_err(|e| Error::cookie(format!("bootstrap request failed: {}", e)))?;

        let status = response.status();
        let pairs: Vec<String> = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter_map(cookie_pair)
            .collect();

        if pairs.is_empty() {
            return Err(Error::cookie(format!(
                "{} answered {} without Set-Cookie headers",
                self.origin, status
            )));
        }

        Ok(compose_cookie_header(&pairs))
    }
}

/// `name=value` part of a `Set-Cookie` header
fn cookie_pair(set_cookie: &str) -> Option<String> {
    let pair = set_cookie.split(';').next()?.trim();
    match pair.split_once('=') {
        Some((name, _)) if !name.trim().is_empty() => Some(pair.to_string()),
        _ => None,
    }
}

/// Join cookie pairs the way a browser sends them back
pub fn compose_cookie_header(pairs: &[String]) -> String {
    let mut parts: Vec<&str> = pairs.iter().map(String::as_str).collect();
    if !parts.iter().any(|p| p.starts_with("locale=")) {
        parts.push(LOCALE_COOKIE);
    }
    parts.join("; ")
}

/// Resolves and memoizes the session cookie of each identity
#[derive(Debug, Clone)]
pub struct SessionCookieProvider {
    source: Arc<dyn CookieSource>,
}

impl SessionCookieProvider {
    pub fn new(source: impl CookieSource + 'static) -> Self {
        Self {
            source: Arc::new(source),
        }
    }

    /// Cookie for `identity`, deriving it on first use
    pub async fn resolve<'a>(&self, identity: &'a ClientIdentity) -> Result<&'a str> {
        let cookie = identity
            .cookie_cell()
            .get_or_try_init(|| async {
                debug!(
                    "Deriving session cookie for session {}",
                    identity.session_uid()
                );
                match self.source.bootstrap(identity).await {
                    Ok(cookie) => {
                        info!("Session cookie derived for session {}", identity.session_uid());
                        Ok(cookie)
                    }
                    Err(e) => {
                        warn!("Session cookie derivation failed, will retry: {}", e);
                        Err(e)
                    }
                }
            })
            .await?;

        Ok(cookie.as_str())
    }

    /// Whether `identity` already holds a derived cookie
    pub fn is_resolved(&self, identity: &ClientIdentity) -> bool {
        identity.cookie_cell().initialized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Debug, Default)]
    struct CountingSource {
        calls: AtomicUsize,
        failing: AtomicBool,
    }

    #[async_trait]
    impl CookieSource for Arc<CountingSource> {
        async fn bootstrap(&self, _identity: &ClientIdentity) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            if self.failing.load(Ordering::SeqCst) {
                Err(Error::cookie("forced failure"))
            } else {
                Ok("__dcfduid=abc; locale=en-US".to_string())
            }
        }
    }

    #[tokio::test]
    async fn test_resolution_is_memoized() {
        let source = Arc::new(CountingSource::default());
        let provider = SessionCookieProvider::new(source.clone());
        let identity = ClientIdentity::builder().build();

        let first = provider.resolve(&identity).await.unwrap().to_string();
        let second = provider.resolve(&identity).await.unwrap().to_string();

        assert_eq!(first, second);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert!(provider.is_resolved(&identity));
        assert_eq!(identity.cached_cookie(), Some(first.as_str()));
    }

    #[tokio::test]
    async fn test_failure_is_not_cached() {
        let source = Arc::new(CountingSource::default());
        source.failing.store(true, Ordering::SeqCst);
        let provider = SessionCookieProvider::new(source.clone());
        let identity = ClientIdentity::builder().build();

        let err = provider.resolve(&identity).await.unwrap_err();
        assert!(matches!(err, Error::CookieDerivation { .. }));
        assert!(!provider.is_resolved(&identity));

        source.failing.store(false, Ordering::SeqCst);
        assert!(provider.resolve(&identity).await.is_ok());
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_concurrent_resolvers_share_one_exchange() {
        let source = Arc::new(CountingSource::default());
        let provider = SessionCookieProvider::new(source.clone());
        let identity = ClientIdentity::builder().build();

        let (a, b, c) = tokio::join!(
            provider.resolve(&identity),
            provider.resolve(&identity),
            provider.resolve(&identity)
        );

        assert!(a.is_ok() && b.is_ok() && c.is_ok());
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cookies_are_per_identity() {
        let source = Arc::new(CountingSource::default());
        let provider = SessionCookieProvider::new(source.clone());
        let first = ClientIdentity::builder().build();
        let second = ClientIdentity::builder().build();

        provider.resolve(&first).await.unwrap();
        provider.resolve(&second).await.unwrap();

        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_cookie_pair_parsing() {
        assert_eq!(
            cookie_pair("__dcfduid=3e83; Expires=Tue, 01 Jan 2030 00:00:00 GMT; HttpOnly"),
            Some("__dcfduid=3e83".to_string())
        );
        assert_eq!(cookie_pair("=orphan; Path=/"), None);
        assert_eq!(cookie_pair("garbage"), None);
    }

    #[test]
    fn test_compose_appends_locale_once() {
        let header = compose_cookie_header(&["a=1".to_string(), "b=2".to_string()]);
        assert_eq!(header, "a=1; b=2; locale=en-US");

        let header = compose_cookie_header(&["locale=de".to_string()]);
        assert_eq!(header, "locale=de");
    }
}
