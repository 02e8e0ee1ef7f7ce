//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

#![allow(dead_code)]

/// Test helper functions
pub mod helpers {
    use async_trait::async_trait;
    use disguise::{
        ClientIdentity, RequestBuilder, Requester, Result, SessionCookieProvider, Settings,
        request::Transport, session::CookieSource,
    };
    use std::time::Duration;
    use url::Url;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    pub const BOOTSTRAP_COOKIE: &str = "__dcfduid=abc; __sdcfduid=def; locale=en-US";

    /// Settings pointing at the mock server with no proxy
    pub fn settings_for(server: &MockServer) -> Settings {
        let mut settings = Settings::default();
        settings.api.base_url = server.uri();
        settings.api.timeout_secs = 5;
        settings.network.proxy = None;
        settings
    }

    /// Identity with a token and client properties
    pub fn test_identity() -> ClientIdentity {
        ClientIdentity::builder()
            .authorization("test-token")
            .with_client_properties()
            .build()
    }

    /// Serve the bootstrap page with two session cookies
    pub async fn mount_bootstrap(server: &MockServer, expected_calls: u64) {
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .append_header("set-cookie", "__dcfduid=abc; Path=/; HttpOnly")
                    .append_header("set-cookie", "__sdcfduid=def; Path=/; Secure"),
            )
            .expect(expected_calls)
            .mount(server)
            .await;
    }

    /// Cookie source that never touches the network
    #[derive(Debug)]
    pub struct FixedCookie(pub &'static str);

    #[async_trait]
    impl CookieSource for FixedCookie {
        async fn bootstrap(&self, _identity: &ClientIdentity) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    /// Requester for `origin` that uses a fixed cookie
    pub fn offline_requester(origin: &str) -> Requester {
        let builder = RequestBuilder::new(
            Url::parse(origin).unwrap(),
            "v9",
            SessionCookieProvider::new(FixedCookie(BOOTSTRAP_COOKIE)),
        );
        let transport = Transport::new(Duration::from_secs(2), None).unwrap();
        Requester::from_parts(builder, transport)
    }
}
