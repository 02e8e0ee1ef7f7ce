//! Request facade
//!
//! Binds a [`RequestBuilder`] and a [`Transport`] together and exposes the
//! domain actions the payload constructs describe.

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

use super::{HeaderOverrides, NormalizedResult, RequestBuilder, Transport, Verb};
use crate::{
    Result,
    config::Settings,
    identity::ClientIdentity,
    payload::{ActionBody, InteractionPayload, MessagePayload, StatusPayload},
    session::{HttpCookieSource, SessionCookieProvider},
};

/// Builds and sends requests on behalf of caller-owned identities
#[derive(Debug, Clone)]
pub struct Requester {
    builder: RequestBuilder,
    transport: Arc<Transport>,
}

impl Requester {
    /// Requester whose cookies are bootstrapped from the configured origin
    pub fn new(settings: &Settings) -> Result<Self> {
        settings.validate()?;
        let origin = settings.origin()?;
        let proxy = settings.proxy_url()?;

        let transport = Transport::new(settings.api.timeout(), proxy.as_ref())?;
        let bootstrap_client = transport.client_for(proxy.as_ref())?;
        let cookies = SessionCookieProvider::new(HttpCookieSource::new(
            bootstrap_client,
            origin.clone(),
        ));

        let builder = RequestBuilder::new(origin, settings.api.api_version.clone(), cookies)
            .registering(settings.api.registering)
            .with_proxy(proxy);

        info!(
            "Requester ready for {} (api {}, proxy: {})",
            builder.origin(),
            builder.api_version(),
            builder.proxy().is_some()
        );

        Ok(Self::from_parts(builder, transport))
    }

    /// Assemble from pre-built parts, e.g. with a custom cookie source
    pub fn from_parts(builder: RequestBuilder, transport: Transport) -> Self {
        Self {
            builder,
            transport: Arc::new(transport),
        }
    }

    pub fn builder(&self) -> &RequestBuilder {
        &self.builder
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Build and execute a request against `path` under the API root
    ///
    /// Construction failures (invalid body, cookie derivation) are errors;
    /// everything after that is reported through [`NormalizedResult`].
    pub async fn fetch(
        &self,
        path: &str,
        body: Option<ActionBody>,
        identity: &ClientIdentity,
        verb: Verb,
        extra_headers: &HeaderOverrides,
    ) -> Result<NormalizedResult> {
        let descriptor = self
            .builder
            .build(path, body, identity, verb, extra_headers)
            .await?;
        Ok(self.transport.execute(descriptor).await)
    }

    /// Unshaped GET of an absolute URL through the session proxy
    pub async fn fetch_raw(&self, url: &str) -> Result<reqwest::Response> {
        debug!("Raw fetch of {}", url);
        let client = self.transport.client_for(self.builder.proxy())?;
        Ok(client.get(url).send().await?)
    }

    /// POST `channels/{channel_id}/messages`
    pub async fn send_message(
        &self,
        channel_id: &str,
        message: MessagePayload,
        identity: &ClientIdentity,
    ) -> Result<NormalizedResult> {
        let path = format!("channels/{}/messages", channel_id);
        self.fetch(
            &path,
            Some(message.into_body()?),
            identity,
            Verb::Create,
            &HeaderOverrides::new(),
        )
        .await
    }

    /// POST `interactions`
    pub async fn send_interaction(
        &self,
        interaction: InteractionPayload,
        identity: &ClientIdentity,
    ) -> Result<NormalizedResult> {
        self.fetch(
            "interactions",
            Some(interaction.into_body()?),
            identity,
            Verb::Create,
            &HeaderOverrides::new(),
        )
        .await
    }

    /// PATCH `users/@me/settings` with a custom status
    pub async fn set_custom_status(
        &self,
        status: StatusPayload,
        identity: &ClientIdentity,
    ) -> Result<NormalizedResult> {
        self.fetch(
            "users/@me/settings",
            Some(status.into_settings_body()),
            identity,
            Verb::Modify,
            &HeaderOverrides::new(),
        )
        .await
    }

    /// GET `users/@me`
    pub async fn current_user(&self, identity: &ClientIdentity) -> Result<Option<Value>> {
        let result = self
            .fetch("users/@me", None, identity, Verb::Read, &HeaderOverrides::new())
            .await?;
        Ok(result.as_json().cloned())
    }
}
