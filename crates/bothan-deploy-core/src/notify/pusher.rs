//! Pusher Channels publisher
//!
//! Triggers events through Pusher's HTTP API. Only the single-channel
//! trigger endpoint is used.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde_json::json;
use tracing::debug;

use super::{NotificationChannel, NotificationEvent, signing};
use crate::error::PublishError;
use crate::http;

/// Channel the deploy form listens on
pub const DEFAULT_CHANNEL: &str = "app_status";

pub const DEFAULT_HOST: &str = "api.pusherapp.com";

/// `https://api-<cluster>.pusher.com`, or the legacy host without a cluster
pub fn base_url_for_cluster(cluster: Option<&str>) -> String {
    match cluster {
        Some(cluster) if !cluster.is_empty() => format!("https://api-{}.pusher.com", cluster),
        _ => format!("https://{}", DEFAULT_HOST),
    }
}

#[derive(Clone)]
pub struct PusherClient {
    client: Client,
    base_url: String,
    app_id: String,
    key: String,
    secret: String,
}

impl std::fmt::Debug for PusherClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PusherClient")
            .field("base_url", &self.base_url)
            .field("app_id", &self.app_id)
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl PusherClient {
    pub fn new(
        app_id: impl Into<String>,
        key: impl Into<String>,
        secret: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(
            http::new_client()?,
            app_id,
            key,
            secret,
            base_url,
        ))
    }

    pub fn with_client(
        client: Client,
        app_id: impl Into<String>,
        key: impl Into<String>,
        secret: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            app_id: app_id.into(),
            key: key.into(),
            secret: secret.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn channel(&self, name: impl Into<String>) -> PusherChannel {
        PusherChannel {
            client: self.clone(),
            name: name.into(),
        }
    }

    /// Trigger `event` on `channel` with `data` as the JSON-encoded payload
    pub async fn trigger(
        &self,
        channel: &str,
        event: &str,
        data: &serde_json::Value,
    ) -> Result<(), PublishError> {
        let body = serde_json::to_vec(&json!({
            "name": event,
            "channels": [channel],
            "data": serde_json::to_string(data)?,
        }))?;

        let path = format!("/apps/{}/events", self.app_id);
        let query = signing::signed_query(
            &self.key,
            &self.secret,
            "POST",
            &path,
            &body,
            chrono::Utc::now().timestamp(),
        );

        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .query(&query)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PublishError::Api {
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }

        debug!(channel, event, "pusher event triggered");
        Ok(())
    }
}

/// One named channel on a [`PusherClient`]
#[derive(Debug, Clone)]
pub struct PusherChannel {
    client: PusherClient,
    name: String,
}

impl PusherChannel {
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl NotificationChannel for PusherChannel {
    async fn publish(&self, event: &NotificationEvent) -> Result<(), PublishError> {
        self.client
            .trigger(&self.name, event.name(), &event.payload())
            .await
    }
}
