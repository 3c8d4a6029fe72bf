//! Shared HTTP client construction.

use std::time::Duration;

use reqwest::{Client, ClientBuilder};

/// Per-request timeout for platform and channel calls
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// `bothan-deploy/<version>`
pub fn user_agent() -> String {
    format!("bothan-deploy/{}", env!("CARGO_PKG_VERSION"))
}

pub fn builder() -> ClientBuilder {
    Client::builder()
        .user_agent(user_agent())
        .timeout(DEFAULT_TIMEOUT)
}

pub fn new_client() -> Result<Client, reqwest::Error> {
    builder().build()
}

/// Heroku-style error body: `{"id": "...", "message": "..."}`
#[derive(Debug, Default, serde::Deserialize)]
pub(crate) struct ApiErrorBody {
    pub id: Option<String>,
    pub message: Option<String>,
}

impl ApiErrorBody {
    /// Best-effort decode; falls back to the raw body as the message.
    pub(crate) fn parse(body: &str) -> Self {
        match serde_json::from_str::<ApiErrorBody>(body) {
            Ok(parsed) if parsed.message.is_some() => parsed,
            _ => ApiErrorBody {
                id: None,
                message: Some(body.trim().to_string()),
            },
        }
    }
}
