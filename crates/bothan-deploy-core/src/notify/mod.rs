//! Notification channel contract
//!
//! A run ends by announcing its outcome on a real-time channel. Subscribers
//! receive either a `success` event with the app URL or a `failed` event with
//! a human-readable message.

pub mod pusher;
pub mod signing;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::error::PublishError;

pub use pusher::{DEFAULT_CHANNEL, PusherChannel, PusherClient};

pub const SUCCESS_EVENT: &str = "success";
pub const FAILED_EVENT: &str = "failed";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationEvent {
    Success { url: String },
    Failed { message: String },
}

impl NotificationEvent {
    pub fn name(&self) -> &'static str {
        match self {
            NotificationEvent::Success { .. } => SUCCESS_EVENT,
            NotificationEvent::Failed { .. } => FAILED_EVENT,
        }
    }

    pub fn payload(&self) -> Value {
        match self {
            NotificationEvent::Success { url } => json!({ "url": url }),
            NotificationEvent::Failed { message } => json!({ "message": message }),
        }
    }
}

#[async_trait]
pub trait NotificationChannel: Send + Sync {
    async fn publish(&self, event: &NotificationEvent) -> Result<(), PublishError>;
}
