//! Provisioning service contract
//!
//! The orchestrator only needs two calls: create an app setup and ask how it
//! is going. [`heroku`] implements them against the Heroku Platform API.

pub mod heroku;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{LookupError, ProvisioningError};
use crate::params::CreationRequest;

pub use heroku::{DEFAULT_API_URL, HerokuClient};

/// Identifier handed back by the create call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreationResult {
    pub id: String,
}

impl CreationResult {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Classified status of an app setup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusReport {
    Pending,
    Succeeded { url: String },
    Failed { message: String },
}

impl StatusReport {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, StatusReport::Pending)
    }
}

/// Message used when the platform reports failure without saying why
pub const UNSPECIFIED_FAILURE: &str = "App setup failed without a failure message";

/// Raw app setup resource as returned by the platform
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppSetupInfo {
    #[serde(default)]
    pub id: Option<String>,
    pub status: String,
    #[serde(default)]
    pub resolved_success_url: Option<String>,
    #[serde(default)]
    pub failure_message: Option<String>,
}

impl TryFrom<AppSetupInfo> for StatusReport {
    type Error = LookupError;

    fn try_from(info: AppSetupInfo) -> Result<Self, Self::Error> {
        match info.status.as_str() {
            "pending" => Ok(StatusReport::Pending),
            "succeeded" => match info.resolved_success_url {
                Some(url) if !url.is_empty() => Ok(StatusReport::Succeeded { url }),
                _ => Err(LookupError::MissingField {
                    status: "succeeded",
                    field: "resolved_success_url",
                }),
            },
            "failed" => Ok(StatusReport::Failed {
                message: info
                    .failure_message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| UNSPECIFIED_FAILURE.to_string()),
            }),
            other => Err(LookupError::UnexpectedStatus(other.to_string())),
        }
    }
}

/// Capability set the orchestrator needs from a provisioning service
#[async_trait]
pub trait ProvisioningClient: Send + Sync {
    async fn create(&self, request: &CreationRequest) -> Result<CreationResult, ProvisioningError>;

    async fn info(&self, id: &str) -> Result<StatusReport, LookupError>;
}
