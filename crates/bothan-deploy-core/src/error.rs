//! Error types for deployment runs.
//!
//! Each collaborator has its own error so the orchestrator can tell a
//! rejected creation apart from a flaky status lookup or a lost notification.

use thiserror::Error;

/// A license identifier the registry does not know about.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown license identifier: {id}")]
pub struct UnknownLicense {
    pub id: String,
}

impl UnknownLicense {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Failures while turning raw parameters into a creation request.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("missing required parameter: {0}")]
    MissingField(&'static str),

    #[error(transparent)]
    UnknownLicense(#[from] UnknownLicense),
}

/// Failures of the create call.
#[derive(Debug, Error)]
pub enum ProvisioningError {
    #[error("provisioning request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provisioning API returned HTTP {status}: {message}")]
    Api {
        status: u16,
        id: Option<String>,
        message: String,
    },

    #[error("malformed provisioning response: {0}")]
    MalformedResponse(String),
}

/// Failures of a single status lookup.
///
/// These describe the call itself failing. A deployment that the platform
/// reports as failed is a [`crate::provision::StatusReport::Failed`], not an
/// error.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("status request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("status API returned HTTP {status}: {message}")]
    Api {
        status: u16,
        id: Option<String>,
        message: String,
    },

    #[error("unexpected deployment status '{0}'")]
    UnexpectedStatus(String),

    #[error("status '{status}' is missing field '{field}'")]
    MissingField {
        status: &'static str,
        field: &'static str,
    },

    #[error("malformed status response: {0}")]
    MalformedResponse(String),

    #[error("cannot build status request: {0}")]
    InvalidRequest(String),
}

impl LookupError {
    /// Whether asking again could plausibly give a different answer.
    pub fn is_retryable(&self) -> bool {
        match self {
            LookupError::Transport(err) => !err.is_decode() && !err.is_builder(),
            LookupError::Api { status, .. } => *status == 429 || *status >= 500,
            LookupError::UnexpectedStatus(_)
            | LookupError::MissingField { .. }
            | LookupError::MalformedResponse(_)
            | LookupError::InvalidRequest(_) => false,
        }
    }
}

/// Failures delivering a notification.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("publish request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("notification API returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("failed to encode notification payload: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors that end a deployment run without a normal terminal status.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("invalid deployment parameters: {0}")]
    Build(#[from] BuildError),

    #[error("failed to create app setup: {0}")]
    Provisioning(#[from] ProvisioningError),

    #[error("failed to look up status of app setup {id}: {source}")]
    Lookup {
        id: String,
        #[source]
        source: LookupError,
    },

    #[error("app setup {id} did not finish after {polls} status checks")]
    TimedOut { id: String, polls: u32 },

    #[error("failed to publish notification: {0}")]
    Publish(#[from] PublishError),
}

pub type DeployResult<T> = Result<T, DeployError>;
