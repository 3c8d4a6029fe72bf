//! Create an app setup, poll it to a terminal status, announce the result.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::policy::PollPolicy;
use super::wait::{TokioWait, Wait};
use crate::error::{DeployError, DeployResult};
use crate::license::{LicenseRegistry, LicenseTable};
use crate::notify::{NotificationChannel, NotificationEvent};
use crate::params::{DEFAULT_SOURCE_TARBALL, ParameterBuilder, RawParams};
use crate::provision::{ProvisioningClient, StatusReport};

/// Terminal status of a finished app setup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Terminal {
    Succeeded { url: String },
    Failed { message: String },
}

impl Terminal {
    pub fn event(&self) -> NotificationEvent {
        match self {
            Terminal::Succeeded { url } => NotificationEvent::Success { url: url.clone() },
            Terminal::Failed { message } => NotificationEvent::Failed {
                message: message.clone(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Terminal::Succeeded { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployOutcome {
    /// App setup identifier
    pub id: String,
    pub terminal: Terminal,
    /// Status lookups made, failed ones included
    pub polls: u32,
}

/// Runs one deployment: `Submitting -> Polling -> Terminal`.
///
/// Side effects happen in a fixed order: one create call, zero or more
/// status lookups, then at most one publish.
pub struct Orchestrator {
    provisioner: Arc<dyn ProvisioningClient>,
    channel: Arc<dyn NotificationChannel>,
    licenses: Arc<dyn LicenseRegistry>,
    wait: Arc<dyn Wait>,
    policy: PollPolicy,
    source_tarball: String,
}

impl Orchestrator {
    pub fn new(
        provisioner: Arc<dyn ProvisioningClient>,
        channel: Arc<dyn NotificationChannel>,
    ) -> Self {
        Self {
            provisioner,
            channel,
            licenses: Arc::new(LicenseTable::builtin()),
            wait: Arc::new(TokioWait),
            policy: PollPolicy::default(),
            source_tarball: DEFAULT_SOURCE_TARBALL.to_string(),
        }
    }

    pub fn with_licenses(mut self, licenses: Arc<dyn LicenseRegistry>) -> Self {
        self.licenses = licenses;
        self
    }

    pub fn with_wait(mut self, wait: Arc<dyn Wait>) -> Self {
        self.wait = wait;
        self
    }

    pub fn with_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_source_tarball(mut self, url: impl Into<String>) -> Self {
        self.source_tarball = url.into();
        self
    }

    pub async fn perform(&self, raw: &RawParams) -> DeployResult<DeployOutcome> {
        let request = ParameterBuilder::new(self.licenses.as_ref())
            .with_source_tarball(self.source_tarball.clone())
            .build(raw)?;

        info!(app = %request.app_name(), "submitting app setup");
        let id = self.provisioner.create(&request).await?.id;
        info!(app_setup = %id, "app setup accepted, polling for status");

        let (terminal, polls) = match self.poll(&id).await {
            Ok(done) => done,
            Err(err) => {
                self.announce_abandoned(&id, &err).await;
                return Err(err);
            }
        };

        self.channel.publish(&terminal.event()).await?;

        match &terminal {
            Terminal::Succeeded { url } => {
                info!(app_setup = %id, polls, url = %url, "deployment succeeded")
            }
            Terminal::Failed { message } => {
                warn!(app_setup = %id, polls, message = %message, "deployment failed")
            }
        }

        Ok(DeployOutcome {
            id,
            terminal,
            polls,
        })
    }

    async fn poll(&self, id: &str) -> DeployResult<(Terminal, u32)> {
        let mut polls = 0u32;
        let mut failures = 0u32;

        loop {
            polls += 1;
            match self.provisioner.info(id).await {
                Ok(StatusReport::Pending) => {
                    failures = 0;
                    debug!(app_setup = %id, polls, "app setup pending");
                }
                Ok(StatusReport::Succeeded { url }) => {
                    return Ok((Terminal::Succeeded { url }, polls));
                }
                Ok(StatusReport::Failed { message }) => {
                    return Ok((Terminal::Failed { message }, polls));
                }
                Err(err) if err.is_retryable() && failures < self.policy.lookup_retries => {
                    failures += 1;
                    warn!(
                        app_setup = %id,
                        polls,
                        attempt = failures,
                        error = %err,
                        "status lookup failed, retrying"
                    );
                }
                Err(source) => {
                    return Err(DeployError::Lookup {
                        id: id.to_string(),
                        source,
                    });
                }
            }

            if polls >= self.policy.max_polls {
                return Err(DeployError::TimedOut {
                    id: id.to_string(),
                    polls,
                });
            }
            self.wait.wait(self.policy.interval()).await;
        }
    }

    /// Best-effort `failed` event once the platform has accepted the job but
    /// polling gave up. Publish errors here are logged, not returned.
    async fn announce_abandoned(&self, id: &str, err: &DeployError) {
        let message = match err {
            DeployError::TimedOut { .. } => {
                "Deployment is taking longer than expected; check the Heroku dashboard".to_string()
            }
            _ => "Could not check the deployment status; check the Heroku dashboard".to_string(),
        };
        warn!(app_setup = %id, error = %err, "giving up on app setup");

        if let Err(publish_err) = self
            .channel
            .publish(&NotificationEvent::Failed { message })
            .await
        {
            warn!(app_setup = %id, error = %publish_err, "failed to announce abandoned deployment");
        }
    }
}
