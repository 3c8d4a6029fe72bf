//! Deployment orchestration
//!
//! [`Orchestrator`] drives a single run against injected collaborators.
//! [`perform`] wires the Heroku and Pusher adapters from configuration.

pub mod orchestrator;
pub mod policy;
pub mod wait;

use std::sync::Arc;

use anyhow::Context;

use crate::config::DeployConfig;
use crate::license::LicenseTable;
use crate::params::RawParams;
use crate::provision::HerokuClient;

pub use orchestrator::{DeployOutcome, Orchestrator, Terminal};
pub use policy::PollPolicy;
pub use wait::{NoWait, TokioWait, Wait};

/// Build an orchestrator from configuration and a Heroku OAuth token
pub fn orchestrator_from_config(config: &DeployConfig, token: &str) -> anyhow::Result<Orchestrator> {
    let heroku = HerokuClient::connect_oauth(token, config.heroku.api_url.clone())
        .context("Failed to build Heroku HTTP client")?;
    let channel = config.pusher.client()?.channel(config.pusher.channel.clone());

    Ok(Orchestrator::new(Arc::new(heroku), Arc::new(channel))
        .with_licenses(Arc::new(LicenseTable::with_extras(&config.licenses)))
        .with_policy(config.poll)
        .with_source_tarball(config.source.tarball_url.clone()))
}

/// Deploy one app with the user's token and form parameters
pub async fn perform(
    config: &DeployConfig,
    token: &str,
    raw: &RawParams,
) -> anyhow::Result<DeployOutcome> {
    let orchestrator = orchestrator_from_config(config, token)?;
    let outcome = orchestrator.perform(raw).await?;
    Ok(outcome)
}
