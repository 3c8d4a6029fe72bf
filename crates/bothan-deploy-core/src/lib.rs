//! Bothan Deploy Core Library
//!
//! Provisions a Bothan metrics API on Heroku from a deploy form, waits for
//! the app setup to finish and announces the outcome on a Pusher channel.

pub mod config;
pub mod deploy;
pub mod error;
pub mod http;
pub mod license;
pub mod notify;
pub mod params;
pub mod provision;

/// Re-exports of commonly used types
pub mod prelude {
    // Configuration
    pub use crate::config::{DeployConfig, PusherConfig};

    // Orchestration
    pub use crate::deploy::{
        DeployOutcome, NoWait, Orchestrator, PollPolicy, Terminal, TokioWait, Wait,
    };

    // Errors
    pub use crate::error::{
        BuildError, DeployError, DeployResult, LookupError, ProvisioningError, PublishError,
        UnknownLicense,
    };

    // Parameters
    pub use crate::params::{CreationRequest, ParameterBuilder, RawParams};

    // Collaborators
    pub use crate::license::{License, LicenseRegistry, LicenseTable};
    pub use crate::notify::{NotificationChannel, NotificationEvent};
    pub use crate::provision::{CreationResult, ProvisioningClient, StatusReport};
}
