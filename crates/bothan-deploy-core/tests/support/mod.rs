//! Test doubles for the deployment collaborators.
//!
//! Every double writes to a shared journal so tests can assert the order of
//! side effects across collaborators.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use bothan_deploy_core::deploy::Wait;
use bothan_deploy_core::error::{LookupError, ProvisioningError, PublishError};
use bothan_deploy_core::notify::{NotificationChannel, NotificationEvent};
use bothan_deploy_core::params::{CreationRequest, RawParams};
use bothan_deploy_core::provision::{CreationResult, ProvisioningClient, StatusReport};

pub type Journal = Arc<Mutex<Vec<String>>>;

pub fn journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn entries(journal: &Journal) -> Vec<String> {
    journal.lock().unwrap().clone()
}

pub fn pending() -> Result<StatusReport, LookupError> {
    Ok(StatusReport::Pending)
}

pub fn succeeded(url: &str) -> Result<StatusReport, LookupError> {
    Ok(StatusReport::Succeeded { url: url.to_string() })
}

pub fn failed(message: &str) -> Result<StatusReport, LookupError> {
    Ok(StatusReport::Failed {
        message: message.to_string(),
    })
}

pub fn lookup_http_error(status: u16) -> Result<StatusReport, LookupError> {
    Err(LookupError::Api {
        status,
        id: None,
        message: format!("HTTP {}", status),
    })
}

pub fn form_params() -> RawParams {
    RawParams {
        name: Some("my-awesome-app".into()),
        username: Some("username".into()),
        password: Some("password".into()),
        title: Some("This is a title".into()),
        description: Some("Here is a description".into()),
        license: Some("CC-BY-4.0".into()),
        publisher_name: Some("Me".into()),
        publisher_url: Some("http://example.com".into()),
    }
}

/// Scripted provisioning service.
///
/// Status reports are handed out in order; asking for more than were
/// scripted panics, which catches polling past a terminal status.
pub struct FakeProvisioner {
    journal: Journal,
    id: String,
    reject_create: Option<u16>,
    statuses: Mutex<VecDeque<Result<StatusReport, LookupError>>>,
    requests: Mutex<Vec<CreationRequest>>,
    lookups: Mutex<Vec<String>>,
}

impl FakeProvisioner {
    pub fn new(journal: &Journal, statuses: Vec<Result<StatusReport, LookupError>>) -> Self {
        Self {
            journal: journal.clone(),
            id: "foo-bar".to_string(),
            reject_create: None,
            statuses: Mutex::new(statuses.into()),
            requests: Mutex::new(Vec::new()),
            lookups: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting_create(journal: &Journal, status: u16) -> Self {
        let mut fake = Self::new(journal, Vec::new());
        fake.reject_create = Some(status);
        fake
    }

    pub fn requests(&self) -> Vec<CreationRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProvisioningClient for FakeProvisioner {
    async fn create(&self, request: &CreationRequest) -> Result<CreationResult, ProvisioningError> {
        self.journal.lock().unwrap().push("create".to_string());
        self.requests.lock().unwrap().push(request.clone());
        if let Some(status) = self.reject_create {
            return Err(ProvisioningError::Api {
                status,
                id: Some("forbidden".into()),
                message: "You do not have access".into(),
            });
        }
        Ok(CreationResult::new(self.id.clone()))
    }

    async fn info(&self, id: &str) -> Result<StatusReport, LookupError> {
        self.journal.lock().unwrap().push("info".to_string());
        self.lookups.lock().unwrap().push(id.to_string());
        self.statuses
            .lock()
            .unwrap()
            .pop_front()
            .expect("status polled after the scripted reports ran out")
    }
}

/// Channel that records what was published
pub struct RecordingChannel {
    journal: Journal,
    fail: bool,
    events: Mutex<Vec<NotificationEvent>>,
}

impl RecordingChannel {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            fail: false,
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(journal: &Journal) -> Self {
        Self {
            fail: true,
            ..Self::new(journal)
        }
    }

    pub fn events(&self) -> Vec<NotificationEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationChannel for RecordingChannel {
    async fn publish(&self, event: &NotificationEvent) -> Result<(), PublishError> {
        self.journal
            .lock()
            .unwrap()
            .push(format!("publish:{}", event.name()));
        self.events.lock().unwrap().push(event.clone());
        if self.fail {
            return Err(PublishError::Api {
                status: 401,
                body: "Invalid signature".into(),
            });
        }
        Ok(())
    }
}

/// Wait that returns immediately and remembers each requested pause
#[derive(Default)]
pub struct CountingWait {
    waits: Mutex<Vec<Duration>>,
}

impl CountingWait {
    pub fn count(&self) -> usize {
        self.waits.lock().unwrap().len()
    }

    pub fn waits(&self) -> Vec<Duration> {
        self.waits.lock().unwrap().clone()
    }
}

#[async_trait]
impl Wait for CountingWait {
    async fn wait(&self, duration: Duration) {
        self.waits.lock().unwrap().push(duration);
    }
}
