//! Deployment parameters
//!
//! [`RawParams`] is the flat form a user fills in; [`builder`] turns it into
//! the structured [`CreationRequest`] sent to the provisioning service.

pub mod builder;

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub use builder::{
    CERTIFICATE_URL_PLACEHOLDER, CreationRequest, DEFAULT_SOURCE_TARBALL, ENV_KEYS, ParameterBuilder,
};

/// User-supplied fields, keyed the way the deploy form submits them
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawParams {
    pub name: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub license: Option<String>,
    pub publisher_name: Option<String>,
    pub publisher_url: Option<String>,
}

impl RawParams {
    /// Collect known keys from a flat map. Unknown keys are ignored.
    pub fn from_map(map: &HashMap<String, String>) -> Self {
        let get = |key: &str| map.get(key).cloned();
        Self {
            name: get("name"),
            username: get("username"),
            password: get("password"),
            title: get("title"),
            description: get("description"),
            license: get("license"),
            publisher_name: get("publisherName"),
            publisher_url: get("publisherUrl"),
        }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Overlay fields that are set in `other`
    pub fn merge(&mut self, other: RawParams) {
        fn take(slot: &mut Option<String>, value: Option<String>) {
            if value.is_some() {
                *slot = value;
            }
        }
        take(&mut self.name, other.name);
        take(&mut self.username, other.username);
        take(&mut self.password, other.password);
        take(&mut self.title, other.title);
        take(&mut self.description, other.description);
        take(&mut self.license, other.license);
        take(&mut self.publisher_name, other.publisher_name);
        take(&mut self.publisher_url, other.publisher_url);
    }
}

impl fmt::Debug for RawParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawParams")
            .field("name", &self.name)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("title", &self.title)
            .field("description", &self.description)
            .field("license", &self.license)
            .field("publisher_name", &self.publisher_name)
            .field("publisher_url", &self.publisher_url)
            .finish()
    }
}
