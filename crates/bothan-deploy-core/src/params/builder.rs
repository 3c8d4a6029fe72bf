//! Build the App Setup creation request from raw parameters.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::RawParams;
use crate::error::BuildError;
use crate::license::LicenseRegistry;

/// Tarball the metrics API is built from
pub const DEFAULT_SOURCE_TARBALL: &str = "https://github.com/theodi/bothan/tarball/master";

/// No certificate lookup is done; the app gets this placeholder.
pub const CERTIFICATE_URL_PLACEHOLDER: &str = "#";

pub const ENV_USERNAME: &str = "METRICS_API_USERNAME";
pub const ENV_PASSWORD: &str = "METRICS_API_PASSWORD";
pub const ENV_TITLE: &str = "METRICS_API_TITLE";
pub const ENV_DESCRIPTION: &str = "METRICS_API_DESCRIPTION";
pub const ENV_LICENSE_NAME: &str = "METRICS_API_LICENSE_NAME";
pub const ENV_LICENSE_URL: &str = "METRICS_API_LICENSE_URL";
pub const ENV_PUBLISHER_NAME: &str = "METRICS_API_PUBLISHER_NAME";
pub const ENV_PUBLISHER_URL: &str = "METRICS_API_PUBLISHER_URL";
pub const ENV_CERTIFICATE_URL: &str = "METRICS_API_CERTIFICATE_URL";

/// Every override key a creation request carries
pub const ENV_KEYS: [&str; 9] = [
    ENV_USERNAME,
    ENV_PASSWORD,
    ENV_TITLE,
    ENV_DESCRIPTION,
    ENV_LICENSE_NAME,
    ENV_LICENSE_URL,
    ENV_PUBLISHER_NAME,
    ENV_PUBLISHER_URL,
    ENV_CERTIFICATE_URL,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSpec {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceBlob {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overrides {
    pub env: BTreeMap<String, String>,
}

/// Body of `POST /app-setups`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreationRequest {
    pub app: AppSpec,
    pub source_blob: SourceBlob,
    pub overrides: Overrides,
}

impl CreationRequest {
    pub fn app_name(&self) -> &str {
        &self.app.name
    }

    pub fn env(&self, key: &str) -> Option<&str> {
        self.overrides.env.get(key).map(String::as_str)
    }
}

pub struct ParameterBuilder<'a> {
    licenses: &'a dyn LicenseRegistry,
    source_tarball: String,
}

impl<'a> ParameterBuilder<'a> {
    pub fn new(licenses: &'a dyn LicenseRegistry) -> Self {
        Self {
            licenses,
            source_tarball: DEFAULT_SOURCE_TARBALL.to_string(),
        }
    }

    pub fn with_source_tarball(mut self, url: impl Into<String>) -> Self {
        self.source_tarball = url.into();
        self
    }

    pub fn build(&self, raw: &RawParams) -> Result<CreationRequest, BuildError> {
        let name = required(&raw.name, "name")?;
        let username = required(&raw.username, "username")?;
        let password = required(&raw.password, "password")?;
        let license_id = required(&raw.license, "license")?;

        let license = self.licenses.resolve(license_id)?;

        let env: BTreeMap<String, String> = [
            (ENV_USERNAME, username.to_string()),
            (ENV_PASSWORD, password.to_string()),
            (ENV_TITLE, optional(&raw.title)),
            (ENV_DESCRIPTION, optional(&raw.description)),
            (ENV_LICENSE_NAME, license.title),
            (ENV_LICENSE_URL, license.url),
            (ENV_PUBLISHER_NAME, optional(&raw.publisher_name)),
            (ENV_PUBLISHER_URL, optional(&raw.publisher_url)),
            (ENV_CERTIFICATE_URL, CERTIFICATE_URL_PLACEHOLDER.to_string()),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect();

        Ok(CreationRequest {
            app: AppSpec {
                name: name.to_string(),
            },
            source_blob: SourceBlob {
                url: self.source_tarball.clone(),
            },
            overrides: Overrides { env },
        })
    }
}

/// Blank values count as missing; present values are kept as typed.
fn required<'p>(value: &'p Option<String>, field: &'static str) -> Result<&'p str, BuildError> {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(BuildError::MissingField(field)),
    }
}

fn optional(value: &Option<String>) -> String {
    value.as_deref().unwrap_or_default().to_string()
}
