//! Heroku Platform API client for app setups.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, Response, Url};
use serde::Deserialize;
use tracing::debug;

use super::{AppSetupInfo, CreationResult, ProvisioningClient, StatusReport};
use crate::error::{LookupError, ProvisioningError};
use crate::http::{self, ApiErrorBody};
use crate::params::CreationRequest;

pub const DEFAULT_API_URL: &str = "https://api.heroku.com";

const HEROKU_ACCEPT: &str = "application/vnd.heroku+json; version=3";

/// Create response; only the id is relied on
#[derive(Debug, Deserialize)]
struct CreatedAppSetup {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

/// App setup client authenticated with an OAuth bearer token
#[derive(Clone)]
pub struct HerokuClient {
    client: Client,
    api_url: String,
    token: String,
}

impl std::fmt::Debug for HerokuClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HerokuClient")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

impl HerokuClient {
    pub fn connect_oauth(
        token: impl Into<String>,
        api_url: impl Into<String>,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(http::new_client()?, token, api_url))
    }

    pub fn with_client(
        client: Client,
        token: impl Into<String>,
        api_url: impl Into<String>,
    ) -> Self {
        let api_url: String = api_url.into();
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// `/app-setups/<id>` with the id as a single encoded path segment
    fn setup_url(&self, id: &str) -> Result<Url, LookupError> {
        let mut url = Url::parse(&self.url("/app-setups"))
            .map_err(|e| LookupError::InvalidRequest(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| LookupError::InvalidRequest(format!("cannot use {} as a base URL", self.api_url)))?
            .push(id);
        Ok(url)
    }
}

#[async_trait]
impl ProvisioningClient for HerokuClient {
    async fn create(&self, request: &CreationRequest) -> Result<CreationResult, ProvisioningError> {
        let response = self
            .client
            .post(self.url("/app-setups"))
            .header(ACCEPT, HEROKU_ACCEPT)
            .bearer_auth(&self.token)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let (status, body) = error_parts(response).await;
            return Err(ProvisioningError::Api {
                status,
                id: body.id,
                message: body.message.unwrap_or_default(),
            });
        }

        let body = response.text().await?;
        let created: CreatedAppSetup = serde_json::from_str(&body)
            .map_err(|e| ProvisioningError::MalformedResponse(e.to_string()))?;
        let id = created
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ProvisioningError::MalformedResponse("response has no id".into()))?;

        debug!(app_setup = %id, status = ?created.status, "app setup created");
        Ok(CreationResult { id })
    }

    async fn info(&self, id: &str) -> Result<StatusReport, LookupError> {
        let response = self
            .client
            .get(self.setup_url(id)?)
            .header(ACCEPT, HEROKU_ACCEPT)
            .bearer_auth(&self.token)
            .send()
            .await?;

        if !response.status().is_success() {
            let (status, body) = error_parts(response).await;
            return Err(LookupError::Api {
                status,
                id: body.id,
                message: body.message.unwrap_or_default(),
            });
        }

        let body = response.text().await?;
        let info: AppSetupInfo = serde_json::from_str(&body)
            .map_err(|e| LookupError::MalformedResponse(e.to_string()))?;
        StatusReport::try_from(info)
    }
}

async fn error_parts(response: Response) -> (u16, ApiErrorBody) {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    (status, ApiErrorBody::parse(&body))
}
