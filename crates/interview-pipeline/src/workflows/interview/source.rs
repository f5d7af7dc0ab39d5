use std::future::Future;
use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::domain::{Application, Assessment, AssessmentId};

const PRIMARY_ENDPOINT: &str = "applications-with-interviews";
const FALLBACK_ENDPOINT: &str = "applications";

/// Read-only access to the REST backend that owns applications and assessments.
pub trait ApplicationSource: Send + Sync {
    fn applications(&self) -> impl Future<Output = Result<Vec<Application>, SourceError>> + Send;

    fn assessment(
        &self,
        id: &AssessmentId,
    ) -> impl Future<Output = Result<Option<Assessment>, SourceError>> + Send;
}

/// Error raised while reading from the backend.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("upstream responded with {status} for {endpoint}")]
    Status { endpoint: String, status: u16 },
    #[error("upstream reported failure for {endpoint}")]
    Rejected { endpoint: String },
    #[error("upstream payload could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("source unavailable: {0}")]
    Unavailable(String),
}

impl SourceError {
    /// Errors where the backend answered but refused; the list fallback applies to these.
    fn is_upstream_refusal(&self) -> bool {
        matches!(self, SourceError::Status { .. } | SourceError::Rejected { .. })
    }
}

#[derive(Debug, Deserialize)]
struct ApplicationsEnvelope {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    applications: Vec<Value>,
}

/// HTTP source for the placement backend.
#[derive(Debug, Clone)]
pub struct RestApplicationSource {
    client: reqwest::Client,
    base_url: String,
}

impl RestApplicationSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn fetch_list(&self, endpoint: &str) -> Result<Vec<Application>, SourceError> {
        let response = self.client.get(self.url(endpoint)).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        let envelope: ApplicationsEnvelope = response.json().await?;
        if envelope.success == Some(false) {
            return Err(SourceError::Rejected {
                endpoint: endpoint.to_string(),
            });
        }

        Ok(decode_applications(envelope.applications))
    }
}

impl ApplicationSource for RestApplicationSource {
    async fn applications(&self) -> Result<Vec<Application>, SourceError> {
        match self.fetch_list(PRIMARY_ENDPOINT).await {
            Ok(applications) => Ok(applications),
            Err(err) if err.is_upstream_refusal() => {
                warn!(error = %err, "interview listing unavailable; falling back to plain applications");
                self.fetch_list(FALLBACK_ENDPOINT).await
            }
            Err(err) => Err(err),
        }
    }

    async fn assessment(&self, id: &AssessmentId) -> Result<Option<Assessment>, SourceError> {
        let endpoint = format!("assessments/{id}");
        let response = self.client.get(self.url(&endpoint)).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(SourceError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        let payload: Value = response.json().await?;
        decode_assessment(endpoint, payload)
    }
}

/// The backend answers either with the bare assessment or `{ success, assessment }`.
fn decode_assessment(endpoint: String, payload: Value) -> Result<Option<Assessment>, SourceError> {
    let Some(wrapped) = payload.get("assessment") else {
        return Ok(Some(serde_json::from_value(payload)?));
    };

    if payload.get("success").and_then(Value::as_bool) == Some(false) {
        return Err(SourceError::Rejected { endpoint });
    }
    if wrapped.is_null() {
        return Ok(None);
    }

    Ok(Some(Assessment::deserialize(wrapped)?))
}

/// Decodes each application independently so one malformed record cannot hide the rest.
pub fn decode_applications(raw: Vec<Value>) -> Vec<Application> {
    let total = raw.len();
    let applications: Vec<Application> = raw
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<Application>(value) {
            Ok(application) => Some(application),
            Err(err) => {
                warn!(error = %err, "skipping malformed application record");
                None
            }
        })
        .collect();

    debug!(total, decoded = applications.len(), "decoded application listing");
    applications
}
