use std::time::Duration;

use autopilot_core::{JobConfig, JobStatus, Preset, PresetId, PresetSettings, ProjectId};
use autopilot_logging::{autopilot_debug, autopilot_warn};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::wire::{
    PresetListResponse, ProjectFullResponse, QueueResponse, SavePresetRequest, StartJobRequest,
    StartJobResponse, StatusEnvelope, StatusPatch,
};
use crate::{ApiError, FailureKind, QueueSnapshot};

/// Status a dequeued project is reset to.
const DEQUEUED_STATUS: &str = "planning";

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Remote workflow service as consumed by the controller.
#[async_trait::async_trait]
pub trait WorkflowApi: Send + Sync {
    async fn start_job(&self, config: &JobConfig) -> Result<ProjectId, ApiError>;

    /// Current status of one project. A response without a status maps to
    /// the `processing` placeholder.
    async fn project_status(&self, project_id: ProjectId) -> Result<JobStatus, ApiError>;

    async fn queue(&self) -> Result<QueueSnapshot, ApiError>;

    async fn start_batch(&self) -> Result<(), ApiError>;

    async fn dequeue(&self, project_id: ProjectId) -> Result<(), ApiError>;

    async fn list_presets(&self) -> Result<Vec<Preset>, ApiError>;

    async fn save_preset(&self, name: &str, settings: &PresetSettings) -> Result<(), ApiError>;

    async fn delete_preset(&self, preset_id: PresetId) -> Result<(), ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestApi {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestApi {
    pub fn new(settings: &ApiSettings) -> Result<Self, ApiError> {
        let base_url = settings.base_url.trim().trim_end_matches('/').to_string();
        let parsed = reqwest::Url::parse(&base_url)
            .map_err(|err| ApiError::new(FailureKind::InvalidBaseUrl, err.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::new(
                FailureKind::InvalidBaseUrl,
                format!("unsupported scheme '{}'", parsed.scheme()),
            ));
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        autopilot_debug!("{} {}", method, url);
        self.client.request(method, url)
    }
}

#[async_trait::async_trait]
impl WorkflowApi for ReqwestApi {
    async fn start_job(&self, config: &JobConfig) -> Result<ProjectId, ApiError> {
        let body = StartJobRequest::from(config);
        let response = send(self.request(Method::POST, "/api/autopilot/start").json(&body)).await?;
        let response: StartJobResponse = read_json(response).await?;

        match (response.status.as_deref(), response.project_id) {
            (Some("ok"), Some(project_id)) => Ok(project_id),
            _ => Err(ApiError::new(
                FailureKind::Rejected,
                response
                    .error
                    .unwrap_or_else(|| "Failed to start".to_string()),
            )),
        }
    }

    async fn project_status(&self, project_id: ProjectId) -> Result<JobStatus, ApiError> {
        let path = format!("/api/projects/{project_id}/full");
        let response = send(self.request(Method::GET, &path)).await?;
        let response: ProjectFullResponse = read_json(response).await?;

        Ok(response
            .project
            .and_then(|project| project.status)
            .filter(|status| !status.is_empty())
            .map(JobStatus::from)
            .unwrap_or_else(JobStatus::processing))
    }

    async fn queue(&self) -> Result<QueueSnapshot, ApiError> {
        let response = send(self.request(Method::GET, "/api/autopilot/queue")).await?;
        let response: QueueResponse = read_json(response).await?;
        let count = response.count.unwrap_or(response.projects.len());
        Ok(QueueSnapshot {
            entries: response.projects,
            count,
        })
    }

    async fn start_batch(&self) -> Result<(), ApiError> {
        let response = send(self.request(Method::POST, "/api/autopilot/batch-start")).await?;
        let envelope: StatusEnvelope = read_json(response).await?;
        match envelope.status.as_deref() {
            Some("started") => Ok(()),
            other => Err(ApiError::new(
                FailureKind::Rejected,
                envelope
                    .error
                    .or(envelope.message)
                    .unwrap_or_else(|| format!("batch not started (status {other:?})")),
            )),
        }
    }

    async fn dequeue(&self, project_id: ProjectId) -> Result<(), ApiError> {
        let path = format!("/api/projects/{project_id}");
        let patch = StatusPatch {
            status: DEQUEUED_STATUS,
        };
        send(self.request(Method::PATCH, &path).json(&patch)).await?;
        Ok(())
    }

    async fn list_presets(&self) -> Result<Vec<Preset>, ApiError> {
        let response = send(self.request(Method::GET, "/api/autopilot/presets")).await?;
        let response: PresetListResponse = read_json(response).await?;

        let presets = response
            .presets
            .into_iter()
            .map(|raw| Preset {
                id: raw.id,
                settings: decode_settings(raw.id, raw.settings),
                name: raw.name,
            })
            .collect();
        Ok(presets)
    }

    async fn save_preset(&self, name: &str, settings: &PresetSettings) -> Result<(), ApiError> {
        let body = SavePresetRequest { name, settings };
        let response = send(self.request(Method::POST, "/api/autopilot/presets").json(&body)).await?;
        expect_ok(read_json(response).await?)
    }

    async fn delete_preset(&self, preset_id: PresetId) -> Result<(), ApiError> {
        let path = format!("/api/autopilot/presets/{preset_id}");
        let response = send(self.request(Method::DELETE, &path)).await?;
        expect_ok(read_json(response).await?)
    }
}

/// Decodes a stored settings blob, skipping keys whose values have the
/// wrong type so the rest of the preset still applies.
fn decode_settings(preset_id: PresetId, value: serde_json::Value) -> PresetSettings {
    let fields = match value {
        serde_json::Value::Null => return PresetSettings::default(),
        serde_json::Value::Object(fields) => fields,
        other => {
            autopilot_warn!("Preset {} settings are not an object: {}", preset_id, other);
            return PresetSettings::default();
        }
    };

    let readable: serde_json::Map<String, serde_json::Value> = fields
        .into_iter()
        .filter(|(key, value)| {
            let single = serde_json::Value::Object(
                [(key.clone(), value.clone())].into_iter().collect(),
            );
            match serde_json::from_value::<PresetSettings>(single) {
                Ok(_) => true,
                Err(err) => {
                    autopilot_warn!("Preset {} ignores setting {}: {}", preset_id, key, err);
                    false
                }
            }
        })
        .collect();

    serde_json::from_value(serde_json::Value::Object(readable)).unwrap_or_else(|err| {
        autopilot_warn!("Preset {} has unreadable settings: {}", preset_id, err);
        PresetSettings::default()
    })
}

/// Sends the request and rejects non-success statuses, preferring the
/// backend's own `error` text when the body carries one.
async fn send(request: RequestBuilder) -> Result<Response, ApiError> {
    let response = request.send().await.map_err(map_reqwest_error)?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<StatusEnvelope>(&body)
        .ok()
        .and_then(|envelope| envelope.error)
        .unwrap_or_else(|| status.to_string());
    Err(ApiError::new(FailureKind::HttpStatus(status.as_u16()), message))
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let bytes = response.bytes().await.map_err(map_reqwest_error)?;
    serde_json::from_slice(&bytes).map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
}

fn expect_ok(envelope: StatusEnvelope) -> Result<(), ApiError> {
    match envelope.status.as_deref() {
        Some("ok") => Ok(()),
        _ => Err(ApiError::new(
            FailureKind::Rejected,
            envelope
                .error
                .unwrap_or_else(|| "request rejected".to_string()),
        )),
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ApiError::new(FailureKind::Decode, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
