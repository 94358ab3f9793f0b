//! HTTP model provider client.
//!
//! Speaks the provider's REST surface: model containers under `/v1/models`,
//! training runs under versioned trainer paths, predictions under
//! `/v1/predictions`. Inference is asynchronous on the wire, so
//! [`HttpModelProvider::run_inference`] creates a prediction and waits for
//! it to settle before returning.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::{ForgeError, ForgeResult};
use crate::http::{HttpClient, HttpError};
use crate::polling::{calculate_backoff, BackoffConfig};

use super::types::{
    CreateModelOutcome, InferenceRequest, ModelSpec, ModelWire, PredictionWire, RemoteJob,
    TrainingRequest, TrainingWire,
};
use super::ModelProvider;

/// Model container endpoint root.
const MODELS_ENDPOINT: &str = "/v1/models";

/// Training job endpoint root.
const TRAININGS_ENDPOINT: &str = "/v1/trainings";

/// Prediction endpoint root.
const PREDICTIONS_ENDPOINT: &str = "/v1/predictions";

/// Default ceiling on how long one inference call may wait to settle.
const DEFAULT_INFERENCE_WAIT_SECS: u64 = 600;

/// HTTP implementation of [`ModelProvider`].
pub struct HttpModelProvider {
    http: HttpClient,
    backoff: BackoffConfig,
    inference_wait: Duration,
}

impl HttpModelProvider {
    /// Create a new provider client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Provider API base URL
    /// * `api_key` - Bearer token
    /// * `timeout_secs` - Per-request timeout in seconds
    pub fn new(base_url: &str, api_key: &str, timeout_secs: u64) -> ForgeResult<Self> {
        let http = HttpClient::new(base_url, api_key, timeout_secs)
            .map_err(|e| ForgeError::Internal(format!("failed to create http client: {}", e)))?;
        Ok(Self {
            http,
            backoff: BackoffConfig::default(),
            inference_wait: Duration::from_secs(DEFAULT_INFERENCE_WAIT_SECS),
        })
    }

    /// Override the prediction settle-wait cadence.
    pub fn with_poll_config(mut self, backoff: BackoffConfig, inference_wait: Duration) -> Self {
        self.backoff = backoff;
        self.inference_wait = inference_wait;
        self
    }

    async fn wait_for_prediction(&self, first: PredictionWire) -> ForgeResult<Vec<String>> {
        let deadline = Instant::now() + self.inference_wait;
        let mut prediction = first;

        loop {
            let status = prediction.status();
            if status.is_terminal() {
                if status.is_success() {
                    let urls = prediction.output_urls();
                    if urls.is_empty() {
                        return Err(ForgeError::Protocol(format!(
                            "prediction {} succeeded without output",
                            prediction.id
                        )));
                    }
                    return Ok(urls);
                }
                let message = prediction
                    .error
                    .as_deref()
                    .unwrap_or("inference reported a terminal failure");
                return Err(ForgeError::training(&prediction.id, message));
            }

            if Instant::now() >= deadline {
                return Err(ForgeError::timeout(format!(
                    "prediction {} did not settle within {}s",
                    prediction.id,
                    self.inference_wait.as_secs()
                )));
            }

            tokio::time::sleep(calculate_backoff(&self.backoff, 0)).await;

            let path = format!("{}/{}", PREDICTIONS_ENDPOINT, prediction.id);
            prediction = self
                .http
                .get(&path, None)
                .await
                .map_err(map_http_error)?;
        }
    }
}

#[async_trait]
impl ModelProvider for HttpModelProvider {
    async fn create_model(
        &self,
        owner: &str,
        name: &str,
        spec: &ModelSpec,
    ) -> ForgeResult<CreateModelOutcome> {
        let mut body = serde_json::to_value(spec)
            .map_err(|e| ForgeError::Validation(format!("failed to serialize spec: {}", e)))?;
        if let Value::Object(ref mut map) = body {
            map.insert("owner".to_string(), Value::String(owner.to_string()));
            map.insert("name".to_string(), Value::String(name.to_string()));
        }

        match self.http.post_json::<Value>(MODELS_ENDPOINT, &body).await {
            Ok(_) => Ok(CreateModelOutcome::Created),
            Err(HttpError::Response(detail))
                if is_already_exists(detail.status, detail.body_snippet.as_deref()) =>
            {
                Ok(CreateModelOutcome::AlreadyExists)
            }
            Err(err) => Err(map_http_error(err)),
        }
    }

    async fn latest_trainer_version(&self, owner: &str, name: &str) -> ForgeResult<String> {
        let path = format!("{}/{}/{}", MODELS_ENDPOINT, owner, name);
        let model: ModelWire = self.http.get(&path, None).await.map_err(map_http_error)?;
        model
            .latest_version
            .map(|v| v.id)
            .ok_or_else(|| {
                ForgeError::Validation(format!(
                    "trainer {}/{} has no published version",
                    owner, name
                ))
            })
    }

    async fn start_training(
        &self,
        trainer_owner: &str,
        trainer_name: &str,
        version: &str,
        destination: &str,
        request: &TrainingRequest,
    ) -> ForgeResult<RemoteJob> {
        let input = serde_json::to_value(request)
            .map_err(|e| ForgeError::Validation(format!("failed to serialize request: {}", e)))?;
        let body = serde_json::json!({
            "destination": destination,
            "input": input,
        });

        let path = format!(
            "{}/{}/{}/versions/{}/trainings",
            MODELS_ENDPOINT, trainer_owner, trainer_name, version
        );
        let wire: TrainingWire = self
            .http
            .post_json(&path, &body)
            .await
            .map_err(map_http_error)?;
        Ok(wire.into_remote_job())
    }

    async fn get_job(&self, job_id: &str) -> ForgeResult<RemoteJob> {
        let path = format!("{}/{}", TRAININGS_ENDPOINT, job_id);
        let wire: TrainingWire = self.http.get(&path, None).await.map_err(map_http_error)?;
        Ok(wire.into_remote_job())
    }

    async fn run_inference(
        &self,
        model_ref: &str,
        request: &InferenceRequest,
    ) -> ForgeResult<Vec<String>> {
        if model_ref.trim().is_empty() {
            return Err(ForgeError::InvalidInput(
                "model reference cannot be empty".to_string(),
            ));
        }

        let input = serde_json::to_value(request)
            .map_err(|e| ForgeError::Validation(format!("failed to serialize request: {}", e)))?;
        let body = serde_json::json!({
            "version": model_ref,
            "input": input,
        });

        let prediction: PredictionWire = self
            .http
            .post_json(PREDICTIONS_ENDPOINT, &body)
            .await
            .map_err(map_http_error)?;

        self.wait_for_prediction(prediction).await
    }
}

/// Detect an idempotent-create conflict: a 409, or a 4xx whose body says the
/// model already exists.
fn is_already_exists(status: u16, body: Option<&str>) -> bool {
    if status == 409 {
        return true;
    }
    if (400..500).contains(&status) {
        if let Some(body) = body {
            return body.to_lowercase().contains("already exists");
        }
    }
    false
}

/// Map HTTP errors to ForgeError.
fn map_http_error(e: HttpError) -> ForgeError {
    match e {
        HttpError::Response(detail) => {
            if detail.status == 401 || detail.status == 403 {
                ForgeError::Authentication(format!("authentication failed: {}", detail))
            } else {
                ForgeError::HttpResponse(crate::errors::HttpErrorInfo {
                    status: detail.status,
                    url: detail.url,
                    message: detail.message,
                    body_snippet: detail.body_snippet,
                })
            }
        }
        HttpError::Request(e) => ForgeError::Http(e),
        _ => ForgeError::Internal(format!("{}", e)),
    }
}
