//! Provider request and response types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{InferenceDefaults, TrainingDefaults};
use crate::status::TrainingStatus;

// =============================================================================
// Model Creation
// =============================================================================

/// Fixed configuration for a brand's model container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSpec {
    pub visibility: String,
    pub hardware: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Default for ModelSpec {
    fn default() -> Self {
        Self {
            visibility: "private".to_string(),
            hardware: "gpu-t4".to_string(),
            description: None,
        }
    }
}

/// Outcome of a create-model call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateModelOutcome {
    Created,
    /// The container already exists; reused as-is.
    AlreadyExists,
}

// =============================================================================
// Training
// =============================================================================

/// Input submitted with a training run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingRequest {
    /// Public URL of the packaged training archive.
    pub input_images: String,
    /// The brand's trigger phrase.
    pub trigger_word: String,
    pub steps: u32,
    pub lora_rank: u32,
    pub optimizer: String,
    pub learning_rate: f64,
    pub batch_size: u32,
    pub resolution: String,
    pub autocaption: bool,
    pub caption_dropout_rate: f64,
}

impl TrainingRequest {
    pub fn new(archive_url: &str, trigger_word: &str, defaults: &TrainingDefaults) -> Self {
        Self {
            input_images: archive_url.to_string(),
            trigger_word: trigger_word.to_string(),
            steps: defaults.steps,
            lora_rank: defaults.lora_rank,
            optimizer: defaults.optimizer.clone(),
            learning_rate: defaults.learning_rate,
            batch_size: defaults.batch_size,
            resolution: defaults.resolution.clone(),
            autocaption: defaults.autocaption,
            caption_dropout_rate: defaults.caption_dropout_rate,
        }
    }
}

/// Authoritative state of a remote job, as reported by the provider.
#[derive(Debug, Clone)]
pub struct RemoteJob {
    /// Opaque job handle.
    pub id: String,
    pub status: TrainingStatus,
    /// Version id produced by the job, once it has succeeded.
    pub output_version: Option<String>,
    /// Model container the job trains into, when reported.
    pub destination: Option<String>,
    /// Provider-reported error message, if any.
    pub error: Option<String>,
}

/// Wire shape of a training job payload.
#[derive(Debug, Deserialize)]
pub(crate) struct TrainingWire {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub output: Option<TrainingOutputWire>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TrainingOutputWire {
    #[serde(default)]
    pub version: Option<String>,
}

impl TrainingWire {
    pub(crate) fn into_remote_job(self) -> RemoteJob {
        let status = self
            .status
            .as_deref()
            .and_then(TrainingStatus::from_str)
            .unwrap_or(TrainingStatus::Starting);
        let output_version = self
            .output
            .and_then(|o| o.version)
            .map(|v| strip_version_prefix(&v));
        RemoteJob {
            id: self.id,
            status,
            output_version,
            destination: self.destination,
            error: self.error,
        }
    }
}

/// Strip a leading `owner/name:` qualifier from a version reference,
/// leaving the bare version id.
pub(crate) fn strip_version_prefix(version: &str) -> String {
    match version.rsplit_once(':') {
        Some((_, id)) if !id.is_empty() => id.to_string(),
        _ => version.to_string(),
    }
}

/// Wire shape of a model payload (for latest-version resolution).
#[derive(Debug, Deserialize)]
pub(crate) struct ModelWire {
    #[serde(default)]
    pub latest_version: Option<ModelVersionWire>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ModelVersionWire {
    pub id: String,
}

// =============================================================================
// Inference
// =============================================================================

/// Input submitted with an inference call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceRequest {
    /// Resolved prompt, trigger phrase included.
    pub prompt: String,
    pub aspect_ratio: String,
    pub seed: i64,
    pub model: String,
    pub num_outputs: u32,
    pub lora_scale: f64,
    pub guidance_scale: f64,
    pub num_inference_steps: u32,
    pub output_format: String,
    pub output_quality: u32,
    pub disable_safety_checker: bool,
}

impl InferenceRequest {
    pub fn new(prompt: &str, aspect_ratio: &str, seed: i64, defaults: &InferenceDefaults) -> Self {
        Self {
            prompt: prompt.to_string(),
            aspect_ratio: aspect_ratio.to_string(),
            seed,
            model: defaults.model.clone(),
            num_outputs: defaults.num_outputs,
            lora_scale: defaults.lora_scale,
            guidance_scale: defaults.guidance_scale,
            num_inference_steps: defaults.num_inference_steps,
            output_format: defaults.output_format.clone(),
            output_quality: defaults.output_quality,
            disable_safety_checker: defaults.disable_safety_checker,
        }
    }
}

/// Wire shape of a prediction payload.
#[derive(Debug, Deserialize)]
pub(crate) struct PredictionWire {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub output: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
}

impl PredictionWire {
    pub(crate) fn status(&self) -> TrainingStatus {
        self.status
            .as_deref()
            .and_then(TrainingStatus::from_str)
            .unwrap_or(TrainingStatus::Starting)
    }

    /// Collect output URLs. Image models return either a single URL or an
    /// array of them.
    pub(crate) fn output_urls(&self) -> Vec<String> {
        match &self.output {
            Some(Value::String(url)) => vec![url.clone()],
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str())
                .map(String::from)
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_version_prefix() {
        assert_eq!(strip_version_prefix("acme/coffee:abc123"), "abc123");
        assert_eq!(strip_version_prefix("abc123"), "abc123");
        assert_eq!(strip_version_prefix("acme/coffee:"), "acme/coffee:");
    }

    #[test]
    fn test_training_wire_parses_status_and_version() {
        let wire: TrainingWire = serde_json::from_value(serde_json::json!({
            "id": "train-abc",
            "status": "succeeded",
            "destination": "acme/coffee-co-1700000000",
            "output": {"version": "acme/coffee-co-1700000000:v7"},
        }))
        .unwrap();
        let job = wire.into_remote_job();
        assert_eq!(job.status, TrainingStatus::Succeeded);
        assert_eq!(job.output_version.as_deref(), Some("v7"));
        assert_eq!(job.destination.as_deref(), Some("acme/coffee-co-1700000000"));
    }

    #[test]
    fn test_training_wire_defaults() {
        let wire: TrainingWire =
            serde_json::from_value(serde_json::json!({"id": "train-abc"})).unwrap();
        let job = wire.into_remote_job();
        assert_eq!(job.status, TrainingStatus::Starting);
        assert!(job.output_version.is_none());
    }

    #[test]
    fn test_prediction_output_urls() {
        let single: PredictionWire = serde_json::from_value(serde_json::json!({
            "id": "pred-1",
            "status": "succeeded",
            "output": "https://cdn.test/a.webp",
        }))
        .unwrap();
        assert_eq!(single.output_urls(), vec!["https://cdn.test/a.webp"]);

        let array: PredictionWire = serde_json::from_value(serde_json::json!({
            "id": "pred-2",
            "status": "succeeded",
            "output": ["https://cdn.test/a.webp", "https://cdn.test/b.webp"],
        }))
        .unwrap();
        assert_eq!(array.output_urls().len(), 2);

        let missing: PredictionWire =
            serde_json::from_value(serde_json::json!({"id": "pred-3"})).unwrap();
        assert!(missing.output_urls().is_empty());
    }

    #[test]
    fn test_training_request_carries_defaults() {
        let defaults = TrainingDefaults::default();
        let request = TrainingRequest::new(
            "https://cdn.test/archive.tar.gz",
            "COFFEECO_AB12",
            &defaults,
        );
        assert_eq!(request.steps, 1000);
        assert_eq!(request.trigger_word, "COFFEECO_AB12");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["input_images"], "https://cdn.test/archive.tar.gz");
        assert_eq!(value["optimizer"], "adamw8bit");
    }
}
