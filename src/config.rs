//! Configuration for the orchestrator.
//!
//! This module provides:
//! - Endpoint/credential configuration (OrchestratorConfig)
//! - The fixed training hyperparameter set (TrainingDefaults)
//! - The fixed inference parameter set (InferenceDefaults)
//!
//! Training and inference parameters are configuration constants, not
//! per-request knobs.

use serde::{Deserialize, Serialize};

use crate::errors::{ForgeError, ForgeResult};

/// Minimum number of source images required to register a brand.
pub const MIN_TRAINING_IMAGES: usize = 5;

/// Aspect ratio used when a generation request does not specify one.
pub const DEFAULT_ASPECT_RATIO: &str = "1:1";

/// Endpoint and credential configuration shared across the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Base URL of the remote training/inference provider.
    pub provider_base_url: String,
    /// API token for the provider (Bearer).
    pub provider_api_token: Option<String>,
    /// Base URL of the object storage service.
    pub storage_base_url: String,
    /// API key for the object storage service.
    pub storage_api_key: Option<String>,
    /// Bucket holding training archives and generated images.
    pub storage_bucket: String,
    /// Owner namespace under which brand models are created.
    pub model_owner: String,
    /// Owner of the fixed trainer algorithm.
    pub trainer_owner: String,
    /// Name of the fixed trainer algorithm.
    pub trainer_name: String,
    /// Request timeout in seconds for provider/storage calls.
    pub timeout_secs: u64,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        let provider_base_url = std::env::var("BRANDFORGE_PROVIDER_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "https://api.replicate.com".to_string());
        let storage_base_url = std::env::var("BRANDFORGE_STORAGE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_default();
        let storage_bucket = std::env::var("BRANDFORGE_STORAGE_BUCKET")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "brand-images".to_string());
        OrchestratorConfig {
            provider_base_url,
            provider_api_token: std::env::var("BRANDFORGE_PROVIDER_TOKEN").ok(),
            storage_base_url,
            storage_api_key: std::env::var("BRANDFORGE_STORAGE_KEY").ok(),
            storage_bucket,
            model_owner: std::env::var("BRANDFORGE_MODEL_OWNER").unwrap_or_default(),
            trainer_owner: "ostris".to_string(),
            trainer_name: "flux-dev-lora-trainer".to_string(),
            timeout_secs: 120,
        }
    }
}

impl OrchestratorConfig {
    /// Build a config from environment variables, failing fast on missing
    /// credentials.
    ///
    /// # Environment Variables
    ///
    /// - `BRANDFORGE_PROVIDER_URL` (default: `https://api.replicate.com`)
    /// - `BRANDFORGE_PROVIDER_TOKEN` (required)
    /// - `BRANDFORGE_STORAGE_URL` (required)
    /// - `BRANDFORGE_STORAGE_KEY`
    /// - `BRANDFORGE_STORAGE_BUCKET` (default: `brand-images`)
    /// - `BRANDFORGE_MODEL_OWNER` (required)
    pub fn from_env() -> ForgeResult<Self> {
        let config = Self::default();
        if config
            .provider_api_token
            .as_deref()
            .unwrap_or("")
            .trim()
            .is_empty()
        {
            return Err(ForgeError::Authentication(
                "BRANDFORGE_PROVIDER_TOKEN environment variable not set".to_string(),
            ));
        }
        if config.storage_base_url.trim().is_empty() {
            return Err(ForgeError::config(
                "BRANDFORGE_STORAGE_URL environment variable not set",
            ));
        }
        if config.model_owner.trim().is_empty() {
            return Err(ForgeError::config(
                "BRANDFORGE_MODEL_OWNER environment variable not set",
            ));
        }
        Ok(config)
    }
}

// =============================================================================
// Training Defaults
// =============================================================================

/// Fixed hyperparameter set submitted with every training run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingDefaults {
    /// Number of training steps.
    pub steps: u32,
    /// LoRA rank.
    pub lora_rank: u32,
    /// Optimizer name.
    pub optimizer: String,
    /// Learning rate.
    pub learning_rate: f64,
    /// Batch size.
    pub batch_size: u32,
    /// Resolution buckets, comma separated.
    pub resolution: String,
    /// Whether the trainer captions the input images itself.
    pub autocaption: bool,
    /// Caption dropout rate.
    pub caption_dropout_rate: f64,
}

impl Default for TrainingDefaults {
    fn default() -> Self {
        Self {
            steps: 1000,
            lora_rank: 16,
            optimizer: "adamw8bit".to_string(),
            learning_rate: 0.0004,
            batch_size: 1,
            resolution: "512,768,1024".to_string(),
            autocaption: true,
            caption_dropout_rate: 0.05,
        }
    }
}

// =============================================================================
// Inference Defaults
// =============================================================================

/// Fixed parameter set submitted with every inference call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceDefaults {
    /// Base model variant to run the fine-tune against.
    pub model: String,
    /// Number of output images per call.
    pub num_outputs: u32,
    /// LoRA scale.
    pub lora_scale: f64,
    /// Guidance scale.
    pub guidance_scale: f64,
    /// Number of inference steps.
    pub num_inference_steps: u32,
    /// Output image format (file extension).
    pub output_format: String,
    /// Output image quality (0-100).
    pub output_quality: u32,
    /// Whether the provider-side safety checker is disabled.
    pub disable_safety_checker: bool,
}

impl Default for InferenceDefaults {
    fn default() -> Self {
        Self {
            model: "dev".to_string(),
            num_outputs: 1,
            lora_scale: 1.0,
            guidance_scale: 3.5,
            num_inference_steps: 28,
            output_format: "webp".to_string(),
            output_quality: 90,
            disable_safety_checker: true,
        }
    }
}

impl InferenceDefaults {
    /// MIME content type matching `output_format`.
    pub fn content_type(&self) -> String {
        match self.output_format.as_str() {
            "jpg" | "jpeg" => "image/jpeg".to_string(),
            other => format!("image/{}", other),
        }
    }
}
