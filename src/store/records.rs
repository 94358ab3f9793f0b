//! Durable entities owned by the orchestrator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::status::TrainingStatus;

/// The unit of personalization: one fine-tuned model scoped to one set of
/// training images and one trigger phrase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brand {
    pub id: String,
    /// Registering user; the brand is owned by them.
    pub user_id: String,
    /// Display name, as entered at registration.
    pub name: String,
    /// Unique token injected into every prompt. Immutable after
    /// registration.
    pub trigger_phrase: String,
    pub created_at: DateTime<Utc>,
}

impl Brand {
    pub fn new(user_id: &str, name: &str, trigger_phrase: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            name: name.to_string(),
            trigger_phrase: trigger_phrase.to_string(),
            created_at: Utc::now(),
        }
    }
}

/// Reference to one input image belonging to a brand. Created in bulk at
/// registration; never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingAsset {
    pub id: String,
    pub brand_id: String,
    /// Path of the uploaded image inside the artifact store.
    pub storage_path: String,
    /// Original filename as submitted by the user.
    pub file_name: String,
    pub created_at: DateTime<Utc>,
}

impl TrainingAsset {
    pub fn new(brand_id: &str, storage_path: &str, file_name: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            brand_id: brand_id.to_string(),
            storage_path: storage_path.to_string(),
            file_name: file_name.to_string(),
            created_at: Utc::now(),
        }
    }
}

/// One training attempt for a brand. Rows are never deleted; the most
/// recently created row is the brand's current job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingJob {
    pub id: String,
    pub brand_id: String,
    /// Opaque job handle assigned by the remote provider.
    pub provider_job_id: String,
    /// Model container (`owner/name`) the job trains into, recorded at
    /// launch.
    pub destination: String,
    pub status: TrainingStatus,
    /// Model version produced by the job; empty until it succeeds.
    pub version: String,
    pub created_at: DateTime<Utc>,
}

impl TrainingJob {
    pub fn new(brand_id: &str, provider_job_id: &str, destination: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            brand_id: brand_id.to_string(),
            provider_job_id: provider_job_id.to_string(),
            destination: destination.to_string(),
            status: TrainingStatus::Starting,
            version: String::new(),
            created_at: Utc::now(),
        }
    }

    /// Fully-qualified model reference, available once the job has
    /// succeeded and a version is known.
    pub fn model_ref(&self) -> Option<String> {
        if self.status.is_success() && !self.version.is_empty() {
            Some(format!("{}:{}", self.destination, self.version))
        } else {
            None
        }
    }
}

/// One successful inference result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub id: String,
    pub brand_id: String,
    pub user_id: String,
    /// Durable public URL of the stored image.
    pub url: String,
    /// Resolved prompt, including the trigger phrase.
    pub prompt: String,
    pub aspect_ratio: String,
    /// Seed the image was generated with; in the unsigned-32-bit range when
    /// drawn randomly.
    pub seed: i64,
    pub created_at: DateTime<Utc>,
}

impl GeneratedImage {
    pub fn new(
        brand_id: &str,
        user_id: &str,
        url: &str,
        prompt: &str,
        aspect_ratio: &str,
        seed: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            brand_id: brand_id.to_string(),
            user_id: user_id.to_string(),
            url: url.to_string(),
            prompt: prompt.to_string(),
            aspect_ratio: aspect_ratio.to_string(),
            seed,
            created_at: Utc::now(),
        }
    }
}
