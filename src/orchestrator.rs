//! Training and generation orchestration.
//!
//! This is the surface the UI layer consumes: brand registration, training
//! launch, and image generation. Training runs remotely; this module
//! packages assets, provisions the model container, starts the job, and
//! later reconciles the locally-cached job status against the provider as a
//! side effect of generation requests. There is no background scheduler;
//! callers poll by re-issuing generation requests.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::artifacts::{generated_image_path, training_archive_path, ArtifactStore};
use crate::config::{
    InferenceDefaults, OrchestratorConfig, TrainingDefaults, DEFAULT_ASPECT_RATIO,
    MIN_TRAINING_IMAGES,
};
use crate::errors::{ForgeError, ForgeResult};
use crate::naming::{derive_model_name_now, derive_trigger_phrase, epoch_seconds};
use crate::packaging::{fetch_url, package_assets};
use crate::provider::{
    CreateModelOutcome, InferenceRequest, ModelProvider, ModelSpec, TrainingRequest,
};
use crate::status::TrainingStatus;
use crate::store::{Brand, GeneratedImage, RecordStore, TrainingAsset, TrainingJob};
use crate::urls::validate_public_url;

/// Content type of the packaged training archive.
const ARCHIVE_CONTENT_TYPE: &str = "application/gzip";

// =============================================================================
// Request / Response Types
// =============================================================================

/// One uploaded source image reference submitted at registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAsset {
    pub storage_path: String,
    pub file_name: String,
}

/// Brand registration request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterBrandRequest {
    pub user_id: String,
    pub name: String,
    pub assets: Vec<NewAsset>,
}

/// Training launch request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchTrainingRequest {
    pub brand_id: String,
    /// Public URLs of the brand's source images.
    pub asset_urls: Vec<String>,
    pub trigger_phrase: String,
}

/// Image generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateImageRequest {
    pub brand_id: String,
    pub user_id: String,
    pub prompt: String,
    /// Defaults to `1:1` when unset.
    pub aspect_ratio: Option<String>,
    /// Used verbatim when supplied; drawn from the unsigned-32-bit range
    /// otherwise.
    pub seed: Option<i64>,
}

/// Outcome of a generation request.
#[derive(Debug, Clone)]
pub enum GenerationOutcome {
    /// The brand's training job has not reached a terminal state yet.
    /// Callers should retry later.
    Pending { status: TrainingStatus },
    /// Inference ran and the result was persisted.
    Complete(GeneratedImage),
}

impl GenerationOutcome {
    pub fn is_pending(&self) -> bool {
        matches!(self, GenerationOutcome::Pending { .. })
    }
}

// =============================================================================
// Orchestrator
// =============================================================================

/// The training-and-generation orchestrator.
pub struct Orchestrator {
    provider: Arc<dyn ModelProvider>,
    artifacts: Arc<dyn ArtifactStore>,
    store: Arc<dyn RecordStore>,
    config: OrchestratorConfig,
    training: TrainingDefaults,
    inference: InferenceDefaults,
}

impl Orchestrator {
    pub fn new(
        provider: Arc<dyn ModelProvider>,
        artifacts: Arc<dyn ArtifactStore>,
        store: Arc<dyn RecordStore>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            provider,
            artifacts,
            store,
            config,
            training: TrainingDefaults::default(),
            inference: InferenceDefaults::default(),
        }
    }

    /// Register a brand with its source images.
    ///
    /// Derives the brand's trigger phrase and records the asset references.
    /// Returns the brand, which carries the id and trigger phrase the
    /// caller needs for the rest of the pipeline.
    pub async fn register_brand(&self, request: RegisterBrandRequest) -> ForgeResult<Brand> {
        if request.user_id.trim().is_empty() {
            return Err(ForgeError::validation("user id is required"));
        }
        if request.name.trim().is_empty() {
            return Err(ForgeError::validation("brand name is required"));
        }
        if request.assets.len() < MIN_TRAINING_IMAGES {
            return Err(ForgeError::validation(format!(
                "at least {} source images are required, got {}",
                MIN_TRAINING_IMAGES,
                request.assets.len()
            )));
        }

        let trigger_phrase = derive_trigger_phrase(&request.name);
        let brand = Brand::new(&request.user_id, request.name.trim(), &trigger_phrase);
        self.store.insert_brand(brand.clone()).await?;

        let assets: Vec<TrainingAsset> = request
            .assets
            .iter()
            .map(|a| TrainingAsset::new(&brand.id, &a.storage_path, &a.file_name))
            .collect();
        self.store.insert_assets(assets).await?;

        info!(brand_id = %brand.id, name = %brand.name, "registered brand");
        Ok(brand)
    }

    /// Package a brand's assets and launch a remote training job.
    ///
    /// No job row is written unless every step up to and including the
    /// remote start call succeeds.
    pub async fn launch_training(&self, request: LaunchTrainingRequest) -> ForgeResult<TrainingJob> {
        if request.brand_id.trim().is_empty() {
            return Err(ForgeError::validation("brand id is required"));
        }
        if request.asset_urls.is_empty() {
            return Err(ForgeError::validation("asset urls are required"));
        }
        if request.trigger_phrase.trim().is_empty() {
            return Err(ForgeError::validation("trigger phrase is required"));
        }
        for url in &request.asset_urls {
            validate_public_url(url)?;
        }

        let brand = self
            .store
            .get_brand(&request.brand_id)
            .await?
            .ok_or_else(|| {
                ForgeError::InvalidInput(format!("unknown brand: {}", request.brand_id))
            })?;

        let packaged = package_assets(&request.asset_urls).await?;
        if packaged.is_empty() {
            return Err(ForgeError::validation(
                "none of the source images could be fetched",
            ));
        }
        info!(
            brand_id = %brand.id,
            requested = request.asset_urls.len(),
            packaged = packaged.entry_count,
            "packaged training assets"
        );

        let archive_path = training_archive_path(&brand.id, epoch_seconds());
        self.artifacts
            .upload(
                &self.config.storage_bucket,
                &archive_path,
                packaged.bytes,
                ARCHIVE_CONTENT_TYPE,
            )
            .await?;
        let archive_url = self
            .artifacts
            .public_url(&self.config.storage_bucket, &archive_path);

        let model_name = derive_model_name_now(&brand.name);
        let destination = format!("{}/{}", self.config.model_owner, model_name);

        let outcome = self
            .provider
            .create_model(&self.config.model_owner, &model_name, &ModelSpec::default())
            .await?;
        if outcome == CreateModelOutcome::AlreadyExists {
            debug!(destination = %destination, "model container already exists, reusing");
        }

        let trainer_version = self
            .provider
            .latest_trainer_version(&self.config.trainer_owner, &self.config.trainer_name)
            .await?;

        let training_request =
            TrainingRequest::new(&archive_url, &request.trigger_phrase, &self.training);
        let remote = self
            .provider
            .start_training(
                &self.config.trainer_owner,
                &self.config.trainer_name,
                &trainer_version,
                &destination,
                &training_request,
            )
            .await?;

        let job = TrainingJob::new(&brand.id, &remote.id, &destination);
        self.store.insert_job(job.clone()).await?;

        info!(
            brand_id = %brand.id,
            provider_job_id = %remote.id,
            destination = %destination,
            "started training job"
        );
        Ok(job)
    }

    /// Generate an image for a trained brand.
    ///
    /// Lazily synchronizes the brand's current training job against the
    /// provider first. A non-terminal job yields a pending outcome rather
    /// than an error; a failed job is a terminal error.
    pub async fn generate_image(
        &self,
        request: GenerateImageRequest,
    ) -> ForgeResult<GenerationOutcome> {
        if request.brand_id.trim().is_empty() {
            return Err(ForgeError::validation("brand id is required"));
        }
        if request.user_id.trim().is_empty() {
            return Err(ForgeError::validation("user id is required"));
        }
        if request.prompt.trim().is_empty() {
            return Err(ForgeError::validation("prompt is required"));
        }

        let brand = self
            .store
            .get_brand(&request.brand_id)
            .await?
            .ok_or_else(|| {
                ForgeError::InvalidInput(format!("unknown brand: {}", request.brand_id))
            })?;
        let job = self.store.latest_job(&brand.id).await?.ok_or_else(|| {
            ForgeError::InvalidInput(format!("brand {} has no training job", brand.id))
        })?;

        let job = self.sync_job(job).await?;

        match job.status {
            TrainingStatus::Failed | TrainingStatus::Canceled => {
                return Err(ForgeError::training(
                    &job.provider_job_id,
                    "training did not complete successfully",
                ));
            }
            TrainingStatus::Starting | TrainingStatus::Training => {
                return Ok(GenerationOutcome::Pending { status: job.status });
            }
            TrainingStatus::Succeeded => {}
        }

        let model_ref = job.model_ref().ok_or_else(|| {
            ForgeError::Protocol(format!(
                "training job {} succeeded without a model version",
                job.provider_job_id
            ))
        })?;

        let seed = request
            .seed
            .unwrap_or_else(|| i64::from(rand::random::<u32>()));
        let prompt = format!("{}, {}", request.prompt.trim(), brand.trigger_phrase);
        let aspect_ratio = request
            .aspect_ratio
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .unwrap_or(DEFAULT_ASPECT_RATIO)
            .to_string();

        let inference_request = InferenceRequest::new(&prompt, &aspect_ratio, seed, &self.inference);
        let outputs = self
            .provider
            .run_inference(&model_ref, &inference_request)
            .await?;
        let output_url = outputs
            .first()
            .ok_or_else(|| ForgeError::Protocol("provider returned no output".to_string()))?;

        let bytes = fetch_url(output_url).await?;
        let image_path = generated_image_path(
            &brand.id,
            epoch_seconds(),
            &self.inference.output_format,
        );
        self.artifacts
            .upload(
                &self.config.storage_bucket,
                &image_path,
                bytes,
                &self.inference.content_type(),
            )
            .await?;
        let public_url = self
            .artifacts
            .public_url(&self.config.storage_bucket, &image_path);

        let image = GeneratedImage::new(
            &brand.id,
            &request.user_id,
            &public_url,
            &prompt,
            &aspect_ratio,
            seed,
        );
        self.store.insert_image(image.clone()).await?;

        info!(
            brand_id = %brand.id,
            image_id = %image.id,
            seed,
            "generated image"
        );
        Ok(GenerationOutcome::Complete(image))
    }

    /// Reconcile a cached training job against the provider.
    ///
    /// A job already cached as succeeded is returned as-is, with no remote
    /// call. Only terminal remote states are persisted; a still-running job
    /// is reported through the returned copy without touching the row.
    async fn sync_job(&self, mut job: TrainingJob) -> ForgeResult<TrainingJob> {
        if job.status.is_success() {
            return Ok(job);
        }

        let remote = self.provider.get_job(&job.provider_job_id).await?;

        if remote.status.is_terminal() {
            let version = remote.output_version.unwrap_or_default();
            self.store
                .update_job(&job.id, remote.status, &version)
                .await?;
            job.status = remote.status;
            job.version = version;

            if remote.status.is_success() {
                info!(
                    provider_job_id = %job.provider_job_id,
                    version = %job.version,
                    "training job succeeded"
                );
            } else {
                warn!(
                    provider_job_id = %job.provider_job_id,
                    status = %remote.status,
                    error = remote.error.as_deref().unwrap_or(""),
                    "training job ended without success"
                );
            }
        } else {
            job.status = remote.status;
        }

        Ok(job)
    }
}
