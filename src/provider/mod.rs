//! Remote training/inference provider.
//!
//! The provider's SDK-shaped surface is abstracted behind the narrow
//! [`ModelProvider`] trait so the orchestrator can be exercised against a
//! fake implementation. [`HttpModelProvider`] is the production wiring.

pub mod http;
pub mod types;

use async_trait::async_trait;

use crate::errors::ForgeResult;

pub use http::HttpModelProvider;
pub use types::{
    CreateModelOutcome, InferenceRequest, ModelSpec, RemoteJob, TrainingRequest,
};

/// The five provider operations the orchestrator consumes.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Create a model container under `owner`. Reports an already-existing
    /// container as a distinct outcome rather than an error.
    async fn create_model(
        &self,
        owner: &str,
        name: &str,
        spec: &ModelSpec,
    ) -> ForgeResult<CreateModelOutcome>;

    /// Resolve the latest published version of the trainer algorithm.
    /// Fails with a descriptive error when no version is published.
    async fn latest_trainer_version(&self, owner: &str, name: &str) -> ForgeResult<String>;

    /// Start a training run against the given trainer version, targeting
    /// the `destination` container. Returns the remote job.
    async fn start_training(
        &self,
        trainer_owner: &str,
        trainer_name: &str,
        version: &str,
        destination: &str,
        request: &TrainingRequest,
    ) -> ForgeResult<RemoteJob>;

    /// Fetch the authoritative state of a training job.
    async fn get_job(&self, job_id: &str) -> ForgeResult<RemoteJob>;

    /// Run one inference call against a fully-qualified model reference
    /// (`owner/name:version`), returning the output URLs.
    async fn run_inference(
        &self,
        model_ref: &str,
        request: &InferenceRequest,
    ) -> ForgeResult<Vec<String>>;
}
