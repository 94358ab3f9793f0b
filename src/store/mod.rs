//! Durable record storage.
//!
//! The relational datastore is an external collaborator; the orchestrator
//! only needs a narrow keyed insert/select/update surface, expressed here
//! as the [`RecordStore`] trait. [`MemoryStore`] is an in-process
//! implementation used by tests and embedders without a database.

pub mod memory;
pub mod records;

use async_trait::async_trait;

use crate::errors::ForgeResult;
use crate::status::TrainingStatus;

pub use memory::MemoryStore;
pub use records::{Brand, GeneratedImage, TrainingAsset, TrainingJob};

/// Keyed storage for brands, assets, training jobs, and generated images.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn insert_brand(&self, brand: Brand) -> ForgeResult<()>;

    async fn get_brand(&self, brand_id: &str) -> ForgeResult<Option<Brand>>;

    async fn insert_assets(&self, assets: Vec<TrainingAsset>) -> ForgeResult<()>;

    async fn assets_for_brand(&self, brand_id: &str) -> ForgeResult<Vec<TrainingAsset>>;

    async fn insert_job(&self, job: TrainingJob) -> ForgeResult<()>;

    /// Most recently created training job for a brand, if any. This is the
    /// brand's "current" job; all generation requests resolve against it.
    async fn latest_job(&self, brand_id: &str) -> ForgeResult<Option<TrainingJob>>;

    /// Persist a status/version transition for a job. Last-write-wins;
    /// concurrent syncs of the same job write the same terminal value.
    async fn update_job(
        &self,
        job_id: &str,
        status: TrainingStatus,
        version: &str,
    ) -> ForgeResult<()>;

    async fn insert_image(&self, image: GeneratedImage) -> ForgeResult<()>;

    async fn images_for_brand(&self, brand_id: &str) -> ForgeResult<Vec<GeneratedImage>>;
}
