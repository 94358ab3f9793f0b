//! In-process record store.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::errors::{ForgeError, ForgeResult};
use crate::status::TrainingStatus;

use super::records::{Brand, GeneratedImage, TrainingAsset, TrainingJob};
use super::RecordStore;

#[derive(Default)]
struct Inner {
    brands: HashMap<String, Brand>,
    assets: Vec<TrainingAsset>,
    // Insertion order doubles as creation order for latest-job resolution.
    jobs: Vec<TrainingJob>,
    images: Vec<GeneratedImage>,
}

/// In-memory [`RecordStore`] guarded by a read/write lock.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert_brand(&self, brand: Brand) -> ForgeResult<()> {
        self.inner.write().brands.insert(brand.id.clone(), brand);
        Ok(())
    }

    async fn get_brand(&self, brand_id: &str) -> ForgeResult<Option<Brand>> {
        Ok(self.inner.read().brands.get(brand_id).cloned())
    }

    async fn insert_assets(&self, assets: Vec<TrainingAsset>) -> ForgeResult<()> {
        self.inner.write().assets.extend(assets);
        Ok(())
    }

    async fn assets_for_brand(&self, brand_id: &str) -> ForgeResult<Vec<TrainingAsset>> {
        Ok(self
            .inner
            .read()
            .assets
            .iter()
            .filter(|a| a.brand_id == brand_id)
            .cloned()
            .collect())
    }

    async fn insert_job(&self, job: TrainingJob) -> ForgeResult<()> {
        self.inner.write().jobs.push(job);
        Ok(())
    }

    async fn latest_job(&self, brand_id: &str) -> ForgeResult<Option<TrainingJob>> {
        Ok(self
            .inner
            .read()
            .jobs
            .iter()
            .rev()
            .find(|j| j.brand_id == brand_id)
            .cloned())
    }

    async fn update_job(
        &self,
        job_id: &str,
        status: TrainingStatus,
        version: &str,
    ) -> ForgeResult<()> {
        let mut inner = self.inner.write();
        let job = inner
            .jobs
            .iter_mut()
            .find(|j| j.id == job_id)
            .ok_or_else(|| ForgeError::InvalidInput(format!("unknown training job: {}", job_id)))?;
        job.status = status;
        job.version = version.to_string();
        Ok(())
    }

    async fn insert_image(&self, image: GeneratedImage) -> ForgeResult<()> {
        self.inner.write().images.push(image);
        Ok(())
    }

    async fn images_for_brand(&self, brand_id: &str) -> ForgeResult<Vec<GeneratedImage>> {
        Ok(self
            .inner
            .read()
            .images
            .iter()
            .filter(|i| i.brand_id == brand_id)
            .cloned()
            .collect())
    }
}
