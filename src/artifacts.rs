//! Durable object storage for training archives and generated images.
//!
//! The storage service itself is an external collaborator; this module
//! defines the narrow seam the orchestrator consumes plus an HTTP
//! implementation speaking a standard object-storage surface.

use async_trait::async_trait;

use crate::errors::{ForgeError, ForgeResult};
use crate::http::HttpClient;

/// Durable object storage with public-readable URLs.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Upload an object. Overwrites are not expected; paths are keyed by
    /// brand id and timestamp.
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> ForgeResult<()>;

    /// Stable public URL for a stored object.
    fn public_url(&self, bucket: &str, path: &str) -> String;
}

/// Storage path for a brand's training archive.
pub fn training_archive_path(brand_id: &str, epoch_secs: u64) -> String {
    format!("training/{}/{}.tar.gz", brand_id, epoch_secs)
}

/// Storage path for a generated image.
pub fn generated_image_path(brand_id: &str, epoch_secs: u64, extension: &str) -> String {
    format!("generated/{}/{}.{}", brand_id, epoch_secs, extension)
}

/// Object storage client over HTTP.
///
/// Objects are written with `POST {base}/object/{bucket}/{path}` and read
/// publicly from `{base}/object/public/{bucket}/{path}`.
pub struct HttpArtifactStore {
    http: HttpClient,
    base_url: String,
}

impl HttpArtifactStore {
    pub fn new(base_url: &str, api_key: &str, timeout_secs: u64) -> ForgeResult<Self> {
        let http = HttpClient::new(base_url, api_key, timeout_secs)
            .map_err(|e| ForgeError::Internal(format!("failed to create http client: {}", e)))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ArtifactStore for HttpArtifactStore {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> ForgeResult<()> {
        let object_path = format!("/object/{}/{}", bucket, path.trim_start_matches('/'));
        self.http
            .post_bytes(&object_path, bytes, content_type)
            .await
            .map_err(ForgeError::from)
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!(
            "{}/object/public/{}/{}",
            self.base_url,
            bucket,
            path.trim_start_matches('/')
        )
    }
}
