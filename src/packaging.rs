//! Training asset packaging.
//!
//! Bundles a set of remote image URLs into a single gzip'd tar archive
//! suitable for upload to the training provider. Individual fetch failures
//! are logged and skipped; the archive is assembled only after every fetch
//! attempt has resolved.

use flate2::write::GzEncoder;
use flate2::Compression;
use futures_util::future::join_all;
use tar::{Builder, Header};
use tracing::warn;

use crate::errors::{ForgeError, ForgeResult};
use crate::shared_client::SHARED_CLIENT;

/// Extension used when one cannot be parsed from the source URL.
pub const DEFAULT_EXTENSION: &str = "jpg";

/// A packaged training archive plus the number of entries it contains.
#[derive(Debug, Clone)]
pub struct PackagedAssets {
    /// Gzip'd tar archive bytes.
    pub bytes: Vec<u8>,
    /// Number of images that were successfully fetched and packaged.
    pub entry_count: usize,
}

impl PackagedAssets {
    pub fn is_empty(&self) -> bool {
        self.entry_count == 0
    }
}

/// Extract a file extension from a source URL, falling back to `jpg`.
///
/// Query strings and fragments are ignored; anything empty, non-alphanumeric,
/// or implausibly long is treated as unparseable.
pub fn file_extension(url: &str) -> String {
    let path = url
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .rsplit('/')
        .next()
        .unwrap_or_default();
    match path.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && !ext.is_empty()
                && ext.len() <= 5
                && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            ext.to_ascii_lowercase()
        }
        _ => DEFAULT_EXTENSION.to_string(),
    }
}

/// Fetch raw bytes from a public URL with the shared unauthenticated client.
pub(crate) async fn fetch_url(url: &str) -> ForgeResult<Vec<u8>> {
    let resp = SHARED_CLIENT.get(url).send().await?;
    let status = resp.status().as_u16();
    let body = resp.bytes().await?;
    if !(200..300).contains(&status) {
        return Err(ForgeError::http_response(
            status,
            url,
            "fetch_failed",
            None,
        ));
    }
    Ok(body.to_vec())
}

/// Package a list of source image URLs into one training archive.
///
/// All fetches are issued concurrently. Entries are named by positional
/// index plus the source extension (`0.jpg`, `1.png`, ...). URLs that fail
/// to fetch are skipped; an all-failure input still yields a valid (empty)
/// archive, which the caller treats as fatal for launch.
pub async fn package_assets(urls: &[String]) -> ForgeResult<PackagedAssets> {
    let fetches = urls.iter().enumerate().map(|(index, url)| async move {
        match fetch_url(url).await {
            Ok(bytes) => Some((index, file_extension(url), bytes)),
            Err(err) => {
                warn!(url = %url, error = %err, "skipping training asset that failed to fetch");
                None
            }
        }
    });

    let fetched: Vec<(usize, String, Vec<u8>)> =
        join_all(fetches).await.into_iter().flatten().collect();

    let bytes = build_archive(&fetched)?;
    Ok(PackagedAssets {
        bytes,
        entry_count: fetched.len(),
    })
}

fn build_archive(entries: &[(usize, String, Vec<u8>)]) -> ForgeResult<Vec<u8>> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = Builder::new(encoder);

    for (index, extension, bytes) in entries {
        let mut header = Header::new_gnu();
        header.set_size(bytes.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(
                &mut header,
                format!("{}.{}", index, extension),
                bytes.as_slice(),
            )
            .map_err(|e| ForgeError::Internal(format!("failed to add image to archive: {}", e)))?;
    }

    builder
        .finish()
        .map_err(|e| ForgeError::Internal(format!("failed to finish archive: {}", e)))?;
    let encoder = builder
        .into_inner()
        .map_err(|e| ForgeError::Internal(format!("failed to finalize archive: {}", e)))?;
    encoder
        .finish()
        .map_err(|e| ForgeError::Internal(format!("failed to write archive: {}", e)))
}
