//! Copying provider-hosted images into our own object storage.
//!
//! Provider URLs expire; mirrored copies do not. Mirroring is best effort:
//! callers fall back to the provider URL when it fails.

use studio_cloud::{object_key, ObjectStore, StorageError};
use studio_core::media::GENERATED_FOLDER;

/// Largest image we are willing to mirror.
pub const MAX_MIRROR_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum MirrorError {
    #[error("Download failed: {0}")]
    Download(#[from] reqwest::Error),

    #[error("Download returned status {0}")]
    Status(u16),

    #[error("Image exceeds {0} bytes")]
    TooLarge(usize),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Download `source_url` and store it under `generated/`. Returns the
/// public URL of the copy.
pub async fn mirror_image(
    http: &reqwest::Client,
    store: &dyn ObjectStore,
    source_url: &str,
) -> Result<String, MirrorError> {
    let mut response = http.get(source_url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(MirrorError::Status(status.as_u16()));
    }
    if response
        .content_length()
        .is_some_and(|len| len as usize > MAX_MIRROR_BYTES)
    {
        return Err(MirrorError::TooLarge(MAX_MIRROR_BYTES));
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
        .unwrap_or_else(|| "image/png".to_string());

    let mut bytes = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        if bytes.len().saturating_add(chunk.len()) > MAX_MIRROR_BYTES {
            return Err(MirrorError::TooLarge(MAX_MIRROR_BYTES));
        }
        bytes.extend_from_slice(&chunk);
    }

    let key = object_key(GENERATED_FOLDER, extension_for(&content_type));
    let url = store.put(&key, bytes, &content_type).await?;
    tracing::debug!(
        backend = store.backend_name(),
        %key,
        source = source_url,
        "Mirrored generated image"
    );
    Ok(url)
}

fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "png",
    }
}
