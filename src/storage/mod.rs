//! Object storage boundary: uploads and deletes of image objects (client
//! logos, project gallery images, squad avatars).

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::config;

#[derive(Debug, Error)]
pub enum StorageError {
    /// Upload refused by policy before any bytes were sent.
    #[error("{0}")]
    Rejected(String),

    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Delete failed: {0}")]
    Delete(String),

    #[error("Storage call timed out: {0}")]
    Timeout(String),
}

/// Consumed interface over the hosted object store.
///
/// Callers must follow the ordering contract: upload new objects, then write
/// the row referencing their URLs, then best-effort delete whatever became
/// unreferenced. A crash mid-sequence therefore never leaves a row pointing
/// at a deleted object.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Upload bytes and return the public URL of the stored object.
    async fn upload(
        &self,
        bytes: Vec<u8>,
        content_type: &str,
        path_hint: &str,
    ) -> Result<String, StorageError>;

    /// Delete the object behind a previously returned public URL.
    async fn delete(&self, public_url: &str) -> Result<(), StorageError>;
}

/// Check an incoming image against the upload policy. Runs before any
/// storage write; a rejected file must leave every record untouched.
pub fn validate_image(content_type: &str, size: usize) -> Result<(), StorageError> {
    let uploads = &config::config().uploads;

    if !uploads
        .allowed_content_types
        .iter()
        .any(|allowed| allowed == content_type)
    {
        return Err(StorageError::Rejected(format!(
            "File type '{}' not supported. Please use JPG, PNG, GIF, or WebP.",
            content_type
        )));
    }

    if size > uploads.max_size_bytes {
        return Err(StorageError::Rejected(format!(
            "File size too large. Maximum size is {} bytes.",
            uploads.max_size_bytes
        )));
    }

    Ok(())
}

/// Build a collision-free object key under `path_hint`, keeping a sensible
/// extension for the given content type.
pub fn object_key(path_hint: &str, content_type: &str) -> String {
    let ext = match content_type {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        _ => "bin",
    };
    format!("{}/{}.{}", path_hint.trim_matches('/'), Uuid::new_v4(), ext)
}

/// HTTP implementation against a Supabase-style storage API:
/// objects live at `{endpoint}/object/{bucket}/{key}` and are served from
/// `{endpoint}/object/public/{bucket}/{key}`.
pub struct HttpObjectStorage {
    http: reqwest::Client,
    endpoint: String,
    bucket: String,
    api_key: String,
    timeout: Duration,
}

impl HttpObjectStorage {
    pub fn from_config() -> Self {
        let storage = &config::config().storage;
        Self {
            http: reqwest::Client::new(),
            endpoint: storage.endpoint.trim_end_matches('/').to_string(),
            bucket: storage.bucket.clone(),
            api_key: storage.api_key.clone(),
            timeout: Duration::from_secs(storage.request_timeout_secs),
        }
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/object/public/{}/{}", self.endpoint, self.bucket, key)
    }

    /// Recover the object key from a public URL we handed out earlier.
    fn key_from_url(&self, public_url: &str) -> Result<String, StorageError> {
        let prefix = format!("{}/object/public/{}/", self.endpoint, self.bucket);
        public_url
            .strip_prefix(&prefix)
            .map(|key| key.to_string())
            .ok_or_else(|| {
                StorageError::Delete(format!("URL does not belong to this bucket: {}", public_url))
            })
    }
}

#[async_trait]
impl ObjectStorage for HttpObjectStorage {
    async fn upload(
        &self,
        bytes: Vec<u8>,
        content_type: &str,
        path_hint: &str,
    ) -> Result<String, StorageError> {
        let key = object_key(path_hint, content_type);
        let url = format!("{}/object/{}/{}", self.endpoint, self.bucket, key);

        let request = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header(reqwest::header::CACHE_CONTROL, "max-age=3600")
            .body(bytes)
            .send();

        let response = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| StorageError::Timeout(format!("upload of {}", key)))?
            .map_err(|e| StorageError::Upload(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StorageError::Upload(format!(
                "storage responded {} for {}",
                response.status(),
                key
            )));
        }

        info!("Uploaded object {}", key);
        Ok(self.public_url(&key))
    }

    async fn delete(&self, public_url: &str) -> Result<(), StorageError> {
        let key = self.key_from_url(public_url)?;
        let url = format!("{}/object/{}/{}", self.endpoint, self.bucket, key);

        let request = self.http.delete(&url).bearer_auth(&self.api_key).send();

        let response = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| StorageError::Timeout(format!("delete of {}", key)))?
            .map_err(|e| StorageError::Delete(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StorageError::Delete(format!(
                "storage responded {} for {}",
                response.status(),
                key
            )));
        }

        info!("Deleted object {}", key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversized_upload_is_rejected() {
        let too_big = config::config().uploads.max_size_bytes + 1;
        assert!(matches!(
            validate_image("image/png", too_big),
            Err(StorageError::Rejected(_))
        ));
    }

    #[test]
    fn unsupported_content_type_is_rejected() {
        assert!(matches!(
            validate_image("application/pdf", 100),
            Err(StorageError::Rejected(_))
        ));
    }

    #[test]
    fn small_png_passes_policy() {
        assert!(validate_image("image/png", 1024).is_ok());
    }

    #[test]
    fn object_key_uses_content_type_extension() {
        let key = object_key("projects", "image/webp");
        assert!(key.starts_with("projects/"));
        assert!(key.ends_with(".webp"));
    }
}
