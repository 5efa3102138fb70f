//! Object-storage client over the S3 API.
//!
//! Wraps `aws-sdk-s3` against an S3-compatible endpoint and exposes the three
//! operations this service needs: upload, presigned read URL, remove.

use std::time::Duration;

use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{Delete, ObjectIdentifier};

/// Lifetime of every signed URL issued by this service: 24 hours.
pub const SIGNED_URL_TTL: Duration = Duration::from_secs(60 * 60 * 24);

/// Connection settings for the object store, loaded from the environment by
/// the binary.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// S3-compatible endpoint URL.
    pub endpoint: String,
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
}

/// Errors from object-storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Upload of '{key}' failed: {message}")]
    Upload { key: String, message: String },

    #[error("Signing URL for '{key}' failed: {message}")]
    Sign { key: String, message: String },

    #[error("Removing objects failed: {message}")]
    Remove { message: String },
}

/// Client for one bucket of the object store.
///
/// Cheaply cloneable; the inner SDK client is already reference-counted.
#[derive(Debug, Clone)]
pub struct ObjectStorage {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl ObjectStorage {
    /// Build a client from explicit credentials and endpoint.
    ///
    /// Uses path-style addressing, which S3-compatible stores expect.
    pub async fn connect(config: &StorageConfig) -> Self {
        let credentials = Credentials::new(
            config.access_key.clone(),
            config.secret_key.clone(),
            None,
            None,
            "Static",
        );

        let base = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .endpoint_url(&config.endpoint)
            .load()
            .await;

        let s3_config = aws_sdk_s3::config::Builder::from(&base)
            .force_path_style(true)
            .build();

        Self {
            client: aws_sdk_s3::Client::from_conf(s3_config),
            bucket: config.bucket.clone(),
        }
    }

    /// Bucket this client writes to.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Upload a byte buffer to `key` with the given content type.
    pub async fn upload(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let size = bytes.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| StorageError::Upload {
                key: key.to_string(),
                message: e.to_string(),
            })?;

        tracing::info!(key, size, content_type, "Object uploaded");
        Ok(())
    }

    /// Issue a presigned GET URL for `key`, valid for [`SIGNED_URL_TTL`].
    pub async fn signed_url(&self, key: &str) -> Result<String, StorageError> {
        let presigning = PresigningConfig::expires_in(SIGNED_URL_TTL).map_err(|e| {
            StorageError::Sign {
                key: key.to_string(),
                message: e.to_string(),
            }
        })?;

        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| StorageError::Sign {
                key: key.to_string(),
                message: e.to_string(),
            })?;

        Ok(request.uri().to_string())
    }

    /// Remove a batch of objects. A missing object is not an error.
    pub async fn remove(&self, keys: &[String]) -> Result<(), StorageError> {
        if keys.is_empty() {
            return Ok(());
        }

        let identifiers: Vec<ObjectIdentifier> = keys
            .iter()
            .map(|key| {
                ObjectIdentifier::builder()
                    .key(key)
                    .build()
                    .map_err(|e| StorageError::Remove {
                        message: e.to_string(),
                    })
            })
            .collect::<Result<_, _>>()?;

        let delete = Delete::builder()
            .set_objects(Some(identifiers))
            .build()
            .map_err(|e| StorageError::Remove {
                message: e.to_string(),
            })?;

        self.client
            .delete_objects()
            .bucket(&self.bucket)
            .delete(delete)
            .send()
            .await
            .map_err(|e| StorageError::Remove {
                message: e.to_string(),
            })?;

        tracing::info!(count = keys.len(), "Objects removed");
        Ok(())
    }

    /// Re-derive an object key from a previously stored (signed) URL.
    ///
    /// Stored URLs embed the bucket name; the key is everything after the
    /// `{bucket}/` marker, with the signature query stripped. Returns `None`
    /// when the URL does not reference this bucket.
    pub fn object_key_from_url(&self, url: &str) -> Option<String> {
        let marker = format!("{}/", self.bucket);
        let (_, rest) = url.split_once(&marker)?;
        let key = rest.split('?').next().unwrap_or(rest);
        if key.is_empty() {
            None
        } else {
            Some(key.to_string())
        }
    }
}
