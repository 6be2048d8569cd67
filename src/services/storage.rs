// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Cloud object storage for uploaded media.
//!
//! Uploaded files land under a random object key; the resulting public URL
//! is what gets patched into the owning document. Nothing is ever deleted
//! here, so a failed document patch leaves the blob orphaned.

use aws_config::BehaviorVersion;
use aws_sdk_s3::primitives::ByteStream;

use crate::error::AppError;

/// Object-storage client for uploaded media.
#[derive(Clone)]
pub struct MediaStorage {
    client: Option<aws_sdk_s3::Client>,
    bucket: String,
}

impl MediaStorage {
    /// Create a storage client using ambient AWS credentials.
    pub async fn new(bucket: &str) -> Self {
        let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        Self {
            client: Some(aws_sdk_s3::Client::new(&config)),
            bucket: bucket.to_string(),
        }
    }

    /// Create a mock storage client for testing (offline mode).
    ///
    /// All upload operations will return an error if called.
    pub fn new_mock(bucket: &str) -> Self {
        Self {
            client: None,
            bucket: bucket.to_string(),
        }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&aws_sdk_s3::Client, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Storage("Storage not connected (offline mode)".to_string()))
    }

    /// Upload a file body under the given key and return its public URL.
    pub async fn upload(
        &self,
        key: &str,
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<String, AppError> {
        let size = body.len();

        self.get_client()?
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        tracing::info!(key, size, content_type, "Uploaded media object");

        Ok(self.public_url(key))
    }

    /// Public URL for an object in the media bucket.
    pub fn public_url(&self, key: &str) -> String {
        format!("https://{}.s3.amazonaws.com/{}", self.bucket, key)
    }
}
