// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Media upload route.
//!
//! Accepts a multipart form with a target kind (`type`), a target document
//! id (`id`) and one file part. The file is uploaded to object storage
//! under a random key, then the target document is patched with the
//! resulting public URL. There is no rollback: if the patch fails, the
//! uploaded blob stays orphaned in the bucket.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::id::{new_doc_id, parse_doc_id};
use crate::AppState;
use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::post,
    Extension, Router,
};
use std::sync::Arc;

/// Uploaded training videos can be large; profile pictures are not.
const MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

/// Routes in this module require authentication; the auth middleware is
/// applied in routes/mod.rs.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/file/upload", post(upload_file))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

/// What document an upload is destined for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UploadKind {
    UserProfile,
    AnimalProfile,
    TrainingVideo,
}

impl UploadKind {
    fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_uppercase().as_str() {
            "USER" => Some(Self::UserProfile),
            "ANIMAL" => Some(Self::AnimalProfile),
            "TRAINING" => Some(Self::TrainingVideo),
            _ => None,
        }
    }

    /// Object-key extension for an allow-listed MIME type, or `None` if
    /// the type is not acceptable for this target kind.
    fn extension_for(self, content_type: &str) -> Option<&'static str> {
        match (self, content_type) {
            (Self::UserProfile | Self::AnimalProfile, "image/png") => Some("png"),
            (Self::UserProfile | Self::AnimalProfile, "image/jpeg") => Some("jpg"),
            (Self::TrainingVideo, "video/mp4") => Some("mp4"),
            (Self::TrainingVideo, "video/quicktime") => Some("mov"),
            _ => None,
        }
    }
}

/// Upload a media file and patch the target document with its URL.
async fn upload_file(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    mut multipart: Multipart,
) -> Result<StatusCode> {
    let mut kind: Option<UploadKind> = None;
    let mut target_id: Option<String> = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("malformed multipart body: {}", e)))?
    {
        let name = field.name().map(|n| n.to_string());
        match name.as_deref() {
            Some("type") => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("unreadable 'type' field: {}", e)))?;
                kind = Some(UploadKind::parse(&raw).ok_or_else(|| {
                    AppError::Validation("type must be USER, ANIMAL or TRAINING".to_string())
                })?);
            }
            Some("id") => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("unreadable 'id' field: {}", e)))?;
                target_id = Some(parse_doc_id(&raw).ok_or_else(|| {
                    AppError::Validation("id must be a 24-character hex id".to_string())
                })?);
            }
            Some("file") => {
                let content_type = field
                    .content_type()
                    .map(|m| m.to_string())
                    .ok_or_else(|| {
                        AppError::Validation("file part must declare a content type".to_string())
                    })?;
                let bytes = field.bytes().await.map_err(|e| {
                    AppError::Validation(format!("failed reading file part: {}", e))
                })?;
                file = Some((content_type, bytes.to_vec()));
            }
            _ => {
                // unknown parts are ignored
            }
        }
    }

    let kind =
        kind.ok_or_else(|| AppError::Validation("missing 'type' field".to_string()))?;
    let target_id =
        target_id.ok_or_else(|| AppError::Validation("missing 'id' field".to_string()))?;
    let (content_type, body) =
        file.ok_or_else(|| AppError::Validation("missing 'file' part".to_string()))?;

    let extension = kind.extension_for(&content_type).ok_or_else(|| {
        AppError::Validation(format!(
            "content type {} not allowed for this upload type",
            content_type
        ))
    })?;

    let key = format!("{}.{}", new_doc_id(), extension);
    let url = state.storage.upload(&key, &content_type, body).await?;

    match kind {
        UploadKind::UserProfile => state.db.set_user_profile_picture(&target_id, &url).await?,
        UploadKind::AnimalProfile => state.db.set_animal_profile_picture(&target_id, &url).await?,
        UploadKind::TrainingVideo => state.db.set_training_video(&target_id, &url).await?,
    }

    tracing::info!(
        uploaded_by = %user.user_id,
        key,
        target = %target_id,
        "Media uploaded and document patched"
    );

    Ok(StatusCode::OK)
}
