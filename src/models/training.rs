// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Training record model for storage and API.

use serde::{Deserialize, Serialize};

/// Training session document stored in Firestore.
///
/// Invariant, enforced at write time: `user` equals the `owner` field of
/// the referenced animal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingRecord {
    /// Document id (also used as the Firestore document name)
    pub id: String,
    /// When the session took place (YYYY-MM-DD)
    pub date: String,
    /// What was worked on
    pub description: String,
    /// Session length in hours
    pub hours: u32,
    /// Trained animal's document id
    pub animal: String,
    /// Logging user's document id
    pub user: String,
    /// Uploaded session video URL
    pub training_log_video: Option<String>,
    /// When the record was logged (RFC 3339)
    pub created_at: String,
}
