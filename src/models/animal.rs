// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Animal model for storage and API.

use serde::{Deserialize, Serialize};

/// Animal document stored in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Animal {
    /// Document id (also used as the Firestore document name)
    pub id: String,
    /// Animal name
    pub name: String,
    /// Total hours trained
    pub hours_trained: u32,
    /// Owning user's document id
    pub owner: String,
    /// Date of birth (YYYY-MM-DD)
    pub date_of_birth: Option<String>,
    /// Profile picture URL
    pub profile_picture: Option<String>,
    /// When the animal was registered (RFC 3339)
    pub created_at: String,
}
