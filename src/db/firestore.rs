// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (registration, login lookup, listing)
//! - Animals (registration, ownership lookup, listing)
//! - Training records (creation, listing)
//!
//! Listing uses keyset pagination: documents with id greater than the
//! caller's cursor, ascending by id, truncated to the page size.

use crate::db::collections;
use crate::error::AppError;
use crate::models::{Animal, TrainingRecord, User};

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        // Use ExternalJwtFunctionSource to provide a dummy token without needing
        // a custom TokenSource implementation struct.
        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by document id.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Look up a user by email (login path).
    ///
    /// Email is unique at registration time, so at most one document matches.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let email = email.to_string();
        let matches: Vec<User> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(move |q| q.field("email").eq(email.clone()))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(matches.into_iter().next())
    }

    /// Store a newly registered user.
    pub async fn insert_user(&self, user: &User) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.id)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// List users with keyset pagination (ascending by id).
    pub async fn list_users(&self, last_index: &str, limit: u32) -> Result<Vec<User>, AppError> {
        let last_index = last_index.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(move |q| q.field("id").greater_than(last_index.clone()))
            .order_by([("id", firestore::FirestoreQueryDirection::Ascending)])
            .limit(limit)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Set a user's profile picture URL after a successful upload.
    ///
    /// Fails if no user document matches the id.
    pub async fn set_user_profile_picture(
        &self,
        user_id: &str,
        url: &str,
    ) -> Result<(), AppError> {
        let mut user = self.get_user(user_id).await?.ok_or_else(|| {
            AppError::Database(format!("No user document matched id {}", user_id))
        })?;
        user.profile_picture = Some(url.to_string());
        self.insert_user(&user).await
    }

    // ─── Animal Operations ───────────────────────────────────────

    /// Get an animal by document id.
    pub async fn get_animal(&self, animal_id: &str) -> Result<Option<Animal>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::ANIMALS)
            .obj()
            .one(animal_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Store a newly registered animal.
    pub async fn insert_animal(&self, animal: &Animal) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::ANIMALS)
            .document_id(&animal.id)
            .object(animal)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// List animals with keyset pagination (ascending by id).
    pub async fn list_animals(
        &self,
        last_index: &str,
        limit: u32,
    ) -> Result<Vec<Animal>, AppError> {
        let last_index = last_index.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::ANIMALS)
            .filter(move |q| q.field("id").greater_than(last_index.clone()))
            .order_by([("id", firestore::FirestoreQueryDirection::Ascending)])
            .limit(limit)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Set an animal's profile picture URL after a successful upload.
    ///
    /// Fails if no animal document matches the id.
    pub async fn set_animal_profile_picture(
        &self,
        animal_id: &str,
        url: &str,
    ) -> Result<(), AppError> {
        let mut animal = self.get_animal(animal_id).await?.ok_or_else(|| {
            AppError::Database(format!("No animal document matched id {}", animal_id))
        })?;
        animal.profile_picture = Some(url.to_string());
        self.insert_animal(&animal).await
    }

    // ─── Training Record Operations ──────────────────────────────

    /// Get a training record by document id.
    pub async fn get_training(&self, record_id: &str) -> Result<Option<TrainingRecord>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::TRAINING)
            .obj()
            .one(record_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Store a training record.
    ///
    /// Ownership of the referenced animal is checked by the caller before
    /// this write happens.
    pub async fn insert_training(&self, record: &TrainingRecord) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::TRAINING)
            .document_id(&record.id)
            .object(record)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// List training records with keyset pagination (ascending by id).
    pub async fn list_training(
        &self,
        last_index: &str,
        limit: u32,
    ) -> Result<Vec<TrainingRecord>, AppError> {
        let last_index = last_index.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::TRAINING)
            .filter(move |q| q.field("id").greater_than(last_index.clone()))
            .order_by([("id", firestore::FirestoreQueryDirection::Ascending)])
            .limit(limit)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Set a training record's video URL after a successful upload.
    ///
    /// Fails if no training document matches the id.
    pub async fn set_training_video(&self, record_id: &str, url: &str) -> Result<(), AppError> {
        let mut record = self.get_training(record_id).await?.ok_or_else(|| {
            AppError::Database(format!("No training document matched id {}", record_id))
        })?;
        record.training_log_video = Some(url.to_string());
        self.insert_training(&record).await
    }
}
