// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use std::sync::Arc;
use training_log_api::config::Config;
use training_log_api::db::FirestoreDb;
use training_log_api::routes::create_router;
use training_log_api::services::MediaStorage;
use training_log_api::AppState;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

/// Create a test app with offline mock dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let db = test_db_offline();
    let storage = MediaStorage::new_mock(&config.media_bucket);

    let state = Arc::new(AppState {
        config,
        db,
        storage,
    });

    (create_router(state.clone()), state)
}

/// Create a test app backed by the Firestore emulator.
/// Storage stays mocked; only the database is live.
#[allow(dead_code)]
pub async fn create_emulator_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let db = test_db().await;
    let storage = MediaStorage::new_mock(&config.media_bucket);

    let state = Arc::new(AppState {
        config,
        db,
        storage,
    });

    (create_router(state.clone()), state)
}

/// Create a signed bearer token the same way the verify route does.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: &str, email: &str, signing_key: &[u8]) -> String {
    training_log_api::middleware::auth::create_jwt(user_id, email, signing_key)
        .expect("Failed to create JWT")
}
