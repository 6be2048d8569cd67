// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Training-Log API: registration, authentication and session logging
//! for a dog-training application.
//!
//! This crate provides the backend API: users, their animals, training
//! records, and media uploads to cloud object storage.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::FirestoreDb;
use services::MediaStorage;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub storage: MediaStorage,
}
