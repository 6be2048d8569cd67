// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Animal and training-record routes, plus the admin listing endpoints.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::id::{new_doc_id, parse_doc_id, MIN_DOC_ID};
use crate::models::{Animal, TrainingRecord, UserSummary};
use crate::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

/// Routes in this module require authentication; the auth middleware is
/// applied in routes/mod.rs.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/animal", post(create_animal))
        .route("/api/training", post(create_training))
        .route("/api/admin/users", get(list_users))
        .route("/api/admin/animals", get(list_animals))
        .route("/api/admin/training", get(list_training))
}

// ─── Pagination ──────────────────────────────────────────────

const DEFAULT_PAGE_SIZE: u32 = 20;
const MIN_PAGE_SIZE: u32 = 1;
const MAX_PAGE_SIZE: u32 = 100;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageQuery {
    /// Page size, clamped to [1, 100]
    limit: Option<u32>,
    /// Last document id of the previous page (keyset cursor)
    last_index: Option<String>,
}

fn page_limit(limit: Option<u32>) -> u32 {
    limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE)
}

fn page_cursor(last_index: Option<&str>) -> Result<String> {
    match last_index {
        None => Ok(MIN_DOC_ID.to_string()),
        Some(raw) => parse_doc_id(raw).ok_or_else(|| {
            AppError::Validation("lastIndex must be a 24-character hex id".to_string())
        }),
    }
}

/// Accept only YYYY-MM-DD dates from clients.
fn parse_date(raw: &str) -> Result<String> {
    chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|_| raw.to_string())
        .map_err(|_| AppError::Validation("date must be formatted YYYY-MM-DD".to_string()))
}

// ─── Animals ─────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAnimalRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub hours_trained: u32,
    pub date_of_birth: Option<String>,
    #[validate(url)]
    pub profile_picture: Option<String>,
}

/// Register an animal owned by the authenticated user.
async fn create_animal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateAnimalRequest>,
) -> Result<StatusCode> {
    payload.validate()?;

    let date_of_birth = payload
        .date_of_birth
        .as_deref()
        .map(parse_date)
        .transpose()?;

    let animal = Animal {
        id: new_doc_id(),
        name: payload.name,
        hours_trained: payload.hours_trained,
        owner: user.user_id,
        date_of_birth,
        profile_picture: payload.profile_picture,
        created_at: chrono::Utc::now().to_rfc3339(),
    };

    state.db.insert_animal(&animal).await?;

    tracing::info!(animal_id = %animal.id, owner = %animal.owner, "Animal registered");

    Ok(StatusCode::OK)
}

// ─── Training Records ────────────────────────────────────────

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTrainingRequest {
    pub date: String,
    #[validate(length(min = 1, max = 2000))]
    pub description: String,
    pub hours: u32,
    pub animal: String,
    #[validate(url)]
    pub training_log_video: Option<String>,
}

/// Log a training session.
///
/// The referenced animal must exist and be owned by the authenticated
/// user; otherwise nothing is written and the request fails with 400.
async fn create_training(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateTrainingRequest>,
) -> Result<StatusCode> {
    payload.validate()?;

    let date = parse_date(&payload.date)?;
    let animal_id = parse_doc_id(&payload.animal).ok_or_else(|| {
        AppError::Validation("animal must be a 24-character hex id".to_string())
    })?;

    // Ownership check before any write. A missing animal and an animal
    // owned by someone else get the same uniform 400 contract.
    match state.db.get_animal(&animal_id).await? {
        Some(animal) if animal.owner == user.user_id => {}
        _ => {
            return Err(AppError::BadRequest("animal not owned by user".to_string()));
        }
    }

    let record = TrainingRecord {
        id: new_doc_id(),
        date,
        description: payload.description,
        hours: payload.hours,
        animal: animal_id,
        user: user.user_id,
        training_log_video: payload.training_log_video,
        created_at: chrono::Utc::now().to_rfc3339(),
    };

    state.db.insert_training(&record).await?;

    tracing::info!(record_id = %record.id, animal = %record.animal, "Training session logged");

    Ok(StatusCode::OK)
}

// ─── Admin Listings ──────────────────────────────────────────

/// List users, excluding password hashes.
async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageQuery>,
) -> Result<Json<Vec<UserSummary>>> {
    let limit = page_limit(params.limit);
    let cursor = page_cursor(params.last_index.as_deref())?;

    let users = state.db.list_users(&cursor, limit).await?;

    Ok(Json(users.into_iter().map(UserSummary::from).collect()))
}

/// List animals.
async fn list_animals(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageQuery>,
) -> Result<Json<Vec<Animal>>> {
    let limit = page_limit(params.limit);
    let cursor = page_cursor(params.last_index.as_deref())?;

    Ok(Json(state.db.list_animals(&cursor, limit).await?))
}

/// List training records.
async fn list_training(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageQuery>,
) -> Result<Json<Vec<TrainingRecord>>> {
    let limit = page_limit(params.limit);
    let cursor = page_cursor(params.last_index.as_deref())?;

    Ok(Json(state.db.list_training(&cursor, limit).await?))
}
