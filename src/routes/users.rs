// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User registration and password/token authentication routes.

use crate::error::{AppError, Result};
use crate::middleware::auth::create_jwt;
use crate::models::id::new_doc_id;
use crate::models::User;
use crate::services::password::{hash_password, verify_password};
use crate::AppState;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/user", post(register_user))
        .route("/api/user/login", post(login))
        .route("/api/user/verify", post(verify))
}

// ─── Registration ────────────────────────────────────────────

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
    #[validate(url)]
    pub profile_picture: Option<String>,
}

/// Register a new user.
async fn register_user(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterUserRequest>,
) -> Result<StatusCode> {
    payload.validate()?;

    // Email is the login key, so it must be unique.
    if state
        .db
        .find_user_by_email(&payload.email)
        .await?
        .is_some()
    {
        return Err(AppError::BadRequest("email already registered".to_string()));
    }

    let user = User {
        id: new_doc_id(),
        first_name: payload.first_name,
        last_name: payload.last_name,
        email: payload.email,
        password_hash: hash_password(&payload.password)?,
        profile_picture: payload.profile_picture,
        created_at: chrono::Utc::now().to_rfc3339(),
    };

    state.db.insert_user(&user).await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok(StatusCode::OK)
}

// ─── Login / Token Issuance ──────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Look up a user by email and check the supplied password.
///
/// A missing user and a wrong password both surface as 403.
async fn validate_email_password(
    state: &AppState,
    email: &str,
    password: &str,
) -> Result<User> {
    let user = state
        .db
        .find_user_by_email(email)
        .await?
        .ok_or_else(|| AppError::Forbidden("no user with that email".to_string()))?;

    if !verify_password(password, &user.password_hash)? {
        return Err(AppError::Forbidden("passwords do not match".to_string()));
    }

    Ok(user)
}

#[derive(Serialize)]
pub struct LoginResponse {
    #[serde(rename = "Success")]
    pub success: String,
}

/// Check email + password without issuing a token.
async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    payload.validate()?;

    validate_email_password(&state, &payload.email, &payload.password).await?;

    Ok(Json(LoginResponse {
        success: "Passwords match!".to_string(),
    }))
}

#[derive(Serialize)]
pub struct VerifyResponse {
    #[serde(rename = "Authentication Token")]
    pub token: String,
}

/// Check email + password and issue a bearer token.
async fn verify(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<VerifyResponse>> {
    payload.validate()?;

    let user = validate_email_password(&state, &payload.email, &payload.password).await?;
    let token = create_jwt(&user.id, &user.email, &state.config.jwt_signing_key)?;

    tracing::info!(user_id = %user.id, "Issued bearer token");

    Ok(Json(VerifyResponse { token }))
}
