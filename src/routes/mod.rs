// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers.

pub mod records;
pub mod upload;
pub mod users;

use crate::middleware::auth::require_auth;
use crate::AppState;
use axum::http::{header, Method};
use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Greeting response for the root route.
#[derive(Serialize)]
pub struct RootResponse {
    #[serde(rename = "Hello")]
    pub hello: String,
    #[serde(rename = "Version")]
    pub version: u32,
}

async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        hello: "World".to_string(),
        version: 2,
    })
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub healthy: bool,
}

/// Health check response
async fn healthy() -> Json<HealthResponse> {
    Json(HealthResponse { healthy: true })
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS layer - the API is consumed by browser clients on any origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]);

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/", get(root))
        .route("/healthy", get(healthy))
        .merge(users::routes());

    // Protected routes (auth required)
    let protected_routes = records::routes()
        .merge(upload::routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
