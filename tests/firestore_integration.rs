// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running
//! (set FIRESTORE_EMULATOR_HOST). The emulator provides a clean state
//! for each test run, but tests still use unique emails and ids so they
//! can share a long-lived emulator.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;
use training_log_api::models::id::new_doc_id;
use training_log_api::models::{Animal, User};
use training_log_api::services::password::hash_password;

mod common;
use common::{create_emulator_app, create_test_jwt};

/// Generate a unique email for test isolation.
fn unique_email(prefix: &str) -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}{}@example.com", prefix, nanos)
}

fn json_post(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn json_post_authed(uri: &str, token: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_authed(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Walk a listing endpoint page by page until it runs dry.
async fn walk_listing(app: &axum::Router, token: &str, path: &str) -> Vec<serde_json::Value> {
    let mut collected = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let uri = match &cursor {
            None => format!("{}?limit=100", path),
            Some(c) => format!("{}?limit=100&lastIndex={}", path, c),
        };
        let response = app.clone().oneshot(get_authed(&uri, token)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let items = response_json(response).await;
        let items = items.as_array().expect("listing returns an array").clone();
        if items.is_empty() {
            break;
        }

        cursor = Some(
            items
                .last()
                .unwrap()["id"]
                .as_str()
                .expect("documents carry a string id")
                .to_string(),
        );
        collected.extend(items);
    }

    collected
}

fn test_animal(owner_id: &str, name: &str) -> Animal {
    Animal {
        id: new_doc_id(),
        name: name.to_string(),
        hours_trained: 10,
        owner: owner_id.to_string(),
        date_of_birth: Some("2020-06-01".to_string()),
        profile_picture: None,
        created_at: chrono::Utc::now().to_rfc3339(),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// AUTH FLOW
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_register_login_verify_flow() {
    require_emulator!();

    let (app, _state) = create_emulator_app().await;
    let email = unique_email("flow");

    // Register
    let response = app
        .clone()
        .oneshot(json_post(
            "/api/user",
            serde_json::json!({
                "firstName": "A",
                "lastName": "B",
                "email": email,
                "password": "pw"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Login with the right password
    let response = app
        .clone()
        .oneshot(json_post(
            "/api/user/login",
            serde_json::json!({"email": email, "password": "pw"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["Success"], "Passwords match!");

    // Login with the wrong password
    let response = app
        .clone()
        .oneshot(json_post(
            "/api/user/login",
            serde_json::json!({"email": email, "password": "wrong"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Verify issues a bearer token
    let response = app
        .clone()
        .oneshot(json_post(
            "/api/user/verify",
            serde_json::json!({"email": email, "password": "pw"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    let token = json["Authentication Token"]
        .as_str()
        .expect("verify returns a token")
        .to_string();

    // The issued token opens protected routes
    let response = app
        .clone()
        .oneshot(get_authed("/api/admin/users", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_duplicate_email_rejected() {
    require_emulator!();

    let (app, _state) = create_emulator_app().await;
    let email = unique_email("dup");

    let body = serde_json::json!({
        "firstName": "A",
        "lastName": "B",
        "email": email,
        "password": "pw"
    });

    let response = app
        .clone()
        .oneshot(json_post("/api/user", body.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(json_post("/api/user", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_unknown_email_rejected() {
    require_emulator!();

    let (app, _state) = create_emulator_app().await;

    let response = app
        .clone()
        .oneshot(json_post(
            "/api/user/login",
            serde_json::json!({"email": unique_email("ghost"), "password": "pw"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ═══════════════════════════════════════════════════════════════════════════
// TRAINING OWNERSHIP
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_training_ownership_enforced() {
    require_emulator!();

    let (app, state) = create_emulator_app().await;

    // Arrange: an owner with one animal, plus a stranger.
    let owner = User {
        id: new_doc_id(),
        first_name: "Own".to_string(),
        last_name: "Er".to_string(),
        email: unique_email("owner"),
        password_hash: hash_password("pw").unwrap(),
        profile_picture: None,
        created_at: chrono::Utc::now().to_rfc3339(),
    };
    state.db.insert_user(&owner).await.unwrap();

    let animal = test_animal(&owner.id, "Rex");
    state.db.insert_animal(&animal).await.unwrap();

    let owner_token = create_test_jwt(&owner.id, &owner.email, &state.config.jwt_signing_key);
    let stranger_token = create_test_jwt(
        &new_doc_id(),
        "stranger@example.com",
        &state.config.jwt_signing_key,
    );

    let training_body = serde_json::json!({
        "date": "2024-06-01",
        "description": "Recall work at the park",
        "hours": 2,
        "animal": animal.id
    });

    // A stranger logging training for someone else's animal is rejected...
    let response = app
        .clone()
        .oneshot(json_post_authed(
            "/api/training",
            &stranger_token,
            training_body.clone(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // ...and nothing was persisted.
    let records = walk_listing(&app, &owner_token, "/api/admin/training").await;
    assert!(
        records.iter().all(|r| r["animal"] != animal.id.as_str()),
        "rejected training record must not be written"
    );

    // The owner logging the same session succeeds.
    let response = app
        .clone()
        .oneshot(json_post_authed(
            "/api/training",
            &owner_token,
            training_body,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let records = walk_listing(&app, &owner_token, "/api/admin/training").await;
    let logged: Vec<_> = records
        .iter()
        .filter(|r| r["animal"] == animal.id.as_str())
        .collect();
    assert_eq!(logged.len(), 1);
    assert_eq!(logged[0]["user"], owner.id.as_str());
}

#[tokio::test]
async fn test_training_missing_animal_rejected() {
    require_emulator!();

    let (app, state) = create_emulator_app().await;
    let token = create_test_jwt(
        &new_doc_id(),
        "nobody@example.com",
        &state.config.jwt_signing_key,
    );

    // Well-formed id, but no such animal document.
    let response = app
        .clone()
        .oneshot(json_post_authed(
            "/api/training",
            &token,
            serde_json::json!({
                "date": "2024-06-01",
                "description": "Ghost session",
                "hours": 1,
                "animal": new_doc_id()
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ═══════════════════════════════════════════════════════════════════════════
// PAGINATION
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_pagination_is_monotonic_and_resumable() {
    require_emulator!();

    let (app, state) = create_emulator_app().await;
    let token = create_test_jwt(
        &new_doc_id(),
        "pager@example.com",
        &state.config.jwt_signing_key,
    );

    // Arrange: five animals belonging to this test.
    let owner_id = new_doc_id();
    let mut inserted_ids = Vec::new();
    for i in 0..5 {
        let animal = test_animal(&owner_id, &format!("Dog {}", i));
        state.db.insert_animal(&animal).await.unwrap();
        inserted_ids.push(animal.id);
    }

    // Walk everything with small pages.
    let mut collected = Vec::new();
    let mut cursor: Option<String> = None;
    loop {
        let uri = match &cursor {
            None => "/api/admin/animals?limit=2".to_string(),
            Some(c) => format!("/api/admin/animals?limit=2&lastIndex={}", c),
        };
        let response = app.clone().oneshot(get_authed(&uri, &token)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let page = response_json(response).await;
        let page = page.as_array().unwrap().clone();
        assert!(page.len() <= 2, "page must respect the limit");
        if page.is_empty() {
            break;
        }

        cursor = Some(page.last().unwrap()["id"].as_str().unwrap().to_string());
        collected.extend(page);
    }

    // Ids are strictly increasing across the entire walk (no overlap,
    // no duplicates) and include everything we inserted.
    let ids: Vec<String> = collected
        .iter()
        .map(|a| a["id"].as_str().unwrap().to_string())
        .collect();
    assert!(
        ids.windows(2).all(|w| w[0] < w[1]),
        "ids must be strictly increasing across pages"
    );
    for id in &inserted_ids {
        assert!(ids.contains(id), "walk must include inserted animal {}", id);
    }

    // Resuming from a mid-walk cursor returns only later documents.
    let resume_cursor = &ids[ids.len() / 2];
    let response = app
        .clone()
        .oneshot(get_authed(
            &format!("/api/admin/animals?limit=100&lastIndex={}", resume_cursor),
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let resumed = response_json(response).await;
    for item in resumed.as_array().unwrap() {
        assert!(
            item["id"].as_str().unwrap() > resume_cursor.as_str(),
            "resumed page must start after the cursor"
        );
    }
}

#[tokio::test]
async fn test_user_listing_excludes_password_hash() {
    require_emulator!();

    let (app, state) = create_emulator_app().await;
    let email = unique_email("nopass");

    let response = app
        .clone()
        .oneshot(json_post(
            "/api/user",
            serde_json::json!({
                "firstName": "No",
                "lastName": "Pass",
                "email": email,
                "password": "a secret"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let token = create_test_jwt(
        &new_doc_id(),
        "admin@example.com",
        &state.config.jwt_signing_key,
    );
    let users = walk_listing(&app, &token, "/api/admin/users").await;

    let listed = users
        .iter()
        .find(|u| u["email"] == email.as_str())
        .expect("registered user must appear in the listing");

    assert_eq!(listed["firstName"], "No");
    assert!(listed.get("passwordHash").is_none());
    assert!(listed.get("password").is_none());
}
