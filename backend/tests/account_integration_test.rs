//! Integration tests for the account endpoints against Postgres

mod common;

use axum::http::StatusCode;
use movie_accounts_backend::auth::JwtService;
use serde_json::json;

#[tokio::test]
#[ignore = "requires database"]
async fn test_register_and_authenticate() {
    let app = common::TestApp::new().await;
    let (email, token) = app.register_user("pw123").await;

    let claims = JwtService::new(common::JWT_SECRET, 72)
        .validate_token(&token)
        .unwrap();
    assert!(claims.id > 0);
    assert_eq!(claims.email, email);

    let (status, body) = app
        .post(
            "/api/account/authenticate/",
            json!({ "email": email, "password": "pw123" }),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, _) = app
        .post(
            "/api/account/authenticate/",
            json!({ "email": email, "password": "wrong" }),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_register_duplicate_email() {
    let app = common::TestApp::new().await;
    let (email, _) = app.register_user("pw123").await;

    let (status, body) = app
        .post(
            "/api/account/register/",
            json!({ "name": "Again", "email": email.to_uppercase(), "password": "pw123" }),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "user already exists");
    assert_eq!(app.count_users(&email).await, 1);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_concurrent_registration_creates_one_row() {
    let app = common::TestApp::new().await;
    let email = format!("race_{}@example.com", uuid::Uuid::new_v4());
    let body = json!({ "name": "Racer", "email": email, "password": "pw123" });

    let (first, second) = tokio::join!(
        app.post("/api/account/register/", body.clone(), None),
        app.post("/api/account/register/", body.clone(), None),
    );

    let statuses = [first.0, second.0];
    assert!(statuses.contains(&StatusCode::OK));
    assert!(statuses.contains(&StatusCode::UNAUTHORIZED));
    assert_eq!(app.count_users(&email).await, 1);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_collections_are_idempotent() {
    let app = common::TestApp::new().await;
    let movie_id = app.insert_movie("The Matrix").await;
    let (_, token) = app.register_user("pw123").await;
    let body = json!({ "movie_id": movie_id, "collection": "favorite" });

    for _ in 0..2 {
        let (status, _) = app
            .post("/api/account/save-to-collection/", body.clone(), Some(&token))
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, favorites) = app.get("/api/account/favorites/", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(favorites.as_array().unwrap().len(), 1);
    assert_eq!(favorites[0]["title"], "The Matrix");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_unknown_movie_is_bad_request() {
    let app = common::TestApp::new().await;
    let (_, token) = app.register_user("pw123").await;

    let (status, _) = app
        .post(
            "/api/account/save-to-collection/",
            json!({ "movie_id": -1, "collection": "watchlist" }),
            Some(&token),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_soft_deleted_user_is_excluded() {
    let app = common::TestApp::new().await;
    let (email, token) = app.register_user("pw123").await;
    app.soft_delete(&email).await;

    let (status, _) = app.get("/api/account/", Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .post(
            "/api/account/authenticate/",
            json!({ "email": email, "password": "pw123" }),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_protected_endpoint_with_expired_token() {
    let app = common::TestApp::new().await;

    // Use a clearly invalid/expired token
    let fake_token = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.eyJpZCI6MSwiZXhwIjoxfQ.invalid";

    let (status, _) = app.get("/api/account/", Some(fake_token)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
