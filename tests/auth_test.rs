use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::NamedTempFile;
use tower::ServiceExt;

use shortlinks::config::Config;
use shortlinks::database::{init_db, AppState};
use shortlinks::route::create_app;

const ADMIN_TOKEN: &str = "secret_token";

fn setup_test_app_with_token(admin_token: &str) -> (Router, NamedTempFile) {
    let temp_db = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = temp_db.path().to_str().unwrap();
    let db = init_db(db_path).expect("Failed to initialize test database");

    let config = Config {
        port: 0,
        database_url: String::new(),
        public_base_url: "http://localhost:8080".to_string(),
        admin_token: admin_token.to_string(),
        qr_api_url: "https://api.qrserver.com/v1/create-qr-code/".to_string(),
    };

    (create_app(AppState::new(db, config)), temp_db)
}

fn setup_test_app() -> (Router, NamedTempFile) {
    setup_test_app_with_token(ADMIN_TOKEN)
}

/// Helper function to parse response body as JSON
async fn response_json(body: Body) -> Value {
    let bytes = body
        .collect()
        .await
        .expect("Failed to read response body")
        .to_bytes();

    serde_json::from_slice(&bytes).expect("Failed to parse JSON")
}

fn create_request(
    authorization: Option<&str>,
    cookie_token: Option<&str>,
    header_token: Option<&str>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/admin/api/create")
        .header("content-type", "application/json");

    if let Some(value) = authorization {
        builder = builder.header("Authorization", value);
    }
    if let Some(value) = cookie_token {
        builder = builder.header("Cookie", format!("theme=dark; csrf_token={}", value));
    }
    if let Some(value) = header_token {
        builder = builder.header("X-CSRF-Token", value);
    }

    let payload = json!({ "url": "https://example.com/auth", "custom_path": "auth-test" });
    builder.body(Body::from(payload.to_string())).unwrap()
}

async fn list_len(app: &Router) -> usize {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/admin/api/list")
                .header("Authorization", ADMIN_TOKEN)
                .header("Cookie", "csrf_token=t")
                .header("X-CSRF-Token", "t")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let body = response_json(response.into_body()).await;
    body["data"]["urls"].as_array().unwrap().len()
}

async fn assert_unauthorized(response: axum::response::Response) {
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = response_json(response.into_body()).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["data"]["message"], "Invalid or missing security token");
}

#[tokio::test]
async fn test_valid_admin_and_csrf_token() {
    let (app, _temp_db) = setup_test_app();

    let response = app
        .clone()
        .oneshot(create_request(Some(ADMIN_TOKEN), Some("abc"), Some("abc")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response.into_body()).await["success"], true);
    assert_eq!(list_len(&app).await, 1);
}

#[tokio::test]
async fn test_bearer_admin_token_accepted() {
    let (app, _temp_db) = setup_test_app();

    let bearer = format!("Bearer {}", ADMIN_TOKEN);
    let response = app
        .oneshot(create_request(Some(&bearer), Some("abc"), Some("abc")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_wrong_admin_token() {
    let (app, _temp_db) = setup_test_app();

    let response = app
        .clone()
        .oneshot(create_request(Some("wrong_token"), Some("abc"), Some("abc")))
        .await
        .unwrap();

    assert_unauthorized(response).await;
    assert_eq!(list_len(&app).await, 0);
}

#[tokio::test]
async fn test_missing_admin_token() {
    let (app, _temp_db) = setup_test_app();

    let response = app
        .clone()
        .oneshot(create_request(None, Some("abc"), Some("abc")))
        .await
        .unwrap();

    assert_unauthorized(response).await;
    assert_eq!(list_len(&app).await, 0);
}

#[tokio::test]
async fn test_csrf_header_missing() {
    let (app, _temp_db) = setup_test_app();

    let response = app
        .clone()
        .oneshot(create_request(Some(ADMIN_TOKEN), Some("abc"), None))
        .await
        .unwrap();

    assert_unauthorized(response).await;
    assert_eq!(list_len(&app).await, 0);
}

#[tokio::test]
async fn test_csrf_cookie_missing() {
    let (app, _temp_db) = setup_test_app();

    let response = app
        .oneshot(create_request(Some(ADMIN_TOKEN), None, Some("abc")))
        .await
        .unwrap();

    assert_unauthorized(response).await;
}

#[tokio::test]
async fn test_csrf_token_mismatch() {
    let (app, _temp_db) = setup_test_app();

    let response = app
        .clone()
        .oneshot(create_request(Some(ADMIN_TOKEN), Some("abc"), Some("abd")))
        .await
        .unwrap();

    assert_unauthorized(response).await;
    assert_eq!(list_len(&app).await, 0);
}

#[tokio::test]
async fn test_empty_admin_token_rejects_everything() {
    let (app, _temp_db) = setup_test_app_with_token("");

    let response = app
        .oneshot(create_request(Some(""), Some("abc"), Some("abc")))
        .await
        .unwrap();

    assert_unauthorized(response).await;
}

#[tokio::test]
async fn test_issue_token_sets_cookie() {
    let (app, _temp_db) = setup_test_app();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/admin/api/token")
                .header("Authorization", ADMIN_TOKEN)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get("set-cookie")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.contains("HttpOnly"));

    let body = response_json(response.into_body()).await;
    let token = body["data"]["token"].as_str().unwrap().to_string();
    assert_eq!(token.len(), 32);
    assert!(cookie.starts_with(&format!("csrf_token={};", token)));

    // The issued pair is accepted by a mutating request
    let response = app
        .oneshot(create_request(Some(ADMIN_TOKEN), Some(&token), Some(&token)))
        .await
        .unwrap();
    assert_eq!(response_json(response.into_body()).await["success"], true);
}

#[tokio::test]
async fn test_issue_token_requires_admin() {
    let (app, _temp_db) = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/admin/api/token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_unauthorized(response).await;
}

#[tokio::test]
async fn test_public_redirects_need_no_auth() {
    let (app, _temp_db) = setup_test_app();

    app.clone()
        .oneshot(create_request(Some(ADMIN_TOKEN), Some("abc"), Some("abc")))
        .await
        .unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth-test")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
}
