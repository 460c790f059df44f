use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

use billing_backend::{config::Config, create_router, store::Store, AppState};

/// Builds the real router over a lazy pool: no connection is opened unless a
/// handler actually touches the database, so auth paths are testable offline.
fn test_state() -> AppState {
    let config = Config {
        database_url: "postgres://localhost/unused".to_string(),
        port: "0".to_string(),
        jwt_secret: "test-secret".to_string(),
        admin_username: "admin".to_string(),
        admin_password: "changeme".to_string(),
        cors_origin: "*".to_string(),
    };

    let pool = PgPoolOptions::new()
        .connect_lazy(&config.database_url)
        .expect("lazy pool");

    AppState::new(config, Store::new(pool))
}

async fn body_json(body: Body) -> serde_json::Value {
    let bytes = body.collect().await.expect("body").to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn health_is_public() {
    let app = create_router(test_state());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn login_issues_a_token() {
    let app = create_router(test_state());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"username":"admin","password":"changeme"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response.into_body()).await;
    assert!(json["token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let app = create_router(test_state());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"username":"admin","password":"wrong"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response.into_body()).await;
    assert_eq!(json["error"], "invalid credentials");
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let app = create_router(test_state());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/items")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response.into_body()).await;
    assert_eq!(json["error"], "missing authorization");
}

#[tokio::test]
async fn malformed_authorization_header_is_rejected() {
    let app = create_router(test_state());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/items")
                .header(header::AUTHORIZATION, "Token abc123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response.into_body()).await;
    assert_eq!(json["error"], "invalid authorization header");
}

#[tokio::test]
async fn invalid_token_is_rejected() {
    let app = create_router(test_state());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/items")
                .header(header::AUTHORIZATION, "Bearer not-a-real-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response.into_body()).await;
    assert_eq!(json["error"], "invalid token");
}
