//! Integration tests for admin login, logout and the session-gated console.

use axum::{
    Router,
    body::Body,
    extract::connect_info::MockConnectInfo,
    http::{Request, Response, StatusCode},
};
use http_body_util::BodyExt;
use pickupscan::config::Config;
use pickupscan::db::Store;
use std::net::SocketAddr;
use tower::ServiceExt;

/// Bootstrap credentials seeded by the initial migration.
const BOOTSTRAP_LOGIN: &str = "admin";
const BOOTSTRAP_PASSWORD: &str = "password";

async fn spawn_app() -> (Router, Store) {
    let mut config = Config::default();
    config.database.url = "sqlite::memory:".to_string();
    config.database.max_connections = 1;
    config.database.min_connections = 1;

    let state = pickupscan::api::create_app_state(config)
        .await
        .expect("Failed to create app state");
    let store = state.store.clone();

    let app = pickupscan::api::router(state)
        .expect("Failed to build router")
        .layer(MockConnectInfo(SocketAddr::from(([127, 0, 0, 1], 4000))));

    (app, store)
}

async fn post_login(app: &Router, login: &str, password: &str) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/admin/login")
                .header("Content-Type", "application/x-www-form-urlencoded")
                .body(Body::from(format!("login={login}&password={password}")))
                .unwrap(),
        )
        .await
        .unwrap()
}

/// Log in and return the session cookie pair ("name=value").
async fn login_session_cookie(app: &Router, login: &str, password: &str) -> String {
    let response = post_login(app, login, password).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    response
        .headers()
        .get("set-cookie")
        .expect("session cookie should be set")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

async fn get_with_cookie(app: &Router, uri: &str, cookie: &str) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .header("Cookie", cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let (app, store) = spawn_app().await;

    // A real, active user without superuser privilege.
    store
        .create_user("viewer", "viewer-password", true, false)
        .await
        .unwrap();

    let unknown_user = post_login(&app, "nobody", BOOTSTRAP_PASSWORD).await;
    let wrong_password = post_login(&app, BOOTSTRAP_LOGIN, "not-the-password").await;
    let not_superuser = post_login(&app, "viewer", "viewer-password").await;

    let mut bodies = Vec::new();
    for response in [unknown_user, wrong_password, not_superuser] {
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        bodies.push(response.into_body().collect().await.unwrap().to_bytes());
    }

    // One generic response for all three causes.
    assert_eq!(bodies[0], bodies[1]);
    assert_eq!(bodies[1], bodies[2]);
    assert!(String::from_utf8_lossy(&bodies[0]).contains("Invalid credentials"));
}

#[tokio::test]
async fn login_success_redirects_and_grants_console_access() {
    let (app, _store) = spawn_app().await;

    let response = post_login(&app, BOOTSTRAP_LOGIN, BOOTSTRAP_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get("location").unwrap(), "/admin");

    let cookie = login_session_cookie(&app, BOOTSTRAP_LOGIN, BOOTSTRAP_PASSWORD).await;

    let response = get_with_cookie(&app, "/admin", &cookie).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get("location").unwrap(), "/admin/scans");

    let response = get_with_cookie(&app, "/admin/scans", &cookie).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_with_cookie(&app, "/admin/api/scans", &cookie).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn console_requires_a_session() {
    let (app, _store) = spawn_app().await;

    for uri in ["/admin", "/admin/scans", "/admin/api/scans"] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[tokio::test]
async fn logout_invalidates_the_session() {
    let (app, _store) = spawn_app().await;

    let cookie = login_session_cookie(&app, BOOTSTRAP_LOGIN, BOOTSTRAP_PASSWORD).await;

    let response = get_with_cookie(&app, "/admin/api/scans", &cookie).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_with_cookie(&app, "/admin/logout", &cookie).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get("location").unwrap(), "/admin/login");

    let response = get_with_cookie(&app, "/admin/api/scans", &cookie).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn inactive_admin_is_rejected_at_the_gate() {
    let (app, store) = spawn_app().await;

    // Login itself does not check is_active, only the per-request gate does.
    store
        .create_user("ghost", "ghost-password", false, true)
        .await
        .unwrap();

    let cookie = login_session_cookie(&app, "ghost", "ghost-password").await;

    let response = get_with_cookie(&app, "/admin/api/scans", &cookie).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_scan_listing_joins_pharmacy_and_region_names() {
    let (app, store) = spawn_app().await;

    let region = store.create_region("NRW West", "NW1").await.unwrap();
    let pharmacy = store
        .create_pharmacy("Adler Apotheke", None, Some(region.id))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/scan")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({ "pharmacy_public_id": pharmacy.public_id }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = login_session_cookie(&app, BOOTSTRAP_LOGIN, BOOTSTRAP_PASSWORD).await;
    let response = get_with_cookie(&app, "/admin/api/scans", &cookie).await;
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let scans: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    let scans = scans.as_array().expect("listing should be an array");
    assert_eq!(scans.len(), 1);
    assert_eq!(scans[0]["pharmacy"], serde_json::json!("Adler Apotheke"));
    assert_eq!(scans[0]["region"], serde_json::json!("NRW West"));
}

#[tokio::test]
async fn login_form_is_served() {
    let (app, _store) = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/admin/login")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let page = String::from_utf8_lossy(&bytes);
    assert!(page.contains("name=\"login\""));
    assert!(page.contains("name=\"password\""));
}
