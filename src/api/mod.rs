use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer, cookie::Key};

pub mod admin;
mod assets;
pub mod auth;
mod error;
pub mod scan;

pub use error::ApiError;

use crate::config::Config;
use crate::db::Store;

#[derive(Clone)]
pub struct AppState {
    /// Read-only after startup; handlers receive it through `State`, never
    /// through an ambient global.
    pub config: Config,

    pub store: Store,
}

pub async fn create_app_state(config: Config) -> anyhow::Result<Arc<AppState>> {
    let store = Store::with_pool_options(
        &config.database.url,
        config.database.max_connections,
        config.database.min_connections,
    )
    .await?;

    Ok(Arc::new(AppState { config, store }))
}

pub fn router(state: Arc<AppState>) -> anyhow::Result<Router> {
    let signing_key = Key::try_from(state.config.session.secret.as_bytes())
        .map_err(|e| anyhow::anyhow!("Invalid session secret: {e}"))?;

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(state.config.server.secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            state.config.session.expiry_minutes,
        )))
        .with_signed(signing_key);

    // The admin gate is re-evaluated on every request; nothing is cached
    // across requests.
    let admin_routes = Router::new()
        .route("/admin", get(admin::admin_home))
        .route("/admin/scans", get(admin::scans_page))
        .route("/admin/api/scans", get(admin::list_scans))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_admin,
        ));

    let cors_origins = state.config.server.cors_allowed_origins.clone();
    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Ok(Router::new()
        .route("/", get(scan::scanner_page))
        .route("/api/scan", post(scan::submit_scan))
        .route("/admin/login", get(auth::login_form).post(auth::login))
        .route("/admin/logout", get(auth::logout))
        .merge(admin_routes)
        .layer(session_layer)
        .with_state(state)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http()))
}
