use axum::{
    Form,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;
use tracing::info;

use super::{ApiError, AppState, assets};
use crate::db::User;

/// Session key holding the authenticated user's id.
const SESSION_USER_KEY: &str = "user_id";

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub login: String,
    pub password: String,
}

/// The admin user resolved by [`require_admin`], available to protected
/// handlers via request extensions.
#[derive(Debug, Clone)]
pub struct CurrentAdmin(pub User);

// ============================================================================
// Handlers
// ============================================================================

/// GET /admin/login
pub async fn login_form() -> Response {
    assets::page("admin_login.html")
}

/// POST /admin/login
///
/// Looks up the user, verifies the password and requires superuser
/// privilege. On success the user id is stored in the session and the
/// browser is redirected to the console.
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, ApiError> {
    let Some(user) = state
        .store
        .authenticate_admin(&form.login, &form.password)
        .await?
    else {
        return Err(ApiError::InvalidCredentials);
    };

    session
        .insert(SESSION_USER_KEY, user.id)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to create session: {e}")))?;

    info!("Admin '{}' logged in", user.login);
    Ok(Redirect::to("/admin").into_response())
}

/// GET /admin/logout
///
/// Clears the session unconditionally; never errors.
pub async fn logout(session: Session) -> Redirect {
    let _ = session.flush().await;
    Redirect::to("/admin/login")
}

// ============================================================================
// Middleware
// ============================================================================

/// Gate for admin-only routes. Loads the user referenced by the session on
/// every request and requires it to exist, be active and be a superuser.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user_id = session
        .get::<i32>(SESSION_USER_KEY)
        .await
        .map_err(|e| ApiError::Internal(format!("Session error: {e}")))?
        .ok_or(ApiError::Unauthenticated)?;

    let user = state
        .store
        .get_admin(user_id)
        .await?
        .filter(|user| user.is_active && user.is_superuser)
        .ok_or(ApiError::Unauthenticated)?;

    request.extensions_mut().insert(CurrentAdmin(user));
    Ok(next.run(request).await)
}
