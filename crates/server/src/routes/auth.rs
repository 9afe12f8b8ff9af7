//! Authentication route handlers.
//!
//! Handles registration, login, logout and the current-session lookup.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::middleware::RequireAuth;
use crate::models::session::CurrentUser;
use crate::models::user::User;
use crate::routes::AppJson;
use crate::services::auth::{AuthService, LoginInput, RegisterInput, login_session, logout_session};
use crate::state::AppState;

/// Register a customer and log them in.
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    AppJson(input): AppJson<RegisterInput>,
) -> Result<impl IntoResponse> {
    let user = AuthService::new(state.pool()).register(&input).await?;
    start_session(&session, &user).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Log in with email and password.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    AppJson(input): AppJson<LoginInput>,
) -> Result<Json<User>> {
    let user = AuthService::new(state.pool()).login(&input).await?;
    start_session(&session, &user).await?;
    Ok(Json(user))
}

/// Log out: drop the identity and the cart.
#[instrument(skip_all)]
pub async fn logout(session: Session) -> Result<StatusCode> {
    logout_session(&session).await?;
    clear_sentry_user();
    add_breadcrumb("auth", "Logged out", None);
    Ok(StatusCode::NO_CONTENT)
}

/// Current user, refreshed from the database.
#[instrument(skip_all)]
pub async fn me(RequireAuth(user): RequireAuth) -> Json<CurrentUser> {
    Json(user)
}

async fn start_session(session: &Session, user: &User) -> Result<()> {
    login_session(session, user).await?;
    set_sentry_user(&user.id, Some(user.email.as_str()));
    let user_id = user.id.to_string();
    add_breadcrumb("auth", "Logged in", Some(&[("user_id", user_id.as_str())]));
    tracing::info!(user_id = %user.id, "User logged in");
    Ok(())
}
