//! Authentication middleware and extractors.
//!
//! Provides extractors for requiring a logged-in user (or an admin) in route
//! handlers. `RequireAuth` and `RequireAdmin` reload the user record on every
//! request, so role changes and deleted accounts apply to live sessions.
//! `OptionalAuth` reads the [`CurrentUser`] snapshot only.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::error::AppError;
use crate::models::session::{CurrentUser, keys};
use crate::services::auth::refresh_current_user;
use crate::state::AppState;

/// Extractor that requires an authenticated user.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Olá, {}!", user.name)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Extractor that requires an authenticated administrator.
pub struct RequireAdmin(pub CurrentUser);

fn login_required() -> AppError {
    AppError::Unauthorized("login required".to_string())
}

fn admin_required() -> AppError {
    AppError::Forbidden("admin access required".to_string())
}

async fn session_user(parts: &Parts) -> Option<CurrentUser> {
    let session = parts.extensions.get::<Session>()?;
    session
        .get::<CurrentUser>(keys::CURRENT_USER)
        .await
        .ok()
        .flatten()
}

/// Reload the session user from the database.
async fn fresh_user(parts: &Parts, state: &AppState) -> Result<CurrentUser, AppError> {
    let session = parts
        .extensions
        .get::<Session>()
        .ok_or_else(login_required)?;

    refresh_current_user(session, state.pool())
        .await?
        .ok_or_else(login_required)
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        fresh_user(parts, state).await.map(Self)
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // A customer snapshot is rejected without a database round trip.
        let snapshot = session_user(parts).await.ok_or_else(login_required)?;
        if !snapshot.is_admin() {
            tracing::debug!(user_id = %snapshot.id, "Non-admin rejected from admin route");
            return Err(admin_required());
        }

        let user = fresh_user(parts, state).await?;
        if !user.is_admin() {
            tracing::info!(user_id = %user.id, "Session admin was demoted");
            return Err(admin_required());
        }

        Ok(Self(user))
    }
}

/// Extractor that optionally gets the current user.
///
/// Unlike `RequireAuth`, this does not reject the request if nobody is logged in,
/// and it reads the session snapshot without touching the database.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(
///     OptionalAuth(user): OptionalAuth,
/// ) -> impl IntoResponse {
///     match user {
///         Some(u) => format!("Olá, {}!", u.name),
///         None => "Olá, visitante!".to_string(),
///     }
/// }
/// ```
pub struct OptionalAuth(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(session_user(parts).await))
    }
}

/// Helper to set the current user in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::CURRENT_USER, user).await
}

/// Helper to clear the current user from the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.remove::<CurrentUser>(keys::CURRENT_USER).await?;
    Ok(())
}
