//! Administrator route handlers: order management and user roles.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use ipufood_core::{OrderId, OrderStatus, UserId, UserRole};

use crate::db::{OrderRepository, RepositoryError, UserRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::order::Order;
use crate::models::user::User;
use crate::routes::{AppJson, AppQuery};
use crate::services::auth::refresh_current_user;
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct OrderQuery {
    pub status: Option<OrderStatus>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserQuery {
    pub role: Option<UserRole>,
}

#[derive(Debug, Deserialize)]
pub struct RoleUpdate {
    pub role: UserRole,
}

// =============================================================================
// Orders
// =============================================================================

/// Every order, newest first, optionally narrowed to one status.
#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn orders(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    AppQuery(query): AppQuery<OrderQuery>,
) -> Result<Json<Vec<Order>>> {
    let repo = OrderRepository::new(state.pool());
    let orders = match query.status {
        Some(status) => repo.list_by_status(status).await?,
        None => repo.list_all().await?,
    };
    Ok(Json(orders))
}

/// Set an order's status.
#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn update_order_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<OrderId>,
    AppJson(input): AppJson<StatusUpdate>,
) -> Result<Json<Order>> {
    set_status(&state, id, input.status).await.map(Json)
}

/// Confirm delivery of an order.
#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn deliver_order(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>> {
    set_status(&state, id, OrderStatus::Delivered).await.map(Json)
}

async fn set_status(state: &AppState, id: OrderId, status: OrderStatus) -> Result<Order> {
    let order = OrderRepository::new(state.pool())
        .update_status(id, status)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound(format!("order {id} not found")),
            other => other.into(),
        })?;

    tracing::info!(order_id = %order.id, status = %order.status, "Order status changed");
    Ok(order)
}

// =============================================================================
// Users
// =============================================================================

/// Registered users, optionally narrowed to one role.
#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn users(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    AppQuery(query): AppQuery<UserQuery>,
) -> Result<Json<Vec<User>>> {
    let repo = UserRepository::new(state.pool());
    let users = match query.role {
        Some(role) => repo.list_by_role(role).await?,
        None => repo.list(None).await?,
    };
    Ok(Json(users))
}

/// Promote or demote a user.
///
/// Changing one's own role takes effect immediately in the session.
#[instrument(skip(state, session, admin), fields(admin_id = %admin.id))]
pub async fn update_user_role(
    State(state): State<AppState>,
    session: Session,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<UserId>,
    AppJson(input): AppJson<RoleUpdate>,
) -> Result<Json<User>> {
    let user = UserRepository::new(state.pool())
        .set_role(id, input.role)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound(format!("user {id} not found")),
            other => other.into(),
        })?;

    if user.id == admin.id {
        refresh_current_user(&session, state.pool()).await?;
    }

    tracing::info!(user_id = %user.id, role = %user.role, "User role changed");
    Ok(Json(user))
}
