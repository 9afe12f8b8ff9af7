//! Customer order history.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use ipufood_core::OrderId;

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::order::Order;
use crate::state::AppState;

/// The logged-in user's orders, newest first.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<Order>>> {
    let orders = OrderRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;
    Ok(Json(orders))
}

/// A single order.
///
/// Customers only see their own orders; someone else's order is reported as
/// missing rather than forbidden.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>> {
    OrderRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .filter(|order| user.is_admin() || order.user_id == user.id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("order {id} not found")))
}
