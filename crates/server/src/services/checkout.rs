//! Checkout: turn the session cart into a persisted order.

use sqlx::PgPool;
use thiserror::Error;
use tower_sessions::Session;
use tracing::instrument;

use ipufood_core::PaymentMethod;

use crate::db::{OrderRepository, RepositoryError};
use crate::models::cart::Cart;
use crate::models::order::{NewOrder, Order};
use crate::models::session::CurrentUser;
use crate::services::cart::{load_cart, save_cart};

/// Checkout failures.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("login required to checkout")]
    NotLoggedIn,

    #[error("cart is empty")]
    EmptyCart,

    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Build the order for `user` from the cart contents.
///
/// # Errors
///
/// Returns `CheckoutError::NotLoggedIn` without a user and
/// `CheckoutError::EmptyCart` when there is nothing to buy.
pub fn build_order(
    user: Option<&CurrentUser>,
    cart: &Cart,
    payment_method: PaymentMethod,
) -> Result<NewOrder, CheckoutError> {
    let user = user.ok_or(CheckoutError::NotLoggedIn)?;
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    Ok(NewOrder {
        user_id: user.id,
        user_name: user.name.clone(),
        items: cart.to_order_items(),
        total: cart.total(),
        payment_method,
    })
}

/// Place an order with the session cart.
///
/// The cart is cleared only after the order has been stored, so a failed
/// insert leaves it untouched.
///
/// # Errors
///
/// See [`CheckoutError`].
#[instrument(skip_all, fields(user_id = user.map(|u| u.id.as_i32()), payment_method = %payment_method))]
pub async fn checkout(
    session: &Session,
    pool: &PgPool,
    user: Option<&CurrentUser>,
    payment_method: PaymentMethod,
) -> Result<Order, CheckoutError> {
    let mut cart = load_cart(session).await?;
    let new_order = build_order(user, &cart, payment_method)?;

    let order = OrderRepository::new(pool).create(&new_order).await?;

    cart.clear();
    save_cart(session, &cart).await?;

    tracing::info!(order_id = %order.id, total = %order.total, "Order placed");
    Ok(order)
}
