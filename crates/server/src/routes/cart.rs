//! Cart and checkout route handlers.
//!
//! The cart lives in the session, so anonymous visitors can fill one;
//! checkout requires a logged-in user.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use ipufood_core::{PaymentMethod, ProductId};

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::middleware::OptionalAuth;
use crate::models::cart::{CartError, CartView};
use crate::routes::AppJson;
use crate::services::cart::{load_cart, save_cart};
use crate::services::checkout::{CheckoutError, checkout as place_order};
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

/// Add-to-cart request.
#[derive(Debug, Deserialize)]
pub struct AddItem {
    pub product_id: ProductId,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

const fn default_quantity() -> u32 {
    1
}

/// Quantity update request. Zero removes the line.
#[derive(Debug, Deserialize)]
pub struct UpdateItem {
    pub quantity: u32,
}

/// Checkout request.
#[derive(Debug, Default, Deserialize)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

// =============================================================================
// Handlers
// =============================================================================

/// Current cart contents.
#[instrument(skip_all)]
pub async fn show(session: Session) -> Result<Json<CartView>> {
    let cart = load_cart(&session).await?;
    Ok(Json(cart.into()))
}

/// Add a product to the cart.
#[instrument(skip(state, session))]
pub async fn add_item(
    State(state): State<AppState>,
    session: Session,
    AppJson(input): AppJson<AddItem>,
) -> Result<Json<CartView>> {
    let product = ProductRepository::new(state.pool())
        .get_by_id(input.product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {} not found", input.product_id)))?;

    if !product.available {
        return Err(AppError::BadRequest(format!(
            "{} is not available",
            product.name
        )));
    }

    let mut cart = load_cart(&session).await?;
    cart.add(product, input.quantity).map_err(|e| match e {
        CartError::InvalidQuantity => AppError::BadRequest(e.to_string()),
    })?;
    save_cart(&session, &cart).await?;

    Ok(Json(cart.into()))
}

/// Change the quantity of a cart line.
#[instrument(skip(session))]
pub async fn update_item(
    session: Session,
    Path(product_id): Path<ProductId>,
    AppJson(input): AppJson<UpdateItem>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    if !cart.set_quantity(product_id, input.quantity) {
        return Err(not_in_cart(product_id));
    }
    save_cart(&session, &cart).await?;
    Ok(Json(cart.into()))
}

/// Remove a line from the cart.
#[instrument(skip(session))]
pub async fn remove_item(
    session: Session,
    Path(product_id): Path<ProductId>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    if !cart.remove(product_id) {
        return Err(not_in_cart(product_id));
    }
    save_cart(&session, &cart).await?;
    Ok(Json(cart.into()))
}

/// Empty the cart.
#[instrument(skip_all)]
pub async fn clear(session: Session) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    cart.clear();
    save_cart(&session, &cart).await?;
    Ok(Json(cart.into()))
}

/// Place an order with the cart contents.
///
/// The body is optional; without one the default payment method is used.
#[instrument(skip_all)]
pub async fn checkout(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
    body: std::result::Result<Option<Json<CheckoutRequest>>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let input = body?.map(|Json(input)| input).unwrap_or_default();
    let order = place_order(&session, state.pool(), user.as_ref(), input.payment_method)
        .await
        .map_err(|e| match e {
            CheckoutError::NotLoggedIn => {
                AppError::Unauthorized("login required to checkout".to_string())
            }
            CheckoutError::EmptyCart => AppError::BadRequest("cart is empty".to_string()),
            CheckoutError::Session(err) => err.into(),
            CheckoutError::Repository(err) => err.into(),
        })?;

    Ok((StatusCode::CREATED, Json(order)))
}

fn not_in_cart(product_id: ProductId) -> AppError {
    AppError::NotFound(format!("product {product_id} is not in the cart"))
}
