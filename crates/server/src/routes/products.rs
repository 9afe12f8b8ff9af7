//! Product catalog route handlers.
//!
//! Listing and detail are public; create, update and delete require an
//! administrator.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::instrument;

use ipufood_core::ProductId;

use crate::db::{ProductRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::product::{Product, ProductFilter, ProductInput, ProductPatch};
use crate::routes::{AppJson, AppQuery};
use crate::state::AppState;

/// List products, optionally filtered by text, category and availability.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    AppQuery(filter): AppQuery<ProductFilter>,
) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool()).list(&filter).await?;
    Ok(Json(products))
}

/// Distinct product categories.
#[instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Result<Json<Vec<String>>> {
    let categories = ProductRepository::new(state.pool())
        .list_categories()
        .await?;
    Ok(Json(categories))
}

/// Product detail.
#[instrument(skip(state), fields(product_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    ProductRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| product_not_found(id))
}

/// Create a product.
#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    AppJson(input): AppJson<ProductInput>,
) -> Result<impl IntoResponse> {
    let new_product = input.validate()?;
    let product = ProductRepository::new(state.pool())
        .create(&new_product)
        .await?;

    tracing::info!(product_id = %product.id, name = %product.name, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// Update the given fields of a product.
#[instrument(skip_all, fields(admin_id = %admin.id, product_id = %id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<ProductId>,
    AppJson(patch): AppJson<ProductPatch>,
) -> Result<Json<Product>> {
    let update = patch.validate()?;
    let product = ProductRepository::new(state.pool())
        .update(id, &update)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => product_not_found(id),
            other => other.into(),
        })?;

    tracing::info!(product_id = %product.id, "Product updated");
    Ok(Json(product))
}

/// Delete a product. Past orders keep their item snapshots.
#[instrument(skip_all, fields(admin_id = %admin.id, product_id = %id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<ProductId>,
) -> Result<StatusCode> {
    if ProductRepository::new(state.pool()).delete(id).await? {
        tracing::info!(product_id = %id, "Product deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(product_not_found(id))
    }
}

fn product_not_found(id: ProductId) -> AppError {
    AppError::NotFound(format!("product {id} not found"))
}
