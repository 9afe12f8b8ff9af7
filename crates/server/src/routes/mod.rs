//! HTTP route handlers for the ordering API.
//!
//! Every endpoint speaks JSON. Errors are `{"error": "..."}` with a
//! `fields` list on validation failures.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                     - Liveness
//! GET    /health/ready               - Database connectivity
//!
//! # Auth (login/register rate limited)
//! POST   /auth/register              - Create a customer account and log in
//! POST   /auth/login                 - Log in
//! POST   /auth/logout                - Log out (drops the cart too)
//! GET    /auth/me                    - Current user
//!
//! # Profile (requires auth)
//! GET    /profile                    - Own profile
//! PUT    /profile                    - Edit name, email, phone, address
//!
//! # Menu
//! GET    /products                   - Listing (?q, ?category, ?available)
//! GET    /products/categories        - Distinct categories
//! GET    /products/{id}              - Detail
//! POST   /products                   - Create (admin)
//! PUT    /products/{id}              - Partial update (admin)
//! DELETE /products/{id}              - Delete (admin)
//!
//! # Cart (session backed)
//! GET    /cart                       - Contents
//! DELETE /cart                       - Empty
//! POST   /cart/items                 - Add a product
//! PUT    /cart/items/{product_id}    - Set quantity (0 removes)
//! DELETE /cart/items/{product_id}    - Remove a line
//! POST   /cart/checkout              - Place the order (requires auth)
//!
//! # Orders (requires auth)
//! GET    /orders                     - Own orders
//! GET    /orders/{id}                - Order detail (owner or admin)
//!
//! # Reports
//! GET    /reports/purchases          - Own purchase report (?period)
//! GET    /admin/reports/sales        - Store sales report (admin, ?period)
//!
//! # Administration (requires admin)
//! GET    /admin/orders               - All orders (?status)
//! PUT    /admin/orders/{id}/status   - Set status
//! POST   /admin/orders/{id}/deliver  - Confirm delivery
//! GET    /admin/users                - Users (?role)
//! PUT    /admin/users/{id}/role      - Promote or demote
//! ```

pub mod admin;
pub mod auth;
pub mod cart;
pub mod health;
pub mod orders;
pub mod products;
pub mod profile;
pub mod reports;

use axum::{
    Router,
    extract::{FromRequest, FromRequestParts},
    routing::{get, post, put},
};

use crate::config::ServerConfig;
use crate::error::AppError;
use crate::middleware::auth_rate_limiter;
use crate::state::AppState;

/// JSON body extractor whose rejections use the API error format.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Query string extractor whose rejections use the API error format.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

/// Create the auth routes router.
///
/// `trust_proxy_headers` selects how the rate limiter identifies clients.
pub fn auth_routes(trust_proxy_headers: bool) -> Router<AppState> {
    let limited = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .layer(auth_rate_limiter(trust_proxy_headers));

    Router::new()
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
        .merge(limited)
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route("/categories", get(products::categories))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::delete),
        )
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/items", post(cart::add_item))
        .route(
            "/items/{product_id}",
            put(cart::update_item).delete(cart::remove_item),
        )
        .route("/checkout", post(cart::checkout))
}

/// Create the order history routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}", get(orders::show))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(admin::orders))
        .route("/orders/{id}/status", put(admin::update_order_status))
        .route("/orders/{id}/deliver", post(admin::deliver_order))
        .route("/users", get(admin::users))
        .route("/users/{id}/role", put(admin::update_user_role))
        .route("/reports/sales", get(reports::sales))
}

/// Create all routes.
pub fn routes(config: &ServerConfig) -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/profile", get(profile::show).put(profile::update))
        .route("/reports/purchases", get(reports::purchases))
        .nest("/auth", auth_routes(config.trust_proxy_headers))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/orders", order_routes())
        .nest("/admin", admin_routes())
}
