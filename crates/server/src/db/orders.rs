//! Order repository.
//!
//! An order is stored as one `ipufood.order` row plus one `ipufood.order_item`
//! row per line. Both are written in a single transaction at checkout.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, instrument};

use ipufood_core::{
    OrderId, OrderItemId, OrderStatus, PaymentMethod, Price, ProductId, UserId,
};

use super::RepositoryError;
use crate::models::order::{NewOrder, Order, OrderItem};

const ORDER_COLUMNS: &str =
    "id, user_id, user_name, total, status, payment_method, created_at, delivered_at";

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    user_id: UserId,
    user_name: String,
    total: Price,
    status: OrderStatus,
    payment_method: PaymentMethod,
    created_at: DateTime<Utc>,
    delivered_at: Option<DateTime<Utc>>,
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> Order {
        Order {
            id: self.id,
            user_id: self.user_id,
            user_name: self.user_name,
            items,
            total: self.total,
            status: self.status,
            payment_method: self.payment_method,
            created_at: self.created_at,
            delivered_at: self.delivered_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    id: OrderItemId,
    order_id: OrderId,
    product_id: Option<ProductId>,
    product_name: String,
    category: Option<String>,
    quantity: i32,
    price: Price,
    total: Price,
}

impl TryFrom<OrderItemRow> for OrderItem {
    type Error = RepositoryError;

    fn try_from(r: OrderItemRow) -> Result<Self, Self::Error> {
        let quantity = u32::try_from(r.quantity).map_err(|_| {
            RepositoryError::DataCorruption(format!(
                "negative quantity {} on order item {}",
                r.quantity, r.id
            ))
        })?;

        Ok(Self {
            id: r.id,
            product_id: r.product_id,
            product_name: r.product_name,
            category: r.category,
            quantity,
            price: r.price,
            total: r.total,
        })
    }
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert an order and its items atomically.
    ///
    /// The order starts as `pending` with `created_at = now()`. Items whose
    /// product was deleted after it went into the cart keep their snapshot and
    /// get a null `product_id`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any insert fails; nothing is
    /// written in that case.
    #[instrument(skip_all, fields(user_id = %order.user_id, items = order.items.len()))]
    pub async fn create(&self, order: &NewOrder) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row: OrderRow = sqlx::query_as(&format!(
            r"
            INSERT INTO ipufood.order (user_id, user_name, total, status, payment_method)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(order.user_id)
        .bind(&order.user_name)
        .bind(order.total)
        .bind(OrderStatus::Pending)
        .bind(order.payment_method)
        .fetch_one(&mut *tx)
        .await?;

        let mut items = Vec::with_capacity(order.items.len());
        for item in &order.items {
            let quantity = i32::try_from(item.quantity).map_err(|_| {
                RepositoryError::DataCorruption(format!("quantity {} out of range", item.quantity))
            })?;

            let item_row: OrderItemRow = sqlx::query_as(
                r"
                INSERT INTO ipufood.order_item
                    (order_id, product_id, product_name, category, quantity, price, total)
                VALUES (
                    $1,
                    (SELECT id FROM ipufood.product WHERE id = $2),
                    $3, $4, $5, $6, $7
                )
                RETURNING id, order_id, product_id, product_name, category, quantity, price, total
                ",
            )
            .bind(row.id)
            .bind(item.product_id)
            .bind(&item.product_name)
            .bind(item.category.as_deref())
            .bind(quantity)
            .bind(item.price)
            .bind(item.total)
            .fetch_one(&mut *tx)
            .await?;

            items.push(OrderItem::try_from(item_row)?);
        }

        tx.commit().await?;

        debug!(order_id = %row.id, "Created order");
        Ok(row.into_order(items))
    }

    /// Orders placed by one user, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            r"
            SELECT {ORDER_COLUMNS}
            FROM ipufood.order
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        self.attach_items(rows).await
    }

    /// Every order, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Order>, RepositoryError> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            r"
            SELECT {ORDER_COLUMNS}
            FROM ipufood.order
            ORDER BY created_at DESC, id DESC
            "
        ))
        .fetch_all(self.pool)
        .await?;

        self.attach_items(rows).await
    }

    /// Orders with a given status, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_status(
        &self,
        status: OrderStatus,
    ) -> Result<Vec<Order>, RepositoryError> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            r"
            SELECT {ORDER_COLUMNS}
            FROM ipufood.order
            WHERE status = $1
            ORDER BY created_at DESC, id DESC
            "
        ))
        .bind(status)
        .fetch_all(self.pool)
        .await?;

        self.attach_items(rows).await
    }

    /// Get an order with its items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row: Option<OrderRow> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM ipufood.order WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(row) => Ok(self.attach_items(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    /// Set an order's status.
    ///
    /// Moving to `delivered` stamps `delivered_at`; any other status leaves it
    /// as it was.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    #[instrument(skip_all, fields(order_id = %id, status = %status))]
    pub async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        let row: Option<OrderRow> = sqlx::query_as(&format!(
            r"
            UPDATE ipufood.order
            SET status = $2,
                delivered_at = CASE WHEN $3 THEN NOW() ELSE delivered_at END
            WHERE id = $1
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(id)
        .bind(status)
        .bind(status == OrderStatus::Delivered)
        .fetch_optional(self.pool)
        .await?;

        let row = row.ok_or(RepositoryError::NotFound)?;
        self.attach_items(vec![row])
            .await?
            .pop()
            .ok_or(RepositoryError::NotFound)
    }

    /// Load the items of `rows` in one query and assemble full orders,
    /// preserving the row order.
    async fn attach_items(&self, rows: Vec<OrderRow>) -> Result<Vec<Order>, RepositoryError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = rows.iter().map(|r| r.id.as_i32()).collect();
        let item_rows: Vec<OrderItemRow> = sqlx::query_as(
            r"
            SELECT id, order_id, product_id, product_name, category, quantity, price, total
            FROM ipufood.order_item
            WHERE order_id = ANY($1)
            ORDER BY id ASC
            ",
        )
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        let mut by_order: HashMap<OrderId, Vec<OrderItem>> = HashMap::new();
        for item_row in item_rows {
            let order_id = item_row.order_id;
            by_order
                .entry(order_id)
                .or_default()
                .push(OrderItem::try_from(item_row)?);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let items = by_order.remove(&row.id).unwrap_or_default();
                row.into_order(items)
            })
            .collect())
    }
}
