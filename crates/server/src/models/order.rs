//! Order types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ipufood_core::{OrderId, OrderItemId, OrderStatus, PaymentMethod, Price, ProductId, UserId};

/// An order placed at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    /// Customer name at the time of the order.
    pub user_name: String,
    pub items: Vec<OrderItem>,
    pub total: Price,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub created_at: DateTime<Utc>,
    /// Set when an admin confirms delivery.
    pub delivered_at: Option<DateTime<Utc>>,
}

/// A product snapshot inside an order.
///
/// Name, category and unit price are copied at checkout so later catalog
/// edits never change an existing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: OrderItemId,
    /// `None` once the product has been removed from the catalog.
    pub product_id: Option<ProductId>,
    pub product_name: String,
    pub category: Option<String>,
    pub quantity: u32,
    /// Unit price.
    pub price: Price,
    /// `price * quantity`.
    pub total: Price,
}

/// Line of an order that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub category: Option<String>,
    pub quantity: u32,
    pub price: Price,
    pub total: Price,
}

/// An order ready to be inserted.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: UserId,
    pub user_name: String,
    pub items: Vec<NewOrderItem>,
    pub total: Price,
    pub payment_method: PaymentMethod,
}

impl Order {
    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}
