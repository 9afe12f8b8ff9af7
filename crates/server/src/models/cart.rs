//! Shopping cart held in the client's session.
//!
//! The cart is never written to its own table: it is serialized into the
//! session under [`keys::CART`](super::session::keys::CART) and becomes an
//! order only at checkout.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use ipufood_core::{Price, ProductId};

use super::order::NewOrderItem;
use super::product::Product;

/// Highest quantity a single line can hold.
pub const MAX_LINE_QUANTITY: u32 = 99;

/// Cart operation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("quantity must be at least 1")]
    InvalidQuantity,
}

/// A product and how many units of it the customer wants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
}

impl CartLine {
    /// `price * quantity`.
    #[must_use]
    pub fn total(&self) -> Price {
        self.product
            .price
            .checked_mul_qty(self.quantity)
            .unwrap_or_default()
    }
}

/// Session cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Add `quantity` units of `product`.
    ///
    /// If the product is already in the cart the quantities are summed and
    /// the line takes the newer product snapshot.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` when `quantity` is zero.
    pub fn add(&mut self, product: Product, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }

        if let Some(line) = self.lines.iter_mut().find(|l| l.product.id == product.id) {
            line.quantity = line
                .quantity
                .saturating_add(quantity)
                .min(MAX_LINE_QUANTITY);
            line.product = product;
        } else {
            self.lines.push(CartLine {
                product,
                quantity: quantity.min(MAX_LINE_QUANTITY),
            });
        }
        Ok(())
    }

    /// Set the quantity of a line. Zero removes it.
    ///
    /// Returns `false` if the product is not in the cart.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove(product_id);
        }
        match self.lines.iter_mut().find(|l| l.product.id == product_id) {
            Some(line) => {
                line.quantity = quantity.min(MAX_LINE_QUANTITY);
                true
            }
            None => false,
        }
    }

    /// Remove a line. Returns `false` if the product is not in the cart.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.product.id != product_id);
        self.lines.len() != before
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of `price * quantity` over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(CartLine::total).sum()
    }

    /// Total number of units.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Snapshot the lines as order items.
    #[must_use]
    pub fn to_order_items(&self) -> Vec<NewOrderItem> {
        self.lines
            .iter()
            .map(|line| NewOrderItem {
                product_id: line.product.id,
                product_name: line.product.name.clone(),
                category: line.product.category.clone(),
                quantity: line.quantity,
                price: line.product.price,
                total: line.total(),
            })
            .collect()
    }
}

/// Cart as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub total: Price,
    pub item_count: u32,
}

impl From<Cart> for CartView {
    fn from(cart: Cart) -> Self {
        let total = cart.total();
        let item_count = cart.item_count();
        Self {
            lines: cart.lines,
            total,
            item_count,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
pub(crate) mod tests {
    use chrono::Utc;

    use super::*;

    pub(crate) fn product(id: i32, name: &str, cents: u32, category: Option<&str>) -> Product {
        let now = Utc::now();
        Product {
            id: ProductId::new(id),
            name: name.to_owned(),
            description: format!("{name} da casa"),
            price: Price::from_cents(cents),
            image_url: None,
            category: category.map(str::to_owned),
            available: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_add_merges_quantities() {
        let mut cart = Cart::new();
        cart.add(product(1, "X-Burger", 1500, Some("Lanches")), 1)
            .unwrap();
        cart.add(product(1, "X-Burger", 1500, Some("Lanches")), 2)
            .unwrap();
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_add_keeps_newest_snapshot() {
        let mut cart = Cart::new();
        cart.add(product(1, "X-Burger", 1500, None), 1).unwrap();
        cart.add(product(1, "X-Burger Duplo", 1800, None), 1).unwrap();
        assert_eq!(cart.lines()[0].product.name, "X-Burger Duplo");
        assert_eq!(cart.total(), Price::from_cents(3600));
    }

    #[test]
    fn test_add_rejects_zero() {
        let mut cart = Cart::new();
        assert_eq!(
            cart.add(product(1, "X-Burger", 1500, None), 0),
            Err(CartError::InvalidQuantity)
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn test_quantity_is_capped() {
        let mut cart = Cart::new();
        cart.add(product(1, "Refrigerante", 800, None), 98).unwrap();
        cart.add(product(1, "Refrigerante", 800, None), 5).unwrap();
        assert_eq!(cart.item_count(), MAX_LINE_QUANTITY);
        assert!(cart.set_quantity(ProductId::new(1), 500));
        assert_eq!(cart.item_count(), MAX_LINE_QUANTITY);
    }

    #[test]
    fn test_set_quantity_and_remove() {
        let mut cart = Cart::new();
        cart.add(product(1, "X-Burger", 1500, None), 1).unwrap();
        cart.add(product(2, "Batata Frita", 1200, None), 1).unwrap();

        assert!(cart.set_quantity(ProductId::new(2), 3));
        assert_eq!(cart.total(), Price::from_cents(1500 + 3600));

        assert!(cart.set_quantity(ProductId::new(1), 0));
        assert_eq!(cart.lines().len(), 1);

        assert!(!cart.set_quantity(ProductId::new(9), 1));
        assert!(!cart.remove(ProductId::new(9)));
        assert!(cart.remove(ProductId::new(2)));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_total_of_empty_cart_is_zero() {
        assert_eq!(Cart::new().total(), Price::zero());
    }

    #[test]
    fn test_to_order_items_snapshots_lines() {
        let mut cart = Cart::new();
        cart.add(product(3, "Pizza Margherita", 2500, Some("Pizzas")), 2)
            .unwrap();
        let items = cart.to_order_items();
        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.product_id, ProductId::new(3));
        assert_eq!(item.product_name, "Pizza Margherita");
        assert_eq!(item.category.as_deref(), Some("Pizzas"));
        assert_eq!(item.price, Price::from_cents(2500));
        assert_eq!(item.total, Price::from_cents(5000));
    }

    #[test]
    fn test_clear_and_view() {
        let mut cart = Cart::new();
        cart.add(product(1, "Sorvete", 800, None), 2).unwrap();
        let view = CartView::from(cart.clone());
        assert_eq!(view.item_count, 2);
        assert_eq!(view.total, Price::from_cents(1600));
        cart.clear();
        assert!(cart.is_empty());
    }
}
