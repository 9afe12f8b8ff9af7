//! Menu catalog types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ipufood_core::{Price, ProductId};

use crate::validation::{ValidationError, Validator, non_blank};

/// A menu item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub image_url: Option<String>,
    pub category: Option<String>,
    /// Unavailable products stay listed but cannot be added to a cart.
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A validated product ready to be inserted.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub available: bool,
}

/// Partial update of a product. `None` leaves the column unchanged;
/// `Some(None)` clears a nullable column.
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Price>,
    pub image_url: Option<Option<String>>,
    pub category: Option<Option<String>>,
    pub available: Option<bool>,
}

/// Catalog listing filter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilter {
    /// Case-insensitive match against name or description.
    pub q: Option<String>,
    /// Exact category.
    pub category: Option<String>,
    /// Only available (or only unavailable) products.
    pub available: Option<bool>,
}

/// Product creation form.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductInput {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default = "default_available")]
    pub available: bool,
}

const fn default_available() -> bool {
    true
}

impl ProductInput {
    /// Validate the form.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` listing blank name/description and
    /// non-positive prices.
    pub fn validate(self) -> Result<NewProduct, ValidationError> {
        let mut v = Validator::new();
        let name = v.required("name", &self.name, "Nome é obrigatório");
        let description = v.required("description", &self.description, "Descrição é obrigatória");
        let price = validate_price(&mut v, self.price);
        v.finish()?;

        Ok(NewProduct {
            name,
            description,
            price: price.unwrap_or_default(),
            image_url: non_blank(self.image_url),
            category: non_blank(self.category),
            available: self.available,
        })
    }
}

/// Product edit form. Absent fields keep their current value.
///
/// For `image_url` and `category`, a blank string clears the value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub available: Option<bool>,
}

impl ProductPatch {
    /// Validate the fields that are present.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` when a present field would make the merged
    /// product invalid.
    pub fn validate(self) -> Result<ProductUpdate, ValidationError> {
        let mut v = Validator::new();
        let name = self
            .name
            .map(|n| v.required("name", &n, "Nome é obrigatório"));
        let description = self
            .description
            .map(|d| v.required("description", &d, "Descrição é obrigatória"));
        let price = self.price.and_then(|p| validate_price(&mut v, p));
        v.finish()?;

        Ok(ProductUpdate {
            name,
            description,
            price,
            image_url: self.image_url.map(|u| non_blank(Some(u))),
            category: self.category.map(|c| non_blank(Some(c))),
            available: self.available,
        })
    }
}

/// Highest accepted menu price (R$ 10.000,00), in centavos.
pub const MAX_PRICE_CENTS: u32 = 1_000_000;

/// Round to centavos, then require `0 < price <= MAX_PRICE_CENTS`.
fn validate_price(v: &mut Validator, amount: Decimal) -> Option<Price> {
    match Price::new(amount).map(|p| p.round()).filter(Price::is_positive) {
        Some(price) if price <= Price::from_cents(MAX_PRICE_CENTS) => Some(price),
        Some(_) => {
            v.error("price", "Preço máximo é R$ 10.000,00");
            None
        }
        None => {
            v.error("price", "Preço deve ser maior que zero");
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn input() -> ProductInput {
        ProductInput {
            name: " X-Burger ".into(),
            description: "Pão, carne e queijo".into(),
            price: Decimal::new(1500, 2),
            image_url: Some(String::new()),
            category: Some("Lanches".into()),
            available: true,
        }
    }

    #[test]
    fn test_input_validates_and_normalizes() {
        let product = input().validate().unwrap();
        assert_eq!(product.name, "X-Burger");
        assert_eq!(product.price, Price::from_cents(1500));
        assert_eq!(product.image_url, None);
        assert_eq!(product.category.as_deref(), Some("Lanches"));
    }

    #[test]
    fn test_input_rejects_blank_and_non_positive() {
        let mut bad = input();
        bad.name = "  ".into();
        bad.price = Decimal::ZERO;
        let err = bad.validate().unwrap_err();
        let fields: Vec<_> = err.fields().iter().map(|f| f.field).collect();
        assert_eq!(fields, vec!["name", "price"]);
    }

    #[test]
    fn test_input_rejects_negative_price() {
        let mut bad = input();
        bad.price = Decimal::new(-500, 2);
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_price_is_checked_after_rounding() {
        let mut tiny = input();
        tiny.price = Decimal::new(4, 3);
        let err = tiny.validate().unwrap_err();
        assert_eq!(err.fields()[0].field, "price");

        let mut rounded = input();
        rounded.price = Decimal::new(12_995, 3);
        assert_eq!(rounded.validate().unwrap().price, Price::from_cents(1300));
    }

    #[test]
    fn test_price_upper_bound() {
        let mut max = input();
        max.price = Decimal::new(i64::from(MAX_PRICE_CENTS), 2);
        assert!(max.validate().is_ok());

        let mut over = input();
        over.price = Decimal::new(100_000_001, 2);
        let err = over.validate().unwrap_err();
        assert_eq!(err.fields()[0].message, "Preço máximo é R$ 10.000,00");

        let patch = ProductPatch {
            price: Some(Decimal::new(1_000_000_000_000, 2)),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }

    #[test]
    fn test_patch_blank_clears_optional_fields() {
        let patch = ProductPatch {
            category: Some("   ".into()),
            available: Some(false),
            ..Default::default()
        };
        let update = patch.validate().unwrap();
        assert_eq!(update.category, Some(None));
        assert_eq!(update.image_url, None);
        assert_eq!(update.name, None);
        assert_eq!(update.available, Some(false));
    }

    #[test]
    fn test_patch_rejects_blank_name() {
        let patch = ProductPatch {
            name: Some(String::new()),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }
}
