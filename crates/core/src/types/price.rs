//! Type-safe price representation using decimal arithmetic.
//!
//! All amounts are in Brazilian reais (BRL). Prices are never negative;
//! totals are computed with [`Decimal`] so `0.1 + 0.2` stays exact.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price in BRL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Currency symbol used for display.
    pub const SYMBOL: &'static str = "R$";

    /// Create a new price, rejecting negative amounts.
    #[must_use]
    pub fn new(amount: Decimal) -> Option<Self> {
        (!amount.is_sign_negative() || amount.is_zero()).then_some(Self(amount))
    }

    /// Create a price from an amount in centavos.
    #[must_use]
    pub fn from_cents(cents: u32) -> Self {
        Self(Decimal::new(i64::from(cents), 2))
    }

    /// A zero price.
    #[must_use]
    pub const fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the price is strictly greater than zero.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Round to whole centavos.
    #[must_use]
    pub fn round(&self) -> Self {
        Self(self.0.round_dp(2))
    }

    /// Price of `quantity` units, or `None` on overflow.
    #[must_use]
    pub fn checked_mul_qty(&self, quantity: u32) -> Option<Self> {
        self.0.checked_mul(Decimal::from(quantity)).map(Self)
    }

    /// Divide evenly by `count`, returning zero when `count` is zero.
    #[must_use]
    pub fn average_over(&self, count: usize) -> Self {
        if count == 0 {
            return Self::zero();
        }
        let divisor = Decimal::from(u64::try_from(count).unwrap_or(u64::MAX));
        Self((self.0 / divisor).round_dp(2))
    }

    /// Format for display, e.g. `R$ 49,44`.
    #[must_use]
    pub fn display(&self) -> String {
        let formatted = format!("{:.2}", self.0.round_dp(2));
        format!("{} {}", Self::SYMBOL, formatted.replace('.', ","))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Self> for Price {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(amount))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_negative() {
        assert!(Price::new(Decimal::new(-1, 2)).is_none());
        assert!(Price::new(Decimal::ZERO).is_some());
        assert!(Price::new(Decimal::new(1500, 2)).is_some());
    }

    #[test]
    fn test_display_uses_comma() {
        assert_eq!(Price::from_cents(4944).display(), "R$ 49,44");
        assert_eq!(Price::from_cents(1500).display(), "R$ 15,00");
        assert_eq!(Price::zero().display(), "R$ 0,00");
    }

    #[test]
    fn test_mul_and_sum() {
        let burger = Price::from_cents(1500).checked_mul_qty(2).unwrap();
        let fries = Price::from_cents(1200).checked_mul_qty(1).unwrap();
        let total: Price = [burger, fries].into_iter().sum();
        assert_eq!(total, Price::from_cents(4200));
    }

    #[test]
    fn test_average_over() {
        let total = Price::from_cents(10000);
        assert_eq!(total.average_over(3), Price::new(Decimal::new(3333, 2)).unwrap());
        assert_eq!(total.average_over(0), Price::zero());
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&Price::from_cents(1250)).unwrap();
        assert_eq!(json, "\"12.50\"");
    }
}
