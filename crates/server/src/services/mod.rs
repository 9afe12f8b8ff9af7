//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Registration, login and session identity
//! - `cart` - Session cart persistence
//! - `checkout` - Cart to order conversion
//! - `reports` - Purchase and sales reports

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod reports;
