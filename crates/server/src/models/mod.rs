//! Domain models.
//!
//! - `user` - Customers and administrators
//! - `product` - Menu catalog and its input forms
//! - `order` - Orders and their item snapshots
//! - `cart` - Session cart
//! - `session` - Identity snapshot kept in the session

pub mod cart;
pub mod order;
pub mod product;
pub mod session;
pub mod user;

pub use cart::{Cart, CartError, CartLine, CartView, MAX_LINE_QUANTITY};
pub use order::{NewOrder, NewOrderItem, Order, OrderItem};
pub use product::{NewProduct, Product, ProductFilter, ProductInput, ProductPatch, ProductUpdate};
pub use session::CurrentUser;
pub use user::{NewUser, User, UserUpdate};
