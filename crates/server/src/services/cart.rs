//! Loading and saving the session cart.

use tower_sessions::Session;

use crate::models::cart::Cart;
use crate::models::session::keys;

/// Read the cart from the session; an absent cart is empty.
///
/// # Errors
///
/// Returns an error if the session store cannot be read.
pub async fn load_cart(session: &Session) -> Result<Cart, tower_sessions::session::Error> {
    Ok(session.get::<Cart>(keys::CART).await?.unwrap_or_default())
}

/// Write the cart back to the session. An empty cart removes the key.
///
/// # Errors
///
/// Returns an error if the session store cannot be written.
pub async fn save_cart(session: &Session, cart: &Cart) -> Result<(), tower_sessions::session::Error> {
    if cart.is_empty() {
        session.remove::<Cart>(keys::CART).await?;
        Ok(())
    } else {
        session.insert(keys::CART, cart).await
    }
}
