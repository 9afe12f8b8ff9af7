//! User role management commands.
//!
//! # Usage
//!
//! ```bash
//! ipufood user promote -e maria@example.com
//! ipufood user demote -e maria@example.com
//! ipufood user list
//! ipufood user list -r admin
//! ```
//!
//! A role change takes effect on the user's next request: the server refreshes
//! the session snapshot from the database.

use ipufood_core::{Email, UserRole};
use ipufood_server::db::UserRepository;

use super::{CliError, connect};

/// Set the role of the user with `email`.
pub async fn set_role(email: &str, role: UserRole) -> Result<(), CliError> {
    let email = Email::parse(email).map_err(|_| CliError::InvalidEmail(email.to_owned()))?;

    let pool = connect().await?;
    let users = UserRepository::new(&pool);

    let user = users
        .get_by_email(&email)
        .await?
        .ok_or_else(|| CliError::UserNotFound(email.to_string()))?;

    if user.role == role {
        tracing::info!("{} already has role {}", user.email, role);
        return Ok(());
    }

    let user = users.set_role(user.id, role).await?;
    tracing::info!(
        "Role updated! ID: {}, Email: {}, Role: {}",
        user.id,
        user.email,
        user.role
    );
    Ok(())
}

/// List users, optionally only those with `role`.
pub async fn list(role: Option<UserRole>) -> Result<(), CliError> {
    let pool = connect().await?;
    let users = UserRepository::new(&pool).list(role).await?;

    tracing::info!("{} user(s)", users.len());
    for user in users {
        tracing::info!(
            "  #{} {} <{}> [{}] {}",
            user.id,
            user.name,
            user.email,
            user.role,
            user.phone
        );
    }
    Ok(())
}
