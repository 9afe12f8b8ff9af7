//! Authentication service.
//!
//! Provides password registration and login, plus the helpers that keep the
//! session's identity snapshot in sync with the user record.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use serde::Deserialize;
use sqlx::PgPool;
use tower_sessions::Session;
use tracing::instrument;

use ipufood_core::{Email, Phone, UserRole};

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::middleware::auth::{clear_current_user, set_current_user};
use crate::models::session::{CurrentUser, keys};
use crate::models::user::{NewUser, User};
use crate::validation::Validator;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Registration form.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub password: String,
    pub confirm_password: String,
}

/// Login form.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Authentication service.
///
/// Handles user registration and password login.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new customer.
    ///
    /// Every field is validated before anything is written. The role is
    /// always `user`; admins are promoted from the CLI.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` listing every invalid field.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    #[instrument(skip_all)]
    pub async fn register(&self, input: &RegisterInput) -> Result<User, AuthError> {
        let new_user = validate_registration(input)?;
        let password_hash = hash_password(&input.password)?;

        let user = self
            .users
            .create_with_password(&new_user, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` for malformed input.
    /// Returns `AuthError::InvalidCredentials` if the email is unknown or the
    /// password is wrong; the two cases are indistinguishable.
    #[instrument(skip_all)]
    pub async fn login(&self, input: &LoginInput) -> Result<User, AuthError> {
        let mut v = Validator::new();
        let email = v.parse("email", Email::parse(&input.email), "Email inválido");
        check_password_length(&mut v, &input.password);
        v.finish()?;
        let Some(email) = email else {
            return Err(AuthError::InvalidCredentials);
        };

        let (user, password_hash) = self
            .users
            .get_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(&input.password, &password_hash)?;

        Ok(user)
    }
}

/// Reload the session user from the database and rewrite the snapshot.
///
/// Returns `None` (and clears the identity) when the session is anonymous or
/// the user no longer exists.
///
/// # Errors
///
/// Returns `AuthError::Session` or `AuthError::Repository` on storage failures.
pub async fn refresh_current_user(
    session: &Session,
    pool: &PgPool,
) -> Result<Option<CurrentUser>, AuthError> {
    let Some(current) = session.get::<CurrentUser>(keys::CURRENT_USER).await? else {
        return Ok(None);
    };

    match UserRepository::new(pool).get_by_id(current.id).await? {
        Some(user) => {
            let refreshed = CurrentUser::from(&user);
            if refreshed != current {
                set_current_user(session, &refreshed).await?;
            }
            Ok(Some(refreshed))
        }
        None => {
            tracing::warn!(user_id = %current.id, "Session user no longer exists");
            clear_current_user(session).await?;
            Ok(None)
        }
    }
}

/// Start an authenticated session for `user`.
///
/// The session ID is cycled to prevent fixation.
///
/// # Errors
///
/// Returns `AuthError::Session` if the session cannot be written.
pub async fn login_session(session: &Session, user: &User) -> Result<CurrentUser, AuthError> {
    session.cycle_id().await?;
    let current = CurrentUser::from(user);
    set_current_user(session, &current).await?;
    Ok(current)
}

/// End the session: drop the identity and the cart.
///
/// # Errors
///
/// Returns `AuthError::Session` if the session cannot be modified.
pub async fn logout_session(session: &Session) -> Result<(), AuthError> {
    session.flush().await?;
    Ok(())
}

/// Validate the registration form.
fn validate_registration(input: &RegisterInput) -> Result<NewUser, AuthError> {
    let mut v = Validator::new();
    let name = v.required("name", &input.name, "Informe seu nome");
    let email = if input.email.trim().is_empty() {
        v.error("email", "Informe seu email");
        None
    } else {
        v.parse("email", Email::parse(&input.email), "Email inválido")
    };
    let phone = if input.phone.trim().is_empty() {
        v.error("phone", "Informe seu telefone");
        None
    } else {
        v.parse(
            "phone",
            Phone::parse(&input.phone),
            "Telefone inválido - Exemplo: 84981568463",
        )
    };
    let address = v.required("address", &input.address, "Informe seu endereço");
    check_password_length(&mut v, &input.password);
    v.check(
        input.confirm_password == input.password,
        "confirm_password",
        "As senhas não coincidem",
    );
    v.finish()?;

    match (email, phone) {
        (Some(email), Some(phone)) => Ok(NewUser {
            name,
            email,
            phone,
            address,
            role: UserRole::User,
        }),
        _ => Err(AuthError::InvalidCredentials),
    }
}

fn check_password_length(v: &mut Validator, password: &str) {
    if password.is_empty() {
        v.error("password", "Informe sua senha");
    } else {
        v.check(
            password.chars().count() >= MIN_PASSWORD_LENGTH,
            "password",
            "A senha deve ter pelo menos 6 caracteres",
        );
    }
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn register_input() -> RegisterInput {
        RegisterInput {
            name: "Maria".into(),
            email: "Maria@Example.com".into(),
            phone: "84981568463".into(),
            address: "Rua das Flores, 10".into(),
            password: "segredo1".into(),
            confirm_password: "segredo1".into(),
        }
    }

    fn failing_fields(err: AuthError) -> Vec<&'static str> {
        match err {
            AuthError::Validation(v) => v.fields().iter().map(|f| f.field).collect(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_registration_valid() {
        let user = validate_registration(&register_input()).unwrap();
        assert_eq!(user.email.as_str(), "maria@example.com");
        assert_eq!(user.role, UserRole::User);
    }

    #[test]
    fn test_registration_accepts_formatted_phone() {
        let mut input = register_input();
        input.phone = "(11) 88888-8888".into();
        assert!(validate_registration(&input).is_ok());
    }

    #[test]
    fn test_registration_reports_every_field() {
        let input = RegisterInput {
            name: " ".into(),
            email: "not-an-email".into(),
            phone: "123".into(),
            address: String::new(),
            password: "12345".into(),
            confirm_password: "54321".into(),
        };
        let fields = failing_fields(validate_registration(&input).unwrap_err());
        assert_eq!(
            fields,
            vec!["name", "email", "phone", "address", "password", "confirm_password"]
        );
    }

    #[test]
    fn test_registration_password_mismatch() {
        let mut input = register_input();
        input.confirm_password = "outra-senha".into();
        let fields = failing_fields(validate_registration(&input).unwrap_err());
        assert_eq!(fields, vec!["confirm_password"]);
    }

    #[test]
    fn test_password_length_counts_chars() {
        let mut v = Validator::new();
        check_password_length(&mut v, "çãõéíú");
        assert!(v.finish().is_ok());

        let mut v = Validator::new();
        check_password_length(&mut v, "abc");
        assert!(v.finish().is_err());
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("cliente123").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("cliente123", &hash).is_ok());
        assert!(matches!(
            verify_password("errada", &hash),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            verify_password("cliente123", "not-a-hash"),
            Err(AuthError::InvalidCredentials)
        ));
    }
}
