//! Profile route handlers.

use axum::{Json, extract::State};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use ipufood_core::{Email, Phone};

use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::user::{User, UserUpdate};
use crate::routes::AppJson;
use crate::services::auth::refresh_current_user;
use crate::state::AppState;
use crate::validation::{ValidationError, Validator};

/// Profile edit form. Every field is required.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl ProfileInput {
    /// Validate the form.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` listing every invalid field.
    pub fn validate(&self) -> std::result::Result<UserUpdate, ValidationError> {
        let mut v = Validator::new();
        let name = v.required("name", &self.name, "Informe seu nome");
        let email = if self.email.trim().is_empty() {
            v.error("email", "Informe seu email");
            None
        } else {
            v.parse("email", Email::parse(&self.email), "Email inválido")
        };
        let address = v.required("address", &self.address, "Informe seu endereço");
        let phone = if self.phone.trim().is_empty() {
            v.error("phone", "Informe seu telefone");
            None
        } else {
            v.parse(
                "phone",
                Phone::parse(&self.phone),
                "Telefone inválido - Use (11) 88888-8888",
            )
        };
        v.finish()?;

        Ok(UserUpdate {
            name: Some(name),
            email,
            phone,
            address: Some(address),
        })
    }
}

/// Show the logged-in user's profile.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<User>> {
    UserRepository::new(state.pool())
        .get_by_id(user.id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))
}

/// Update the profile and refresh the session snapshot.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    AppJson(input): AppJson<ProfileInput>,
) -> Result<Json<User>> {
    let update = input.validate()?;
    let updated = UserRepository::new(state.pool())
        .update(user.id, &update)
        .await?;

    refresh_current_user(&session, state.pool()).await?;
    tracing::info!(user_id = %updated.id, "Profile updated");
    Ok(Json(updated))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn input() -> ProfileInput {
        ProfileInput {
            name: "Cliente Teste".into(),
            email: "cliente@ipufood.com".into(),
            phone: "(11) 88888-8888".into(),
            address: "Av. Central, 100".into(),
        }
    }

    #[test]
    fn test_valid_profile() {
        let update = input().validate().unwrap();
        assert_eq!(update.name.as_deref(), Some("Cliente Teste"));
        assert_eq!(update.phone.unwrap().as_str(), "(11) 88888-8888");
    }

    #[test]
    fn test_invalid_profile_fields() {
        let mut bad = input();
        bad.email = "cliente@ipufood".into();
        bad.phone = "11 88888-8888".into();
        let err = bad.validate().unwrap_err();
        let fields: Vec<_> = err.fields().iter().map(|f| f.field).collect();
        assert_eq!(fields, vec!["email", "phone"]);
    }
}
