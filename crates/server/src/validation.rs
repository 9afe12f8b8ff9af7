//! Declarative input validation.
//!
//! Request bodies are checked field by field before anything reaches the
//! repositories. Every failing field is reported at once so clients can show
//! all messages next to the form.

use serde::Serialize;
use thiserror::Error;

/// A single failing field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Input field name as sent by the client.
    pub field: &'static str,
    /// Human-readable reason (pt-BR, shown to the end user).
    pub message: String,
}

/// One or more fields failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid input: {}", summary(.0))]
pub struct ValidationError(pub Vec<FieldError>);

fn summary(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    /// Failing fields, in the order they were checked.
    #[must_use]
    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }
}

/// Collects field errors while a form is being checked.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error for `field`.
    pub fn error(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Record an error for `field` when `ok` is false.
    pub fn check(&mut self, ok: bool, field: &'static str, message: &str) {
        if !ok {
            self.error(field, message);
        }
    }

    /// Require a non-blank string. Returns the trimmed value.
    pub fn required(&mut self, field: &'static str, value: &str, message: &str) -> String {
        let trimmed = value.trim();
        self.check(!trimmed.is_empty(), field, message);
        trimmed.to_owned()
    }

    /// Run a parser, recording its error message on failure.
    pub fn parse<T, E: std::fmt::Display>(
        &mut self,
        field: &'static str,
        result: Result<T, E>,
        message: &str,
    ) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!(field, error = %e, "Field failed validation");
                self.error(field, message);
                None
            }
        }
    }

    /// Finish validation.
    ///
    /// # Errors
    ///
    /// Returns every recorded field error.
    pub fn finish(self) -> Result<(), ValidationError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError(self.errors))
        }
    }
}

/// Trim an optional string, mapping blank to `None`.
#[must_use]
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_all_errors() {
        let mut v = Validator::new();
        v.required("name", "  ", "Nome é obrigatório");
        v.check(false, "price", "Preço deve ser positivo");
        let err = v.finish().unwrap_err();
        assert_eq!(err.fields().len(), 2);
        assert_eq!(err.fields()[0].field, "name");
        assert!(err.to_string().contains("price: Preço deve ser positivo"));
    }

    #[test]
    fn test_required_trims() {
        let mut v = Validator::new();
        assert_eq!(v.required("name", "  Ana ", "x"), "Ana");
        assert!(v.finish().is_ok());
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  ".into())), None);
        assert_eq!(non_blank(Some(" Pizzas ".into())), Some("Pizzas".into()));
        assert_eq!(non_blank(None), None);
    }
}
