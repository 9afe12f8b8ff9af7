//! Phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone cannot be empty")]
    Empty,
    /// The input matches neither accepted format.
    #[error("invalid phone - use 84981568463 or (11) 88888-8888")]
    InvalidFormat,
}

/// A Brazilian phone number.
///
/// Two spellings are accepted:
///
/// - 11 bare digits: `84981568463`
/// - area code in parentheses: `(11) 88888-8888` or `(11) 8888-8888`
///
/// The value is kept exactly as entered (after trimming).
///
/// ## Examples
///
/// ```
/// use ipufood_core::Phone;
///
/// assert!(Phone::parse("84981568463").is_ok());
/// assert!(Phone::parse("(11) 88888-8888").is_ok());
/// assert!(Phone::parse("(11) 8888-8888").is_ok());
///
/// assert!(Phone::parse("8498156846").is_err());   // 10 digits
/// assert!(Phone::parse("11 88888-8888").is_err()); // no parentheses
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Number of digits in the bare-digit format.
    pub const BARE_DIGITS: usize = 11;

    /// Parse a `Phone` from a string.
    ///
    /// # Errors
    ///
    /// Returns [`PhoneError::Empty`] for blank input and
    /// [`PhoneError::InvalidFormat`] when neither format matches.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PhoneError::Empty);
        }

        if is_bare_digits(s) || is_formatted(s) {
            Ok(Self(s.to_owned()))
        } else {
            Err(PhoneError::InvalidFormat)
        }
    }

    /// Returns the phone number as entered.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Phone` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Returns only the digits of the number.
    #[must_use]
    pub fn digits(&self) -> String {
        self.0.chars().filter(char::is_ascii_digit).collect()
    }
}

/// `^\d{11}$`
fn is_bare_digits(s: &str) -> bool {
    s.len() == Phone::BARE_DIGITS && s.bytes().all(|b| b.is_ascii_digit())
}

/// `^\(\d{2}\) \d{4,5}-\d{4}$`
fn is_formatted(s: &str) -> bool {
    let Some(rest) = s.strip_prefix('(') else {
        return false;
    };
    let Some((area, rest)) = rest.split_once(") ") else {
        return false;
    };
    let Some((prefix, line)) = rest.split_once('-') else {
        return false;
    };

    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());

    area.len() == 2
        && all_digits(area)
        && (4..=5).contains(&prefix.len())
        && all_digits(prefix)
        && line.len() == 4
        && all_digits(line)
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Phone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Phone {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Phone {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Phone {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_digits() {
        assert!(Phone::parse("84981568463").is_ok());
        assert_eq!(
            Phone::parse("8498156846"),
            Err(PhoneError::InvalidFormat)
        );
        assert_eq!(
            Phone::parse("849815684631"),
            Err(PhoneError::InvalidFormat)
        );
        assert_eq!(
            Phone::parse("8498156846a"),
            Err(PhoneError::InvalidFormat)
        );
    }

    #[test]
    fn test_parse_formatted() {
        assert!(Phone::parse("(11) 88888-8888").is_ok());
        assert!(Phone::parse("(11) 8888-8888").is_ok());
        assert!(Phone::parse("(11) 888-8888").is_err());
        assert!(Phone::parse("(111) 88888-8888").is_err());
        assert!(Phone::parse("(11)88888-8888").is_err());
        assert!(Phone::parse("(11) 88888-888").is_err());
        assert!(Phone::parse("(11) 88888 8888").is_err());
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Phone::parse("   "), Err(PhoneError::Empty));
    }

    #[test]
    fn test_keeps_input_and_extracts_digits() {
        let phone = Phone::parse(" (11) 99999-9999 ").unwrap();
        assert_eq!(phone.as_str(), "(11) 99999-9999");
        assert_eq!(phone.digits(), "11999999999");
    }
}
