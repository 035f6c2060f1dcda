//! Email address type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`Email`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum EmailError {
    /// The input string is empty.
    #[error("email cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("email must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input does not contain an @ symbol.
    #[error("email must contain an @ symbol")]
    MissingAtSymbol,
    /// The local part (before @) is empty.
    #[error("email local part cannot be empty")]
    EmptyLocalPart,
    /// The domain part (after @) is empty.
    #[error("email domain cannot be empty")]
    EmptyDomain,
}

/// An email address.
///
/// Registration and login forms validate the email shape before anything is
/// dispatched to the upstream API; the server remains the authority on
/// whether the address is actually deliverable.
///
/// ## Constraints
///
/// - Length: 1-254 characters (RFC 5321 limit)
/// - Must contain an @ symbol with non-empty text on both sides
///
/// ## Examples
///
/// ```
/// use tutorhub_core::Email;
///
/// assert!(Email::parse("student@example.com").is_ok());
/// assert!(Email::parse("no-at-symbol").is_err());
/// assert!(Email::parse("@example.com").is_err());
/// assert!(Email::parse("student@").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Maximum length of an email address (RFC 5321).
    pub const MAX_LENGTH: usize = 254;

    /// Parse an `Email` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, longer than 254 characters,
    /// missing an @ symbol, or has an empty local part or domain.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        if s.is_empty() {
            return Err(EmailError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        let at_pos = s.find('@').ok_or(EmailError::MissingAtSymbol)?;

        if at_pos == 0 {
            return Err(EmailError::EmptyLocalPart);
        }

        if at_pos == s.len() - 1 {
            return Err(EmailError::EmptyDomain);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the email address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Email` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(Email::parse("student@example.com").is_ok());
        assert!(Email::parse("tutor.name+math@school.co.uk").is_ok());
        assert!(Email::parse("a@b").is_ok());
    }

    #[test]
    fn test_invalid_emails() {
        assert!(matches!(Email::parse(""), Err(EmailError::Empty)));
        assert!(matches!(
            Email::parse("missing-at"),
            Err(EmailError::MissingAtSymbol)
        ));
        assert!(matches!(
            Email::parse("@example.com"),
            Err(EmailError::EmptyLocalPart)
        ));
        assert!(matches!(Email::parse("user@"), Err(EmailError::EmptyDomain)));
    }

    #[test]
    fn test_too_long() {
        let long = format!("{}@example.com", "a".repeat(250));
        assert!(matches!(
            Email::parse(&long),
            Err(EmailError::TooLong { max: 254 })
        ));
    }

    #[test]
    fn test_display_roundtrip() {
        let email = Email::parse("admin@tutorhub.test").expect("valid");
        assert_eq!(email.to_string(), "admin@tutorhub.test");
        assert_eq!(email.as_str(), "admin@tutorhub.test");
    }
}
