//! Validated account email.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Why a string is not an acceptable account email.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailError {
    #[error("enter an email address")]
    Empty,
    #[error("the email address is longer than {0} characters")]
    TooLong(usize),
    #[error("the email address cannot contain spaces")]
    Whitespace,
    /// No `@`, more than one `@`, or nothing on one side of it.
    #[error("not a valid email address ({0})")]
    Malformed(Shape),
}

/// Structural problem found in a malformed address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    NoAt,
    SeveralAts,
    NoLocalPart,
    NoDomain,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NoAt => "missing @",
            Self::SeveralAts => "more than one @",
            Self::NoLocalPart => "nothing before @",
            Self::NoDomain => "nothing after @",
        })
    }
}

/// An account email address, as typed at login or sent by the backend.
///
/// Input is trimmed; the result has exactly one `@` with text on both
/// sides, no whitespace, and at most [`Email::MAX_LENGTH`] bytes.
///
/// ```
/// use queledoy_core::Email;
///
/// let email = Email::parse(" ana@example.cl ").unwrap();
/// assert_eq!(email.local_part(), "ana");
/// assert!(Email::parse("ana@@example.cl").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// RFC 5321 path limit.
    pub const MAX_LENGTH: usize = 254;

    /// Validate an address.
    ///
    /// # Errors
    ///
    /// Returns an [`EmailError`] describing the first problem found.
    pub fn parse(input: &str) -> Result<Self, EmailError> {
        let address = input.trim();
        if address.is_empty() {
            return Err(EmailError::Empty);
        }
        if address.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong(Self::MAX_LENGTH));
        }
        if address.contains(char::is_whitespace) {
            return Err(EmailError::Whitespace);
        }

        let shape = match address.split_once('@') {
            None => Some(Shape::NoAt),
            Some((_, domain)) if domain.contains('@') => Some(Shape::SeveralAts),
            Some(("", _)) => Some(Shape::NoLocalPart),
            Some((_, "")) => Some(Shape::NoDomain),
            Some(_) => None,
        };

        match shape {
            Some(shape) => Err(EmailError::Malformed(shape)),
            None => Ok(Self(address.to_owned())),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Text before the `@`; used as a fallback display name.
    #[must_use]
    pub fn local_part(&self) -> &str {
        self.0.split_once('@').map_or("", |(local, _)| local)
    }

    #[must_use]
    pub fn domain(&self) -> &str {
        self.0.split_once('@').map_or("", |(_, domain)| domain)
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Email {
    type Error = EmailError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_common_addresses() {
        for ok in ["ana@example.cl", "ana.perez+listas@correo.example.com", "a@b"] {
            assert!(Email::parse(ok).is_ok(), "{ok}");
        }
    }

    #[test]
    fn test_trims_input() {
        assert_eq!(Email::parse("\tana@example.cl\n").unwrap().as_str(), "ana@example.cl");
    }

    #[test]
    fn test_rejections() {
        assert_eq!(Email::parse("  "), Err(EmailError::Empty));
        assert_eq!(Email::parse("ana perez@example.cl"), Err(EmailError::Whitespace));
        assert_eq!(
            Email::parse(&format!("{}@example.cl", "a".repeat(250))),
            Err(EmailError::TooLong(Email::MAX_LENGTH))
        );
        assert_eq!(Email::parse("ana"), Err(EmailError::Malformed(Shape::NoAt)));
        assert_eq!(
            Email::parse("ana@b@c"),
            Err(EmailError::Malformed(Shape::SeveralAts))
        );
        assert_eq!(
            Email::parse("@example.cl"),
            Err(EmailError::Malformed(Shape::NoLocalPart))
        );
        assert_eq!(Email::parse("ana@"), Err(EmailError::Malformed(Shape::NoDomain)));
    }

    #[test]
    fn test_error_message_names_the_problem() {
        let err = Email::parse("ana").unwrap_err();
        assert_eq!(err.to_string(), "not a valid email address (missing @)");
    }

    #[test]
    fn test_parts() {
        let email = Email::parse("ana@example.cl").unwrap();
        assert_eq!(email.local_part(), "ana");
        assert_eq!(email.domain(), "example.cl");
    }

    #[test]
    fn test_serde_validates() {
        let email: Email = serde_json::from_str("\"ana@example.cl\"").unwrap();
        assert_eq!(serde_json::to_string(&email).unwrap(), "\"ana@example.cl\"");
        assert!(serde_json::from_str::<Email>("\"nope\"").is_err());
    }
}
