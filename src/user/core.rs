//! The user model and validation of user-provided profile fields.

use std::fmt::Display;

use email_address::EmailAddress;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, PasswordHash};

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors, and more flexible generics that can have distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A registered user of the application.
///
/// The password hash is never serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The user's display name.
    pub name: String,
    /// The user's email address, used to log in.
    pub email: String,
    /// The user's password hash.
    #[serde(skip)]
    pub password_hash: PasswordHash,
    /// When the user registered.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the user's profile was last changed.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

const MIN_NAME_LENGTH: usize = 2;
const MAX_NAME_LENGTH: usize = 100;

/// Trim `raw_name` and check that it is between 2 and 100 characters long.
///
/// Used for user, category and savings goal names.
///
/// # Errors
/// Returns [Error::Validation] if the name is too short or too long.
pub fn validate_name(raw_name: &str) -> Result<String, Error> {
    let name = raw_name.trim();
    let length = name.chars().count();

    if !(MIN_NAME_LENGTH..=MAX_NAME_LENGTH).contains(&length) {
        return Err(Error::Validation(format!(
            "name must be between {MIN_NAME_LENGTH} and {MAX_NAME_LENGTH} characters"
        )));
    }

    Ok(name.to_owned())
}

/// Check that `raw_email` is a valid email address and normalize it to lowercase.
///
/// # Errors
/// Returns [Error::Validation] if the email address is not valid.
pub fn validate_email(raw_email: &str) -> Result<String, Error> {
    let email = raw_email.trim().to_lowercase();

    if !EmailAddress::is_valid(&email) {
        return Err(Error::Validation("email must be a valid email".to_owned()));
    }

    Ok(email)
}

#[cfg(test)]
mod validation_tests {
    use crate::{
        Error,
        user::core::{validate_email, validate_name},
    };

    #[test]
    fn name_is_trimmed() {
        assert_eq!(validate_name("  Ana  "), Ok("Ana".to_owned()));
    }

    #[test]
    fn name_with_one_character_is_rejected() {
        assert!(matches!(validate_name("A"), Err(Error::Validation(_))));
    }

    #[test]
    fn name_length_counts_characters_not_bytes() {
        assert!(validate_name("Ñu").is_ok());
        assert!(validate_name(&"é".repeat(100)).is_ok());
        assert!(validate_name(&"é".repeat(101)).is_err());
    }

    #[test]
    fn email_is_lowercased() {
        assert_eq!(
            validate_email("Ana@Example.COM"),
            Ok("ana@example.com".to_owned())
        );
    }

    #[test]
    fn invalid_email_is_rejected() {
        assert_eq!(
            validate_email("not-an-email"),
            Err(Error::Validation("email must be a valid email".to_owned()))
        );
    }

    #[test]
    fn user_serialization_omits_password_hash() {
        let user = crate::user::User {
            id: crate::user::UserID::new(1),
            name: "Ana".to_owned(),
            email: "ana@example.com".to_owned(),
            password_hash: crate::PasswordHash::new_unchecked("hunter2"),
            created_at: time::OffsetDateTime::UNIX_EPOCH,
            updated_at: time::OffsetDateTime::UNIX_EPOCH,
        };

        let json = serde_json::to_value(&user).unwrap();

        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["createdAt"], "1970-01-01T00:00:00Z");
    }
}
