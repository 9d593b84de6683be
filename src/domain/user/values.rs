//! User value objects

use std::fmt;

use validator::ValidateEmail;

use crate::domain::validation::{
    rules::{finish, length, required},
    string_value_object, ValidationError, Validated,
};

const USERNAME_MIN_LENGTH: usize = 4;
const USERNAME_MAX_LENGTH: usize = 32;
const PASSWORD_MIN_LENGTH: usize = 8;
const PASSWORD_MAX_LENGTH: usize = 32;
const PROFILE_TEXT_MAX_LENGTH: usize = 512;

string_value_object!(
    /// Email address, unique per user
    Email
);

impl Email {
    pub const KEY: &'static str = "email";

    pub fn new(input: Option<&str>) -> Validated<Self> {
        let value = required(Self::KEY, input)?;

        let mut errors = Vec::new();
        if !value.validate_email() {
            errors.push(ValidationError::InvalidFormat {
                key: Self::KEY,
                value: value.clone(),
            });
        }

        finish(Self(value), errors)
    }
}

string_value_object!(
    /// Public handle, unique per user
    Username
);

impl Username {
    pub const KEY: &'static str = "username";

    pub fn new(input: Option<&str>) -> Validated<Self> {
        let value = required(Self::KEY, input)?;
        let errors = length(
            Self::KEY,
            &value,
            Some(USERNAME_MIN_LENGTH),
            USERNAME_MAX_LENGTH,
        );

        finish(Self(value), errors)
    }
}

/// Plain-text password as submitted by the user. Never logged or serialized.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub const KEY: &'static str = "password";

    pub fn new(input: Option<&str>) -> Validated<Self> {
        let value = required(Self::KEY, input)?;
        let errors = length(
            Self::KEY,
            &value,
            Some(PASSWORD_MIN_LENGTH),
            PASSWORD_MAX_LENGTH,
        )
        .into_iter()
        .map(redact)
        .collect();

        finish(Self(value), errors)
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password([hidden])")
    }
}

fn redact(error: ValidationError) -> ValidationError {
    match error {
        ValidationError::TooShort { key, min, .. } => ValidationError::TooShort {
            key,
            value: String::new(),
            min,
        },
        ValidationError::TooLong { key, max, .. } => ValidationError::TooLong {
            key,
            value: String::new(),
            max,
        },
        other => other,
    }
}

string_value_object!(
    /// Free-form profile text; empty is allowed
    Bio
);

impl Bio {
    pub const KEY: &'static str = "bio";

    pub fn new(input: Option<&str>) -> Validated<Self> {
        let value = required(Self::KEY, input)?;
        let errors = length(Self::KEY, &value, None, PROFILE_TEXT_MAX_LENGTH);

        finish(Self(value), errors)
    }
}

string_value_object!(
    /// Profile image URL; empty is allowed
    Image
);

impl Image {
    pub const KEY: &'static str = "image";

    pub fn new(input: Option<&str>) -> Validated<Self> {
        let value = required(Self::KEY, input)?;
        let errors = length(Self::KEY, &value, None, PROFILE_TEXT_MAX_LENGTH);

        finish(Self(value), errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_valid() {
        let email = Email::new(Some("jake@jake.jake")).unwrap();
        assert_eq!(email.as_str(), "jake@jake.jake");
    }

    #[test]
    fn test_email_required() {
        let errors = Email::new(None).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.first(), &ValidationError::Required { key: "email" });
    }

    #[test]
    fn test_email_invalid_format() {
        let errors = Email::new(Some("not-an-email")).unwrap_err();
        assert_eq!(
            errors.first(),
            &ValidationError::InvalidFormat {
                key: "email",
                value: "not-an-email".to_string()
            }
        );
    }

    #[test]
    fn test_username_bounds() {
        assert!(Username::new(Some("jake")).is_ok());
        assert!(Username::new(Some(&"a".repeat(32))).is_ok());

        let errors = Username::new(Some("abc")).unwrap_err();
        assert!(matches!(
            errors.first(),
            ValidationError::TooShort { min: 4, .. }
        ));

        let errors = Username::new(Some(&"a".repeat(33))).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors.first(),
            ValidationError::TooLong { max: 32, .. }
        ));
    }

    #[test]
    fn test_username_required_runs_no_other_check() {
        let errors = Username::new(None).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.first().key(), "username");
    }

    #[test]
    fn test_password_bounds() {
        assert!(Password::new(Some("password")).is_ok());

        let errors = Password::new(Some("short")).unwrap_err();
        assert!(matches!(
            errors.first(),
            ValidationError::TooShort { min: 8, .. }
        ));

        let errors = Password::new(Some(&"p".repeat(33))).unwrap_err();
        assert!(matches!(
            errors.first(),
            ValidationError::TooLong { max: 32, .. }
        ));
    }

    #[test]
    fn test_password_is_not_leaked() {
        let password = Password::new(Some("hunter2hunter2")).unwrap();
        assert_eq!(format!("{:?}", password), "Password([hidden])");

        let errors = Password::new(Some("hunter2")).unwrap_err();
        assert!(!format!("{:?}", errors).contains("hunter2"));
    }

    #[test]
    fn test_bio_allows_empty_but_not_missing() {
        assert_eq!(Bio::new(Some("")).unwrap().as_str(), "");
        assert!(Bio::new(None).is_err());
    }

    #[test]
    fn test_image_too_long() {
        let errors = Image::new(Some(&"i".repeat(513))).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.first().key(), "image");
        assert!(Image::new(Some(&"i".repeat(512))).is_ok());
    }
}
