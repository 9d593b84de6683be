//! User entity and related types

use serde::Serialize;

use super::values::{Bio, Email, Image, Password, Username};
use crate::domain::validation::{optional, zip, zip3, Validated};

/// Numeric user identifier assigned by storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user that exists in storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredUser {
    user_id: UserId,
    email: Email,
    username: Username,
    bio: Bio,
    image: Image,
}

impl RegisteredUser {
    pub fn new(user_id: UserId, email: Email, username: Username, bio: Bio, image: Image) -> Self {
        Self {
            user_id,
            email,
            username,
            bio,
            image,
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn bio(&self) -> &Bio {
        &self.bio
    }

    pub fn image(&self) -> &Image {
        &self.image
    }
}

/// Validated registration input
#[derive(Debug, Clone)]
pub struct UnregisteredUser {
    email: Email,
    username: Username,
    password: Password,
}

impl UnregisteredUser {
    /// Validate all three fields, reporting the errors of every field
    pub fn new(
        email: Option<&str>,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Validated<Self> {
        let (email, username, password) = zip3(
            Email::new(email),
            Username::new(username),
            Password::new(password),
        )?;

        Ok(Self {
            email,
            username,
            password,
        })
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn password(&self) -> &Password {
        &self.password
    }
}

/// Partial update of the current user; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub email: Option<Email>,
    pub username: Option<Username>,
    pub password: Option<Password>,
    pub bio: Option<Bio>,
    pub image: Option<Image>,
}

impl UserUpdate {
    pub fn new(
        email: Option<&str>,
        username: Option<&str>,
        password: Option<&str>,
        bio: Option<&str>,
        image: Option<&str>,
    ) -> Validated<Self> {
        let ((email, username, password), (bio, image)) = zip(
            zip3(
                optional(email, Email::new),
                optional(username, Username::new),
                optional(password, Password::new),
            ),
            zip(optional(bio, Bio::new), optional(image, Image::new)),
        )?;

        Ok(Self {
            email,
            username,
            password,
            bio,
            image,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.username.is_none()
            && self.password.is_none()
            && self.bio.is_none()
            && self.image.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validation::ValidationError;

    #[test]
    fn test_unregistered_user_valid() {
        let user =
            UnregisteredUser::new(Some("jake@jake.jake"), Some("jake"), Some("jakejake")).unwrap();

        assert_eq!(user.email().as_str(), "jake@jake.jake");
        assert_eq!(user.username().as_str(), "jake");
        assert_eq!(user.password().expose(), "jakejake");
    }

    #[test]
    fn test_unregistered_user_reports_every_field() {
        let errors = UnregisteredUser::new(None, Some("abc"), Some("short")).unwrap_err();
        let keys: Vec<_> = errors.iter().map(ValidationError::key).collect();

        assert_eq!(keys, vec!["email", "username", "password"]);
    }

    #[test]
    fn test_user_update_partial() {
        let update = UserUpdate::new(None, None, None, Some("I work at statefarm"), None).unwrap();

        assert!(update.email.is_none());
        assert_eq!(update.bio.unwrap().as_str(), "I work at statefarm");
    }

    #[test]
    fn test_user_update_empty() {
        assert!(UserUpdate::new(None, None, None, None, None)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_user_update_validates_present_fields() {
        let errors = UserUpdate::new(Some("bad"), None, Some("x"), None, None).unwrap_err();
        let keys: Vec<_> = errors.iter().map(ValidationError::key).collect();

        assert_eq!(keys, vec!["email", "password"]);
    }

    #[test]
    fn test_user_id_display() {
        assert_eq!(UserId::new(42).to_string(), "42");
        assert_eq!(UserId::new(42).value(), 42);
    }
}
