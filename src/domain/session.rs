//! Authenticated session payload

use super::user::{Email, UserId};

/// Identity carried inside a signed token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    user_id: UserId,
    email: Email,
}

impl Session {
    pub fn new(user_id: UserId, email: Email) -> Self {
        Self { user_id, email }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn email(&self) -> &Email {
        &self.email
    }
}
