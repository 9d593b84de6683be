//! User domain
//!
//! This module provides domain types and traits for user accounts,
//! including the validated value objects, entities and repository trait.

mod entity;
mod repository;
mod values;

pub use entity::{RegisteredUser, UnregisteredUser, UserId, UserUpdate};
pub use repository::UserRepository;
pub use values::{Bio, Email, Image, Password, Username};

#[cfg(test)]
pub use repository::MockUserRepository;
