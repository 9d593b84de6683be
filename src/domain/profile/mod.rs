//! Profile domain
//!
//! A profile is the public view of a user, relative to whoever is looking at it.

mod entity;
mod repository;

pub use entity::Profile;
pub use repository::ProfileRepository;

#[cfg(test)]
pub use repository::MockProfileRepository;
