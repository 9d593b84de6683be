//! Comment domain

mod entity;
mod repository;
mod values;

pub use entity::Comment;
pub use repository::CommentRepository;
pub use values::{Body, CommentId};
