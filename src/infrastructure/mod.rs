//! Infrastructure layer - repositories, services, tokens and logging

pub mod article;
pub mod auth;
pub mod comment;
pub mod logging;
pub mod profile;
pub mod storage;
pub mod user;
