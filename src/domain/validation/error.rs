//! Validation error types

use std::fmt;

use thiserror::Error;

/// A single rule violation produced while constructing a value object
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{key} is required")]
    Required { key: &'static str },

    #[error("{key} must be at least {min} characters")]
    TooShort {
        key: &'static str,
        value: String,
        min: usize,
    },

    #[error("{key} must be at most {max} characters")]
    TooLong {
        key: &'static str,
        value: String,
        max: usize,
    },

    #[error("{key} has an invalid format")]
    InvalidFormat { key: &'static str, value: String },

    #[error("{key} must be an integer")]
    FailedConvertToInteger { key: &'static str, value: String },

    #[error("{key} must be {min} or more")]
    RequireMinimumOrOver {
        key: &'static str,
        value: i64,
        min: i64,
    },

    #[error("{key} must be {max} or less")]
    RequireMaximumOrUnder {
        key: &'static str,
        value: i64,
        max: i64,
    },
}

impl ValidationError {
    /// Name of the value object this violation belongs to
    pub fn key(&self) -> &'static str {
        match self {
            Self::Required { key }
            | Self::TooShort { key, .. }
            | Self::TooLong { key, .. }
            | Self::InvalidFormat { key, .. }
            | Self::FailedConvertToInteger { key, .. }
            | Self::RequireMinimumOrOver { key, .. }
            | Self::RequireMaximumOrUnder { key, .. } => key,
        }
    }

    /// Human-readable message
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// Non-empty, ordered list of validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    head: ValidationError,
    tail: Vec<ValidationError>,
}

impl ValidationErrors {
    /// Create a list holding a single error
    pub fn one(error: ValidationError) -> Self {
        Self {
            head: error,
            tail: Vec::new(),
        }
    }

    /// Build a list from a vector, `None` when the vector is empty
    pub fn from_vec(errors: Vec<ValidationError>) -> Option<Self> {
        let mut iter = errors.into_iter();
        let head = iter.next()?;

        Some(Self {
            head,
            tail: iter.collect(),
        })
    }

    /// Append all errors of `other`, keeping order
    pub fn append(&mut self, other: ValidationErrors) {
        self.tail.push(other.head);
        self.tail.extend(other.tail);
    }

    pub fn first(&self) -> &ValidationError {
        &self.head
    }

    pub fn len(&self) -> usize {
        1 + self.tail.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        std::iter::once(&self.head).chain(self.tail.iter())
    }

    /// Messages of every error, in order
    pub fn messages(&self) -> Vec<String> {
        self.iter().map(ValidationError::message).collect()
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::iter::Chain<std::iter::Once<ValidationError>, std::vec::IntoIter<ValidationError>>;

    fn into_iter(self) -> Self::IntoIter {
        std::iter::once(self.head).chain(self.tail)
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self::one(error)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.messages().join("; "))
    }
}

impl std::error::Error for ValidationErrors {}
