//! Comment value objects

use serde::Serialize;

use crate::domain::validation::{
    rules::{finish, integer, length, range, required},
    string_value_object, Validated,
};

const BODY_MAX_LENGTH: usize = 1024;

/// Positive comment identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CommentId(i64);

impl CommentId {
    pub const KEY: &'static str = "commentId";

    pub fn new(input: Option<&str>) -> Validated<Self> {
        let raw = required(Self::KEY, input)?;
        let value = integer(Self::KEY, &raw)?;
        let errors = range(Self::KEY, value, Some(1), None);

        finish(Self(value), errors)
    }

    #[allow(dead_code)]
    pub(crate) fn new_without_validation(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for CommentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

string_value_object!(
    /// Text of a comment
    Body
);

impl Body {
    pub const KEY: &'static str = "body";

    pub fn new(input: Option<&str>) -> Validated<Self> {
        let value = required(Self::KEY, input)?;
        let errors = length(Self::KEY, &value, None, BODY_MAX_LENGTH);

        finish(Self(value), errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validation::ValidationError;

    #[test]
    fn test_comment_id_valid() {
        assert_eq!(CommentId::new(Some("42")).unwrap().value(), 42);
    }

    #[test]
    fn test_comment_id_required() {
        let errors = CommentId::new(None).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.first(), &ValidationError::Required { key: "commentId" });
    }

    #[test]
    fn test_comment_id_must_be_positive() {
        for raw in ["0", "-3"] {
            assert!(matches!(
                CommentId::new(Some(raw)).unwrap_err().first(),
                ValidationError::RequireMinimumOrOver { min: 1, .. }
            ));
        }
    }

    #[test]
    fn test_comment_id_not_a_number() {
        assert!(matches!(
            CommentId::new(Some("one")).unwrap_err().first(),
            ValidationError::FailedConvertToInteger { .. }
        ));
    }

    #[test]
    fn test_body_bounds() {
        assert!(Body::new(Some("")).is_ok());
        assert!(Body::new(Some(&"b".repeat(1024))).is_ok());

        let errors = Body::new(Some(&"b".repeat(1025))).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors.first(),
            ValidationError::TooLong { max: 1024, .. }
        ));
    }
}
