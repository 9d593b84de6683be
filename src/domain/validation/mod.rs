//! Accumulating validation
//!
//! Value objects return every violated rule at once instead of stopping at the
//! first one. Results of independent fields are merged with [`zip`] / [`zip3`].

mod error;
pub(crate) mod rules;

pub use error::{ValidationError, ValidationErrors};

/// Either a validated value or a non-empty list of violations
pub type Validated<T> = Result<T, ValidationErrors>;

/// Combine two independent results, keeping the errors of both sides
pub fn zip<A, B>(a: Validated<A>, b: Validated<B>) -> Validated<(A, B)> {
    match (a, b) {
        (Ok(a), Ok(b)) => Ok((a, b)),
        (Err(errors), Ok(_)) | (Ok(_), Err(errors)) => Err(errors),
        (Err(mut left), Err(right)) => {
            left.append(right);
            Err(left)
        }
    }
}

pub fn zip3<A, B, C>(a: Validated<A>, b: Validated<B>, c: Validated<C>) -> Validated<(A, B, C)> {
    zip(zip(a, b), c).map(|((a, b), c)| (a, b, c))
}

/// Validate an optional field: `None` stays `None`, `Some` must pass `validate`
pub fn optional<T>(
    input: Option<&str>,
    validate: impl FnOnce(Option<&str>) -> Validated<T>,
) -> Validated<Option<T>> {
    match input {
        Some(value) => validate(Some(value)).map(Some),
        None => Ok(None),
    }
}

/// Declares a string-backed value object with the shared accessors.
/// The validated constructor is written by hand next to each declaration.
macro_rules! string_value_object {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a value that is already known to be valid (read back from storage)
            #[allow(dead_code)]
            pub(crate) fn new_without_validation(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

pub(crate) use string_value_object;

#[cfg(test)]
mod tests {
    use super::*;

    fn fail(key: &'static str) -> Validated<i32> {
        Err(ValidationError::Required { key }.into())
    }

    #[test]
    fn test_zip_ok() {
        assert_eq!(zip(Ok(1), Ok("a")).unwrap(), (1, "a"));
    }

    #[test]
    fn test_zip_accumulates_both_sides() {
        let errors = zip(fail("email"), fail("password")).unwrap_err();
        let keys: Vec<_> = errors.iter().map(ValidationError::key).collect();
        assert_eq!(keys, vec!["email", "password"]);
    }

    #[test]
    fn test_zip3_keeps_order() {
        let errors = zip3(fail("email"), Ok(2), fail("username")).unwrap_err();
        let keys: Vec<_> = errors.iter().map(ValidationError::key).collect();
        assert_eq!(keys, vec!["email", "username"]);
    }

    #[test]
    fn test_optional_skips_absent() {
        let result = optional(None, |_| fail("bio"));
        assert_eq!(result.unwrap(), None);

        let result = optional(Some("x"), |_| fail("bio"));
        assert!(result.is_err());
    }
}
