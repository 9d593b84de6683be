//! Reusable rule checks shared by value objects

use super::{ValidationError, ValidationErrors, Validated};

/// Reject missing input; nothing else is checked for an absent value
pub(crate) fn required(key: &'static str, input: Option<&str>) -> Validated<String> {
    input
        .map(str::to_string)
        .ok_or_else(|| ValidationError::Required { key }.into())
}

/// Length bounds, counted in characters. Both bounds are checked independently.
pub(crate) fn length(
    key: &'static str,
    value: &str,
    min: Option<usize>,
    max: usize,
) -> Vec<ValidationError> {
    let len = value.chars().count();
    let mut errors = Vec::new();

    if let Some(min) = min {
        if len < min {
            errors.push(ValidationError::TooShort {
                key,
                value: value.to_string(),
                min,
            });
        }
    }

    if len > max {
        errors.push(ValidationError::TooLong {
            key,
            value: value.to_string(),
            max,
        });
    }

    errors
}

/// Integer parse. Range checks depend on this, so callers return early on failure.
pub(crate) fn integer(key: &'static str, raw: &str) -> Validated<i64> {
    raw.trim().parse::<i64>().map_err(|_| {
        ValidationError::FailedConvertToInteger {
            key,
            value: raw.to_string(),
        }
        .into()
    })
}

/// Range bounds on an already-parsed integer
pub(crate) fn range(
    key: &'static str,
    value: i64,
    min: Option<i64>,
    max: Option<i64>,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Some(min) = min {
        if value < min {
            errors.push(ValidationError::RequireMinimumOrOver { key, value, min });
        }
    }

    if let Some(max) = max {
        if value > max {
            errors.push(ValidationError::RequireMaximumOrUnder { key, value, max });
        }
    }

    errors
}

/// Turn collected violations into a result
pub(crate) fn finish<T>(value: T, errors: Vec<ValidationError>) -> Validated<T> {
    match ValidationErrors::from_vec(errors) {
        Some(errors) => Err(errors),
        None => Ok(value),
    }
}
