//! Pagination value objects for list endpoints

use super::validation::{
    rules::{finish, integer, range},
    Validated,
};

/// Page size, 1..=100, defaults to 20
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit(u32);

impl Limit {
    pub const KEY: &'static str = "limit";
    pub const DEFAULT: u32 = 20;
    const MIN: i64 = 1;
    const MAX: i64 = 100;

    pub fn new(input: Option<&str>) -> Validated<Self> {
        let value = match input {
            Some(raw) => integer(Self::KEY, raw)?,
            None => i64::from(Self::DEFAULT),
        };

        let errors = range(Self::KEY, value, Some(Self::MIN), Some(Self::MAX));

        // in range, so the cast cannot truncate
        finish(Self(value as u32), errors)
    }

    #[allow(dead_code)]
    pub(crate) fn new_without_validation(value: u32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl Default for Limit {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

/// Number of items to skip, >= 0, defaults to 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Offset(u64);

impl Offset {
    pub const KEY: &'static str = "offset";

    pub fn new(input: Option<&str>) -> Validated<Self> {
        let value = match input {
            Some(raw) => integer(Self::KEY, raw)?,
            None => 0,
        };

        let errors = range(Self::KEY, value, Some(0), None);

        finish(Self(u64::try_from(value).unwrap_or_default()), errors)
    }

    #[allow(dead_code)]
    pub(crate) fn new_without_validation(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}
