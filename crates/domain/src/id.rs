//! Typed identifier for todos.
//!
//! Identifiers are assigned by the store when a todo is first saved and are
//! never reassigned. They are always strictly positive.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Unique identifier for a [`Todo`](crate::todo::Todo).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct TodoId(i64);

impl TodoId {
    /// Wrap a store-assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidId`] when `value` is not positive.
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if value < 1 {
            return Err(ValidationError::InvalidId);
        }
        Ok(Self(value))
    }

    /// Access the inner integer.
    #[must_use]
    pub fn get(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for TodoId {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TodoId> for i64 {
    fn from(id: TodoId) -> Self {
        id.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TodoId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: i64 = s.parse().map_err(|_| ValidationError::InvalidId)?;
        Self::new(value)
    }
}
