//! Todo: the single persisted entity of the service.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::TodoId;

/// A persisted todo item.
///
/// `id` and `title` never change after creation; only `completed` is mutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub completed: bool,
}

/// Validated input for creating a [`Todo`].
///
/// Repositories accept only this type, so a blank title can never reach the
/// store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    title: String,
}

impl NewTodo {
    /// Trim `title` and check it is not empty.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyTitle`] when nothing but whitespace
    /// was supplied.
    pub fn new(title: impl AsRef<str>) -> Result<Self, ValidationError> {
        let title = title.as_ref().trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        Ok(Self {
            title: title.to_string(),
        })
    }

    /// The trimmed title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }
}
