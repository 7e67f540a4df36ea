//! HTTP error response mapping.

use std::error::Error as StdError;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use ergo_domain::error::ErgoError;
use ergo_domain::id::TodoId;

use crate::envelope::Envelope;

/// The API operation a failure belongs to; picks the generic 500 message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl Operation {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Get => "get",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    fn failure_message(self) -> &'static str {
        match self {
            Self::List => "an error occurred when fetching todo list",
            Self::Get => "an error occurred when fetching todo",
            Self::Create => "an error occurred when creating todo",
            Self::Update => "an error occurred when updating todo",
            Self::Delete => "an error occurred when deleting todo",
        }
    }
}

/// Maps [`ErgoError`] to an HTTP response with appropriate status code.
///
/// Storage failures are logged with their full source chain and answered with
/// a generic message; nothing from the underlying error reaches the client.
#[derive(Debug)]
pub struct ApiError {
    operation: Operation,
    todo_id: Option<TodoId>,
    error: ErgoError,
}

impl ApiError {
    pub fn new(operation: Operation, error: impl Into<ErgoError>) -> Self {
        Self {
            operation,
            todo_id: None,
            error: error.into(),
        }
    }

    /// Record which todo the failing request targeted.
    #[must_use]
    pub fn with_todo_id(mut self, id: TodoId) -> Self {
        self.todo_id = Some(id);
        self
    }

    /// HTTP status this error maps to.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self.error {
            ErgoError::Validation(_) => StatusCode::BAD_REQUEST,
            ErgoError::NotFound(_) => StatusCode::NOT_FOUND,
            ErgoError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let operation = self.operation.as_str();
        let todo_id = self.todo_id.map(TodoId::get);

        let message = match &self.error {
            ErgoError::Validation(err) => {
                tracing::debug!(
                    operation,
                    todo_id,
                    outcome = "rejected",
                    reason = %err,
                    "invalid request"
                );
                err.to_string()
            }
            ErgoError::NotFound(err) => {
                tracing::info!(
                    operation,
                    todo_id,
                    outcome = "not_found",
                    reason = %err,
                    "todo not found"
                );
                "todo not found".to_string()
            }
            ErgoError::Storage(err) => {
                tracing::error!(
                    operation,
                    todo_id,
                    outcome = "failed",
                    error = %error_chain(&**err),
                    "storage error"
                );
                self.operation.failure_message().to_string()
            }
        };

        (self.status(), Json(Envelope::failure(message))).into_response()
    }
}

/// Render `err` and all of its sources as `outer: inner: root`.
pub(crate) fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        out.push_str(": ");
        out.push_str(&inner.to_string());
        source = inner.source();
    }
    out
}
