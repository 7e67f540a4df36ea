//! Server-side rendered HTML page driven by htmx form posts.

#[allow(clippy::missing_errors_doc)]
pub mod todos;

use askama::Template;
use axum::Router;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, patch, post};

use ergo_app::ports::TodoRepository;
use ergo_domain::error::ErgoError;

use crate::error::error_chain;
use crate::state::AppState;

/// Build the dashboard sub-router.
pub fn routes<R>() -> Router<AppState<R>>
where
    R: TodoRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(todos::home::<R>))
        .route("/ui/todo", post(todos::create::<R>))
        .route(
            "/ui/todo/{id}",
            patch(todos::update::<R>).delete(todos::delete::<R>),
        )
}

/// Plain-text error answered to htmx requests.
#[derive(Debug, PartialEq, Eq)]
pub enum UiError {
    BadRequest(&'static str),
    NotFound,
    Internal,
}

impl UiError {
    /// Translate a service failure, logging it the way the JSON API does.
    pub(crate) fn from_service(operation: &'static str, err: &ErgoError) -> Self {
        match err {
            ErgoError::Validation(_) => {
                tracing::debug!(operation, outcome = "rejected", reason = %err, "invalid form");
                Self::BadRequest("invalid request")
            }
            ErgoError::NotFound(_) => {
                tracing::info!(operation, outcome = "not_found", reason = %err, "todo not found");
                Self::NotFound
            }
            ErgoError::Storage(source) => {
                tracing::error!(
                    operation,
                    outcome = "failed",
                    error = %error_chain(&**source),
                    "storage error"
                );
                Self::Internal
            }
        }
    }
}

impl IntoResponse for UiError {
    fn into_response(self) -> Response {
        match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message).into_response(),
            Self::NotFound => (StatusCode::NOT_FOUND, "todo not found").into_response(),
            Self::Internal => {
                (StatusCode::INTERNAL_SERVER_ERROR, "an error occurred").into_response()
            }
        }
    }
}

pub(crate) fn render<T: Template>(template: &T) -> Result<Html<String>, UiError> {
    template.render().map(Html).map_err(|err| {
        tracing::error!(error = %err, "template rendering failed");
        UiError::Internal
    })
}
