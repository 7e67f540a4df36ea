//! Shared application state for axum handlers.

use std::sync::Arc;

use ergo_app::ports::TodoRepository;
use ergo_app::services::todo_service::TodoService;

/// Application state shared across all axum handlers.
///
/// Generic over the repository type to avoid dynamic dispatch; handlers only
/// ever see the service. `Clone` is implemented manually so the repository
/// itself does not need to be `Clone`: only the `Arc` wrapper is cloned.
pub struct AppState<R> {
    /// Todo CRUD service.
    pub todo_service: Arc<TodoService<R>>,
}

impl<R> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            todo_service: Arc::clone(&self.todo_service),
        }
    }
}

impl<R> AppState<R>
where
    R: TodoRepository + Send + Sync + 'static,
{
    /// Create a new application state from a service instance.
    pub fn new(todo_service: TodoService<R>) -> Self {
        Self {
            todo_service: Arc::new(todo_service),
        }
    }
}
