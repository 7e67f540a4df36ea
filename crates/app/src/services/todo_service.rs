//! Todo service: use-cases for managing todos.

use ergo_domain::error::ErgoError;
use ergo_domain::id::TodoId;
use ergo_domain::params::{ListParams, UpdateParams};
use ergo_domain::todo::{NewTodo, Todo};

use crate::ports::TodoRepository;

/// Application service for todo CRUD operations.
///
/// This is the only interface the HTTP handlers and the HTML dashboard call
/// into, so both front ends share the same semantics whatever repository is
/// plugged in.
pub struct TodoService<R> {
    repo: R,
}

impl<R: TodoRepository> TodoService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// List one page of todos.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip_all, fields(page = params.page(), per_page = params.per_page()))]
    pub async fn list_todos(&self, params: ListParams) -> Result<Vec<Todo>, ErgoError> {
        self.repo.find(params).await
    }

    /// Look up a todo by id.
    ///
    /// # Errors
    ///
    /// Returns [`ErgoError::NotFound`] when no todo with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip_all, fields(todo_id = %id))]
    pub async fn get_todo(&self, id: TodoId) -> Result<Todo, ErgoError> {
        self.repo.find_by_id(id).await
    }

    /// Persist a new todo.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip_all, fields(title = new_todo.title()))]
    pub async fn create_todo(&self, new_todo: NewTodo) -> Result<Todo, ErgoError> {
        self.repo.save(new_todo).await
    }

    /// Set the completion flag of an existing todo.
    ///
    /// # Errors
    ///
    /// Returns [`ErgoError::NotFound`] when no todo with that id exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip_all, fields(todo_id = %params.id, completed = params.completed))]
    pub async fn update_todo(&self, params: UpdateParams) -> Result<Todo, ErgoError> {
        self.repo.update(params).await
    }

    /// Delete a todo by id.
    ///
    /// # Errors
    ///
    /// Returns [`ErgoError::NotFound`] when nothing was deleted,
    /// or a storage error from the repository.
    #[tracing::instrument(skip_all, fields(todo_id = %id))]
    pub async fn delete_todo(&self, id: TodoId) -> Result<(), ErgoError> {
        self.repo.delete(id).await
    }
}
