//! Storage port: repository trait for persisting todos.

use std::future::Future;

use ergo_domain::error::ErgoError;
use ergo_domain::id::TodoId;
use ergo_domain::params::{ListParams, UpdateParams};
use ergo_domain::todo::{NewTodo, Todo};

/// Repository for persisting and querying [`Todo`]s.
///
/// Implementations translate raw store failures into
/// [`ErgoError::Storage`] and are responsible for detecting the
/// [`ErgoError::NotFound`] condition; nothing else is interpreted.
pub trait TodoRepository {
    /// Insert a new todo and return it as re-read from the store, including
    /// the store-assigned identifier.
    ///
    /// If the read after the insert fails, the call fails even though the
    /// row was written.
    fn save(&self, new_todo: NewTodo) -> impl Future<Output = Result<Todo, ErgoError>> + Send;

    /// Get a todo by its identifier.
    ///
    /// Fails with [`ErgoError::NotFound`] when no row matches.
    fn find_by_id(&self, id: TodoId) -> impl Future<Output = Result<Todo, ErgoError>> + Send;

    /// Get one page of todos ordered by identifier ascending.
    ///
    /// A window past the last row yields an empty list.
    fn find(&self, params: ListParams)
    -> impl Future<Output = Result<Vec<Todo>, ErgoError>> + Send;

    /// Set the completion flag, then re-fetch the todo by identifier.
    ///
    /// The number of affected rows is not inspected: a missing identifier
    /// surfaces as the re-fetch's [`ErgoError::NotFound`].
    fn update(&self, params: UpdateParams) -> impl Future<Output = Result<Todo, ErgoError>> + Send;

    /// Delete a todo by its identifier.
    ///
    /// Fails with [`ErgoError::NotFound`] when no row was removed.
    fn delete(&self, id: TodoId) -> impl Future<Output = Result<(), ErgoError>> + Send;
}
