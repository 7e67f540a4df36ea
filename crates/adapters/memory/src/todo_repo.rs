//! In-memory implementation of [`TodoRepository`].

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use ergo_app::ports::TodoRepository;
use ergo_domain::error::{ErgoError, NotFoundError};
use ergo_domain::id::TodoId;
use ergo_domain::params::{ListParams, UpdateParams};
use ergo_domain::todo::{NewTodo, Todo};

use crate::error::MemoryError;

#[derive(Debug, Default)]
struct Table {
    last_id: i64,
    rows: BTreeMap<TodoId, Todo>,
}

impl Table {
    fn get(&self, id: TodoId) -> Result<Todo, ErgoError> {
        self.rows.get(&id).cloned().ok_or_else(|| not_found(id))
    }
}

fn not_found(id: TodoId) -> ErgoError {
    NotFoundError {
        entity: "Todo",
        id: id.to_string(),
    }
    .into()
}

/// Mutex-guarded todo store.
///
/// The lock is only taken for the synchronous body of each call and is
/// never held across an `.await`.
#[derive(Debug, Default)]
pub struct InMemoryTodoRepository {
    table: Mutex<Table>,
}

impl InMemoryTodoRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Table>, MemoryError> {
        self.table.lock().map_err(|_| MemoryError::Poisoned)
    }
}

impl TodoRepository for InMemoryTodoRepository {
    async fn save(&self, new_todo: NewTodo) -> Result<Todo, ErgoError> {
        let mut table = self.lock()?;
        let next = table
            .last_id
            .checked_add(1)
            .ok_or(MemoryError::IdsExhausted)?;
        let id = TodoId::new(next)?;
        table.last_id = next;
        table.rows.insert(
            id,
            Todo {
                id,
                title: new_todo.title().to_string(),
                completed: false,
            },
        );
        table.get(id)
    }

    async fn find_by_id(&self, id: TodoId) -> Result<Todo, ErgoError> {
        self.lock()?.get(id)
    }

    async fn find(&self, params: ListParams) -> Result<Vec<Todo>, ErgoError> {
        let table = self.lock()?;
        let offset = usize::try_from(params.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(params.limit()).unwrap_or(usize::MAX);
        Ok(table.rows.values().skip(offset).take(limit).cloned().collect())
    }

    async fn update(&self, params: UpdateParams) -> Result<Todo, ErgoError> {
        let mut table = self.lock()?;
        if let Some(row) = table.rows.get_mut(&params.id) {
            row.completed = params.completed;
        }
        table.get(params.id)
    }

    async fn delete(&self, id: TodoId) -> Result<(), ErgoError> {
        let mut table = self.lock()?;
        match table.rows.remove(&id) {
            Some(_) => Ok(()),
            None => Err(not_found(id)),
        }
    }
}
