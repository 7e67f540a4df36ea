//! `SQLite` implementation of [`TodoRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use ergo_app::ports::TodoRepository;
use ergo_domain::error::{ErgoError, NotFoundError};
use ergo_domain::id::TodoId;
use ergo_domain::params::{ListParams, UpdateParams};
use ergo_domain::todo::{NewTodo, Todo};

use crate::error::StorageError;

/// Wrapper for converting database rows into domain [`Todo`].
struct Wrapper(Todo);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: i64 = row.try_get("id")?;
        let title: String = row.try_get("title")?;
        let completed: bool = row.try_get("completed")?;

        let id = TodoId::new(id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(Todo {
            id,
            title,
            completed,
        }))
    }
}

const INSERT: &str = "INSERT INTO todos (title) VALUES (?)";
const SELECT_BY_ID: &str = "SELECT id, title, completed FROM todos WHERE id = ?";
const SELECT_PAGE: &str = r"
    SELECT id, title, completed
    FROM todos
    ORDER BY id ASC
    LIMIT ? OFFSET ?
";
const UPDATE_COMPLETED: &str = "UPDATE todos SET completed = ? WHERE id = ?";
const DELETE_BY_ID: &str = "DELETE FROM todos WHERE id = ?";

fn not_found(id: TodoId) -> ErgoError {
    NotFoundError {
        entity: "Todo",
        id: id.to_string(),
    }
    .into()
}

/// `SQLite`-backed todo repository.
pub struct SqliteTodoRepository {
    pool: SqlitePool,
}

impl SqliteTodoRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl TodoRepository for SqliteTodoRepository {
    async fn save(&self, new_todo: NewTodo) -> Result<Todo, ErgoError> {
        let result = sqlx::query(INSERT)
            .bind(new_todo.title())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        let id = TodoId::new(result.last_insert_rowid())
            .map_err(|err| StorageError::from(sqlx::Error::Decode(Box::new(err))))?;

        self.find_by_id(id).await
    }

    async fn find_by_id(&self, id: TodoId) -> Result<Todo, ErgoError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        row.map(|w| w.0).ok_or_else(|| not_found(id))
    }

    async fn find(&self, params: ListParams) -> Result<Vec<Todo>, ErgoError> {
        let limit = i64::try_from(params.limit()).unwrap_or(i64::MAX);
        let offset = i64::try_from(params.offset()).unwrap_or(i64::MAX);

        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_PAGE)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn update(&self, params: UpdateParams) -> Result<Todo, ErgoError> {
        let result = sqlx::query(UPDATE_COMPLETED)
            .bind(params.completed)
            .bind(params.id.get())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        if result.rows_affected() == 0 {
            tracing::debug!(todo_id = %params.id, "update matched no rows");
        }

        self.find_by_id(params.id).await
    }

    async fn delete(&self, id: TodoId) -> Result<(), ErgoError> {
        let result = sqlx::query(DELETE_BY_ID)
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }

        Ok(())
    }
}
