//! # ergo-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the `TodoRepository` port defined in `ergo-app::ports::storage`
//! - Manage the bounded `SQLite` connection pool (size, lifetime, idle timeout)
//! - Bootstrap the `todos` table when the pool opens
//! - Map between domain types and database rows
//!
//! ## Dependency rule
//! Depends on `ergo-app` (for the port trait) and `ergo-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod error;
mod pool;
mod todo_repo;

pub use error::StorageError;
pub use pool::{Config, Database};
pub use todo_repo::SqliteTodoRepository;
