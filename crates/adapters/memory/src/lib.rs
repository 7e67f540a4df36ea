//! # ergo-adapter-memory
//!
//! In-process persistence adapter.
//!
//! ## Responsibilities
//! - Implement the `TodoRepository` port from `ergo-app` without any IO
//! - Reproduce the observable behaviour of the SQL adapter: identifiers are
//!   assigned once and never reused, listings are ordered by identifier,
//!   missing rows surface as `NotFound`
//!
//! State lives only as long as the repository value, so this adapter suits
//! demos and tests rather than production.
//!
//! ## Dependency rule
//! Depends on `ergo-app` (for the port trait) and `ergo-domain` (for domain types).

mod error;
mod todo_repo;

pub use error::MemoryError;
pub use todo_repo::InMemoryTodoRepository;
