//! # ergo-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the **JSON API** under `/api/todos` with a uniform response
//!   envelope (`status`, `message`, `timestamp`, `data`, `meta`)
//! - Serve a **server-side-rendered HTML page** at `/` plus the form
//!   endpoints under `/ui/todo` it posts back to
//! - Install the cross-cutting middleware chain: request ids, access
//!   logging, request timeout, panic recovery
//! - Map HTTP requests into `TodoService` calls (driving adapter) and map
//!   results and errors back into status codes
//!
//! ## Dependency rule
//! Depends on `ergo-app` (for the port trait and service) and `ergo-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod dashboard;
pub mod envelope;
pub mod error;
pub mod middleware;
pub mod router;
pub mod state;
