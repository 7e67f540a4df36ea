//! # ergo-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define the **port trait** that storage adapters must implement
//!   (driven/outbound port):
//!   - `TodoRepository`: save, find, update, delete todos
//! - Define the **driving/inbound port** as a use-case struct:
//!   - `TodoService`: the one interface both the JSON API and the HTML UI
//!     call into
//! - Orchestrate domain objects without knowing *how* persistence works
//!
//! ## Dependency rule
//! Depends on `ergo-domain` only.
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;
