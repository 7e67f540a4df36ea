//! # ergo-domain
//!
//! Pure domain model for the ergo todo service.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define the **Todo** entity and its validated creation input
//! - Define the **parameter contracts** used by listing and updating
//!   (pagination window, completion toggle)
//! - Contain all invariant enforcement (non-empty titles, positive ids,
//!   pagination defaults)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod params;
pub mod time;
pub mod todo;
