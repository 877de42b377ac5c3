//! Scheduling board: placement store, admission and removal rules, views.
//!
//! # Responsibility
//! - Keep the placement rules (collision, removal priority) pure and
//!   separately testable from the store that applies them.
//! - Expose read-only projections for presentation layers.
//!
//! # Invariants
//! - Only `store::Board` mutates units.

pub mod collision;
pub mod removal;
pub mod store;
pub mod views;
