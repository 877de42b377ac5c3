//! Domain model for the scheduling board.
//!
//! # Responsibility
//! - Define the unit record, its kind and placement state.
//! - Define the local-hour slot timestamp shared by store and views.
//!
//! # Invariants
//! - Every unit is identified by a stable `UnitId`.
//! - Units are destroyed only by explicit removal, never by soft-delete.

pub mod slot;
pub mod unit;
