//! Removal selection policy for quantity edits.
//!
//! # Responsibility
//! - Decide which unit `remove(category, kind)` deletes, without mutating.
//!
//! # Invariants
//! - Completed units are never selected.
//! - When every matching unit is completed the request is blocked.
//! - Unplaced units are preferred over placed ones; among unplaced units the
//!   last one in collection order wins; among placed units the latest slot wins.

use crate::catalog::Category;
use crate::model::unit::{Unit, UnitKind};

/// Outcome of the removal selection for one `(category, kind)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalChoice {
    /// Every matching unit is completed; nothing may be removed.
    Blocked,
    /// Remove the unit at this index of the collection.
    Remove(usize),
    /// No matching unit exists or none is eligible.
    Nothing,
}

/// Selects the unit to delete for `(category, kind)`.
pub fn select_for_removal(units: &[Unit], category: Category, kind: UnitKind) -> RemovalChoice {
    let matching: Vec<(usize, &Unit)> = units
        .iter()
        .enumerate()
        .filter(|(_, unit)| unit.matches(category, kind))
        .collect();

    if !matching.is_empty() && matching.iter().all(|(_, unit)| unit.is_completed()) {
        return RemovalChoice::Blocked;
    }

    let last_unplaced = matching
        .iter()
        .rev()
        .find(|(_, unit)| !unit.is_placed() && !unit.is_completed());
    if let Some((index, _)) = last_unplaced {
        return RemovalChoice::Remove(*index);
    }

    // `max_by_key` keeps the last maximum; slots are unique so ties cannot occur.
    let latest_placed = matching
        .iter()
        .filter(|(_, unit)| !unit.is_completed())
        .filter_map(|(index, unit)| unit.scheduled_start().map(|slot| (*index, slot)))
        .max_by_key(|(_, slot)| *slot);
    match latest_placed {
        Some((index, _)) => RemovalChoice::Remove(index),
        None => RemovalChoice::Nothing,
    }
}
