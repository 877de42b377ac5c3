//! Slot admission rule.
//!
//! The calendar grid has exactly one seat per hour across all categories.

use crate::model::slot::Slot;
use crate::model::unit::{Unit, UnitId};

/// Returns whether `target` is free for a unit, ignoring `excluding`.
///
/// A slot is taken when any other unit is placed on it. Passing the moving
/// unit's own id as `excluding` makes a move onto its current slot legal.
pub fn can_place(units: &[Unit], target: Slot, excluding: Option<UnitId>) -> bool {
    occupant(units, target, excluding).is_none()
}

/// Returns the unit (other than `excluding`) currently placed on `target`.
pub fn occupant(units: &[Unit], target: Slot, excluding: Option<UnitId>) -> Option<&Unit> {
    units.iter().find(|unit| {
        Some(unit.id()) != excluding && unit.scheduled_start() == Some(target)
    })
}
