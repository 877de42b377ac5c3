//! Placement store: the authoritative unit collection.
//!
//! # Responsibility
//! - Own the ordered unit collection and every mutation rule over it.
//! - Route placements through the collision resolver and quantity edits
//!   through the removal policy.
//! - Notify subscribed observers after each successful mutation.
//!
//! # Invariants
//! - Collection order is insertion order; it is never re-sorted.
//! - At most one unit is placed on any slot.
//! - Unit ids are unique within the collection.
//! - A failed operation leaves the collection, revision and observers untouched.

use crate::board::collision::occupant;
use crate::board::removal::{select_for_removal, RemovalChoice};
use crate::catalog::{Category, CATALOG};
use crate::model::slot::Slot;
use crate::model::unit::{Placement, Unit, UnitId, UnitKind};
use log::{debug, info, warn};
use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

/// Store operation errors. None of them mutate state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// Every unit of the pair is completed; completed units are protected.
    Blocked { category: Category, kind: UnitKind },
    /// Target slot is held by another unit.
    Collision { slot: Slot, occupant: UnitId },
    /// No unit with this id exists.
    UnitNotFound(UnitId),
    /// A restored collection breaks id uniqueness or slot exclusivity.
    InvalidSnapshot(String),
}

impl Display for BoardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blocked { category, kind } => write!(
                f,
                "cannot reduce {category} {kind}: all units are already marked as completed"
            ),
            Self::Collision { slot, occupant } => {
                write!(f, "slot {slot} is already taken by unit {occupant}")
            }
            Self::UnitNotFound(id) => write!(f, "unit not found: {id}"),
            Self::InvalidSnapshot(message) => write!(f, "invalid unit snapshot: {message}"),
        }
    }
}

impl Error for BoardError {}

/// Change emitted after a successful store mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardChange {
    Added {
        id: UnitId,
        category: Category,
        kind: UnitKind,
    },
    Removed {
        id: UnitId,
        category: Category,
        kind: UnitKind,
    },
    Moved {
        id: UnitId,
        from: Option<Slot>,
        to: Option<Slot>,
    },
    CompletedToggled {
        id: UnitId,
        completed: bool,
    },
    NoteChanged {
        id: UnitId,
    },
    Reset {
        unplaced: usize,
    },
    Replaced {
        unit_count: usize,
    },
}

/// Receives store change notifications (e.g. to re-render or persist).
pub trait BoardObserver {
    fn on_change(&self, change: &BoardChange);
}

impl<F> BoardObserver for F
where
    F: Fn(&BoardChange),
{
    fn on_change(&self, change: &BoardChange) {
        self(change);
    }
}

/// Owned scheduling board.
#[derive(Default)]
pub struct Board {
    units: Vec<Unit>,
    revision: u64,
    observers: Vec<Box<dyn BoardObserver>>,
}

impl Debug for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Board")
            .field("units", &self.units)
            .field("revision", &self.revision)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a board with the catalog default counts, all in the pile.
    ///
    /// Units are appended per category in catalog order, AI mocks before
    /// real mocks, each seeded with the category default note.
    pub fn with_defaults() -> Self {
        let mut units = Vec::new();
        for row in &CATALOG {
            let note = row.default_note.unwrap_or_default();
            for _ in 0..row.default_ai {
                units.push(Unit::new(row.category, UnitKind::AiMock, note));
            }
            for _ in 0..row.default_real {
                units.push(Unit::new(row.category, UnitKind::RealMock, note));
            }
        }
        info!(
            "event=board_init module=board status=ok source=defaults units={}",
            units.len()
        );
        Self {
            units,
            ..Self::default()
        }
    }

    /// Restores a board from a persisted collection, keeping its order.
    pub fn from_units(units: Vec<Unit>) -> Result<Self, BoardError> {
        validate_units(&units)?;
        Ok(Self {
            units,
            ..Self::default()
        })
    }

    /// All units in insertion order.
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Looks up one unit by id.
    pub fn get(&self, id: UnitId) -> Option<&Unit> {
        self.units.iter().find(|unit| unit.id() == id)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Number of successful mutations applied since construction.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Registers an observer called after every successful mutation.
    pub fn subscribe(&mut self, observer: Box<dyn BoardObserver>) {
        self.observers.push(observer);
    }

    /// Appends a new unplaced, not-completed unit with an empty note.
    pub fn add(&mut self, category: Category, kind: UnitKind) -> &Unit {
        let unit = Unit::new(category, kind, "");
        let id = unit.id();
        self.units.push(unit);
        debug!("event=unit_add module=board status=ok category={category} kind={kind} unit={id}");
        self.emit(BoardChange::Added { id, category, kind });
        &self.units[self.units.len() - 1]
    }

    /// Deletes one unit of `(category, kind)` chosen by the removal policy.
    ///
    /// Returns `Ok(None)` when nothing is eligible and `Err(Blocked)` when
    /// every matching unit is completed.
    pub fn remove(
        &mut self,
        category: Category,
        kind: UnitKind,
    ) -> Result<Option<Unit>, BoardError> {
        match select_for_removal(&self.units, category, kind) {
            RemovalChoice::Blocked => {
                warn!(
                    "event=unit_remove module=board status=blocked category={category} kind={kind}"
                );
                Err(BoardError::Blocked { category, kind })
            }
            RemovalChoice::Nothing => {
                debug!(
                    "event=unit_remove module=board status=noop category={category} kind={kind}"
                );
                Ok(None)
            }
            RemovalChoice::Remove(index) => {
                let removed = self.units.remove(index);
                debug!(
                    "event=unit_remove module=board status=ok category={category} kind={kind} unit={} was_placed={}",
                    removed.id(),
                    removed.is_placed()
                );
                self.emit(BoardChange::Removed {
                    id: removed.id(),
                    category,
                    kind,
                });
                Ok(Some(removed))
            }
        }
    }

    /// Moves a unit onto a slot, or back to the pile when `target` is `None`.
    ///
    /// Placement is rejected with `Collision` when another unit holds the
    /// slot. Moving a unit onto its own slot succeeds. Completed units may be
    /// moved explicitly.
    pub fn move_unit(&mut self, id: UnitId, target: Option<Slot>) -> Result<&Unit, BoardError> {
        let index = self.index_of(id)?;

        if let Some(slot) = target {
            if let Some(holder) = occupant(&self.units, slot, Some(id)) {
                let holder_id = holder.id();
                warn!(
                    "event=unit_move module=board status=collision unit={id} slot={} occupant={holder_id}",
                    slot.epoch_ms()
                );
                return Err(BoardError::Collision {
                    slot,
                    occupant: holder_id,
                });
            }
        }

        let from = self.units[index].scheduled_start();
        let placement = target.map_or(Placement::Unplaced, Placement::Placed);
        self.units[index].set_placement(placement);
        debug!(
            "event=unit_move module=board status=ok unit={id} placed={}",
            placement.is_placed()
        );
        self.emit(BoardChange::Moved {
            id,
            from,
            to: target,
        });
        Ok(&self.units[index])
    }

    /// Flips the completed flag. Placement is not affected.
    pub fn toggle_completed(&mut self, id: UnitId) -> Result<&Unit, BoardError> {
        let index = self.index_of(id)?;
        self.units[index].toggle_completed();
        let completed = self.units[index].is_completed();
        debug!("event=unit_toggle module=board status=ok unit={id} completed={completed}");
        self.emit(BoardChange::CompletedToggled { id, completed });
        Ok(&self.units[index])
    }

    /// Replaces the note text of one unit.
    pub fn set_note(&mut self, id: UnitId, note: impl Into<String>) -> Result<&Unit, BoardError> {
        let index = self.index_of(id)?;
        self.units[index].set_note(note.into());
        debug!("event=unit_note module=board status=ok unit={id}");
        self.emit(BoardChange::NoteChanged { id });
        Ok(&self.units[index])
    }

    /// Moves every placed unit back to the pile; notes and completion stay.
    ///
    /// Returns how many units were unplaced. Callers confirm with the user
    /// before invoking; there is no undo.
    pub fn reset_all(&mut self) -> usize {
        let mut unplaced = 0;
        for unit in &mut self.units {
            if unit.is_placed() {
                unit.set_placement(Placement::Unplaced);
                unplaced += 1;
            }
        }
        info!("event=board_reset module=board status=ok unplaced={unplaced}");
        self.emit(BoardChange::Reset { unplaced });
        unplaced
    }

    /// Swaps the whole collection, e.g. when opening a saved plan.
    pub fn replace_units(&mut self, units: Vec<Unit>) -> Result<(), BoardError> {
        validate_units(&units)?;
        let unit_count = units.len();
        self.units = units;
        info!("event=board_replace module=board status=ok units={unit_count}");
        self.emit(BoardChange::Replaced { unit_count });
        Ok(())
    }

    fn index_of(&self, id: UnitId) -> Result<usize, BoardError> {
        self.units
            .iter()
            .position(|unit| unit.id() == id)
            .ok_or(BoardError::UnitNotFound(id))
    }

    fn emit(&mut self, change: BoardChange) {
        self.revision += 1;
        for observer in &self.observers {
            observer.on_change(&change);
        }
    }
}

fn validate_units(units: &[Unit]) -> Result<(), BoardError> {
    let mut ids = HashSet::with_capacity(units.len());
    let mut slots: HashMap<Slot, UnitId> = HashMap::new();

    for unit in units {
        if !ids.insert(unit.id()) {
            return Err(BoardError::InvalidSnapshot(format!(
                "duplicate unit id {}",
                unit.id()
            )));
        }
        if let Some(slot) = unit.scheduled_start() {
            if let Some(previous) = slots.insert(slot, unit.id()) {
                return Err(BoardError::InvalidSnapshot(format!(
                    "units {previous} and {} share slot {slot}",
                    unit.id()
                )));
            }
        }
    }

    Ok(())
}
