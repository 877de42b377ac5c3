//! Preparation unit domain model.
//!
//! # Responsibility
//! - Define the schedulable unit record and its placement state.
//! - Restrict mutation of scheduling fields to the board store.
//!
//! # Invariants
//! - `id` is stable and never reused for another unit.
//! - `category` and `kind` never change after creation.
//! - A slot is present if and only if the unit is placed; `Placement` encodes
//!   this directly so no unit can carry a dangling slot.

use crate::catalog::Category;
use crate::model::slot::Slot;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier for one preparation unit.
pub type UnitId = Uuid;

/// Practice mode of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UnitKind {
    /// Mock interview run against an AI interviewer.
    AiMock,
    /// Mock interview with a real person.
    RealMock,
}

impl UnitKind {
    pub const ALL: [UnitKind; 2] = [UnitKind::AiMock, UnitKind::RealMock];

    /// Stable tag used in persisted snapshots.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AiMock => "aiMock",
            Self::RealMock => "realMock",
        }
    }

    /// Short label used in event summaries (`AI` / `Real`).
    pub fn short_label(self) -> &'static str {
        match self {
            Self::AiMock => "AI",
            Self::RealMock => "Real",
        }
    }
}

impl Display for UnitKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitKind {
    type Err = UnitKindParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ai" | "aimock" => Ok(Self::AiMock),
            "real" | "realmock" => Ok(Self::RealMock),
            other => Err(UnitKindParseError(other.to_string())),
        }
    }
}

/// Error returned when parsing an unknown unit kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitKindParseError(pub String);

impl Display for UnitKindParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown unit kind `{}`; expected ai|aiMock|real|realMock",
            self.0
        )
    }
}

impl Error for UnitKindParseError {}

/// Where a unit currently lives: the pile or one calendar slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Placement {
    Unplaced,
    Placed(Slot),
}

impl Placement {
    pub fn slot(self) -> Option<Slot> {
        match self {
            Self::Unplaced => None,
            Self::Placed(slot) => Some(slot),
        }
    }

    pub fn is_placed(self) -> bool {
        matches!(self, Self::Placed(_))
    }
}

/// One schedulable preparation task instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    id: UnitId,
    category: Category,
    kind: UnitKind,
    note: String,
    placement: Placement,
    completed: bool,
}

impl Unit {
    /// Creates an unplaced, not-completed unit with a generated ID.
    pub fn new(category: Category, kind: UnitKind, note: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), category, kind, note)
    }

    /// Creates an unplaced, not-completed unit with a caller-provided ID.
    ///
    /// Used by tests and import paths where identity already exists.
    pub fn with_id(
        id: UnitId,
        category: Category,
        kind: UnitKind,
        note: impl Into<String>,
    ) -> Self {
        Self {
            id,
            category,
            kind,
            note: note.into(),
            placement: Placement::Unplaced,
            completed: false,
        }
    }

    pub fn id(&self) -> UnitId {
        self.id
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn kind(&self) -> UnitKind {
        self.kind
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    /// Slot start when placed, `None` while in the pile.
    pub fn scheduled_start(&self) -> Option<Slot> {
        self.placement.slot()
    }

    pub fn is_placed(&self) -> bool {
        self.placement.is_placed()
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Whether this unit matches the `(category, kind)` pair.
    pub fn matches(&self, category: Category, kind: UnitKind) -> bool {
        self.category == category && self.kind == kind
    }

    pub(crate) fn set_placement(&mut self, placement: Placement) {
        self.placement = placement;
    }

    pub(crate) fn set_note(&mut self, note: String) {
        self.note = note;
    }

    pub(crate) fn toggle_completed(&mut self) {
        self.completed = !self.completed;
    }

    /// Test-only shortcut for building fixtures in arbitrary states.
    #[cfg(test)]
    pub(crate) fn with_state(mut self, placement: Placement, completed: bool) -> Self {
        self.placement = placement;
        self.completed = completed;
        self
    }
}
