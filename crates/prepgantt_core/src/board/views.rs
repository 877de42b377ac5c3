//! Read-only projections over the unit collection.
//!
//! # Responsibility
//! - Group pile units by category for the sidebar view.
//! - Map placed units onto a weekly day/hour grid.
//! - Count required and performed units per category and kind.
//!
//! # Invariants
//! - Projections never mutate units and never reorder within a category.
//! - Category ordering always follows catalog display order.

use crate::catalog::{Category, CATALOG};
use crate::model::unit::{Unit, UnitKind};
use chrono::{Datelike, Duration, FixedOffset, NaiveDate, Timelike};

pub const DAYS_PER_WEEK: usize = 7;
pub const HOURS_PER_DAY: usize = 24;

/// Unplaced units of one category, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PileGroup<'a> {
    pub category: Category,
    pub units: Vec<&'a Unit>,
}

/// Partitions unplaced units by category; empty categories are omitted.
pub fn pile_groups(units: &[Unit]) -> Vec<PileGroup<'_>> {
    CATALOG
        .iter()
        .filter_map(|row| {
            let grouped: Vec<&Unit> = units
                .iter()
                .filter(|unit| unit.category() == row.category && !unit.is_placed())
                .collect();
            if grouped.is_empty() {
                None
            } else {
                Some(PileGroup {
                    category: row.category,
                    units: grouped,
                })
            }
        })
        .collect()
}

/// Monday-to-Sunday calendar week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeekWindow {
    start: NaiveDate,
}

impl WeekWindow {
    /// Week (starting Monday) that contains `date`.
    pub fn containing(date: NaiveDate) -> Self {
        let back = i64::from(date.weekday().num_days_from_monday());
        let start = date
            .checked_sub_signed(Duration::days(back))
            .unwrap_or(date);
        Self { start }
    }

    /// Monday of this week.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// The seven dates of this week, Monday first.
    pub fn days(&self) -> Vec<NaiveDate> {
        self.start.iter_days().take(DAYS_PER_WEEK).collect()
    }

    /// Week shifted by `weeks` (negative goes back). `None` past the
    /// supported calendar range.
    pub fn offset(&self, weeks: i64) -> Option<Self> {
        self.start
            .checked_add_signed(Duration::weeks(weeks))
            .map(|start| Self { start })
    }

    pub fn next(&self) -> Option<Self> {
        self.offset(1)
    }

    pub fn previous(&self) -> Option<Self> {
        self.offset(-1)
    }

    /// ISO-8601 week number.
    pub fn iso_week(&self) -> u32 {
        self.start.iso_week().week()
    }

    /// Picker label, e.g. `Week 12 - Mar 16`.
    pub fn label(&self) -> String {
        format!("Week {} - {}", self.iso_week(), self.start.format("%b %-d"))
    }

    /// Day index (0 = Monday) of `date`, if it falls inside this week.
    pub fn day_index(&self, date: NaiveDate) -> Option<usize> {
        let days = date.signed_duration_since(self.start).num_days();
        usize::try_from(days)
            .ok()
            .filter(|index| *index < DAYS_PER_WEEK)
    }
}

/// Placed units laid out on a 7 x 24 grid in a given wall-clock offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekGrid<'a> {
    window: WeekWindow,
    cells: [[Option<&'a Unit>; HOURS_PER_DAY]; DAYS_PER_WEEK],
}

impl<'a> WeekGrid<'a> {
    /// Builds the grid; units scheduled outside `window` are skipped.
    pub fn build(units: &'a [Unit], window: WeekWindow, offset: FixedOffset) -> Self {
        let mut cells = [[None; HOURS_PER_DAY]; DAYS_PER_WEEK];
        for unit in units {
            let Some(slot) = unit.scheduled_start() else {
                continue;
            };
            let local = slot.start_utc().with_timezone(&offset);
            if let Some(day) = window.day_index(local.date_naive()) {
                cells[day][local.hour() as usize] = Some(unit);
            }
        }
        Self { window, cells }
    }

    pub fn window(&self) -> WeekWindow {
        self.window
    }

    /// Unit occupying `(day, hour)`; out-of-range coordinates yield `None`.
    pub fn cell(&self, day: usize, hour: usize) -> Option<&'a Unit> {
        self.cells
            .get(day)
            .and_then(|hours| hours.get(hour))
            .copied()
            .flatten()
    }

    /// Number of occupied cells in this week.
    pub fn placed_count(&self) -> usize {
        self.cells
            .iter()
            .flat_map(|hours| hours.iter())
            .filter(|cell| cell.is_some())
            .count()
    }
}

/// Required (total) and performed (completed) counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KindCount {
    pub required: usize,
    pub performed: usize,
}

impl KindCount {
    fn record(&mut self, unit: &Unit) {
        self.required += 1;
        if unit.is_completed() {
            self.performed += 1;
        }
    }
}

/// Strategy-table row for one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub category: Category,
    pub ai: KindCount,
    pub real: KindCount,
    /// First non-empty note among this category's units.
    pub note: Option<String>,
}

impl SummaryRow {
    pub fn count(&self, kind: UnitKind) -> KindCount {
        match kind {
            UnitKind::AiMock => self.ai,
            UnitKind::RealMock => self.real,
        }
    }
}

/// Strategy-table projection with per-kind totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub rows: Vec<SummaryRow>,
    pub ai_total: KindCount,
    pub real_total: KindCount,
}

impl Summary {
    /// Counts for `(category, kind)`.
    pub fn count(&self, category: Category, kind: UnitKind) -> KindCount {
        self.rows
            .iter()
            .find(|row| row.category == category)
            .map(|row| row.count(kind))
            .unwrap_or_default()
    }
}

/// Counts every unit per category and kind; rows follow catalog order and
/// include categories with zero units.
pub fn summarize(units: &[Unit]) -> Summary {
    let mut rows: Vec<SummaryRow> = CATALOG
        .iter()
        .map(|row| SummaryRow {
            category: row.category,
            ai: KindCount::default(),
            real: KindCount::default(),
            note: None,
        })
        .collect();
    let mut ai_total = KindCount::default();
    let mut real_total = KindCount::default();

    for unit in units {
        let row = &mut rows[unit.category().display_index()];
        match unit.kind() {
            UnitKind::AiMock => {
                row.ai.record(unit);
                ai_total.record(unit);
            }
            UnitKind::RealMock => {
                row.real.record(unit);
                real_total.record(unit);
            }
        }
        if row.note.is_none() && !unit.note().is_empty() {
            row.note = Some(unit.note().to_string());
        }
    }

    Summary {
        rows,
        ai_total,
        real_total,
    }
}

#[cfg(test)]
mod tests {
    use super::{pile_groups, summarize, WeekGrid, WeekWindow};
    use crate::catalog::Category;
    use crate::model::slot::Slot;
    use crate::model::unit::{Placement, Unit, UnitKind};
    use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn pile_groups_follow_catalog_order_and_skip_empty() {
        let slot = Slot::from_datetime(&Utc.with_ymd_and_hms(2026, 1, 1, 8, 0, 0).unwrap());
        let units = vec![
            Unit::new(Category::VibeCoding, UnitKind::AiMock, ""),
            Unit::new(Category::ProductLove, UnitKind::RealMock, ""),
            Unit::new(Category::Behave, UnitKind::AiMock, "")
                .with_state(Placement::Placed(slot), false),
            Unit::new(Category::ProductLove, UnitKind::AiMock, ""),
        ];

        let groups = pile_groups(&units);
        let categories: Vec<_> = groups.iter().map(|group| group.category).collect();
        assert_eq!(categories, vec![Category::ProductLove, Category::VibeCoding]);
        assert_eq!(groups[0].units[0].id(), units[1].id());
        assert_eq!(groups[0].units[1].id(), units[3].id());
    }

    #[test]
    fn week_window_starts_on_monday() {
        let window = WeekWindow::containing(date(2026, 3, 22));
        assert_eq!(window.start(), date(2026, 3, 16));
        assert_eq!(window.days().len(), 7);
        assert_eq!(window.days()[6], date(2026, 3, 22));
        assert_eq!(window.label(), "Week 12 - Mar 16");
        assert_eq!(window.next().unwrap().start(), date(2026, 3, 23));
        assert_eq!(window.previous().unwrap().start(), date(2026, 3, 9));
    }

    #[test]
    fn week_grid_places_units_in_local_cells() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let inside = offset.with_ymd_and_hms(2026, 3, 18, 9, 0, 0).unwrap();
        let outside = offset.with_ymd_and_hms(2026, 3, 25, 9, 0, 0).unwrap();
        let units = vec![
            Unit::new(Category::ProductSense, UnitKind::AiMock, "")
                .with_state(Placement::Placed(Slot::from_datetime(&inside)), false),
            Unit::new(Category::ProductSense, UnitKind::AiMock, "")
                .with_state(Placement::Placed(Slot::from_datetime(&outside)), false),
            Unit::new(Category::ProductSense, UnitKind::AiMock, ""),
        ];

        let grid = WeekGrid::build(&units, WeekWindow::containing(date(2026, 3, 18)), offset);
        assert_eq!(grid.cell(2, 9).map(Unit::id), Some(units[0].id()));
        assert_eq!(grid.placed_count(), 1);
        assert!(grid.cell(7, 0).is_none());
        assert!(grid.cell(0, 24).is_none());
    }

    #[test]
    fn summarize_counts_required_and_performed() {
        let units = vec![
            Unit::new(Category::ProductStrategy, UnitKind::AiMock, "")
                .with_state(Placement::Unplaced, true),
            Unit::new(Category::ProductStrategy, UnitKind::AiMock, "Pricing"),
            Unit::new(Category::ProductStrategy, UnitKind::RealMock, "later note"),
            Unit::new(Category::Behave, UnitKind::RealMock, "")
                .with_state(Placement::Unplaced, true),
        ];

        let summary = summarize(&units);
        let strategy = summary.count(Category::ProductStrategy, UnitKind::AiMock);
        assert_eq!((strategy.required, strategy.performed), (2, 1));
        assert_eq!(summary.rows.len(), 10);
        assert_eq!(
            summary.rows[Category::ProductStrategy.display_index()]
                .note
                .as_deref(),
            Some("Pricing")
        );
        assert_eq!((summary.ai_total.required, summary.ai_total.performed), (2, 1));
        assert_eq!((summary.real_total.required, summary.real_total.performed), (2, 1));
        assert_eq!(summary.count(Category::VibeCoding, UnitKind::AiMock).required, 0);
    }
}
