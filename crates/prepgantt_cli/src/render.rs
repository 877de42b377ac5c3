//! Plain-text rendering of board projections.
//!
//! Every renderer returns a `String` so output stays testable; callers print.

use std::fmt::Write as _;

use chrono::{DateTime, FixedOffset, TimeZone, Utc};

use prepgantt_core::{
    pile_groups, summarize, KindCount, Plan, PlanId, Slot, Unit, WeekGrid, DAYS_PER_WEEK,
    HOURS_PER_DAY,
};

const SHORT_ID_LEN: usize = 8;
const CELL_WIDTH: usize = 13;

/// First characters of a UUID, enough to pass back as a prefix.
pub fn short_id(id: uuid::Uuid) -> String {
    id.to_string()[..SHORT_ID_LEN].to_string()
}

/// Slot start in `offset`, e.g. `2026-03-16 09:00`.
pub fn format_slot(slot: Slot, offset: FixedOffset) -> String {
    slot.start_utc()
        .with_timezone(&offset)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

/// Unplaced units grouped by category.
pub fn render_pile(units: &[Unit]) -> String {
    let groups = pile_groups(units);
    if groups.is_empty() {
        return "Pile is empty; every unit is scheduled.\n".to_string();
    }

    let mut out = String::new();
    for group in groups {
        let _ = writeln!(out, "{} ({})", group.category.label(), group.units.len());
        for unit in group.units {
            let _ = writeln!(out, "  {}", unit_line(unit));
        }
    }
    out
}

/// 7 x 24 grid for one week; hours without any placement are skipped.
pub fn render_week(grid: &WeekGrid<'_>) -> String {
    let mut out = String::new();
    let window = grid.window();
    let _ = writeln!(out, "{}", window.label());

    let _ = write!(out, "{:<6}", "");
    for day in window.days() {
        let _ = write!(out, "{:<CELL_WIDTH$}", day.format("%a %d").to_string());
    }
    out.push('\n');

    let mut any = false;
    for hour in 0..HOURS_PER_DAY {
        if (0..DAYS_PER_WEEK).all(|day| grid.cell(day, hour).is_none()) {
            continue;
        }
        any = true;
        let _ = write!(out, "{hour:02}:00 ");
        for day in 0..DAYS_PER_WEEK {
            let cell = grid.cell(day, hour).map(cell_label).unwrap_or_else(|| "·".to_string());
            let _ = write!(out, "{cell:<CELL_WIDTH$}");
        }
        out.truncate(out.trim_end().len());
        out.push('\n');
    }
    if !any {
        out.push_str("(nothing scheduled this week)\n");
    }
    out
}

/// Strategy table: required / performed counts per category and kind.
pub fn render_summary(units: &[Unit]) -> String {
    let summary = summarize(units);
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<18} {:>9} {:>9}  {}",
        "Category", "AI", "Real", "Notes"
    );
    for row in &summary.rows {
        let _ = writeln!(
            out,
            "{:<18} {:>9} {:>9}  {}",
            row.category.label(),
            ratio(row.ai),
            ratio(row.real),
            row.note.as_deref().unwrap_or("")
        );
    }
    let _ = writeln!(
        out,
        "{:<18} {:>9} {:>9}",
        "Total",
        ratio(summary.ai_total),
        ratio(summary.real_total)
    );
    out
}

/// Every unit in collection order with its slot in `offset`.
pub fn render_list(units: &[Unit], offset: FixedOffset) -> String {
    let mut out = String::new();
    for unit in units {
        let when = unit
            .scheduled_start()
            .map(|slot| format_slot(slot, offset))
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(out, "{when:<16}  {}", unit_line(unit));
    }
    out
}

/// Saved plans, marking the active one with `*`.
pub fn render_plans(plans: &[Plan], active: Option<PlanId>, offset: FixedOffset) -> String {
    if plans.is_empty() {
        return "No saved plans.\n".to_string();
    }
    let mut out = String::new();
    for plan in plans {
        let marker = if Some(plan.id) == active { '*' } else { ' ' };
        let saved = format_epoch_ms(plan.last_saved_at, offset);
        let _ = writeln!(
            out,
            "{marker} {}  {saved}  {:>3} units  {}",
            short_id(plan.id),
            plan.units.len(),
            plan.name
        );
    }
    out
}

fn format_epoch_ms(epoch_ms: i64, offset: FixedOffset) -> String {
    DateTime::<Utc>::from_timestamp_millis(epoch_ms)
        .map(|at| offset.from_utc_datetime(&at.naive_utc()))
        .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "?".to_string())
}

fn unit_line(unit: &Unit) -> String {
    let done = if unit.is_completed() { "[x]" } else { "[ ]" };
    let mut line = format!(
        "{} {done} {:<17} {:<4}",
        short_id(unit.id()),
        unit.category().label(),
        unit.kind().short_label()
    );
    if !unit.note().is_empty() {
        let _ = write!(line, " {}", unit.note());
    }
    line.truncate(line.trim_end().len());
    line
}

fn cell_label(unit: &Unit) -> String {
    let label: String = unit.category().label().chars().take(8).collect();
    let done = if unit.is_completed() { "*" } else { "" };
    format!("{label} {}{done}", unit.kind().short_label())
}

fn ratio(count: KindCount) -> String {
    format!("{}/{}", count.performed, count.required)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use prepgantt_core::{Board, Category, UnitKind, WeekWindow};

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn slot(day: u32, hour: u32) -> Slot {
        Slot::from_datetime(&Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0).unwrap())
    }

    #[test]
    fn pile_lists_unplaced_units_by_category() {
        let mut board = Board::new();
        board.add(Category::VibeCoding, UnitKind::AiMock);
        let placed = board.add(Category::ProductLove, UnitKind::RealMock).id();
        board.move_unit(placed, Some(slot(16, 9))).unwrap();

        let text = render_pile(board.units());

        assert!(text.starts_with("vibeCoding (1)\n"));
        assert!(!text.contains("productLove"));
    }

    #[test]
    fn pile_reports_when_empty() {
        assert!(render_pile(&[]).contains("empty"));
    }

    #[test]
    fn week_shows_only_occupied_hours() {
        let mut board = Board::new();
        let id = board.add(Category::ProductSense, UnitKind::AiMock).id();
        board.move_unit(id, Some(slot(17, 14))).unwrap();
        let window = WeekWindow::containing(NaiveDate::from_ymd_opt(2026, 3, 17).unwrap());
        let grid = WeekGrid::build(board.units(), window, utc());

        let text = render_week(&grid);

        assert!(text.starts_with("Week 12 - Mar 16\n"));
        assert!(text.contains("14:00"));
        assert!(text.contains("productS AI"));
        assert!(!text.contains("13:00"));
    }

    #[test]
    fn empty_week_says_so() {
        let board = Board::new();
        let window = WeekWindow::containing(NaiveDate::from_ymd_opt(2026, 3, 17).unwrap());
        let grid = WeekGrid::build(board.units(), window, utc());

        assert!(render_week(&grid).contains("nothing scheduled"));
    }

    #[test]
    fn summary_shows_performed_over_required() {
        let mut board = Board::new();
        let done = board.add(Category::Behave, UnitKind::RealMock).id();
        board.add(Category::Behave, UnitKind::RealMock);
        board.toggle_completed(done).unwrap();

        let text = render_summary(board.units());
        let behave = text
            .lines()
            .find(|line| line.starts_with("behave "))
            .unwrap();

        assert!(behave.contains("0/0"));
        assert!(behave.contains("1/2"));
        assert!(text.lines().last().unwrap().starts_with("Total"));
    }

    #[test]
    fn list_prints_slot_in_offset() {
        let mut board = Board::new();
        let id = board.add(Category::ProductTech, UnitKind::AiMock).id();
        board.set_note(id, "system design").unwrap();
        board.move_unit(id, Some(slot(16, 9))).unwrap();
        board.add(Category::ProductTech, UnitKind::AiMock);

        let text = render_list(board.units(), FixedOffset::east_opt(3600).unwrap());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("2026-03-16 10:00"));
        assert!(lines[0].ends_with("system design"));
        assert!(lines[1].starts_with('-'));
    }

    #[test]
    fn short_id_is_a_prefix() {
        let id = uuid::Uuid::new_v4();
        assert!(id.to_string().starts_with(&short_id(id)));
        assert_eq!(short_id(id).len(), SHORT_ID_LEN);
    }
}
