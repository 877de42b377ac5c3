//! CLI handlers for commands that read or edit the working board.
//!
//! Store rejections the user can act on (`Blocked`, `Collision`) are printed
//! as warnings and leave the board untouched; everything else is an error.

use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use log::{info, warn};

use prepgantt_core::{
    count_events, render_calendar, Board, BoardError, Category, UnitKind, WeekGrid, WeekWindow,
};

use crate::config::AppConfig;
use crate::render::{format_slot, render_list, render_pile, render_summary, render_week, short_id};
use crate::resolve::{parse_date, parse_slot, resolve_unit_id};

// -----------------------------------------------------------------------
// Read-only views
// -----------------------------------------------------------------------

pub fn cmd_pile(board: &Board) -> Result<()> {
    print!("{}", render_pile(board.units()));
    Ok(())
}

pub fn cmd_week(
    board: &Board,
    config: &AppConfig,
    date: Option<&str>,
    offset: i64,
) -> Result<()> {
    let anchor = match date {
        Some(raw) => parse_date(raw)?,
        None => today(config),
    };
    let window = WeekWindow::containing(anchor)
        .offset(offset)
        .with_context(|| format!("week offset {offset} is out of range"))?;
    let grid = WeekGrid::build(board.units(), window, config.utc_offset);
    print!("{}", render_week(&grid));
    Ok(())
}

pub fn cmd_summary(board: &Board) -> Result<()> {
    print!("{}", render_summary(board.units()));
    Ok(())
}

pub fn cmd_list(board: &Board, config: &AppConfig) -> Result<()> {
    print!("{}", render_list(board.units(), config.utc_offset));
    Ok(())
}

// -----------------------------------------------------------------------
// Mutations
// -----------------------------------------------------------------------

pub fn cmd_add(board: &mut Board, category: Category, kind: UnitKind) -> Result<()> {
    let unit = board.add(category, kind);
    println!(
        "Added {} {} ({}).",
        category.label(),
        kind.short_label(),
        short_id(unit.id())
    );
    Ok(())
}

pub fn cmd_remove(board: &mut Board, category: Category, kind: UnitKind) -> Result<()> {
    match board.remove(category, kind) {
        Ok(Some(unit)) => {
            println!(
                "Removed {} {} ({}).",
                category.label(),
                kind.short_label(),
                short_id(unit.id())
            );
            Ok(())
        }
        Ok(None) => {
            println!(
                "Nothing to remove for {} {}.",
                category.label(),
                kind.short_label()
            );
            Ok(())
        }
        Err(err) => report_rejection(err),
    }
}

pub fn cmd_place(board: &mut Board, config: &AppConfig, unit: &str, at: &str) -> Result<()> {
    let id = resolve_unit_id(board, unit)?;
    let slot = parse_slot(at, config.utc_offset)?;
    match board.move_unit(id, Some(slot)) {
        Ok(unit) => {
            println!(
                "Placed {} at {}.",
                short_id(unit.id()),
                format_slot(slot, config.utc_offset)
            );
            Ok(())
        }
        Err(err) => report_rejection(err),
    }
}

pub fn cmd_unplace(board: &mut Board, unit: &str) -> Result<()> {
    let id = resolve_unit_id(board, unit)?;
    board.move_unit(id, None)?;
    println!("Moved {} back to the pile.", short_id(id));
    Ok(())
}

pub fn cmd_toggle(board: &mut Board, unit: &str) -> Result<()> {
    let id = resolve_unit_id(board, unit)?;
    let unit = board.toggle_completed(id)?;
    let state = if unit.is_completed() {
        "completed"
    } else {
        "not completed"
    };
    println!("Marked {} as {state}.", short_id(id));
    Ok(())
}

pub fn cmd_note(board: &mut Board, unit: &str, text: &str) -> Result<()> {
    let id = resolve_unit_id(board, unit)?;
    board.set_note(id, text)?;
    println!("Updated note on {}.", short_id(id));
    Ok(())
}

pub fn cmd_reset(board: &mut Board, confirmed: bool) -> Result<()> {
    if !confirmed {
        bail!("reset moves every scheduled unit back to the pile and cannot be undone; re-run with --yes");
    }
    let unplaced = board.reset_all();
    println!("Moved {unplaced} unit(s) back to the pile.");
    Ok(())
}

// -----------------------------------------------------------------------
// Export
// -----------------------------------------------------------------------

pub fn cmd_export(board: &Board, output: &Path) -> Result<()> {
    let calendar = render_calendar(board.units(), Utc::now());
    let events = count_events(&calendar);
    std::fs::write(output, &calendar)
        .with_context(|| format!("failed to write calendar to {}", output.display()))?;
    info!("event=export module=cli status=ok events={events}");
    println!("Exported {events} event(s) to {}.", output.display());
    Ok(())
}

fn report_rejection(err: BoardError) -> Result<()> {
    match err {
        BoardError::Blocked { .. } | BoardError::Collision { .. } => {
            warn!("event=board_rejected module=cli status=warning");
            eprintln!("warning: {err}");
            Ok(())
        }
        other => Err(other.into()),
    }
}

fn today(config: &AppConfig) -> NaiveDate {
    Utc::now().with_timezone(&config.utc_offset).date_naive()
}
