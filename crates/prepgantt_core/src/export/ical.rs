//! iCalendar rendering for placed units.
//!
//! # Responsibility
//! - Render every placed unit as a one-hour `VEVENT`.
//!
//! # Invariants
//! - Output is a pure function of the units and the supplied `DTSTAMP`.
//! - Lines end with CRLF.
//! - Unplaced units never produce an event.

use crate::model::unit::Unit;
use chrono::{DateTime, Utc};

/// Suggested file name for downloaded exports.
pub const DEFAULT_EXPORT_FILE_NAME: &str = "interview_prep_schedule.ics";

const PRODID: &str = "-//InterviewPrep//PrepPlanner//EN";
const UID_DOMAIN: &str = "interviewprep.app";
const LINE_END: &str = "\r\n";

/// Renders the placed units as an iCalendar document.
///
/// Events follow collection order. `dtstamp` is written into every event so
/// callers control the only time-dependent field.
pub fn render_calendar(units: &[Unit], dtstamp: DateTime<Utc>) -> String {
    let mut lines: Vec<String> = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        format!("PRODID:{PRODID}"),
        "CALSCALE:GREGORIAN".to_string(),
        "METHOD:PUBLISH".to_string(),
    ];
    let stamp = format_utc(dtstamp);

    for unit in units {
        let Some(slot) = unit.scheduled_start() else {
            continue;
        };
        lines.push("BEGIN:VEVENT".to_string());
        lines.push(format!("UID:{}@{UID_DOMAIN}", unit.id()));
        lines.push(format!("DTSTAMP:{stamp}"));
        lines.push(format!("DTSTART:{}", format_utc(slot.start_utc())));
        lines.push(format!("DTEND:{}", format_utc(slot.end_utc())));
        lines.push(format!("SUMMARY:{}", event_summary(unit)));
        if !unit.note().is_empty() {
            lines.push(format!("DESCRIPTION:{}", escape_text(unit.note())));
        }
        lines.push("END:VEVENT".to_string());
    }

    lines.push("END:VCALENDAR".to_string());

    let mut output = lines.join(LINE_END);
    output.push_str(LINE_END);
    output
}

/// Counts `VEVENT` blocks in rendered calendar text.
pub fn count_events(calendar: &str) -> usize {
    calendar
        .lines()
        .filter(|line| line.trim_end() == "BEGIN:VEVENT")
        .count()
}

/// Event title, e.g. `productSense (AI Mock)`.
pub fn event_summary(unit: &Unit) -> String {
    format!(
        "{} ({} Mock)",
        unit.category().label(),
        unit.kind().short_label()
    )
}

fn format_utc(value: DateTime<Utc>) -> String {
    value.format("%Y%m%dT%H%M%SZ").to_string()
}

fn escape_text(value: &str) -> String {
    value.replace("\r\n", "\n").replace(['\n', '\r'], "\\n")
}
