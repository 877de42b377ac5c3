use chrono::{TimeZone, Utc};
use prepgantt_core::{count_events, render_calendar, Board, Category, Slot, UnitKind};

fn slot_at(hour: u32) -> Slot {
    Slot::from_datetime(&Utc.with_ymd_and_hms(2026, 3, 16, hour, 0, 0).unwrap())
}

#[test]
fn exported_event_count_matches_placed_units() {
    let mut board = Board::with_defaults();
    let ids: Vec<_> = board.units().iter().step_by(5).map(|unit| unit.id()).collect();
    for (hour, id) in ids.iter().enumerate() {
        board.move_unit(*id, Some(slot_at(hour as u32))).unwrap();
    }
    let placed = board.units().iter().filter(|unit| unit.is_placed()).count();

    let calendar = render_calendar(board.units(), Utc::now());

    assert_eq!(placed, ids.len());
    assert_eq!(count_events(&calendar), placed);
}

#[test]
fn empty_schedule_still_renders_a_calendar() {
    let board = Board::with_defaults();

    let calendar = render_calendar(board.units(), Utc::now());

    assert!(calendar.starts_with("BEGIN:VCALENDAR\r\n"));
    assert!(calendar.ends_with("END:VCALENDAR\r\n"));
    assert_eq!(count_events(&calendar), 0);
}

#[test]
fn event_carries_summary_times_and_escaped_note() {
    let mut board = Board::new();
    let id = board.add(Category::ProductSense, UnitKind::RealMock).id();
    board.set_note(id, "line one\nline two").unwrap();
    board.move_unit(id, Some(slot_at(9))).unwrap();
    let stamp = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();

    let calendar = render_calendar(board.units(), stamp);

    assert!(calendar.contains("SUMMARY:productSense (Real Mock)\r\n"));
    assert!(calendar.contains("DTSTART:20260316T090000Z\r\n"));
    assert!(calendar.contains("DTEND:20260316T100000Z\r\n"));
    assert!(calendar.contains("DTSTAMP:20260301T000000Z\r\n"));
    assert!(calendar.contains("DESCRIPTION:line one\\nline two\r\n"));
    assert!(calendar.contains(&format!("UID:{id}@interviewprep.app\r\n")));
}

#[test]
fn units_without_notes_have_no_description() {
    let mut board = Board::new();
    let id = board.add(Category::Behave, UnitKind::AiMock).id();
    board.move_unit(id, Some(slot_at(10))).unwrap();

    let calendar = render_calendar(board.units(), Utc::now());

    assert!(!calendar.contains("DESCRIPTION:"));
}
