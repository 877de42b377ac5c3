//! Argument resolution for unit ids, plan ids, slots and dates.
//!
//! - [`resolve_unit_id`] accepts a full UUID or a unique prefix of one.
//! - [`parse_slot`] reads `YYYY-MM-DDTHH[:MM]` in the configured offset and
//!   floors it to the top of that local hour.

use anyhow::{bail, Context, Result};
use chrono::{FixedOffset, NaiveDate, NaiveDateTime};
use uuid::Uuid;

use prepgantt_core::{Board, Plan, PlanId, Slot, UnitId};

const SLOT_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H"];

/// Resolves a unit id or unique id prefix against the board.
pub fn resolve_unit_id(board: &Board, input: &str) -> Result<UnitId> {
    let ids: Vec<Uuid> = board.units().iter().map(|unit| unit.id()).collect();
    resolve_prefix(&ids, input, "unit")
}

/// Resolves a plan id or unique id prefix among `plans`.
pub fn resolve_plan_id(plans: &[Plan], input: &str) -> Result<PlanId> {
    let ids: Vec<Uuid> = plans.iter().map(|plan| plan.id).collect();
    resolve_prefix(&ids, input, "plan")
}

fn resolve_prefix(ids: &[Uuid], input: &str, what: &str) -> Result<Uuid> {
    let needle = input.trim().to_ascii_lowercase();
    if needle.is_empty() {
        bail!("{what} id must not be empty");
    }
    if let Ok(id) = Uuid::parse_str(&needle) {
        if ids.contains(&id) {
            return Ok(id);
        }
        bail!("no {what} with id {id}");
    }

    let matches: Vec<&Uuid> = ids
        .iter()
        .filter(|id| id.to_string().starts_with(&needle))
        .collect();
    match matches.as_slice() {
        [only] => Ok(**only),
        [] => bail!("no {what} id starts with {needle:?}"),
        many => bail!(
            "{what} id prefix {needle:?} is ambiguous ({} matches); type more characters",
            many.len()
        ),
    }
}

/// Parses a wall-clock hour in `offset` into a slot, flooring minutes.
pub fn parse_slot(input: &str, offset: FixedOffset) -> Result<Slot> {
    let value = input.trim();
    let naive = SLOT_FORMATS
        .iter()
        .find_map(|format| parse_naive(value, format))
        .with_context(|| format!("invalid slot {value:?}: expected YYYY-MM-DDTHH[:MM]"))?;
    Slot::from_local(naive, offset)
        .with_context(|| format!("slot {value:?} is not representable at offset {offset}"))
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid date {input:?}: expected YYYY-MM-DD"))
}

fn parse_naive(value: &str, format: &str) -> Option<NaiveDateTime> {
    if format.ends_with("%H") {
        // `%H` alone leaves minutes unset, which chrono rejects.
        return NaiveDateTime::parse_from_str(&format!("{value}:00"), "%Y-%m-%dT%H:%M").ok();
    }
    NaiveDateTime::parse_from_str(value, format).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use prepgantt_core::{Category, UnitKind};

    fn board_with(n: usize) -> Board {
        let mut board = Board::new();
        for _ in 0..n {
            board.add(Category::Behave, UnitKind::AiMock);
        }
        board
    }

    #[test]
    fn resolve_full_uuid() {
        let board = board_with(2);
        let id = board.units()[1].id();
        assert_eq!(resolve_unit_id(&board, &id.to_string()).unwrap(), id);
    }

    #[test]
    fn resolve_unique_prefix_case_insensitively() {
        let board = board_with(1);
        let id = board.units()[0].id();
        let prefix = id.to_string()[..8].to_ascii_uppercase();
        assert_eq!(resolve_unit_id(&board, &prefix).unwrap(), id);
    }

    #[test]
    fn resolve_rejects_unknown_and_empty() {
        let board = board_with(1);
        assert!(resolve_unit_id(&board, "").is_err());
        assert!(resolve_unit_id(&board, &Uuid::new_v4().to_string()).is_err());
    }

    #[test]
    fn resolve_rejects_ambiguous_prefix() {
        let ids = vec![
            Uuid::parse_str("aaaa0000-0000-4000-8000-000000000001").unwrap(),
            Uuid::parse_str("aaaa0000-0000-4000-8000-000000000002").unwrap(),
        ];
        let err = resolve_prefix(&ids, "aaaa", "unit").unwrap_err();
        assert!(err.to_string().contains("ambiguous"));
        assert_eq!(
            resolve_prefix(&ids, "aaaa0000-0000-4000-8000-000000000002", "unit").unwrap(),
            ids[1]
        );
    }

    #[test]
    fn parse_slot_reads_local_time_and_floors() {
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let slot = parse_slot("2026-03-16T11:45", plus_two).unwrap();
        let expected = Utc.with_ymd_and_hms(2026, 3, 16, 9, 0, 0).unwrap();
        assert_eq!(slot.start_utc(), expected);

        let hour_only = parse_slot("2026-03-16T11", plus_two).unwrap();
        assert_eq!(hour_only, slot);
    }

    #[test]
    fn parse_slot_floors_in_half_hour_offsets() {
        let india = FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap();
        let slot = parse_slot("2026-03-16T09", india).unwrap();
        let expected = Utc.with_ymd_and_hms(2026, 3, 16, 3, 30, 0).unwrap();
        assert_eq!(slot.start_utc(), expected);
        assert_eq!(parse_slot("2026-03-16T09:59", india).unwrap(), slot);
    }

    #[test]
    fn parse_slot_rejects_bad_input() {
        let utc = FixedOffset::east_opt(0).unwrap();
        for raw in ["", "2026-03-16", "2026-03-16T25", "tomorrow", "2026-13-01T10:00"] {
            assert!(parse_slot(raw, utc).is_err(), "{raw:?} should be rejected");
        }
    }

    #[test]
    fn parse_date_reads_iso_dates() {
        assert_eq!(
            parse_date("2026-03-18").unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 18).unwrap()
        );
        assert!(parse_date("18/03/2026").is_err());
    }
}
