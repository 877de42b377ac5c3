//! Calendar file export.

pub mod ical;
