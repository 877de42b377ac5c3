//! Core domain logic for the interview-prep scheduling board.
//! This crate is the single source of truth for placement invariants.

pub mod board;
pub mod catalog;
pub mod db;
pub mod export;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use board::store::{Board, BoardChange, BoardError, BoardObserver};
pub use board::views::{
    pile_groups, summarize, KindCount, PileGroup, Summary, SummaryRow, WeekGrid, WeekWindow,
    DAYS_PER_WEEK, HOURS_PER_DAY,
};
pub use catalog::{CatalogRow, Category, CategoryParseError, CATALOG};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use export::ical::{count_events, render_calendar, DEFAULT_EXPORT_FILE_NAME};
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig, LoggingError};
pub use model::slot::{Slot, SlotError, HOUR_MS, MINUTE_MS};
pub use model::unit::{Placement, Unit, UnitId, UnitKind, UnitKindParseError};
pub use repo::blob_repo::{keys, BlobStore, RepoError, RepoResult, SqliteBlobStore};
pub use service::account_service::{
    normalize_identifier, AccountError, AccountService, Plan, PlanId, User, UserId,
};
pub use service::session_service::{SessionError, SessionService};
pub use service::snapshot::CorruptSnapshot;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
