//! Runtime configuration for the CLI.
//!
//! Resolution chain for every setting: CLI flag > env var > default.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{FixedOffset, Local, Offset};

use prepgantt_core::default_log_level;

pub const DATA_DIR_ENV: &str = "PREPGANTT_DATA_DIR";
pub const LOG_LEVEL_ENV: &str = "PREPGANTT_LOG_LEVEL";
pub const UTC_OFFSET_ENV: &str = "PREPGANTT_UTC_OFFSET";

const DB_FILE_NAME: &str = "prepgantt.sqlite3";
const LOG_DIR_NAME: &str = "logs";

/// Raw global flags as parsed by clap.
#[derive(Debug, Default, Clone)]
pub struct ConfigFlags {
    pub data_dir: Option<PathBuf>,
    pub log_level: Option<String>,
    pub utc_offset: Option<String>,
}

/// Fully resolved configuration, ready for use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub log_level: String,
    pub utc_offset: FixedOffset,
}

impl AppConfig {
    /// Resolves against the process environment.
    pub fn resolve(flags: &ConfigFlags) -> Result<Self> {
        Self::resolve_with(flags, |name| std::env::var(name).ok())
    }

    /// Resolves with an injected environment lookup.
    pub fn resolve_with(flags: &ConfigFlags, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let data_dir = match flags.data_dir.clone() {
            Some(dir) => dir,
            None => match non_blank(env(DATA_DIR_ENV)) {
                Some(dir) => PathBuf::from(dir),
                None => default_data_dir()?,
            },
        };

        let log_level = flags
            .log_level
            .clone()
            .or_else(|| non_blank(env(LOG_LEVEL_ENV)))
            .unwrap_or_else(|| default_log_level().to_string());

        let utc_offset = match flags
            .utc_offset
            .clone()
            .or_else(|| non_blank(env(UTC_OFFSET_ENV)))
        {
            Some(raw) => parse_utc_offset(&raw)?,
            None => Local::now().offset().fix(),
        };

        Ok(Self {
            data_dir: absolutize(&data_dir)?,
            log_level,
            utc_offset,
        })
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join(LOG_DIR_NAME)
    }
}

/// Parses `Z`, `UTC`, `+HH`, `+HH:MM` or `+HHMM` (sign required for hours).
pub fn parse_utc_offset(raw: &str) -> Result<FixedOffset> {
    let value = raw.trim();
    if value.eq_ignore_ascii_case("z") || value.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0).context("zero offset is always valid");
    }

    let (sign, rest) = match value.split_at_checked(1) {
        Some(("+", rest)) => (1, rest),
        Some(("-", rest)) => (-1, rest),
        _ => bail!("invalid UTC offset {value:?}: expected a leading + or -"),
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) || !matches!(digits.len(), 2 | 4) {
        bail!("invalid UTC offset {value:?}: expected +HH or +HH:MM");
    }

    let hours: i32 = digits[..2].parse()?;
    let minutes: i32 = if digits.len() == 4 { digits[2..].parse()? } else { 0 };
    if hours > 14 || minutes > 59 {
        bail!("invalid UTC offset {value:?}: out of range");
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .with_context(|| format!("invalid UTC offset {value:?}"))
}

fn default_data_dir() -> Result<PathBuf> {
    let base = dirs::data_dir()
        .context("cannot determine a data directory; pass --data-dir or set PREPGANTT_DATA_DIR")?;
    Ok(base.join("prepgantt"))
}

fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("failed to get current directory")?;
    Ok(cwd.join(path))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
