//! `prepgantt` command-line entry point.
//!
//! # Responsibility
//! - Resolve configuration, start logging and open the data store.
//! - Load the working board, apply one command and persist any change.

mod account_cmds;
mod board_cmds;
mod config;
mod plan_cmds;
mod render;
mod resolve;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::debug;

use prepgantt_core::{
    init_logging, open_db, AccountService, BoardChange, Category, LoggingConfig, SessionService,
    SqliteBlobStore, UnitKind, DEFAULT_EXPORT_FILE_NAME,
};

use config::{AppConfig, ConfigFlags};

#[derive(Parser)]
#[command(
    name = "prepgantt",
    version,
    about = "Schedule interview-prep sessions on a weekly hour grid"
)]
struct Cli {
    /// Data directory (overrides PREPGANTT_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error (overrides PREPGANTT_LOG_LEVEL)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Wall-clock UTC offset such as +02:00 (overrides PREPGANTT_UTC_OFFSET)
    #[arg(long, global = true, allow_hyphen_values = true)]
    utc_offset: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show unscheduled units grouped by category
    Pile,
    /// Show one week of the calendar grid
    Week {
        /// Any date inside the week (YYYY-MM-DD); defaults to today
        #[arg(long)]
        date: Option<String>,
        /// Shift by this many weeks (negative goes back)
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        offset: i64,
    },
    /// Show required and performed counts per category
    Summary,
    /// List every unit with its slot
    List,
    /// Add one unit to the pile
    Add {
        /// Category tag, e.g. productSense
        category: Category,
        /// ai or real
        kind: UnitKind,
    },
    /// Remove one unit (unscheduled first, then the latest scheduled)
    Remove {
        /// Category tag, e.g. productSense
        category: Category,
        /// ai or real
        kind: UnitKind,
    },
    /// Schedule a unit at an hour
    Place {
        /// Unit id or unique id prefix
        unit: String,
        /// Local start time, YYYY-MM-DDTHH[:MM]
        at: String,
    },
    /// Move a unit back to the pile
    Unplace {
        /// Unit id or unique id prefix
        unit: String,
    },
    /// Flip a unit's completed flag
    Toggle {
        /// Unit id or unique id prefix
        unit: String,
    },
    /// Replace a unit's note
    Note {
        /// Unit id or unique id prefix
        unit: String,
        /// New note text (empty clears it)
        text: String,
    },
    /// Move every scheduled unit back to the pile
    Reset {
        /// Confirm the reset; it cannot be undone
        #[arg(long)]
        yes: bool,
    },
    /// Write scheduled units to an .ics calendar file
    Export {
        /// Output path
        #[arg(long, short, default_value = DEFAULT_EXPORT_FILE_NAME)]
        output: PathBuf,
    },
    /// Sign in with an email address
    Login {
        email: String,
    },
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Named plan management
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
}

#[derive(Subcommand)]
pub enum PlanCommands {
    /// List saved plans, newest first
    List,
    /// Save the working board as a new plan
    Save {
        name: String,
    },
    /// Overwrite the active plan with the working board
    Update,
    /// Replace the working board with a saved plan
    Open {
        /// Plan id or unique id prefix
        plan_id: String,
    },
    /// Delete a saved plan
    Delete {
        /// Plan id or unique id prefix
        plan_id: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::resolve(&ConfigFlags {
        data_dir: cli.data_dir,
        log_level: cli.log_level,
        utc_offset: cli.utc_offset,
    })?;
    std::fs::create_dir_all(&config.data_dir).with_context(|| {
        format!(
            "failed to create data directory {}",
            config.data_dir.display()
        )
    })?;
    init_logging(&LoggingConfig::new(&config.log_level, config.log_dir()))
        .context("failed to start logging")?;

    let conn = open_db(config.db_path())
        .with_context(|| format!("failed to open {}", config.db_path().display()))?;
    let session = SessionService::new(SqliteBlobStore::try_new(&conn)?);
    let accounts = AccountService::new(SqliteBlobStore::try_new(&conn)?);

    let mut board = session.load_or_init_board()?;
    board.subscribe(Box::new(|change: &BoardChange| {
        debug!("event=board_change module=cli status=ok change={change:?}");
    }));
    let loaded_revision = board.revision();

    match cli.command {
        Commands::Pile => board_cmds::cmd_pile(&board)?,
        Commands::Week { date, offset } => {
            board_cmds::cmd_week(&board, &config, date.as_deref(), offset)?
        }
        Commands::Summary => board_cmds::cmd_summary(&board)?,
        Commands::List => board_cmds::cmd_list(&board, &config)?,
        Commands::Add { category, kind } => board_cmds::cmd_add(&mut board, category, kind)?,
        Commands::Remove { category, kind } => {
            board_cmds::cmd_remove(&mut board, category, kind)?
        }
        Commands::Place { unit, at } => board_cmds::cmd_place(&mut board, &config, &unit, &at)?,
        Commands::Unplace { unit } => board_cmds::cmd_unplace(&mut board, &unit)?,
        Commands::Toggle { unit } => board_cmds::cmd_toggle(&mut board, &unit)?,
        Commands::Note { unit, text } => board_cmds::cmd_note(&mut board, &unit, &text)?,
        Commands::Reset { yes } => board_cmds::cmd_reset(&mut board, yes)?,
        Commands::Export { output } => board_cmds::cmd_export(&board, &output)?,
        Commands::Login { email } => account_cmds::cmd_login(&accounts, &email)?,
        Commands::Logout => account_cmds::cmd_logout(&accounts)?,
        Commands::Whoami => account_cmds::cmd_whoami(&accounts)?,
        Commands::Plan { command } => {
            plan_cmds::run_plan_command(command, &accounts, &mut board, &config)?
        }
    }

    if board.revision() != loaded_revision {
        session.save_board(&board)?;
    }

    Ok(())
}
