//! CLI handlers for `prepgantt plan` subcommands.
//!
//! Implements:
//! - `plan list`          -- saved plans of the signed-in user, newest first
//! - `plan save <name>`   -- snapshot the working board as a new plan
//! - `plan update`        -- overwrite the active plan with the working board
//! - `plan open <id>`     -- replace the working board with a saved plan
//! - `plan delete <id>`   -- delete a saved plan

use anyhow::{bail, Context, Result};

use prepgantt_core::{AccountService, BlobStore, Board, User};

use crate::config::AppConfig;
use crate::render::{render_plans, short_id};
use crate::resolve::resolve_plan_id;
use crate::PlanCommands;

/// Dispatch a `PlanCommands` variant to the appropriate handler.
pub fn run_plan_command<S: BlobStore>(
    command: PlanCommands,
    accounts: &AccountService<S>,
    board: &mut Board,
    config: &AppConfig,
) -> Result<()> {
    let user = accounts
        .require_user()
        .context("plans belong to a user; run `prepgantt login <email>` first")?;
    match command {
        PlanCommands::List => cmd_list(accounts, &user, config),
        PlanCommands::Save { name } => cmd_save(accounts, &user, board, &name),
        PlanCommands::Update => cmd_update(accounts, &user, board),
        PlanCommands::Open { plan_id } => cmd_open(accounts, &user, board, &plan_id),
        PlanCommands::Delete { plan_id } => cmd_delete(accounts, &user, &plan_id),
    }
}

fn cmd_list<S: BlobStore>(
    accounts: &AccountService<S>,
    user: &User,
    config: &AppConfig,
) -> Result<()> {
    let plans = accounts.list_plans(user.id)?;
    let active = accounts.active_plan_id()?;
    print!("{}", render_plans(&plans, active, config.utc_offset));
    Ok(())
}

fn cmd_save<S: BlobStore>(
    accounts: &AccountService<S>,
    user: &User,
    board: &Board,
    name: &str,
) -> Result<()> {
    let plan = accounts.create_plan(user, name, board.units().to_vec())?;
    accounts.set_active_plan(Some(plan.id))?;
    println!(
        "Saved plan {:?} ({}) with {} unit(s).",
        plan.name,
        short_id(plan.id),
        plan.units.len()
    );
    Ok(())
}

fn cmd_update<S: BlobStore>(
    accounts: &AccountService<S>,
    user: &User,
    board: &Board,
) -> Result<()> {
    let Some(active_id) = accounts.active_plan_id()? else {
        bail!("no active plan; use `plan save <name>` or `plan open <id>` first");
    };
    let mut plan = accounts
        .get_plan(active_id)?
        .filter(|plan| plan.owner_id == user.id)
        .with_context(|| format!("active plan {active_id} no longer exists for this user"))?;
    plan.units = board.units().to_vec();
    let plan = accounts.save_plan(plan)?;
    println!("Updated plan {:?} ({}).", plan.name, short_id(plan.id));
    Ok(())
}

fn cmd_open<S: BlobStore>(
    accounts: &AccountService<S>,
    user: &User,
    board: &mut Board,
    input: &str,
) -> Result<()> {
    let plans = accounts.list_plans(user.id)?;
    let id = resolve_plan_id(&plans, input)?;
    let Some(plan) = plans.into_iter().find(|plan| plan.id == id) else {
        bail!("no plan with id {id}");
    };
    board
        .replace_units(plan.units)
        .with_context(|| format!("plan {:?} holds an invalid snapshot", plan.name))?;
    accounts.set_active_plan(Some(plan.id))?;
    println!(
        "Opened plan {:?} ({}) with {} unit(s).",
        plan.name,
        short_id(plan.id),
        board.len()
    );
    Ok(())
}

fn cmd_delete<S: BlobStore>(accounts: &AccountService<S>, user: &User, input: &str) -> Result<()> {
    let plans = accounts.list_plans(user.id)?;
    let id = resolve_plan_id(&plans, input)?;
    accounts.delete_plan(id)?;
    println!("Deleted plan {}.", short_id(id));
    Ok(())
}
