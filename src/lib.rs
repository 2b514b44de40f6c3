//! schooldesk library root.
//! Exposes the CLI parser, the high-level run() function and the internal
//! modules (also used directly by the integration tests).

pub mod cli;
pub mod config;
pub mod context;
pub mod core;
pub mod crypto;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod sync;
pub mod ui;
pub mod utils;

use clap::Parser;
use crate::cli::commands;
use crate::cli::parser::{Cli, Commands, CryptCmd, SyncCmd};
use crate::config::{Config, DB_FILE_NAME};
use crate::context::AppContext;
use crate::core::backup::BackupLogic;
use crate::db::migrate::run_pending_migrations;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{read_password, success, warning};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the diagnostic log filter.
pub const LOG_ENV: &str = "SCHOOLDESK_LOG";

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Commands that never touch the database file.
fn needs_database(cmd: &Commands) -> bool {
    !matches!(
        cmd,
        Commands::Config { .. }
            | Commands::Crypt(CryptCmd::Status)
            | Commands::Sync(SyncCmd::Config { .. } | SyncCmd::Status)
    )
}

/// Run `attempt` with a password. One passed on the command line gets a
/// single try; otherwise the user is prompted up to `unlock_attempts` times.
fn with_password(
    cfg: &Config,
    given: Option<&str>,
    mut attempt: impl FnMut(&str) -> AppResult<()>,
) -> AppResult<()> {
    if let Some(pw) = given {
        return attempt(pw);
    }

    let attempts = cfg.unlock_attempts.max(1);
    for n in 1..=attempts {
        let pw = read_password("Database password")?;
        match attempt(&pw) {
            Ok(()) => return Ok(()),
            Err(AppError::WrongPassword) => {
                warning(format!("Wrong password ({n}/{attempts})."));
            }
            Err(e) => return Err(e),
        }
    }
    Err(AppError::UnlockFailed(attempts))
}

/// Make the password available when encryption is enabled.
fn unlock(ctx: &AppContext, cfg: &Config, given: Option<&str>) -> AppResult<()> {
    if !ctx.encryption_enabled() || ctx.has_password() {
        return Ok(());
    }
    with_password(cfg, given, |pw| crypto::unlock(ctx, pw))
}

/// Put the sentinel back for a database that is still encrypted, once the
/// password opens it.
fn restore_sentinel(ctx: &AppContext, cfg: &Config, given: Option<&str>) -> AppResult<()> {
    warn!(path = %ctx.db_path().display(), "encrypted database without sentinel");
    with_password(cfg, given, |pw| crypto::enable(ctx, pw))?;
    success("Encryption sentinel restored.");
    Ok(())
}

/// Startup sequence of every database command: unlock, rotated backup of
/// the file as it sits at rest, then pending migrations.
fn bootstrap(ctx: &AppContext, cfg: &Config, password: Option<&str>) -> AppResult<()> {
    ctx.ensure_layout()?;
    unlock(ctx, cfg, password)?;

    match BackupLogic::startup_backup(ctx) {
        Ok(Some(path)) => debug!(backup = %path.display(), "startup backup"),
        Ok(None) => {}
        Err(e) => warn!(error = %e, "startup backup failed"),
    }

    let pool = DbPool::open(ctx)?;
    run_pending_migrations(&pool.conn)?;
    pool.close()
}

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config, ctx: &Arc<AppContext>) -> AppResult<()> {
    let yes = cli.yes;
    match &cli.command {
        Commands::Init => commands::init::handle(cfg, ctx),
        Commands::Config { print_config } => commands::config::handle(*print_config, cfg, ctx),
        Commands::Db {
            migrate,
            check,
            vacuum,
            info,
        } => commands::db::handle(
            &commands::db::DbFlags {
                migrate: *migrate,
                check: *check,
                vacuum: *vacuum,
                info: *info,
            },
            ctx,
        ),
        Commands::Log { print, limit } => commands::log::handle(*print, *limit, ctx),
        Commands::Center(cmd) => commands::center::handle(cmd, ctx, yes),
        Commands::Classroom(cmd) => commands::classroom::handle(cmd, ctx, yes),
        Commands::Student(cmd) => commands::student::handle(cmd, ctx, yes),
        Commands::Attendance(cmd) => commands::attendance::handle(cmd, ctx, yes),
        Commands::Material(cmd) => commands::material::handle(cmd, ctx, yes),
        Commands::Menu(cmd) => commands::menu::handle(cmd, ctx, yes),
        Commands::Permission(cmd) => commands::permission::handle(cmd, ctx, yes),
        Commands::Message(cmd) => commands::message::handle(cmd, ctx, yes),
        Commands::Note(cmd) => commands::note::handle(cmd, ctx),
        Commands::Document(cmd) => commands::document::handle(cmd, ctx, yes),
        Commands::Report(cmd) => commands::report::handle(cmd, ctx),
        Commands::Backup(cmd) => commands::backup::handle(cmd, ctx, yes),
        Commands::Crypt(cmd) => commands::crypt::handle(cmd, ctx, cli.password.as_deref(), yes),
        Commands::Sync(cmd) => commands::sync::handle(cmd, ctx),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    init_tracing();

    let cli = Cli::parse();

    let mut cfg = Config::load()?;
    if let Some(dir) = &cli.data_dir {
        cfg.data_dir = dir.clone();
        if Path::new(&cfg.database).is_absolute() {
            cfg.database = DB_FILE_NAME.to_string();
        }
    }

    let ctx = Arc::new(AppContext::from_config(&cfg));

    match &cli.command {
        Commands::Crypt(CryptCmd::Enable | CryptCmd::Disable) if crypto::sentinel_missing(&ctx) => {
            restore_sentinel(&ctx, &cfg, cli.password.as_deref())?;
            bootstrap(&ctx, &cfg, None)?;
        }
        cmd if needs_database(cmd) && crypto::sentinel_missing(&ctx) => {
            return Err(AppError::SentinelMissing);
        }
        Commands::Init => {
            ctx.ensure_layout()?;
            unlock(&ctx, &cfg, cli.password.as_deref())?;
        }
        // Enabling encryption takes a new password rather than asking for one.
        Commands::Crypt(CryptCmd::Enable) if !ctx.encryption_enabled() => {
            bootstrap(&ctx, &cfg, None)?;
        }
        cmd if needs_database(cmd) => bootstrap(&ctx, &cfg, cli.password.as_deref())?,
        _ => {}
    }

    dispatch(&cli, &cfg, &ctx)
}
