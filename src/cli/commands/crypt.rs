use super::confirmed;
use crate::cli::parser::CryptCmd;
use crate::context::AppContext;
use crate::crypto::{self, cipher};
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, read_password, success, warning};

fn record(ctx: &AppContext, message: &str) {
    let result = DbPool::open(ctx).and_then(|pool| {
        ttlog(&pool.conn, "crypt", "database", message)?;
        pool.close()
    });
    if let Err(e) = result {
        warning(format!("Failed to write internal log: {e}"));
    }
}

/// Password given on the command line, or asked twice on the terminal.
fn new_password(given: Option<&str>) -> AppResult<String> {
    if let Some(p) = given {
        return Ok(p.to_string());
    }
    let first = read_password("New database password")?;
    let second = read_password("Repeat the password")?;
    if first != second {
        return Err(AppError::Validation("passwords do not match".into()));
    }
    Ok(first)
}

pub fn handle(
    cmd: &CryptCmd,
    ctx: &AppContext,
    password: Option<&str>,
    yes: bool,
) -> AppResult<()> {
    match cmd {
        CryptCmd::Enable => {
            if ctx.encryption_enabled() {
                info("Encryption is already enabled.");
                return Ok(());
            }
            let pw = new_password(password)?;
            crypto::enable(ctx, &pw)?;
            record(ctx, "encryption enabled");
            success("Database encrypted. The password is required from now on.");
            warning("There is no way to recover the data without the password.");
        }

        CryptCmd::Disable => {
            if !ctx.encryption_enabled() {
                info("Encryption is not enabled.");
                return Ok(());
            }
            if !confirmed(yes, "Decrypt the database file back to plaintext?") {
                return Ok(());
            }
            crypto::decrypt_and_disable(ctx)?;
            record(ctx, "encryption disabled, database decrypted");
            success("Encryption disabled and database decrypted.");
        }

        CryptCmd::Status => {
            let enabled = ctx.encryption_enabled();
            let at_rest = cipher::is_encrypted(ctx.db_path());
            info(format!(
                "Encryption: {}",
                if enabled { "enabled" } else { "disabled" }
            ));
            info(format!(
                "Database file: {}",
                if at_rest { "encrypted" } else { "plaintext" }
            ));
            if enabled && !at_rest && ctx.db_path().exists() {
                warning("The database is plaintext and will be sealed at the end of the next session.");
            }
        }
    }
    Ok(())
}
