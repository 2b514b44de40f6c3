use super::confirmed;
use crate::cli::parser::MessageCmd;
use crate::context::AppContext;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::messages;
use crate::errors::AppResult;
use crate::models::message::Message;
use crate::ui::messages::{info, success};
use crate::utils::colors::{CYAN, GREY, RESET};
use chrono::Local;

pub fn handle(cmd: &MessageCmd, ctx: &AppContext, yes: bool) -> AppResult<()> {
    let pool = DbPool::open(ctx)?;

    match cmd {
        MessageCmd::Send {
            student,
            subject,
            body,
        } => {
            let m = Message {
                id: 0,
                student_id: *student,
                subject: subject.trim().to_string(),
                body: body.clone(),
                sent_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
                read: false,
                student_name: None,
            };
            let id = messages::insert(&pool.conn, &m)?;
            ttlog(&pool.conn, "add", &format!("message #{id}"), &m.subject)?;
            success(format!("Message #{id} saved for student #{student}."));
        }

        MessageCmd::List { student, unread } => {
            let list = messages::list(&pool.conn, *student, *unread)?;
            if list.is_empty() {
                info("No messages found.");
            }
            for m in &list {
                let marker = if m.read { " " } else { "●" };
                println!(
                    "{CYAN}{marker} #{:<4}{RESET} {}  {GREY}{} · {}{RESET}",
                    m.id,
                    m.subject,
                    m.student_name.as_deref().unwrap_or(""),
                    m.sent_at
                );
                for line in m.body.lines() {
                    println!("        {line}");
                }
            }
        }

        MessageCmd::Read { id, unread } => {
            messages::mark_read(&pool.conn, *id, !unread)?;
            let state = if *unread { "unread" } else { "read" };
            success(format!("Message #{id} marked as {state}."));
        }

        MessageCmd::Delete { id } => {
            let m = messages::get(&pool.conn, *id)?;
            if !confirmed(yes, &format!("Delete message '{}'?", m.subject)) {
                return Ok(());
            }
            messages::delete(&pool.conn, *id)?;
            ttlog(&pool.conn, "del", &format!("message #{id}"), &m.subject)?;
            success(format!("Message #{id} deleted."));
        }
    }

    pool.close()
}
