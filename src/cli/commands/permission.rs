use super::{clean, confirmed};
use crate::cli::parser::PermissionCmd;
use crate::context::AppContext;
use crate::core::permission_pdf;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::permissions;
use crate::errors::{AppError, AppResult};
use crate::models::filter::PlacementFilter;
use crate::models::permission::{Permission, PermissionResponse};
use crate::ui::messages::{info, success};
use crate::utils::colors::{GREEN, RED, YELLOW};
use crate::utils::date::parse_opt_date;
use crate::utils::table::{Table, opt};

fn parse_response(s: &str) -> AppResult<PermissionResponse> {
    PermissionResponse::from_input(s).ok_or_else(|| {
        AppError::Validation(format!("invalid response '{s}' (use yes, no or pending)"))
    })
}

fn response_color(r: PermissionResponse) -> &'static str {
    match r {
        PermissionResponse::Yes => GREEN,
        PermissionResponse::No => RED,
        PermissionResponse::Pending => YELLOW,
    }
}

pub fn handle(cmd: &PermissionCmd, ctx: &AppContext, yes: bool) -> AppResult<()> {
    let pool = DbPool::open(ctx)?;

    match cmd {
        PermissionCmd::Add {
            student,
            kind,
            date,
            response,
            notes,
        } => {
            let p = Permission {
                id: 0,
                student_id: *student,
                kind: kind.trim().to_string(),
                response: response
                    .as_deref()
                    .map(parse_response)
                    .transpose()?
                    .unwrap_or(PermissionResponse::Pending),
                date: parse_opt_date(date.as_deref())?,
                notes: clean(notes),
                student_name: None,
            };
            let id = permissions::insert(&pool.conn, &p)?;
            ttlog(
                &pool.conn,
                "add",
                &format!("permission #{id}"),
                &format!("{} for student #{student}", p.kind),
            )?;
            success(format!("Permission #{id} '{}' recorded.", p.kind));
        }

        PermissionCmd::List { student, response } => {
            let response = response.as_deref().map(parse_response).transpose()?;
            let list = permissions::list(&pool.conn, *student, response)?;
            if list.is_empty() {
                info("No permissions found.");
            } else {
                let mut table = Table::new(["ID", "Student", "Type", "Response", "Date", "Notes"]);
                for p in &list {
                    table.add_colored_row(
                        vec![
                            p.id.to_string(),
                            opt(&p.student_name),
                            p.kind.clone(),
                            p.response.to_db_str().to_string(),
                            p.date.map(|d| d.to_string()).unwrap_or_default(),
                            opt(&p.notes),
                        ],
                        response_color(p.response),
                    );
                }
                print!("{}", table.render());
            }
        }

        PermissionCmd::Respond { id, response } => {
            let r = parse_response(response)?;
            permissions::set_response(&pool.conn, *id, r)?;
            ttlog(&pool.conn, "edit", &format!("permission #{id}"), r.to_db_str())?;
            success(format!("Permission #{id} set to '{}'.", r.to_db_str()));
        }

        PermissionCmd::Delete { id } => {
            let p = permissions::get(&pool.conn, *id)?;
            let prompt = format!("Delete permission '{}' of {}?", p.kind, opt(&p.student_name));
            if !confirmed(yes, &prompt) {
                return Ok(());
            }
            permissions::delete(&pool.conn, *id)?;
            ttlog(&pool.conn, "del", &format!("permission #{id}"), &p.kind)?;
            success(format!("Permission #{id} deleted."));
        }

        PermissionCmd::Template {
            kind,
            center,
            classroom,
        } => {
            let filter = PlacementFilter::new(*center, *classroom);
            let (path, rows) =
                permission_pdf::generate_template(&pool.conn, &ctx.pdfs_dir(), kind, &filter)?;
            ttlog(
                &pool.conn,
                "export",
                "permission template",
                &format!("{} ({rows} student(s))", path.display()),
            )?;
            success(format!(
                "Template with {rows} student(s) written to {}",
                path.display()
            ));
        }
    }

    pool.close()
}
