use super::{clean, confirmed, merge_id, merge_text};
use crate::cli::parser::StudentCmd;
use crate::context::AppContext;
use crate::core::del::DeleteLogic;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::{classrooms, students};
use crate::errors::AppResult;
use crate::export::fs_utils::ensure_writable;
use crate::export::{csv, notify_export_success};
use crate::models::filter::PlacementFilter;
use crate::models::student::Student;
use crate::ui::messages::{info, success};
use crate::utils::colors::{GREY, RESET};
use crate::utils::date::parse_opt_date;
use crate::utils::path::expand_tilde;
use crate::utils::table::{Table, opt};

pub fn handle(cmd: &StudentCmd, ctx: &AppContext, yes: bool) -> AppResult<()> {
    let mut pool = DbPool::open(ctx)?;

    match cmd {
        StudentCmd::Add {
            name,
            surname,
            birth_date,
            address,
            phone,
            family_email,
            notes,
            center,
            classroom,
            inactive,
        } => {
            let mut s = Student::new(name, surname);
            s.birth_date = parse_opt_date(birth_date.as_deref())?;
            s.address = clean(address);
            s.phone = clean(phone);
            s.family_email = clean(family_email);
            s.notes = clean(notes);
            s.classroom_id = *classroom;
            s.center_id = match (center, classroom) {
                (None, Some(room)) => classrooms::center_of(&pool.conn, *room)?,
                _ => *center,
            };
            s.active = !inactive;

            let id = students::insert(&pool.conn, &s)?;
            ttlog(&pool.conn, "add", &format!("student #{id}"), &s.full_name())?;
            success(format!("Student #{id} '{}' added.", s.full_name()));
        }

        StudentCmd::List {
            center,
            classroom,
            all,
            search,
        } => {
            let filter = PlacementFilter::new(*center, *classroom);
            let list = students::list(&pool.conn, &filter, !all, search.as_deref())?;
            if list.is_empty() {
                info("No students found.");
            } else {
                let mut table =
                    Table::new(["ID", "Surname", "Name", "Birth date", "Phone", "Active"]);
                for s in &list {
                    table.add_row(vec![
                        s.id.to_string(),
                        s.surname.clone(),
                        s.name.clone(),
                        s.birth_date.map(|d| d.to_string()).unwrap_or_default(),
                        opt(&s.phone),
                        if s.active { "yes" } else { "no" }.to_string(),
                    ]);
                }
                print!("{}", table.render());
                println!("{GREY}{} student(s){RESET}", list.len());
            }
        }

        StudentCmd::Show { id } => {
            let s = students::get(&pool.conn, *id)?;
            let field = |label: &str, value: String| println!("{label:<14} {value}");
            field("ID", s.id.to_string());
            field("Name", s.name.clone());
            field("Surname", s.surname.clone());
            field(
                "Birth date",
                s.birth_date.map(|d| d.to_string()).unwrap_or_default(),
            );
            field("Address", opt(&s.address));
            field("Phone", opt(&s.phone));
            field("Family email", opt(&s.family_email));
            field(
                "Center",
                s.center_id.map(|v| v.to_string()).unwrap_or_default(),
            );
            field(
                "Classroom",
                s.classroom_id.map(|v| v.to_string()).unwrap_or_default(),
            );
            field("Active", if s.active { "yes" } else { "no" }.into());
            field("Notes", opt(&s.notes));
        }

        StudentCmd::Edit {
            id,
            name,
            surname,
            birth_date,
            address,
            phone,
            family_email,
            notes,
            center,
            classroom,
            active,
        } => {
            let mut s = students::get(&pool.conn, *id)?;
            if let Some(n) = name {
                s.name = n.trim().to_string();
            }
            if let Some(n) = surname {
                s.surname = n.trim().to_string();
            }
            if birth_date.is_some() {
                s.birth_date = parse_opt_date(clean(birth_date).as_deref())?;
            }
            merge_text(&mut s.address, address);
            merge_text(&mut s.phone, phone);
            merge_text(&mut s.family_email, family_email);
            merge_text(&mut s.notes, notes);
            merge_id(&mut s.center_id, *center);
            merge_id(&mut s.classroom_id, *classroom);
            if let Some(a) = active {
                s.active = *a;
            }

            students::update(&pool.conn, &s)?;
            ttlog(&pool.conn, "edit", &format!("student #{id}"), &s.full_name())?;
            success(format!("Student #{id} updated."));
        }

        StudentCmd::Delete { id } => {
            let s = students::get(&pool.conn, *id)?;
            let prompt = format!(
                "Delete '{}' together with attendance, permissions and messages?",
                s.full_name()
            );
            if !confirmed(yes, &prompt) {
                return Ok(());
            }
            DeleteLogic::student(&mut pool.conn, *id)?;
            success(format!("Student '{}' deleted.", s.full_name()));
        }

        StudentCmd::Export {
            file,
            center,
            classroom,
            all,
            force,
        } => {
            let path = expand_tilde(file);
            ensure_writable(&path, *force || yes)?;

            let filter = PlacementFilter::new(*center, *classroom);
            let list = students::list(&pool.conn, &filter, !all, None)?;
            let n = csv::write_students(&path, &list)?;
            ttlog(
                &pool.conn,
                "export",
                "students",
                &format!("{n} row(s) to {}", path.display()),
            )?;
            notify_export_success("Students", n, &path);
        }
    }

    pool.close()
}
