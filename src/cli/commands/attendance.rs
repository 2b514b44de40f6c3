use super::{clean, confirmed, merge_text};
use crate::cli::parser::AttendanceCmd;
use crate::context::AppContext;
use crate::core::checkin::quick_checkin;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::attendance;
use crate::errors::AppResult;
use crate::export::fs_utils::ensure_writable;
use crate::export::{csv, notify_export_success};
use crate::models::attendance::{
    Attendance, STATUS_ABSENT, STATUS_EXCUSED, STATUS_LATE, STATUS_PRESENT, normalize_status,
};
use crate::models::filter::PlacementFilter;
use crate::ui::messages::{info, success};
use crate::utils::colors::{GREEN, GREY, RED, RESET, YELLOW};
use crate::utils::date::{now_hhmm, parse_date, parse_time, today};
use crate::utils::path::expand_tilde;
use crate::utils::table::{Table, opt};
use chrono::NaiveDate;

fn date_or_today(s: &Option<String>) -> AppResult<NaiveDate> {
    match s {
        Some(d) => parse_date(d),
        None => Ok(today()),
    }
}

/// Validated `HH:MM`, or `None` when the flag is absent or blank.
fn time_arg(s: &Option<String>) -> AppResult<Option<String>> {
    match clean(s) {
        Some(t) => Ok(Some(parse_time(&t)?.format("%H:%M").to_string())),
        None => Ok(None),
    }
}

fn status_color(status: &str) -> &'static str {
    match status {
        STATUS_PRESENT => GREEN,
        STATUS_ABSENT => RED,
        STATUS_LATE | STATUS_EXCUSED => YELLOW,
        _ => "",
    }
}

pub fn handle(cmd: &AttendanceCmd, ctx: &AppContext, yes: bool) -> AppResult<()> {
    let mut pool = DbPool::open(ctx)?;

    match cmd {
        AttendanceCmd::Add {
            student,
            date,
            status,
            check_in,
            check_out,
            notes,
        } => {
            let mut rec = Attendance::new(*student, date_or_today(date)?, status);
            rec.check_in = time_arg(check_in)?;
            rec.check_out = time_arg(check_out)?;
            rec.notes = clean(notes);

            let id = attendance::insert(&pool.conn, &rec)?;
            ttlog(
                &pool.conn,
                "add",
                &format!("attendance #{id}"),
                &format!("student #{student} {} {}", rec.date_str(), rec.status),
            )?;
            success(format!("Attendance #{id} recorded ({}).", rec.status));
        }

        AttendanceCmd::List {
            date,
            all,
            student,
            center,
            classroom,
        } => {
            let day = if *all { None } else { Some(date_or_today(date)?) };
            let filter = PlacementFilter::new(*center, *classroom);
            let list = attendance::list(&pool.conn, day, *student, &filter)?;

            if list.is_empty() {
                info("No attendance records found.");
            } else {
                let mut table =
                    Table::new(["ID", "Date", "Student", "Status", "In", "Out", "Notes"]);
                for a in &list {
                    table.add_colored_row(
                        vec![
                            a.id.to_string(),
                            a.date_str(),
                            opt(&a.student_name),
                            a.status.clone(),
                            opt(&a.check_in),
                            opt(&a.check_out),
                            opt(&a.notes),
                        ],
                        status_color(&a.status),
                    );
                }
                print!("{}", table.render());
                println!("{GREY}{} record(s){RESET}", list.len());
            }
        }

        AttendanceCmd::Edit {
            id,
            date,
            status,
            check_in,
            check_out,
            notes,
        } => {
            let mut rec = attendance::get(&pool.conn, *id)?;
            if let Some(d) = date {
                rec.date = parse_date(d)?;
            }
            if let Some(s) = status {
                rec.status = normalize_status(s);
            }
            if check_in.is_some() {
                rec.check_in = time_arg(check_in)?;
            }
            if check_out.is_some() {
                rec.check_out = time_arg(check_out)?;
            }
            merge_text(&mut rec.notes, notes);

            attendance::update(&pool.conn, &rec)?;
            ttlog(&pool.conn, "edit", &format!("attendance #{id}"), &rec.status)?;
            success(format!("Attendance #{id} updated."));
        }

        AttendanceCmd::Delete { id } => {
            let rec = attendance::get(&pool.conn, *id)?;
            let prompt = format!(
                "Delete the {} record of {} on {}?",
                rec.status,
                opt(&rec.student_name),
                rec.date_str()
            );
            if !confirmed(yes, &prompt) {
                return Ok(());
            }
            attendance::delete(&pool.conn, *id)?;
            ttlog(&pool.conn, "del", &format!("attendance #{id}"), &rec.date_str())?;
            success(format!("Attendance #{id} deleted."));
        }

        AttendanceCmd::Checkin {
            date,
            center,
            classroom,
            time,
        } => {
            let day = date_or_today(date)?;
            let time = match time {
                Some(t) => parse_time(t)?.format("%H:%M").to_string(),
                None => now_hhmm(),
            };
            let filter = PlacementFilter::new(*center, *classroom);
            let n = quick_checkin(&mut pool.conn, day, &filter, &time)?;
            if n == 0 {
                info(format!("Every active student already has a record on {day}."));
            } else {
                success(format!("{n} student(s) marked present at {time} on {day}."));
            }
        }

        AttendanceCmd::Export {
            date,
            file,
            center,
            classroom,
            force,
        } => {
            let path = expand_tilde(file);
            ensure_writable(&path, *force || yes)?;

            let day = date_or_today(date)?;
            let filter = PlacementFilter::new(*center, *classroom);
            let list = attendance::list(&pool.conn, Some(day), None, &filter)?;
            let n = csv::write_attendance(&path, &list)?;
            ttlog(
                &pool.conn,
                "export",
                "attendance",
                &format!("{n} row(s) of {day} to {}", path.display()),
            )?;
            notify_export_success("Attendance", n, &path);
        }
    }

    pool.close()
}
