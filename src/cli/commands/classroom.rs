use super::{clean, confirmed, merge_id, merge_text};
use crate::cli::parser::ClassroomCmd;
use crate::context::AppContext;
use crate::core::del::DeleteLogic;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::classrooms;
use crate::errors::AppResult;
use crate::models::classroom::Classroom;
use crate::ui::messages::{info, success};
use crate::utils::table::{Table, opt};

pub fn handle(cmd: &ClassroomCmd, ctx: &AppContext, yes: bool) -> AppResult<()> {
    let pool = DbPool::open(ctx)?;

    match cmd {
        ClassroomCmd::Add {
            name,
            center,
            capacity,
            notes,
        } => {
            let room = Classroom {
                name: name.clone(),
                center_id: *center,
                capacity: *capacity,
                notes: clean(notes),
                ..Default::default()
            };
            let id = classrooms::insert(&pool.conn, &room)?;
            ttlog(&pool.conn, "add", &format!("classroom #{id}"), name.trim())?;
            success(format!("Classroom #{id} '{}' added.", name.trim()));
        }

        ClassroomCmd::List { center } => {
            let list = classrooms::list(&pool.conn, *center)?;
            if list.is_empty() {
                info("No classrooms found.");
            } else {
                let mut table = Table::new(["ID", "Name", "Center", "Capacity", "Notes"]);
                for r in &list {
                    table.add_row(vec![
                        r.id.to_string(),
                        r.name.clone(),
                        opt(&r.center_name),
                        r.capacity.map(|c| c.to_string()).unwrap_or_default(),
                        opt(&r.notes),
                    ]);
                }
                print!("{}", table.render());
            }
        }

        ClassroomCmd::Edit {
            id,
            name,
            center,
            capacity,
            notes,
        } => {
            let mut room = classrooms::get(&pool.conn, *id)?;
            if let Some(n) = name {
                room.name = n.clone();
            }
            merge_id(&mut room.center_id, *center);
            if capacity.is_some() {
                room.capacity = *capacity;
            }
            merge_text(&mut room.notes, notes);

            classrooms::update(&pool.conn, &room)?;
            ttlog(&pool.conn, "edit", &format!("classroom #{id}"), &room.name)?;
            success(format!("Classroom #{id} updated."));
        }

        ClassroomCmd::Delete { id } => {
            let room = classrooms::get(&pool.conn, *id)?;
            if !confirmed(yes, &format!("Delete classroom '{}'?", room.name)) {
                return Ok(());
            }
            DeleteLogic::classroom(&pool.conn, *id)?;
            success(format!("Classroom '{}' deleted.", room.name));
        }
    }

    pool.close()
}
