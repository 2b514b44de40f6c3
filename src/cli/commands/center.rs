use super::{clean, confirmed, merge_text};
use crate::cli::parser::CenterCmd;
use crate::context::AppContext;
use crate::core::del::DeleteLogic;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::centers;
use crate::errors::AppResult;
use crate::models::center::Center;
use crate::ui::messages::{info, success};
use crate::utils::table::{Table, opt};

pub fn handle(cmd: &CenterCmd, ctx: &AppContext, yes: bool) -> AppResult<()> {
    let pool = DbPool::open(ctx)?;

    match cmd {
        CenterCmd::Add {
            name,
            address,
            phone,
            email,
            notes,
        } => {
            let center = Center {
                name: name.clone(),
                address: clean(address),
                phone: clean(phone),
                email: clean(email),
                notes: clean(notes),
                ..Default::default()
            };
            let id = centers::insert(&pool.conn, &center)?;
            ttlog(&pool.conn, "add", &format!("center #{id}"), name.trim())?;
            success(format!("Center #{id} '{}' added.", name.trim()));
        }

        CenterCmd::List => {
            let list = centers::list(&pool.conn)?;
            if list.is_empty() {
                info("No centers found.");
            } else {
                let mut table = Table::new(["ID", "Name", "Address", "Phone", "E-mail"]);
                for c in &list {
                    table.add_row(vec![
                        c.id.to_string(),
                        c.name.clone(),
                        opt(&c.address),
                        opt(&c.phone),
                        opt(&c.email),
                    ]);
                }
                print!("{}", table.render());
            }
        }

        CenterCmd::Edit {
            id,
            name,
            address,
            phone,
            email,
            notes,
        } => {
            let mut center = centers::get(&pool.conn, *id)?;
            if let Some(n) = name {
                center.name = n.clone();
            }
            merge_text(&mut center.address, address);
            merge_text(&mut center.phone, phone);
            merge_text(&mut center.email, email);
            merge_text(&mut center.notes, notes);

            centers::update(&pool.conn, &center)?;
            ttlog(&pool.conn, "edit", &format!("center #{id}"), &center.name)?;
            success(format!("Center #{id} updated."));
        }

        CenterCmd::Delete { id } => {
            let center = centers::get(&pool.conn, *id)?;
            if !confirmed(yes, &format!("Delete center '{}'?", center.name)) {
                return Ok(());
            }
            DeleteLogic::center(&pool.conn, *id)?;
            success(format!("Center '{}' deleted.", center.name));
        }
    }

    pool.close()
}
