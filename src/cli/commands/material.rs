use super::{clean, confirmed, merge_text};
use crate::cli::parser::MaterialCmd;
use crate::context::AppContext;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::materials;
use crate::errors::AppResult;
use crate::models::material::Material;
use crate::ui::messages::{info, success, warning};
use crate::utils::colors::color_for_stock;
use crate::utils::table::{Table, opt};

pub fn handle(cmd: &MaterialCmd, ctx: &AppContext, yes: bool) -> AppResult<()> {
    let pool = DbPool::open(ctx)?;

    match cmd {
        MaterialCmd::Add {
            name,
            category,
            quantity,
            minimum,
            unit,
            notes,
        } => {
            let m = Material {
                name: name.clone(),
                category: clean(category),
                quantity: *quantity,
                minimum: *minimum,
                unit: clean(unit),
                notes: clean(notes),
                ..Default::default()
            };
            let id = materials::insert(&pool.conn, &m)?;
            ttlog(&pool.conn, "add", &format!("material #{id}"), name.trim())?;
            success(format!("Material #{id} '{}' added.", name.trim()));
            if m.is_low_stock() {
                warning(format!("Low stock: buy {} {}.", m.to_buy(), m.unit_label()));
            }
        }

        MaterialCmd::List { low } => {
            let list = materials::list(&pool.conn, *low)?;
            if list.is_empty() {
                info(if *low {
                    "No materials are low on stock."
                } else {
                    "No materials found."
                });
            } else {
                let mut table =
                    Table::new(["ID", "Name", "Category", "Qty", "Min", "Unit", "Buy"]);
                for m in &list {
                    table.add_colored_row(
                        vec![
                            m.id.to_string(),
                            m.name.clone(),
                            opt(&m.category),
                            m.quantity.to_string(),
                            m.minimum.to_string(),
                            m.unit_label().to_string(),
                            if m.is_low_stock() {
                                m.to_buy().to_string()
                            } else {
                                String::new()
                            },
                        ],
                        color_for_stock(m.quantity, m.minimum),
                    );
                }
                print!("{}", table.render());
            }
        }

        MaterialCmd::Edit {
            id,
            name,
            category,
            quantity,
            minimum,
            unit,
            notes,
        } => {
            let mut m = materials::get(&pool.conn, *id)?;
            if let Some(n) = name {
                m.name = n.clone();
            }
            if let Some(q) = quantity {
                m.quantity = *q;
            }
            if let Some(q) = minimum {
                m.minimum = *q;
            }
            merge_text(&mut m.category, category);
            merge_text(&mut m.unit, unit);
            merge_text(&mut m.notes, notes);

            materials::update(&pool.conn, &m)?;
            ttlog(&pool.conn, "edit", &format!("material #{id}"), &m.name)?;
            success(format!("Material #{id} updated."));
        }

        MaterialCmd::Adjust { id, delta } => {
            let quantity = materials::adjust_quantity(&pool.conn, *id, *delta)?;
            ttlog(
                &pool.conn,
                "adjust",
                &format!("material #{id}"),
                &format!("{delta:+} -> {quantity}"),
            )?;
            let m = materials::get(&pool.conn, *id)?;
            success(format!("'{}' now has {quantity} {}.", m.name, m.unit_label()));
            if m.is_low_stock() {
                warning(format!("Low stock: buy {} {}.", m.to_buy(), m.unit_label()));
            }
        }

        MaterialCmd::Delete { id } => {
            let m = materials::get(&pool.conn, *id)?;
            if !confirmed(yes, &format!("Delete material '{}'?", m.name)) {
                return Ok(());
            }
            materials::delete(&pool.conn, *id)?;
            ttlog(&pool.conn, "del", &format!("material #{id}"), &m.name)?;
            success(format!("Material '{}' deleted.", m.name));
        }
    }

    pool.close()
}
