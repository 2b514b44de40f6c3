use super::{clean, confirmed, merge_text};
use crate::cli::parser::MenuCmd;
use crate::context::AppContext;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::menu;
use crate::errors::{AppError, AppResult};
use crate::models::menu::{MenuItem, normalize_meal_type};
use crate::ui::messages::{info, success};
use crate::utils::colors::{CYAN, RESET};
use crate::utils::date::{parse_date, today};
use crate::utils::table::{Table, opt};
use chrono::Duration;

pub fn handle(cmd: &MenuCmd, ctx: &AppContext, yes: bool) -> AppResult<()> {
    let pool = DbPool::open(ctx)?;

    match cmd {
        MenuCmd::Add {
            date,
            meal,
            dish,
            description,
            allergens,
        } => {
            let item = MenuItem {
                id: 0,
                date: parse_date(date)?,
                meal_type: normalize_meal_type(meal),
                dish: dish.trim().to_string(),
                description: clean(description),
                allergens: clean(allergens),
            };
            let id = menu::insert(&pool.conn, &item)?;
            ttlog(
                &pool.conn,
                "add",
                &format!("menu #{id}"),
                &format!("{} {} {}", item.date, item.meal_type, item.dish),
            )?;
            success(format!("{} on {} added (#{id}).", item.meal_type, item.date));
        }

        MenuCmd::List { from, to } => {
            let from = match from {
                Some(d) => parse_date(d)?,
                None => today(),
            };
            let to = match to {
                Some(d) => parse_date(d)?,
                None => from + Duration::days(6),
            };
            if to < from {
                return Err(AppError::Validation(format!(
                    "range end {to} is before its start {from}"
                )));
            }

            let items = menu::list_range(&pool.conn, from, to)?;
            if items.is_empty() {
                info(format!("No menu between {from} and {to}."));
            }

            let mut current = None;
            let mut table: Option<Table> = None;
            for item in &items {
                if current != Some(item.date) {
                    if let Some(t) = table.take() {
                        println!("{}", t.render());
                    }
                    println!("{CYAN}{}{RESET}", item.date.format("%A %Y-%m-%d"));
                    current = Some(item.date);
                    table = Some(Table::new(["ID", "Meal", "Dish", "Description", "Allergens"]));
                }
                if let Some(t) = table.as_mut() {
                    t.add_row(vec![
                        item.id.to_string(),
                        item.meal_type.clone(),
                        item.dish.clone(),
                        opt(&item.description),
                        opt(&item.allergens),
                    ]);
                }
            }
            if let Some(t) = table {
                print!("{}", t.render());
            }
        }

        MenuCmd::Edit {
            id,
            date,
            meal,
            dish,
            description,
            allergens,
        } => {
            let mut item = menu::get(&pool.conn, *id)?;
            if let Some(d) = date {
                item.date = parse_date(d)?;
            }
            if let Some(m) = meal {
                item.meal_type = normalize_meal_type(m);
            }
            if let Some(d) = dish {
                item.dish = d.trim().to_string();
            }
            merge_text(&mut item.description, description);
            merge_text(&mut item.allergens, allergens);

            menu::update(&pool.conn, &item)?;
            ttlog(&pool.conn, "edit", &format!("menu #{id}"), &item.dish)?;
            success(format!("Menu item #{id} updated."));
        }

        MenuCmd::Delete { id } => {
            let item = menu::get(&pool.conn, *id)?;
            let prompt = format!("Delete {} '{}' on {}?", item.meal_type, item.dish, item.date);
            if !confirmed(yes, &prompt) {
                return Ok(());
            }
            menu::delete(&pool.conn, *id)?;
            ttlog(&pool.conn, "del", &format!("menu #{id}"), &item.dish)?;
            success(format!("Menu item #{id} deleted."));
        }
    }

    pool.close()
}
