use colored::Colorize;
use comfy_table::{Cell, Table};
use rust_decimal::Decimal;

use crate::db::get_connection;
use crate::error::Result;
use crate::fmt::{absolute_euro, euro, percentage_of};
use crate::models::Month;
use crate::reports;
use crate::settings::{get_data_dir, load_settings};
use crate::store;

pub fn run(month: &str, user: &Option<String>) -> Result<()> {
    let settings = load_settings();
    let month: Month = month.parse()?;
    let conn = get_connection(&get_data_dir().join("kasboek.db"))?;
    let user_name = user.clone().unwrap_or(settings.user_name);
    let user_id = store::get_or_create_user(&conn, &user_name)?;

    let overview =
        reports::overview_for_month(&conn, month, user_id, &settings.income_category)?;
    let spent = reports::total_spent_for_month(
        &conn,
        month,
        user_id,
        &settings.income_category,
        &settings.savings_category,
    )?;
    let budget = reports::total_budget_for_month(&conn, month, user_id, &settings.income_category)?;
    let saved = reports::total_saved_for_month(&conn, month, user_id, &settings.savings_category)?;

    let month_outflow: Decimal = overview.iter().map(|summary| summary.sum_outflow).sum();

    let mut table = Table::new();
    table.set_header(vec![
        "Category",
        "Out",
        "In",
        "Balance",
        "Avg out/month",
        "Avg balance/month",
        "Share",
    ]);
    for summary in &overview {
        table.add_row(vec![
            Cell::new(&summary.name),
            Cell::new(absolute_euro(summary.sum_outflow)),
            Cell::new(absolute_euro(summary.sum_inflow)),
            Cell::new(euro(summary.balance_of_month())),
            Cell::new(euro(summary.average_monthly_outflow())),
            Cell::new(euro(summary.average_monthly_balance())),
            Cell::new(format!(
                "{:.0}%",
                percentage_of(summary.sum_outflow, month_outflow)
            )),
        ]);
    }

    println!("Expenses {month}\n{table}");
    println!("{} {}", "Total spent:".bold(), euro(spent));
    println!(
        "{} {}",
        format!("Income ({}):", settings.income_category).green().bold(),
        euro(budget)
    );
    println!(
        "{} {}",
        format!("Saved ({}):", settings.savings_category).blue().bold(),
        euro(saved)
    );
    println!("\n← {}  |  {} →", month.previous(), month.next());
    Ok(())
}
