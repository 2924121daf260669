use std::collections::HashMap;

use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::error::Result;
use crate::models::{Month, MonthlyExpenseSummary, Transaction};
use crate::store;

// ---------------------------------------------------------------------------
// Aggregation passes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
struct FlowAggregate {
    sum_outflow: Decimal,
    sum_inflow: Decimal,
    min_date: Option<NaiveDate>,
    max_date: Option<NaiveDate>,
}

impl FlowAggregate {
    fn add(&mut self, transaction: &Transaction) {
        if let Some(amount) = transaction.outflow {
            self.sum_outflow += amount;
        }
        if let Some(amount) = transaction.inflow {
            self.sum_inflow += amount;
        }
        self.min_date = Some(match self.min_date {
            Some(date) => date.min(transaction.date),
            None => transaction.date,
        });
        self.max_date = Some(match self.max_date {
            Some(date) => date.max(transaction.date),
            None => transaction.date,
        });
    }
}

fn aggregate_by_category<'a>(
    transactions: impl Iterator<Item = &'a Transaction>,
) -> HashMap<i64, FlowAggregate> {
    let mut aggregates: HashMap<i64, FlowAggregate> = HashMap::new();
    for transaction in transactions {
        let Some(category_id) = transaction.category_id else {
            continue;
        };
        aggregates.entry(category_id).or_default().add(transaction);
    }
    aggregates
}

// ---------------------------------------------------------------------------
// Monthly overview
// ---------------------------------------------------------------------------

/// One summary per category for the given month, ordered by category id and
/// excluding the income category. Categories without transactions are
/// included with zero sums and absent dates.
///
/// The aggregates are computed in two plain passes over the user's
/// transactions — one scoped to the target month, one across all time — so
/// the logic does not depend on any query engine's conditional aggregates.
pub fn overview_for_month(
    conn: &Connection,
    month: Month,
    user_id: i64,
    income_category: &str,
) -> Result<Vec<MonthlyExpenseSummary>> {
    let transactions = store::for_user(conn, user_id)?;
    let monthly = aggregate_by_category(
        transactions
            .iter()
            .filter(|transaction| month.contains(transaction.date)),
    );
    let all_time = aggregate_by_category(transactions.iter());

    let mut summaries = Vec::new();
    for category in store::all_categories(conn)? {
        if category.name == income_category {
            continue;
        }
        let month_flows = monthly.get(&category.id).cloned().unwrap_or_default();
        let total_flows = all_time.get(&category.id).cloned().unwrap_or_default();
        summaries.push(MonthlyExpenseSummary {
            category_id: category.id,
            name: category.name,
            description: category.description,
            month,
            sum_outflow: month_flows.sum_outflow,
            sum_inflow: month_flows.sum_inflow,
            total_outflow: total_flows.sum_outflow,
            total_inflow: total_flows.sum_inflow,
            min_transaction_date: total_flows.min_date,
            max_transaction_date: total_flows.max_date,
        });
    }
    Ok(summaries)
}

// ---------------------------------------------------------------------------
// Month totals
// ---------------------------------------------------------------------------

/// Net spent figure for a month: inflow minus outflow over the user's
/// categorized transactions, with the income and savings categories left out.
/// Uncategorized transactions do not count. Can be negative.
pub fn total_spent_for_month(
    conn: &Connection,
    month: Month,
    user_id: i64,
    income_category: &str,
    savings_category: &str,
) -> Result<Decimal> {
    let category_names: HashMap<i64, String> = store::all_categories(conn)?
        .into_iter()
        .map(|category| (category.id, category.name))
        .collect();

    let mut total = Decimal::ZERO;
    for transaction in store::for_user(conn, user_id)? {
        if !month.contains(transaction.date) {
            continue;
        }
        let Some(category_id) = transaction.category_id else {
            continue;
        };
        let Some(name) = category_names.get(&category_id) else {
            continue;
        };
        if name == income_category || name == savings_category {
            continue;
        }
        if let Some(amount) = transaction.inflow {
            total += amount;
        }
        if let Some(amount) = transaction.outflow {
            total -= amount;
        }
    }
    Ok(total)
}

/// Income received in a month: inflow sum for the income category.
pub fn total_budget_for_month(
    conn: &Connection,
    month: Month,
    user_id: i64,
    income_category: &str,
) -> Result<Decimal> {
    let category_id = store::category_id_by_name(conn, income_category)?;
    let total = store::for_user(conn, user_id)?
        .iter()
        .filter(|transaction| {
            transaction.category_id == Some(category_id) && month.contains(transaction.date)
        })
        .filter_map(|transaction| transaction.inflow)
        .fold(Decimal::ZERO, |sum, amount| sum + amount);
    Ok(total)
}

/// Amount put aside in a month: outflow sum for the savings category.
pub fn total_saved_for_month(
    conn: &Connection,
    month: Month,
    user_id: i64,
    savings_category: &str,
) -> Result<Decimal> {
    let category_id = store::category_id_by_name(conn, savings_category)?;
    let total = store::for_user(conn, user_id)?
        .iter()
        .filter(|transaction| {
            transaction.category_id == Some(category_id) && month.contains(transaction.date)
        })
        .filter_map(|transaction| transaction.outflow)
        .fold(Decimal::ZERO, |sum, amount| sum + amount);
    Ok(total)
}
