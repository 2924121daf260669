use regex::Regex;
use rusqlite::Connection;
use tracing::debug;

use crate::error::Result;
use crate::models::Transaction;
use crate::store::{self, SaveEvent};

/// Outcome of running the categorization worker for one save event.
#[derive(Debug, Default)]
pub struct CategorizeOutcome {
    /// Category assigned to the saved transaction itself, when inferred.
    pub assigned_category: Option<i64>,
    /// Number of other transactions that received the saved transaction's category.
    pub backfilled: usize,
}

/// Tally for a bulk re-categorization run over a user's uncategorized transactions.
#[derive(Debug, Default)]
pub struct RecategorizeResult {
    pub categorized: usize,
    pub still_uncategorized: usize,
}

// Merchant descriptors carry trailing reference noise: card-terminal clock
// times ("14:14"), card sequence numbers ("pasnr. 008"), branch numbers.
// A token made of digits and :.,- punctuation is such noise; tokens mixing
// letters and digits (IBANs, product names) are kept.
fn is_reference_token(token: &str) -> bool {
    Regex::new(r"^\d[\d:.,\-]*$")
        .map(|re| re.is_match(token))
        .unwrap_or(false)
}

/// Normalize a payee or memo for similarity comparison: lowercase, drop
/// reference tokens, collapse whitespace.
pub fn normalize_descriptor(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .filter(|token| !is_reference_token(token))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Two transactions are similar when both their normalized payee and memo
/// match exactly. No edit-distance matching: a missed match is acceptable, a
/// wrong match is not.
pub fn similar(a: &Transaction, b: &Transaction) -> bool {
    normalize_descriptor(&a.payee) == normalize_descriptor(&b.payee)
        && normalize_descriptor(&a.memo) == normalize_descriptor(&b.memo)
}

/// Categorization worker, run synchronously after every committed transaction
/// write. Uncategorized transactions get a category inferred from the user's
/// history; categorized ones propagate their category to similar
/// uncategorized transactions. Engine writes are backfills and never cascade.
pub fn handle_save(conn: &Connection, event: &SaveEvent) -> Result<CategorizeOutcome> {
    debug!(
        transaction = event.transaction_id,
        previous = ?event.previous_category,
        current = ?event.category,
        "handling save event"
    );
    let saved = store::get_transaction(conn, event.transaction_id)?;
    let Some(user_id) = saved.user_id else {
        return Ok(CategorizeOutcome::default());
    };

    match event.category {
        None => infer_category(conn, &saved, user_id),
        Some(category_id) => propagate_category(conn, &saved, user_id, category_id),
    }
}

fn infer_category(
    conn: &Connection,
    saved: &Transaction,
    user_id: i64,
) -> Result<CategorizeOutcome> {
    // Candidates come back most recent first; the first similar one wins.
    for candidate in store::categorized_for_user(conn, user_id)? {
        if candidate.id == saved.id {
            continue;
        }
        let Some(category_id) = candidate.category_id else {
            continue;
        };
        if similar(saved, &candidate) {
            let Some(saved_id) = saved.id else {
                break;
            };
            store::backfill_category(conn, saved_id, category_id)?;
            debug!(transaction = saved_id, category = category_id, "inferred category");
            return Ok(CategorizeOutcome {
                assigned_category: Some(category_id),
                backfilled: 0,
            });
        }
    }
    Ok(CategorizeOutcome::default())
}

fn propagate_category(
    conn: &Connection,
    saved: &Transaction,
    user_id: i64,
    category_id: i64,
) -> Result<CategorizeOutcome> {
    let mut backfilled = 0;
    for other in store::uncategorized_for_user(conn, user_id)? {
        if other.id == saved.id {
            continue;
        }
        if similar(saved, &other) {
            let Some(other_id) = other.id else {
                continue;
            };
            store::backfill_category(conn, other_id, category_id)?;
            backfilled += 1;
        }
    }
    if backfilled > 0 {
        debug!(category = category_id, backfilled, "propagated category");
    }
    Ok(CategorizeOutcome {
        assigned_category: Some(category_id),
        backfilled,
    })
}

/// Re-run inference over all of a user's uncategorized transactions.
pub fn categorize_uncategorized(conn: &Connection, user_id: i64) -> Result<RecategorizeResult> {
    let mut result = RecategorizeResult::default();
    for transaction in store::uncategorized_for_user(conn, user_id)? {
        let outcome = infer_category(conn, &transaction, user_id)?;
        if outcome.assigned_category.is_some() {
            result.categorized += 1;
        } else {
            result.still_uncategorized += 1;
        }
    }
    Ok(result)
}
