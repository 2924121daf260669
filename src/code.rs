use md5::{Digest, Md5};

use crate::models::Transaction;

/// Derive the deduplication code for a transaction from its defining fields.
///
/// The code is a 128-bit digest over a canonical concatenation of date, account
/// number, payee, memo and both flows, rendered as 32 lowercase hex characters.
/// Identical rows always produce the same code; the store enforces uniqueness
/// on it, which is the sole deduplication mechanism.
pub fn unique_code(transaction: &Transaction) -> String {
    let inflow = transaction
        .inflow
        .map(|amount| amount.to_string())
        .unwrap_or_default();
    let outflow = transaction
        .outflow
        .map(|amount| amount.to_string())
        .unwrap_or_default();

    let canonical = format!(
        "{}|{}|{}|{}|{}|{}",
        transaction.date.format("%Y-%m-%d"),
        transaction.to_account_number,
        transaction.payee,
        transaction.memo,
        inflow,
        outflow,
    );

    let mut hasher = Md5::new();
    hasher.update(canonical.as_bytes());
    hex::encode(hasher.finalize())
}
