use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::error::{KasboekError, Result};
use crate::models::{Category, Transaction};

/// Emitted by the store after a transaction write has been committed.
///
/// Carries the before/after category state so a categorization worker can
/// decide whether to infer a category or propagate one, without the store
/// knowing anything about the heuristic.
#[derive(Debug, Clone, Copy)]
pub struct SaveEvent {
    pub transaction_id: i64,
    pub previous_category: Option<i64>,
    pub category: Option<i64>,
}

const TRANSACTION_COLUMNS: &str =
    "id, code, date, to_account_number, payee, memo, inflow, outflow, user_id, category_id";

pub fn get_or_create_user(conn: &Connection, name: &str) -> Result<i64> {
    conn.execute("INSERT OR IGNORE INTO users (name) VALUES (?1)", [name])?;
    let id = conn.query_row("SELECT id FROM users WHERE name = ?1", [name], |row| {
        row.get(0)
    })?;
    Ok(id)
}

/// Insert a new transaction. A uniqueness violation on the dedup code maps to
/// `KasboekError::Duplicate`; the constraint itself lives in SQLite so that
/// concurrent imports of overlapping data cannot both succeed.
pub fn insert_transaction(conn: &Connection, transaction: &Transaction) -> Result<SaveEvent> {
    let user_id = transaction.user_id.ok_or_else(|| {
        KasboekError::Validation("transaction has no owning user".to_string())
    })?;

    let insert = conn.execute(
        "INSERT INTO transactions (code, date, to_account_number, payee, memo, inflow, outflow, user_id, category_id) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        rusqlite::params![
            transaction.code,
            transaction.date.format("%Y-%m-%d").to_string(),
            transaction.to_account_number,
            transaction.payee,
            transaction.memo,
            transaction.inflow.map(|amount| amount.to_string()),
            transaction.outflow.map(|amount| amount.to_string()),
            user_id,
            transaction.category_id,
        ],
    );

    match insert {
        Ok(_) => Ok(SaveEvent {
            transaction_id: conn.last_insert_rowid(),
            previous_category: None,
            category: transaction.category_id,
        }),
        Err(rusqlite::Error::SqliteFailure(e, Some(msg)))
            if e.code == rusqlite::ErrorCode::ConstraintViolation
                && msg.contains("transactions.code") =>
        {
            Err(KasboekError::Duplicate(transaction.code.clone()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Change a transaction's category (manual assignment path). Returns the save
/// event so the caller can run the categorization worker on it.
pub fn assign_category(
    conn: &Connection,
    transaction_id: i64,
    category_id: Option<i64>,
) -> Result<SaveEvent> {
    let previous = get_transaction(conn, transaction_id)?.category_id;
    conn.execute(
        "UPDATE transactions SET category_id = ?1 WHERE id = ?2",
        rusqlite::params![category_id, transaction_id],
    )?;
    Ok(SaveEvent {
        transaction_id,
        previous_category: previous,
        category: category_id,
    })
}

/// Category write used by the categorization worker itself. Emits no event,
/// so engine writes never cascade.
pub fn backfill_category(conn: &Connection, transaction_id: i64, category_id: i64) -> Result<()> {
    conn.execute(
        "UPDATE transactions SET category_id = ?1 WHERE id = ?2",
        rusqlite::params![category_id, transaction_id],
    )?;
    Ok(())
}

pub fn get_transaction(conn: &Connection, transaction_id: i64) -> Result<Transaction> {
    let sql = format!("SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = ?1");
    let transaction = conn.query_row(&sql, [transaction_id], row_to_transaction)?;
    Ok(transaction)
}

pub fn find_by_code(conn: &Connection, user_id: i64, code: &str) -> Result<Option<Transaction>> {
    let sql =
        format!("SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE user_id = ?1 AND code = ?2");
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query_map(rusqlite::params![user_id, code], row_to_transaction)?;
    match rows.next() {
        Some(row) => Ok(Some(row?)),
        None => Ok(None),
    }
}

/// All transactions owned by a user, oldest first.
pub fn for_user(conn: &Connection, user_id: i64) -> Result<Vec<Transaction>> {
    let sql = format!(
        "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE user_id = ?1 ORDER BY date, id"
    );
    collect_transactions(conn, &sql, user_id)
}

/// A user's categorized transactions, most recent first — the candidate pool
/// for category inference.
pub fn categorized_for_user(conn: &Connection, user_id: i64) -> Result<Vec<Transaction>> {
    let sql = format!(
        "SELECT {TRANSACTION_COLUMNS} FROM transactions \
         WHERE user_id = ?1 AND category_id IS NOT NULL ORDER BY date DESC, id DESC"
    );
    collect_transactions(conn, &sql, user_id)
}

pub fn uncategorized_for_user(conn: &Connection, user_id: i64) -> Result<Vec<Transaction>> {
    let sql = format!(
        "SELECT {TRANSACTION_COLUMNS} FROM transactions \
         WHERE user_id = ?1 AND category_id IS NULL ORDER BY date, id"
    );
    collect_transactions(conn, &sql, user_id)
}

pub fn all_categories(conn: &Connection) -> Result<Vec<Category>> {
    let mut stmt = conn.prepare("SELECT id, name, description FROM categories ORDER BY id")?;
    let categories = stmt
        .query_map([], |row| {
            Ok(Category {
                id: row.get(0)?,
                name: row.get(1)?,
                description: row.get(2)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(categories)
}

pub fn create_category(
    conn: &Connection,
    name: &str,
    description: Option<&str>,
) -> Result<i64> {
    let insert = conn.execute(
        "INSERT INTO categories (name, description) VALUES (?1, ?2)",
        rusqlite::params![name, description],
    );
    match insert {
        Ok(_) => Ok(conn.last_insert_rowid()),
        Err(rusqlite::Error::SqliteFailure(e, Some(msg)))
            if e.code == rusqlite::ErrorCode::ConstraintViolation
                && msg.contains("categories.name") =>
        {
            Err(KasboekError::Validation(format!(
                "category '{name}' already exists"
            )))
        }
        Err(e) => Err(e.into()),
    }
}

pub fn category_id_by_name(conn: &Connection, name: &str) -> Result<i64> {
    let mut stmt = conn.prepare("SELECT id FROM categories WHERE name = ?1")?;
    let mut rows = stmt.query_map([name], |row| row.get(0))?;
    match rows.next() {
        Some(id) => Ok(id?),
        None => Err(KasboekError::UnknownCategory(name.to_string())),
    }
}

fn collect_transactions(conn: &Connection, sql: &str, user_id: i64) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(sql)?;
    let transactions = stmt
        .query_map([user_id], row_to_transaction)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(transactions)
}

fn row_to_transaction(row: &rusqlite::Row<'_>) -> rusqlite::Result<Transaction> {
    Ok(Transaction {
        id: Some(row.get(0)?),
        code: row.get(1)?,
        date: parse_date(row, 2)?,
        to_account_number: row.get(3)?,
        payee: row.get(4)?,
        memo: row.get(5)?,
        inflow: parse_decimal(row, 6)?,
        outflow: parse_decimal(row, 7)?,
        user_id: Some(row.get(8)?),
        category_id: row.get(9)?,
    })
}

fn parse_date(row: &rusqlite::Row<'_>, index: usize) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(index)?;
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(index, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn parse_decimal(row: &rusqlite::Row<'_>, index: usize) -> rusqlite::Result<Option<Decimal>> {
    let raw: Option<String> = row.get(index)?;
    raw.map(|s| {
        s.parse::<Decimal>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                index,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{get_connection, init_db};
    use std::str::FromStr;

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn test_transaction(code: &str, user_id: i64) -> Transaction {
        Transaction {
            id: None,
            code: code.to_string(),
            date: NaiveDate::from_ymd_opt(2020, 4, 20).unwrap(),
            to_account_number: "NL11RABO0101010444".to_string(),
            payee: "timo".to_string(),
            memo: "small memo".to_string(),
            inflow: Some(dec("10.5")),
            outflow: None,
            user_id: Some(user_id),
            category_id: None,
        }
    }

    #[test]
    fn test_insert_and_read_back() {
        let (_dir, conn) = test_db();
        let user_id = get_or_create_user(&conn, "timo").unwrap();
        let event = insert_transaction(&conn, &test_transaction("code-1", user_id)).unwrap();

        let stored = get_transaction(&conn, event.transaction_id).unwrap();
        assert_eq!(stored.code, "code-1");
        assert_eq!(stored.inflow, Some(dec("10.5")));
        assert_eq!(stored.outflow, None);
        assert_eq!(stored.date, NaiveDate::from_ymd_opt(2020, 4, 20).unwrap());
        assert_eq!(stored.user_id, Some(user_id));
        assert_eq!(event.previous_category, None);
        assert_eq!(event.category, None);
    }

    #[test]
    fn test_duplicate_code_is_rejected() {
        let (_dir, conn) = test_db();
        let user_id = get_or_create_user(&conn, "timo").unwrap();
        insert_transaction(&conn, &test_transaction("code-1", user_id)).unwrap();

        let err = insert_transaction(&conn, &test_transaction("code-1", user_id)).unwrap_err();
        assert!(matches!(err, KasboekError::Duplicate(_)));
    }

    #[test]
    fn test_retrieves_only_own_transactions() {
        let (_dir, conn) = test_db();
        let timo = get_or_create_user(&conn, "timo").unwrap();
        let other = get_or_create_user(&conn, "test 2").unwrap();
        insert_transaction(&conn, &test_transaction("code-1", timo)).unwrap();

        assert_eq!(for_user(&conn, timo).unwrap().len(), 1);
        assert_eq!(for_user(&conn, other).unwrap().len(), 0);
    }

    #[test]
    fn test_get_or_create_user_is_stable() {
        let (_dir, conn) = test_db();
        let first = get_or_create_user(&conn, "timo").unwrap();
        let second = get_or_create_user(&conn, "timo").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_assign_category_reports_previous_state() {
        let (_dir, conn) = test_db();
        let user_id = get_or_create_user(&conn, "timo").unwrap();
        let saved = insert_transaction(&conn, &test_transaction("code-1", user_id)).unwrap();
        let category_id = category_id_by_name(&conn, "Vrije tijd").unwrap();

        let event = assign_category(&conn, saved.transaction_id, Some(category_id)).unwrap();
        assert_eq!(event.previous_category, None);
        assert_eq!(event.category, Some(category_id));

        let event = assign_category(&conn, saved.transaction_id, None).unwrap();
        assert_eq!(event.previous_category, Some(category_id));
        assert_eq!(event.category, None);
    }

    #[test]
    fn test_backfill_updates_without_touching_others() {
        let (_dir, conn) = test_db();
        let user_id = get_or_create_user(&conn, "timo").unwrap();
        let first = insert_transaction(&conn, &test_transaction("code-1", user_id)).unwrap();
        let second = insert_transaction(&conn, &test_transaction("code-2", user_id)).unwrap();
        let category_id = category_id_by_name(&conn, "Boodschappen").unwrap();

        backfill_category(&conn, first.transaction_id, category_id).unwrap();

        assert_eq!(
            get_transaction(&conn, first.transaction_id).unwrap().category_id,
            Some(category_id)
        );
        assert_eq!(
            get_transaction(&conn, second.transaction_id).unwrap().category_id,
            None
        );
    }

    #[test]
    fn test_categorized_and_uncategorized_partitions() {
        let (_dir, conn) = test_db();
        let user_id = get_or_create_user(&conn, "timo").unwrap();
        let first = insert_transaction(&conn, &test_transaction("code-1", user_id)).unwrap();
        insert_transaction(&conn, &test_transaction("code-2", user_id)).unwrap();
        let category_id = category_id_by_name(&conn, "Boodschappen").unwrap();
        backfill_category(&conn, first.transaction_id, category_id).unwrap();

        assert_eq!(categorized_for_user(&conn, user_id).unwrap().len(), 1);
        assert_eq!(uncategorized_for_user(&conn, user_id).unwrap().len(), 1);
    }

    #[test]
    fn test_create_category_rejects_existing_name() {
        let (_dir, conn) = test_db();
        let id = create_category(&conn, "Studie", Some("Cursussen en boeken")).unwrap();
        assert_eq!(category_id_by_name(&conn, "Studie").unwrap(), id);

        let err = create_category(&conn, "Studie", None).unwrap_err();
        assert!(matches!(err, KasboekError::Validation(_)));
    }

    #[test]
    fn test_unknown_category_lookup_fails() {
        let (_dir, conn) = test_db();
        let err = category_id_by_name(&conn, "Nope").unwrap_err();
        assert!(matches!(err, KasboekError::UnknownCategory(_)));
    }

    #[test]
    fn test_find_by_code_is_user_scoped() {
        let (_dir, conn) = test_db();
        let timo = get_or_create_user(&conn, "timo").unwrap();
        let other = get_or_create_user(&conn, "test 2").unwrap();
        insert_transaction(&conn, &test_transaction("code-1", timo)).unwrap();

        assert!(find_by_code(&conn, timo, "code-1").unwrap().is_some());
        assert!(find_by_code(&conn, other, "code-1").unwrap().is_none());
        assert!(find_by_code(&conn, timo, "missing").unwrap().is_none());
    }
}
