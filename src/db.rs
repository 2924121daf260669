use std::path::Path;

use rusqlite::Connection;

use crate::error::Result;

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    created_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    description TEXT
);

CREATE TABLE IF NOT EXISTS transactions (
    id INTEGER PRIMARY KEY,
    code TEXT NOT NULL UNIQUE,
    date TEXT NOT NULL,
    to_account_number TEXT NOT NULL,
    payee TEXT NOT NULL,
    memo TEXT NOT NULL,
    inflow TEXT,
    outflow TEXT,
    user_id INTEGER NOT NULL,
    category_id INTEGER,
    created_at TEXT DEFAULT (datetime('now')),
    FOREIGN KEY (user_id) REFERENCES users(id),
    FOREIGN KEY (category_id) REFERENCES categories(id)
);

CREATE INDEX IF NOT EXISTS idx_transactions_user_date ON transactions(user_id, date);
";

// (name, description) — fixed household taxonomy, seeded once. 'Budget' and
// 'Sparen' are the default income and savings roles (see settings).
const DEFAULT_CATEGORIES: &[(&str, &str)] = &[
    ("Hypotheek", "Vaste lasten voor je huis"),
    ("Huis", "Onderhoud en inrichting"),
    ("Gas & licht", "Energie en water"),
    ("Boodschappen", "Dagelijkse boodschappen"),
    ("Verzekeringen", "Zorg- en schadeverzekeringen"),
    ("Vrije tijd", "Uitjes, sport en hobby's"),
    ("Vervoer", "Auto, brandstof en openbaar vervoer"),
    ("Abonnementen", "Telefoon, internet en streaming"),
    ("Kleding", "Kleding en schoenen"),
    ("Zorg", "Apotheek, tandarts en eigen risico"),
    ("Huisdieren", "Voer en dierenarts"),
    ("Cadeaus", "Verjaardagen en feestdagen"),
    ("Vakantie", "Reizen en weekendjes weg"),
    ("Eten buiten de deur", "Restaurants en bezorgen"),
    ("Persoonlijke verzorging", "Kapper en drogisterij"),
    ("Belastingen", "Gemeente en waterschap"),
    ("Goede doelen", "Donaties"),
    ("Onvoorzien", "Onverwachte uitgaven"),
    ("Sparen", "Inleg spaarrekening"),
    ("Budget", "Maandelijks inkomen"),
];

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;

    let count: i64 = conn.query_row("SELECT count(*) FROM categories", [], |row| row.get(0))?;
    if count == 0 {
        for (name, description) in DEFAULT_CATEGORIES {
            conn.execute(
                "INSERT INTO categories (name, description) VALUES (?1, ?2)",
                rusqlite::params![name, description],
            )?;
        }
    }
    Ok(())
}
