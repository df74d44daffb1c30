//! SQL migration runner for the vocabulary database
//!
//! Migrations are embedded at compile time and applied in order; applied
//! migrations are tracked in a `_migrations` table so each runs once.

use rusqlite::Connection;
use tracing::{debug, info};

/// Embedded migration files (compiled into binary)
const MIGRATIONS: &[(&str, &str)] = &[(
    "001_initial_schema.sql",
    include_str!("../migrations/001_initial_schema.sql"),
)];

/// Run all pending migrations on the database
pub fn run_migrations(conn: &Connection) -> Result<usize, rusqlite::Error> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS _migrations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let applied: Vec<String> = {
        let mut stmt = conn.prepare("SELECT name FROM _migrations ORDER BY id")?;
        stmt.query_map([], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?
    };

    let mut applied_count = 0;

    for (name, sql) in MIGRATIONS {
        if applied.contains(&name.to_string()) {
            debug!("Migration already applied: {}", name);
            continue;
        }

        info!("Applying migration: {}", name);
        conn.execute_batch(sql)?;
        conn.execute("INSERT INTO _migrations (name) VALUES (?1)", [name])?;
        applied_count += 1;
    }

    if applied_count > 0 {
        info!("Applied {} new migration(s)", applied_count);
    } else {
        debug!("Database schema is up to date");
    }

    Ok(applied_count)
}

/// Get list of all applied migrations
pub fn get_applied_migrations(conn: &Connection) -> Result<Vec<String>, rusqlite::Error> {
    let mut stmt = conn.prepare("SELECT name FROM _migrations ORDER BY id")?;
    stmt.query_map([], |row| row.get(0))?
        .collect::<Result<Vec<_>, _>>()
}
