//! Database schema and migrations
//!
//! Migrations are named and ordered. Applied names are recorded in a
//! `schema_migrations` bookkeeping table so that re-opening the same database
//! file never re-runs a step. The whole pending batch executes inside one
//! write transaction; any failure rolls everything back.

use crate::error::{Error, Result};
use rusqlite::Connection;
use std::collections::HashSet;

/// A named schema change, applied at most once per database file.
struct Migration {
    name: &'static str,
    sql: &'static str,
}

/// Ordered migration registry
const MIGRATIONS: &[Migration] = &[Migration {
    name: "v1_create_users_and_profiles",
    sql: r#"
    CREATE TABLE users (
        id         INTEGER PRIMARY KEY AUTOINCREMENT,
        name       TEXT NOT NULL,
        email      TEXT NOT NULL UNIQUE,
        created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
    );

    -- One profile per user is a convention, not a constraint: user_id is
    -- deliberately not UNIQUE here.
    CREATE TABLE profiles (
        id         INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id    INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        bio        TEXT,
        avatar_url TEXT
    );
    "#,
}];

/// Run all pending migrations
pub fn run_migrations(conn: &mut Connection) -> Result<()> {
    apply_pending(conn).map_err(|e| Error::Migration(e.to_string()))
}

fn apply_pending(conn: &mut Connection) -> rusqlite::Result<()> {
    let tx = conn.transaction()?;

    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            name       TEXT PRIMARY KEY,
            applied_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
    )?;

    let applied: HashSet<String> = tx
        .prepare("SELECT name FROM schema_migrations")?
        .query_map([], |r| r.get(0))?
        .collect::<rusqlite::Result<_>>()?;

    tracing::info!(
        applied = applied.len(),
        registered = MIGRATIONS.len(),
        "Checking database migrations"
    );

    for migration in MIGRATIONS {
        if applied.contains(migration.name) {
            continue;
        }
        tracing::info!(name = migration.name, "Running migration");
        tx.execute_batch(migration.sql)?;
        tx.execute(
            "INSERT INTO schema_migrations (name) VALUES (?1)",
            [migration.name],
        )?;
    }

    tx.commit()
}

/// Names of migrations already applied to this database, sorted by name
pub fn applied_migrations(conn: &Connection) -> Result<Vec<String>> {
    let names = conn
        .prepare("SELECT name FROM schema_migrations ORDER BY name")?
        .query_map([], |r| r.get(0))?
        .collect::<rusqlite::Result<Vec<String>>>()?;
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_idempotent() {
        let mut conn = Connection::open_in_memory().unwrap();

        // Run migrations twice - should be idempotent
        run_migrations(&mut conn).unwrap();
        run_migrations(&mut conn).unwrap();

        let applied = applied_migrations(&conn).unwrap();
        assert_eq!(applied.len(), MIGRATIONS.len());
        assert_eq!(applied[0], "v1_create_users_and_profiles");
    }

    #[test]
    fn test_tables_created() {
        let mut conn = Connection::open_in_memory().unwrap();
        run_migrations(&mut conn).unwrap();

        let tables = ["users", "profiles", "schema_migrations"];

        for table in tables {
            let exists: i32 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?",
                    [table],
                    |r| r.get(0),
                )
                .unwrap();
            assert_eq!(exists, 1, "Table {} should exist", table);
        }
    }

    #[test]
    fn test_email_unique_constraint() {
        let mut conn = Connection::open_in_memory().unwrap();
        run_migrations(&mut conn).unwrap();

        conn.execute(
            "INSERT INTO users (name, email, created_at) VALUES ('a', 'a@example.com', '2026-01-01')",
            [],
        )
        .unwrap();
        let dup = conn.execute(
            "INSERT INTO users (name, email, created_at) VALUES ('b', 'a@example.com', '2026-01-01')",
            [],
        );
        assert!(dup.is_err(), "duplicate email should violate UNIQUE");
    }

    #[test]
    fn test_profiles_reference_users_with_cascade() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute("PRAGMA foreign_keys = ON", []).unwrap();
        run_migrations(&mut conn).unwrap();

        // Verify the foreign key target and its delete action
        let fk: (String, String) = conn
            .query_row("PRAGMA foreign_key_list(profiles)", [], |row| {
                Ok((row.get::<_, String>(2)?, row.get::<_, String>(6)?))
            })
            .unwrap();

        assert_eq!(fk.0, "users", "profiles should reference users");
        assert_eq!(fk.1, "CASCADE", "deletes should cascade to profiles");
    }
}
