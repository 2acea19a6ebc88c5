//! Database repository layer
//!
//! Provides the shared connection handle and the query/insert operations for
//! users and profiles. The handle is constructed explicitly and passed by
//! reference; there is no global accessor. A mutex serializes all access
//! through the single long-lived connection, so writes execute one at a time
//! and transactions stay atomic.

use crate::error::{Error, Result};
use crate::types::{Profile, User, UserWithProfile};
use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::Mutex;

/// Database handle wrapping the single process-lifetime connection
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open or create a database at the given path
    ///
    /// Creates the parent directory if needed. Open failures are reported as
    /// [`Error::Connection`]; migrations are a separate step via [`Self::migrate`].
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::Connection(format!(
                    "cannot create data directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let conn = Connection::open(path).map_err(|e| {
            tracing::error!(path = %path.display(), error = %e, "Failed to open database");
            Error::Connection(format!("cannot open {}: {}", path.display(), e))
        })?;

        // Enable foreign keys and WAL mode for better concurrency
        conn.execute_batch(
            "
            PRAGMA foreign_keys = ON;
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )
        .map_err(|e| Error::Connection(e.to_string()))?;

        tracing::info!(path = %path.display(), "Opened database");

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| Error::Connection(e.to_string()))?;
        conn.execute("PRAGMA foreign_keys = ON", [])
            .map_err(|e| Error::Connection(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run migrations on this database
    pub fn migrate(&self) -> Result<()> {
        let mut conn = self.conn.lock().unwrap();
        super::schema::run_migrations(&mut conn)
    }

    /// Get the underlying connection (for advanced use)
    pub fn connection(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap()
    }

    // ============================================
    // User operations
    // ============================================

    /// Insert a new user, returning it with its assigned identity
    ///
    /// A duplicate email violates the schema's UNIQUE constraint and surfaces
    /// as [`Error::Query`]; the existing row is untouched.
    pub fn create_user(&self, user: &User) -> Result<User> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO users (name, email, created_at) VALUES (?1, ?2, ?3)",
            params![user.name, user.email, user.created_at.to_rfc3339()],
        )?;
        let id = conn.last_insert_rowid();

        tracing::info!(name = %user.name, id, "Created user");

        Ok(User {
            id: Some(id),
            ..user.clone()
        })
    }

    /// Get all users, in no particular order
    pub fn fetch_users(&self) -> Result<Vec<User>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT id, name, email, created_at FROM users")?;

        let users = stmt
            .query_map([], Self::row_to_user)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(users)
    }

    /// Get a user by identity; absent rows are `Ok(None)`, not an error
    pub fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT id, name, email, created_at FROM users WHERE id = ?",
            [id],
            Self::row_to_user,
        )
        .optional()
        .map_err(Error::from)
    }

    /// Write all columns of an existing user identified by its id
    ///
    /// Fails with [`Error::NotFound`] when the user has no identity yet or no
    /// row matches it.
    pub fn update_user(&self, user: &User) -> Result<()> {
        let id = user
            .id
            .ok_or_else(|| Error::NotFound("user has no identity".to_string()))?;

        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            "UPDATE users SET name = ?1, email = ?2, created_at = ?3 WHERE id = ?4",
            params![user.name, user.email, user.created_at.to_rfc3339(), id],
        )?;

        if changed == 0 {
            return Err(Error::NotFound(format!("user {}", id)));
        }

        tracing::info!(id, "Updated user");
        Ok(())
    }

    /// Delete a user by identity, returning whether a row was removed
    ///
    /// Deleting a missing id is a no-op (`Ok(false)`). Profile rows for the
    /// user are removed by the schema's ON DELETE CASCADE.
    pub fn delete_user(&self, id: i64) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let removed = conn.execute("DELETE FROM users WHERE id = ?1", [id])?;

        if removed > 0 {
            tracing::info!(id, "Deleted user");
        }
        Ok(removed > 0)
    }

    // ============================================
    // Profile operations
    // ============================================

    /// Insert a user and its profile in one transaction
    ///
    /// The profile's `user_id` is set to the newly assigned user identity
    /// before insert. All-or-nothing: if the profile insert fails, the user
    /// insert is rolled back too.
    pub fn create_user_with_profile(
        &self,
        user: &User,
        profile: &Profile,
    ) -> Result<(User, Profile)> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO users (name, email, created_at) VALUES (?1, ?2, ?3)",
            params![user.name, user.email, user.created_at.to_rfc3339()],
        )?;
        let user_id = tx.last_insert_rowid();

        tx.execute(
            "INSERT INTO profiles (user_id, bio, avatar_url) VALUES (?1, ?2, ?3)",
            params![user_id, profile.bio, profile.avatar_url],
        )?;
        let profile_id = tx.last_insert_rowid();

        tx.commit()?;

        tracing::info!(name = %user.name, user_id, profile_id, "Created user with profile");

        Ok((
            User {
                id: Some(user_id),
                ..user.clone()
            },
            Profile {
                id: Some(profile_id),
                user_id: Some(user_id),
                ..profile.clone()
            },
        ))
    }

    /// Get a profile by identity
    pub fn get_profile_by_id(&self, id: i64) -> Result<Option<Profile>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT id, user_id, bio, avatar_url FROM profiles WHERE id = ?",
            [id],
            Self::row_to_profile,
        )
        .optional()
        .map_err(Error::from)
    }

    /// Get the profile belonging to a user, if any
    ///
    /// If the convention is broken and a user has several profiles, the one
    /// with the lowest id wins.
    pub fn get_profile_for_user(&self, user_id: i64) -> Result<Option<Profile>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT id, user_id, bio, avatar_url FROM profiles WHERE user_id = ? ORDER BY id LIMIT 1",
            [user_id],
            Self::row_to_profile,
        )
        .optional()
        .map_err(Error::from)
    }

    // ============================================
    // Join queries
    // ============================================

    /// Get every user whose email ends in `@example.com`, left-joined with
    /// its profile, ordered by name ascending
    ///
    /// Users matching the filter but lacking a profile are included with
    /// `profile: None`.
    pub fn fetch_users_with_profile(&self) -> Result<Vec<UserWithProfile>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT u.id, u.name, u.email, u.created_at,
                    p.id, p.user_id, p.bio, p.avatar_url
             FROM users u
             LEFT JOIN profiles p ON p.user_id = u.id
             WHERE u.email LIKE '%@example.com'
             ORDER BY u.name ASC",
        )?;

        let rows = stmt
            .query_map([], |row| {
                let user = User {
                    id: Some(row.get(0)?),
                    name: row.get(1)?,
                    email: row.get(2)?,
                    created_at: parse_timestamp(&row.get::<_, String>(3)?),
                };

                // All profile columns are NULL when no profile row matched
                let profile_id: Option<i64> = row.get(4)?;
                let profile = match profile_id {
                    Some(pid) => Some(Profile {
                        id: Some(pid),
                        user_id: row.get(5)?,
                        bio: row.get(6)?,
                        avatar_url: row.get(7)?,
                    }),
                    None => None,
                };

                Ok(UserWithProfile { user, profile })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
    }

    // ============================================
    // Row mapping
    // ============================================

    fn row_to_user(row: &Row) -> rusqlite::Result<User> {
        let created_at_str: String = row.get(3)?;
        Ok(User {
            id: Some(row.get(0)?),
            name: row.get(1)?,
            email: row.get(2)?,
            created_at: parse_timestamp(&created_at_str),
        })
    }

    fn row_to_profile(row: &Row) -> rusqlite::Result<Profile> {
        Ok(Profile {
            id: Some(row.get(0)?),
            user_id: row.get(1)?,
            bio: row.get(2)?,
            avatar_url: row.get(3)?,
        })
    }
}

/// Parse a stored timestamp.
///
/// Rows written by this crate carry RFC 3339 text, but rows created through
/// the schema's `DEFAULT CURRENT_TIMESTAMP` carry SQLite's
/// `YYYY-MM-DD HH:MM:SS` (UTC), so both forms are accepted. Anything else
/// falls back to now.
fn parse_timestamp(s: &str) -> DateTime<Utc> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.with_timezone(&Utc);
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return naive.and_utc();
    }
    Utc::now()
}
