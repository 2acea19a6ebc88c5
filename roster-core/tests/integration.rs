//! Integration tests for the roster storage layer
//!
//! These tests exercise the on-disk lifecycle against a real database file:
//! open, migrate, write, reopen.

use roster_core::db::schema;
use roster_core::{Database, Error, Profile, User};
use tempfile::TempDir;

fn open_at(dir: &TempDir) -> Database {
    let path = dir.path().join("roster.db");
    let db = Database::open(&path).expect("open should succeed");
    db.migrate().expect("migrate should succeed");
    db
}

#[test]
fn test_open_twice_does_not_rerun_migrations() {
    let dir = TempDir::new().unwrap();

    let db = open_at(&dir);
    let first = schema::applied_migrations(&db.connection()).unwrap();
    drop(db);

    // Second open+migrate on the same file must be a no-op
    let db = open_at(&dir);
    let second = schema::applied_migrations(&db.connection()).unwrap();
    assert_eq!(first, second);

    let rows: i64 = db
        .connection()
        .query_row("SELECT COUNT(*) FROM schema_migrations", [], |r| r.get(0))
        .unwrap();
    assert_eq!(rows as usize, first.len(), "no duplicate migration records");
}

#[test]
fn test_data_persists_across_reopen() {
    let dir = TempDir::new().unwrap();

    let db = open_at(&dir);
    let alice = db
        .create_user(&User::new("Alice", "alice@example.com"))
        .unwrap();
    drop(db);

    let db = open_at(&dir);
    let fetched = db
        .get_user_by_id(alice.id.unwrap())
        .unwrap()
        .expect("user should survive reopen");
    assert_eq!(fetched.email, "alice@example.com");
}

#[test]
fn test_full_crud_flow() {
    roster_core::logging::init_test();

    let dir = TempDir::new().unwrap();
    let db = open_at(&dir);

    // Create one plain user and one user with a profile
    let mut alice = db
        .create_user(&User::new("Alice", "alice@example.com"))
        .unwrap();
    let (bob, bob_profile) = db
        .create_user_with_profile(
            &User::new("Bob", "bob@example.com"),
            &Profile {
                bio: Some("brewer of coffee".to_string()),
                avatar_url: Some("https://example.com/bob.png".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

    assert_eq!(db.fetch_users().unwrap().len(), 2);

    // Join query sees both, ordered by name, Alice without a profile
    let joined = db.fetch_users_with_profile().unwrap();
    assert_eq!(joined.len(), 2);
    assert_eq!(joined[0].user.name, "Alice");
    assert!(joined[0].profile.is_none());
    assert_eq!(joined[1].user.name, "Bob");
    assert_eq!(
        joined[1].profile.as_ref().and_then(|p| p.bio.as_deref()),
        Some("brewer of coffee")
    );

    // Update
    alice.name = "Alice Liddell".to_string();
    db.update_user(&alice).unwrap();
    assert_eq!(
        db.get_user_by_id(alice.id.unwrap()).unwrap().unwrap().name,
        "Alice Liddell"
    );

    // Delete cascades to the profile
    assert!(db.delete_user(bob.id.unwrap()).unwrap());
    assert!(db
        .get_profile_by_id(bob_profile.id.unwrap())
        .unwrap()
        .is_none());
    assert_eq!(db.fetch_users().unwrap().len(), 1);
}

#[test]
fn test_open_fails_cleanly_on_unwritable_path() {
    // A directory where a file should be is a connection error, not a panic
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("roster.db");
    std::fs::create_dir_all(&path).unwrap();

    match Database::open(&path) {
        Err(Error::Connection(_)) => {}
        other => panic!("expected Connection error, got {:?}", other.map(|_| ())),
    }
}
