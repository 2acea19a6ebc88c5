//! roster - local user directory demo
//!
//! Walks through every repository operation against the on-disk database:
//! create, read, update, delete, the composed user+profile insert, and the
//! profile join query.

use anyhow::{Context, Result};
use roster_core::{Config, Database, Error, Profile, User};

const DEMO_EMAILS: &[&str] = &[
    "alice@example.com",
    "bob@example.com",
    "nadia@other.org",
];

fn main() -> Result<()> {
    // Load configuration
    let config = Config::load().context("failed to load configuration")?;

    // Initialize logging (to file; demo output goes to stdout)
    let _log_guard = roster_core::logging::init(&Config::state_dir(), &config.logging)
        .context("failed to initialize logging")?;

    // Open database
    let db_path = config.database_path();
    tracing::info!(path = %db_path.display(), "Opening database");

    let db = Database::open(&db_path).context("failed to open database")?;
    db.migrate().context("failed to run database migrations")?;

    run_demo(&db)
}

fn run_demo(db: &Database) -> Result<()> {
    // Remove rows left over from a previous run so the inserts below succeed
    for user in db.fetch_users().context("failed to list users")? {
        if DEMO_EMAILS.contains(&user.email.as_str()) {
            if let Some(id) = user.id {
                db.delete_user(id).context("failed to clear demo user")?;
            }
        }
    }

    // Plain insert
    let mut alice = db
        .create_user(&User::new("Alice", "alice@example.com"))
        .context("failed to create user")?;
    println!("created user {:?} with id {:?}", alice.name, alice.id);

    // Composed insert: user + profile in one transaction
    let (bob, bob_profile) = db
        .create_user_with_profile(
            &User::new("Bob", "bob@example.com"),
            &Profile {
                bio: Some("Brewer of coffee".to_string()),
                avatar_url: Some("https://example.com/bob.png".to_string()),
                ..Default::default()
            },
        )
        .context("failed to create user with profile")?;
    println!(
        "created user {:?} (id {:?}) with profile id {:?}",
        bob.name, bob.id, bob_profile.id
    );

    // A user outside the join query's email filter
    db.create_user(&User::new("Nadia", "nadia@other.org"))
        .context("failed to create user")?;

    // Duplicate emails are rejected by the schema, first row stays intact
    match db.create_user(&User::new("Imposter", "alice@example.com")) {
        Err(Error::Query(e)) => println!("duplicate email rejected: {}", e),
        Err(e) => println!("duplicate email rejected: {}", e),
        Ok(_) => println!("duplicate email was unexpectedly accepted"),
    }

    // Read everything back
    let users = db.fetch_users().context("failed to list users")?;
    println!("{} users total:", users.len());
    for user in &users {
        println!("  [{}] {} <{}>", user.id.unwrap_or(-1), user.name, user.email);
    }

    // Join query: only @example.com users, name ascending, profile optional
    let joined = db
        .fetch_users_with_profile()
        .context("failed to run join query")?;
    println!("{} users match the example.com filter:", joined.len());
    for row in &joined {
        match &row.profile {
            Some(profile) => println!(
                "  {} - {}",
                row.user.name,
                profile.bio.as_deref().unwrap_or("(no bio)")
            ),
            None => println!("  {} - no profile", row.user.name),
        }
    }

    // Update by identity
    alice.name = "Alice Liddell".to_string();
    db.update_user(&alice).context("failed to update user")?;
    let alice_id = alice.id.context("saved user should have an identity")?;
    let renamed = db
        .get_user_by_id(alice_id)
        .context("failed to fetch user")?
        .map(|u| u.name);
    println!("renamed user 1: {:?}", renamed);

    // Delete; the profile goes with it via ON DELETE CASCADE
    let bob_id = bob.id.context("saved user should have an identity")?;
    let profile_id = bob_profile.id.context("saved profile should have an identity")?;
    let removed = db.delete_user(bob_id).context("failed to delete user")?;
    let orphan = db
        .get_profile_by_id(profile_id)
        .context("failed to fetch profile")?;
    println!("deleted bob: {}, profile after cascade: {:?}", removed, orphan);

    // Lookup misses are empty results, not errors
    let missing = db.get_user_by_id(i64::MAX).context("failed to fetch user")?;
    println!("lookup of unknown id: {:?}", missing);

    Ok(())
}
