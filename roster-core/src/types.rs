//! Core domain types for roster
//!
//! Plain data holders for one row each of the `users` and `profiles` tables,
//! plus the composite produced by the join query. There is no declarative
//! relationship metadata here; the one-to-one shape between [`User`] and
//! [`Profile`] is a convention enforced by the repository layer's queries,
//! not by these types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered person in the local directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Row identity; `None` until the first successful insert
    pub id: Option<i64>,
    /// Display name (non-empty by convention)
    pub name: String,
    /// Contact address, unique across all users (enforced by the schema)
    pub email: String,
    /// When this user was created
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Build an unsaved user stamped with the current time.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            email: email.into(),
            created_at: Utc::now(),
        }
    }
}

/// Optional descriptive data attached to a single [`User`].
///
/// Deleting the owning user cascades to its profile rows. The schema does not
/// forbid multiple profiles per user; callers that want exactly one should go
/// through [`crate::Database::create_user_with_profile`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Row identity; `None` until the first successful insert
    pub id: Option<i64>,
    /// Owning user's identity; assigned during a composed insert
    pub user_id: Option<i64>,
    /// Free-form biography text
    pub bio: Option<String>,
    /// Avatar image URL
    pub avatar_url: Option<String>,
}

/// Read-only composite returned by the user/profile join query.
///
/// `profile` is `None` when the user has no matching profile row; such users
/// are still included in the result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserWithProfile {
    pub user: User,
    pub profile: Option<Profile>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_has_no_identity() {
        let user = User::new("Alice", "alice@example.com");
        assert!(user.id.is_none());
        assert_eq!(user.name, "Alice");
        assert_eq!(user.email, "alice@example.com");
    }

    #[test]
    fn test_default_profile_is_empty() {
        let profile = Profile::default();
        assert!(profile.id.is_none());
        assert!(profile.user_id.is_none());
        assert!(profile.bio.is_none());
        assert!(profile.avatar_url.is_none());
    }
}
