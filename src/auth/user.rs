use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered account
///
/// The password hash is always produced by the credential hasher and is
/// never exposed through the API; `/auth/me` returns a [`UserProfile`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier (opaque, immutable)
    pub id: String,
    /// Email address, stored normalized (trimmed, lowercased)
    pub email: String,
    /// Argon2 PHC-string hash of the password
    pub password_hash: String,
    /// Optional display name fields
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
    /// Inactive accounts cannot log in
    pub is_active: bool,
}

impl User {
    /// Creates a new active user with a freshly generated id
    pub fn new(email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email,
            password_hash,
            first_name: None,
            last_name: None,
            created_at: Utc::now(),
            is_active: true,
        }
    }

    /// Creates a new user with display names
    pub fn with_names(
        email: String,
        password_hash: String,
        first_name: Option<String>,
        last_name: Option<String>,
    ) -> Self {
        let mut user = Self::new(email, password_hash);
        user.first_name = first_name;
        user.last_name = last_name;
        user
    }

    /// Sanitized projection for API responses; never carries the hash
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            is_active: self.is_active,
        }
    }
}

/// Public view of a user account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: bool,
}

/// Normalizes an email address for lookup and storage.
/// Comparison is case-insensitive, so at most one account exists per address.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_creation() {
        let user = User::new("alice@example.com".to_string(), "hash".to_string());
        assert!(!user.id.is_empty());
        assert_eq!(user.email, "alice@example.com");
        assert_eq!(user.first_name, None);
        assert!(user.is_active);
    }

    #[test]
    fn test_profile_excludes_hash() {
        let user = User::with_names(
            "alice@example.com".to_string(),
            "hash".to_string(),
            Some("Alice".to_string()),
            None,
        );
        let profile = user.profile();
        assert_eq!(profile.id, user.id);
        assert_eq!(profile.first_name, Some("Alice".to_string()));

        let json = serde_json::to_string(&profile).unwrap();
        assert!(!json.contains("hash"));
        assert!(json.contains("firstName"));
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
        assert_eq!(normalize_email("bob@x.com"), "bob@x.com");
    }
}
