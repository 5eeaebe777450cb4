//! In-memory storage implementation for development and testing
//!
//! This provides a complete user store that keeps all data in memory.
//! Suitable for development, testing, or small deployments.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::traits::UserStore;
use crate::auth::user::User;
use crate::error::{Result, RustyGateError};

/// In-memory user storage
///
/// Lock order is always email index before user map, so the uniqueness
/// check and the row insert are atomic with respect to concurrent inserts.
pub struct MemoryUserStore {
    users: Arc<RwLock<HashMap<String, User>>>, // id -> User
    email_index: Arc<RwLock<HashMap<String, String>>>, // normalized email -> id
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            email_index: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for MemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let email_index = self.email_index.read().await;
        let users = self.users.read().await;

        Ok(email_index.get(email).and_then(|id| users.get(id)).cloned())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User> {
        // The index write lock is held across both map updates; a concurrent
        // insert for the same email observes either nothing or the full row
        let mut email_index = self.email_index.write().await;

        if email_index.contains_key(&user.email) {
            return Err(RustyGateError::DuplicateEmail(user.email));
        }

        email_index.insert(user.email.clone(), user.id.clone());
        self.users.write().await.insert(user.id.clone(), user.clone());

        Ok(user)
    }

    async fn update(&self, user: User) -> Result<()> {
        let mut email_index = self.email_index.write().await;
        let mut users = self.users.write().await;

        let existing = users.get(&user.id).ok_or_else(|| {
            RustyGateError::StorageError(format!("User {} not found", user.id))
        })?;

        // Re-index when the email changed, preserving uniqueness
        if existing.email != user.email {
            if email_index.contains_key(&user.email) {
                return Err(RustyGateError::DuplicateEmail(user.email));
            }
            email_index.remove(&existing.email);
            email_index.insert(user.email.clone(), user.id.clone());
        }

        users.insert(user.id.clone(), user);
        Ok(())
    }
}
