//! Abstract storage interfaces for pluggable backends
//!
//! The user store is an external collaborator with a narrow contract; the
//! orchestrator never assumes anything beyond it. Backends must provide
//! atomic, isolated single-row reads and writes, and in particular must
//! enforce email uniqueness at insert time - the orchestrator's duplicate
//! pre-check is advisory only.

use async_trait::async_trait;

use crate::auth::user::User;
use crate::error::Result;

/// User record storage interface
///
/// All email parameters are expected pre-normalized (see
/// [`crate::auth::user::normalize_email`]).
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Get user by normalized email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Get user by ID
    async fn find_by_id(&self, id: &str) -> Result<Option<User>>;

    /// Insert a new user. Fails with [`crate::error::RustyGateError::DuplicateEmail`]
    /// when a user with the same normalized email already exists, including
    /// when a concurrent insert won the race after the caller's lookup.
    async fn insert(&self, user: User) -> Result<User>;

    /// Update an existing user record
    async fn update(&self, user: User) -> Result<()>;
}
