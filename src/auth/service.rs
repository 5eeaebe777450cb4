//! Auth orchestrator
//!
//! Composes the credential hasher, the token issuer, the user store and the
//! session delivery policy into the login/registration/logout flows. The
//! service is stateless per call; the only shared resource is the store.

use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::session::{ClientType, IssuedSession, RenderedSession};
use crate::auth::token::TokenManager;
use crate::auth::user::{normalize_email, User, UserProfile};
use crate::constants::MIN_AUTH_RESPONSE_MILLIS;
use crate::error::{Result, RustyGateError};
use crate::security::AuthTimer;
use crate::security_logger::{log_security_event, SecurityEvent};
use crate::storage::UserStore;

/// Login input. Transient; the plaintext password is never persisted or logged.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub email: String,
    pub password: String,
    pub client_type: String,
}

/// Registration input. Transient, like [`Credentials`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    pub client_type: String,
}

/// Terminal outcomes of a login attempt.
///
/// `InvalidCredentials` covers both unknown email and wrong password; the
/// caller must not learn which field was wrong. `AccountInactive` is a
/// distinct signal since the identity was proven.
#[derive(Debug)]
pub enum LoginOutcome {
    Success(RenderedSession),
    InvalidCredentials,
    AccountInactive,
    InvalidClientType,
}

/// Terminal outcomes of a registration attempt
#[derive(Debug)]
pub enum RegisterOutcome {
    Success(RenderedSession),
    EmailAlreadyRegistered,
    InvalidClientType,
}

/// Credential verification and session issuance
pub struct AuthService {
    store: Arc<dyn UserStore>,
    tokens: Arc<TokenManager>,
    refresh_token_ttl: Duration,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn UserStore>,
        tokens: Arc<TokenManager>,
        refresh_token_ttl: Duration,
    ) -> Self {
        Self {
            store,
            tokens,
            refresh_token_ttl,
        }
    }

    /// Verifies credentials and issues a session rendered for the caller's
    /// client type.
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginOutcome> {
        // Unknown client types are rejected before any store, hashing or
        // signing work is spent on the request
        let client_type = match ClientType::parse(&credentials.client_type) {
            Some(client_type) => client_type,
            None => return Ok(LoginOutcome::InvalidClientType),
        };

        // Lookup-miss and hash-mismatch must not be distinguishable by timing
        let timer = AuthTimer::new(Duration::from_millis(MIN_AUTH_RESPONSE_MILLIS));
        let email = normalize_email(&credentials.email);

        let user = match self.store.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                log_security_event(SecurityEvent::AuthenticationFailed {
                    email: Some(email),
                    reason: "unknown email".to_string(),
                })
                .await;
                timer.wait().await;
                return Ok(LoginOutcome::InvalidCredentials);
            }
        };

        if !verify_password(&credentials.password, &user.password_hash) {
            log_security_event(SecurityEvent::AuthenticationFailed {
                email: Some(email),
                reason: "password mismatch".to_string(),
            })
            .await;
            timer.wait().await;
            return Ok(LoginOutcome::InvalidCredentials);
        }

        if !user.is_active {
            log_security_event(SecurityEvent::AuthenticationFailed {
                email: Some(email),
                reason: "account inactive".to_string(),
            })
            .await;
            timer.wait().await;
            return Ok(LoginOutcome::AccountInactive);
        }

        let rendered = self.issue_session(&user, client_type)?;

        log_security_event(SecurityEvent::AuthenticationSuccess {
            user_id: user.id.clone(),
        })
        .await;
        timer.wait().await;
        Ok(LoginOutcome::Success(rendered))
    }

    /// Creates an account and issues a session exactly as login does.
    pub async fn register(&self, request: &RegistrationRequest) -> Result<RegisterOutcome> {
        let client_type = match ClientType::parse(&request.client_type) {
            Some(client_type) => client_type,
            None => return Ok(RegisterOutcome::InvalidClientType),
        };

        let email = normalize_email(&request.email);

        if self.store.find_by_email(&email).await?.is_some() {
            log_security_event(SecurityEvent::RegistrationRejected {
                email,
                reason: "email already registered".to_string(),
            })
            .await;
            return Ok(RegisterOutcome::EmailAlreadyRegistered);
        }

        let password_hash = hash_password(&request.password)?;
        let user = User::with_names(
            email.clone(),
            password_hash,
            request.first_name.clone(),
            request.last_name.clone(),
        );

        // The pre-check above races against concurrent registrations for the
        // same email; the store's uniqueness constraint is authoritative and
        // a lost race maps to the same outcome as the pre-check.
        let user = match self.store.insert(user).await {
            Ok(user) => user,
            Err(RustyGateError::DuplicateEmail(_)) => {
                log_security_event(SecurityEvent::RegistrationRejected {
                    email,
                    reason: "email already registered (insert race)".to_string(),
                })
                .await;
                return Ok(RegisterOutcome::EmailAlreadyRegistered);
            }
            Err(e) => return Err(e),
        };

        let rendered = self.issue_session(&user, client_type)?;

        log_security_event(SecurityEvent::RegistrationSuccess {
            user_id: user.id.clone(),
        })
        .await;
        Ok(RegisterOutcome::Success(rendered))
    }

    /// Pure read-through to the store; the projection never includes the
    /// password hash.
    pub async fn current_user(&self, user_id: &str) -> Result<Option<UserProfile>> {
        let user = self.store.find_by_id(user_id).await?;
        Ok(user.map(|user| user.profile()))
    }

    /// Logout never fails and never invalidates issued tokens; clearing the
    /// delivery channel's cookies is handled by the transport layer.
    pub async fn logout(&self, user_id: &str) {
        log::info!("User logged out: {}", user_id);
    }

    fn issue_session(&self, user: &User, client_type: ClientType) -> Result<RenderedSession> {
        let (access_token, expires_at) = self.tokens.issue_access_token(user)?;
        let refresh_token = self.tokens.issue_refresh_token();

        let session = IssuedSession {
            access_token,
            refresh_token,
            expires_at,
        };

        Ok(RenderedSession::render(
            client_type,
            session,
            self.refresh_token_ttl,
        ))
    }
}
