//! Session delivery policy
//!
//! A successful login or registration produces the same pair of tokens for
//! every caller; only the delivery differs. Browser clients get HttpOnly
//! cookies and an expiry-only body, native clients get both tokens in the
//! body. The branch lives entirely in [`RenderedSession::render`].

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::{ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};

/// Trust model of the calling client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientType {
    /// Browser-hosted caller: tokens are delivered as HttpOnly cookies
    Web,
    /// Native/mobile caller: tokens are delivered in the response body
    Mobile,
}

impl ClientType {
    /// Parses the wire tag. Anything outside {Web, Mobile} is rejected
    /// before any hashing or signing work is spent on the request.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "Web" => Some(ClientType::Web),
            "Mobile" => Some(ClientType::Mobile),
            _ => None,
        }
    }
}

/// Tokens minted for one successful authentication
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

/// JSON body of a successful login/registration response.
///
/// For web clients both token fields are absent; the client script only
/// learns when the session expires, never the raw tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
}

/// A session rendered for one delivery channel
#[derive(Debug, Clone)]
pub struct RenderedSession {
    pub body: SessionBody,
    /// Set-Cookie directives; empty for mobile clients
    pub cookies: Vec<String>,
}

impl RenderedSession {
    /// Renders an issued session for the given client type
    pub fn render(client_type: ClientType, session: IssuedSession, refresh_ttl: Duration) -> Self {
        match client_type {
            ClientType::Web => {
                let refresh_expires =
                    Utc::now() + ChronoDuration::seconds(refresh_ttl.as_secs() as i64);
                let cookies = vec![
                    session_cookie(ACCESS_TOKEN_COOKIE, &session.access_token, session.expires_at),
                    session_cookie(REFRESH_TOKEN_COOKIE, &session.refresh_token, refresh_expires),
                ];

                Self {
                    body: SessionBody {
                        access_token: None,
                        refresh_token: None,
                        expires_at: session.expires_at,
                    },
                    cookies,
                }
            }
            ClientType::Mobile => Self {
                body: SessionBody {
                    access_token: Some(session.access_token),
                    refresh_token: Some(session.refresh_token),
                    expires_at: session.expires_at,
                },
                cookies: Vec::new(),
            },
        }
    }
}

/// Builds one session cookie with the mandatory security attributes
fn session_cookie(name: &str, value: &str, expires: DateTime<Utc>) -> String {
    format!(
        "{}={}; Expires={}; Path=/; HttpOnly; Secure; SameSite=Strict",
        name,
        value,
        http_date(expires)
    )
}

/// Builds a Set-Cookie directive that removes a session cookie
fn expired_cookie(name: &str) -> String {
    format!(
        "{}=; Expires=Thu, 01 Jan 1970 00:00:00 GMT; Max-Age=0; Path=/; HttpOnly; Secure; SameSite=Strict",
        name
    )
}

/// Returns clearing directives for whichever session cookies are present
/// on the request. Logout has no effect on token validity; this is its
/// only observable behavior.
pub fn clear_session_cookies(cookie_header: Option<&str>) -> Vec<String> {
    let mut cleared = Vec::new();
    if let Some(header) = cookie_header {
        if cookie_value(header, ACCESS_TOKEN_COOKIE).is_some() {
            cleared.push(expired_cookie(ACCESS_TOKEN_COOKIE));
        }
        if cookie_value(header, REFRESH_TOKEN_COOKIE).is_some() {
            cleared.push(expired_cookie(REFRESH_TOKEN_COOKIE));
        }
    }
    cleared
}

/// Extracts a named cookie value from a Cookie request header
pub fn cookie_value(cookie_header: &str, name: &str) -> Option<String> {
    cookie_header.split(';').find_map(|pair| {
        let pair = pair.trim();
        let (key, value) = pair.split_once('=')?;
        if key == name {
            Some(value.to_string())
        } else {
            None
        }
    })
}

/// Formats a timestamp as an RFC 7231 IMF-fixdate for cookie expiry
fn http_date(t: DateTime<Utc>) -> String {
    t.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
