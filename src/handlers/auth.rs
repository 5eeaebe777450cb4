//! HTTP handlers for the authentication endpoints
//!
//! Every endpoint answers with the same flat envelope (success flag,
//! message, payload). Domain failures are part of the envelope, never
//! warp rejections; infrastructure errors collapse to a generic message
//! so nothing internal leaks to the caller.

use serde::Serialize;
use std::convert::Infallible;
use std::sync::Arc;
use warp::http::{header, HeaderMap, HeaderValue, StatusCode};
use warp::{Filter, Rejection, Reply};

use crate::auth::service::{
    AuthService, Credentials, LoginOutcome, RegisterOutcome, RegistrationRequest,
};
use crate::auth::session::{clear_session_cookies, cookie_value, RenderedSession};
use crate::auth::token::{extract_bearer_token, TokenManager};
use crate::constants::{ACCESS_TOKEN_COOKIE, MAX_TOKEN_LENGTH};
use crate::security::add_security_headers;
use crate::security_logger::{log_security_event, SecurityEvent};

/// Maximum accepted request body size
const MAX_BODY_BYTES: u64 = 16 * 1024;

/// Flat response envelope shared by every endpoint
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AuthContext {
    pub service: Arc<AuthService>,
    pub tokens: Arc<TokenManager>,
}

/// Builds the /auth route tree
pub fn auth_routes(
    ctx: AuthContext,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let login = warp::path!("auth" / "login")
        .and(warp::post())
        .and(json_body::<Credentials>())
        .and(with_context(ctx.clone()))
        .and_then(handle_login);

    let register = warp::path!("auth" / "register")
        .and(warp::post())
        .and(json_body::<RegistrationRequest>())
        .and(with_context(ctx.clone()))
        .and_then(handle_register);

    let me = warp::path!("auth" / "me")
        .and(warp::get())
        .and(warp::header::headers_cloned())
        .and(with_context(ctx.clone()))
        .and_then(handle_me);

    let logout = warp::path!("auth" / "logout")
        .and(warp::post())
        .and(warp::header::headers_cloned())
        .and(with_context(ctx))
        .and_then(handle_logout);

    let refresh = warp::path!("auth" / "refresh")
        .and(warp::post())
        .and_then(handle_refresh);

    login.or(register).or(me).or(logout).or(refresh)
}

// Helper function to include shared state in request handling
fn with_context(
    ctx: AuthContext,
) -> impl Filter<Extract = (AuthContext,), Error = Infallible> + Clone {
    warp::any().map(move || ctx.clone())
}

fn json_body<T: serde::de::DeserializeOwned + Send>(
) -> impl Filter<Extract = (T,), Error = Rejection> + Clone {
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::json())
}

/// Handle POST /auth/login
pub async fn handle_login(
    credentials: Credentials,
    ctx: AuthContext,
) -> Result<warp::reply::Response, Infallible> {
    let response = match ctx.service.login(&credentials).await {
        Ok(LoginOutcome::Success(rendered)) => {
            session_response(StatusCode::OK, "Login successful", rendered)
        }
        Ok(LoginOutcome::InvalidCredentials) => {
            failure_response(StatusCode::UNAUTHORIZED, "Invalid email or password")
        }
        Ok(LoginOutcome::AccountInactive) => {
            failure_response(StatusCode::FORBIDDEN, "Account is inactive")
        }
        Ok(LoginOutcome::InvalidClientType) => {
            failure_response(StatusCode::BAD_REQUEST, "Invalid client type")
        }
        Err(e) => {
            log::error!("Login failed: {}", e);
            failure_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    };

    Ok(response)
}

/// Handle POST /auth/register
pub async fn handle_register(
    request: RegistrationRequest,
    ctx: AuthContext,
) -> Result<warp::reply::Response, Infallible> {
    let response = match ctx.service.register(&request).await {
        Ok(RegisterOutcome::Success(rendered)) => {
            session_response(StatusCode::CREATED, "Registration successful", rendered)
        }
        Ok(RegisterOutcome::EmailAlreadyRegistered) => {
            failure_response(StatusCode::CONFLICT, "User with this email already exists")
        }
        Ok(RegisterOutcome::InvalidClientType) => {
            failure_response(StatusCode::BAD_REQUEST, "Invalid client type")
        }
        Err(e) => {
            log::error!("Registration failed: {}", e);
            failure_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    };

    Ok(response)
}

/// Handle GET /auth/me
pub async fn handle_me(
    headers: HeaderMap,
    ctx: AuthContext,
) -> Result<warp::reply::Response, Infallible> {
    let user_id = match authenticate_request(&ctx.tokens, &headers).await {
        Some(user_id) => user_id,
        None => {
            return Ok(failure_response(
                StatusCode::UNAUTHORIZED,
                "Authentication required",
            ))
        }
    };

    let response = match ctx.service.current_user(&user_id).await {
        Ok(Some(profile)) => success_response(StatusCode::OK, None, Some(profile)),
        Ok(None) => failure_response(StatusCode::NOT_FOUND, "User not found"),
        Err(e) => {
            log::error!("Failed to load current user: {}", e);
            failure_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    };

    Ok(response)
}

/// Handle POST /auth/logout
///
/// Clears whichever session cookies came with the request. The access
/// token itself stays valid until it expires; there is no server-side
/// revocation.
pub async fn handle_logout(
    headers: HeaderMap,
    ctx: AuthContext,
) -> Result<warp::reply::Response, Infallible> {
    let user_id = match authenticate_request(&ctx.tokens, &headers).await {
        Some(user_id) => user_id,
        None => {
            return Ok(failure_response(
                StatusCode::UNAUTHORIZED,
                "Authentication required",
            ))
        }
    };

    ctx.service.logout(&user_id).await;

    let cookie_header = headers.get("cookie").and_then(|value| value.to_str().ok());
    let cleared = clear_session_cookies(cookie_header);

    let envelope = ApiResponse::<serde_json::Value> {
        success: true,
        message: Some("Logout successful".to_string()),
        data: None,
    };
    let mut response =
        warp::reply::with_status(warp::reply::json(&envelope), StatusCode::OK).into_response();
    append_cookies(&mut response, &cleared);

    Ok(add_security_headers(response))
}

/// Handle POST /auth/refresh
///
/// Refresh token rotation is not implemented; the endpoint reports the
/// gap explicitly rather than pretending to rotate.
pub async fn handle_refresh() -> Result<warp::reply::Response, Infallible> {
    Ok(failure_response(
        StatusCode::OK,
        "Token refresh is not implemented",
    ))
}

/// Resolves the calling user from the request headers.
/// Priority 1: Authorization bearer header; Priority 2: AccessToken cookie.
async fn authenticate_request(tokens: &TokenManager, headers: &HeaderMap) -> Option<String> {
    let token = extract_request_token(headers)?;

    // Basic shape checks before spending signature validation on the token
    if token.len() > MAX_TOKEN_LENGTH {
        log_security_event(SecurityEvent::TokenValidationFailed {
            reason: "token too long".to_string(),
        })
        .await;
        return None;
    }

    if token.chars().any(|c| c.is_control()) {
        log_security_event(SecurityEvent::TokenValidationFailed {
            reason: "token contains control characters".to_string(),
        })
        .await;
        return None;
    }

    match tokens.validate_and_get_user_id(&token) {
        Ok(user_id) if !user_id.is_empty() => Some(user_id),
        Ok(_) => {
            log_security_event(SecurityEvent::TokenValidationFailed {
                reason: "empty subject claim".to_string(),
            })
            .await;
            None
        }
        Err(e) => {
            log_security_event(SecurityEvent::TokenValidationFailed {
                reason: e.to_string(),
            })
            .await;
            None
        }
    }
}

/// Secure token extraction from headers only
fn extract_request_token(headers: &HeaderMap) -> Option<String> {
    if let Some(auth_header) = headers.get("authorization") {
        if let Ok(auth_str) = auth_header.to_str() {
            if let Some(token) = extract_bearer_token(auth_str) {
                log::debug!("Token extracted from Authorization header");
                return Some(token);
            }
        }
    }

    if let Some(cookie_header) = headers.get("cookie") {
        if let Ok(cookie_str) = cookie_header.to_str() {
            if let Some(token) = cookie_value(cookie_str, ACCESS_TOKEN_COOKIE) {
                log::debug!("Token extracted from session cookie");
                return Some(token);
            }
        }
    }

    None
}

fn success_response<T: Serialize>(
    status: StatusCode,
    message: Option<&str>,
    data: Option<T>,
) -> warp::reply::Response {
    let envelope = ApiResponse {
        success: true,
        message: message.map(|m| m.to_string()),
        data,
    };
    let response = warp::reply::with_status(warp::reply::json(&envelope), status).into_response();
    add_security_headers(response)
}

fn failure_response(status: StatusCode, message: &str) -> warp::reply::Response {
    let envelope = ApiResponse::<serde_json::Value> {
        success: false,
        message: Some(message.to_string()),
        data: None,
    };
    let response = warp::reply::with_status(warp::reply::json(&envelope), status).into_response();
    add_security_headers(response)
}

/// Success envelope plus whatever Set-Cookie directives the delivery
/// policy produced for this client type
fn session_response(
    status: StatusCode,
    message: &str,
    rendered: RenderedSession,
) -> warp::reply::Response {
    let envelope = ApiResponse {
        success: true,
        message: Some(message.to_string()),
        data: Some(rendered.body),
    };
    let mut response =
        warp::reply::with_status(warp::reply::json(&envelope), status).into_response();
    append_cookies(&mut response, &rendered.cookies);

    add_security_headers(response)
}

fn append_cookies(response: &mut warp::reply::Response, cookies: &[String]) {
    for cookie in cookies {
        match HeaderValue::from_str(cookie) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(e) => log::error!("Failed to encode session cookie: {}", e),
        }
    }
}
