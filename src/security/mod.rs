//! Security utilities and middleware

pub mod headers;
pub mod timing;

pub use headers::add_security_headers;
pub use timing::{add_auth_delay, AuthTimer};
