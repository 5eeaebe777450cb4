//! Security headers for HTTP responses
//!
//! This module provides security headers that should be added to all API
//! responses to protect against common web vulnerabilities.

use warp::http::HeaderValue;
use warp::reply::Response;

/// Strict Content Security Policy for API endpoints
const STRICT_CSP: &str = "default-src 'none'; connect-src 'self'; frame-ancestors 'none';";

/// Add security headers to a response
pub fn add_security_headers(mut response: Response) -> Response {
    let headers = response.headers_mut();

    // Prevent clickjacking
    headers.insert("X-Frame-Options", HeaderValue::from_static("DENY"));

    // Prevent MIME type sniffing
    headers.insert("X-Content-Type-Options", HeaderValue::from_static("nosniff"));

    // Referrer policy - don't leak referrer information
    headers.insert(
        "Referrer-Policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    // Content Security Policy - nothing on this API is a document
    headers.insert("Content-Security-Policy", HeaderValue::from_static(STRICT_CSP));

    // Responses carry credentials; never cache them
    headers.insert("Cache-Control", HeaderValue::from_static("no-store"));

    // Remove server information disclosure
    headers.remove("Server");

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use warp::http::Response as HttpResponse;

    #[test]
    fn test_security_headers_present() {
        let response = HttpResponse::new(warp::hyper::Body::empty());
        let secured = add_security_headers(response);

        let headers = secured.headers();
        assert_eq!(headers.get("X-Frame-Options").unwrap(), "DENY");
        assert_eq!(headers.get("X-Content-Type-Options").unwrap(), "nosniff");
        assert_eq!(headers.get("Cache-Control").unwrap(), "no-store");
        assert!(headers.get("Content-Security-Policy").is_some());
    }
}
