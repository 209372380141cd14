//! Security headers for HTTP responses
//!
//! Every API response carries these headers; they are attached once, around
//! the whole route tree, so error replies get them too.

use warp::http::header::{HeaderMap, HeaderName, HeaderValue};

/// Strict Content Security Policy for API endpoints
const STRICT_CSP: &str = "default-src 'none'; connect-src 'self'; frame-ancestors 'none';";

const PERMISSIONS_POLICY: &str = "geolocation=(), microphone=(), camera=(), payment=(), usb=(), magnetometer=(), gyroscope=(), accelerometer=()";

const API_SECURITY_HEADERS: &[(&str, &str)] = &[
    // Prevent clickjacking
    ("x-frame-options", "DENY"),
    // Prevent MIME type sniffing
    ("x-content-type-options", "nosniff"),
    ("referrer-policy", "no-referrer"),
    ("content-security-policy", STRICT_CSP),
    // Responses carry user data and tokens
    ("cache-control", "no-cache, no-store, must-revalidate"),
    ("permissions-policy", PERMISSIONS_POLICY),
];

/// Header set for API responses, for use with `warp::reply::with::headers`
pub fn api_security_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    for &(name, value) in API_SECURITY_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_csp_for_api() {
        assert!(STRICT_CSP.contains("default-src 'none'"));
        assert!(STRICT_CSP.contains("frame-ancestors 'none'"));
        assert!(!STRICT_CSP.contains("unsafe-inline"));
    }

    #[test]
    fn test_api_header_set() {
        let headers = api_security_headers();
        assert_eq!(headers.len(), API_SECURITY_HEADERS.len());
        assert_eq!(headers["x-frame-options"], "DENY");
        assert_eq!(headers["cache-control"], "no-cache, no-store, must-revalidate");
    }
}
