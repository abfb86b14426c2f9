//! Fixed response header set
//!
//! Cache suppression, CORS and security headers, attached identically to
//! every response regardless of status. Names are stored lowercase; the
//! connection writes them title-cased on the wire.

use hyper::header::{HeaderName, HeaderValue};
use hyper::http::response::Builder;
use hyper::HeaderMap;

/// The headers every response carries, in the order they are written
pub const FIXED_HEADERS: [(&str, &str); 9] = [
    ("cache-control", "no-store, no-cache, must-revalidate, max-age=0"),
    ("pragma", "no-cache"),
    ("expires", "0"),
    ("access-control-allow-origin", "*"),
    ("access-control-allow-methods", "GET, POST, OPTIONS"),
    ("access-control-allow-headers", "Content-Type"),
    ("x-frame-options", "DENY"),
    ("x-content-type-options", "nosniff"),
    ("x-xss-protection", "1; mode=block"),
];

/// Append the fixed header set to a response builder
pub fn apply(mut builder: Builder) -> Builder {
    for (name, value) in FIXED_HEADERS {
        builder = builder.header(name, value);
    }
    builder
}

/// Insert the fixed header set into an existing header map
///
/// Used for fallback responses built without a `Builder`.
pub fn insert_into(headers: &mut HeaderMap) {
    for (name, value) in FIXED_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
}

#[cfg(test)]
pub fn assert_fixed_headers(headers: &HeaderMap) {
    for (name, value) in FIXED_HEADERS {
        assert_eq!(
            headers.get(name).and_then(|v| v.to_str().ok()),
            Some(value),
            "header {name} missing or wrong"
        );
    }
}
