//! HTTP response building module
//!
//! Builders for every status the server emits. Each one starts from the fixed
//! header set, so no response can leave without it.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::http::response::Builder;
use hyper::{Response, StatusCode};

use super::headers;

/// Methods the server answers
pub const ALLOWED_METHODS: &str = "GET, OPTIONS";

fn base(status: StatusCode) -> Builder {
    headers::apply(Response::builder().status(status))
}

/// Build 200 OK response carrying a file body
pub fn build_file_response(data: Bytes, content_type: &str) -> Response<Full<Bytes>> {
    let content_length = data.len();
    finish(
        StatusCode::OK,
        base(StatusCode::OK)
            .header("Content-Type", content_type)
            .header("Content-Length", content_length),
        data,
    )
}

/// Build 200 OK preflight response with an empty body
pub fn build_options_response() -> Response<Full<Bytes>> {
    finish(
        StatusCode::OK,
        base(StatusCode::OK).header("Content-Length", 0),
        Bytes::new(),
    )
}

/// Build 404 Not Found response naming the requested path
pub fn build_404_response(requested_path: &str) -> Response<Full<Bytes>> {
    build_error_response(
        StatusCode::NOT_FOUND,
        &format!("File not found: {requested_path}"),
    )
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<Full<Bytes>> {
    let body = Bytes::from("405 Method Not Allowed");
    finish(
        StatusCode::METHOD_NOT_ALLOWED,
        base(StatusCode::METHOD_NOT_ALLOWED)
            .header("Content-Type", "text/plain")
            .header("Allow", ALLOWED_METHODS),
        body,
    )
}

/// Build 500 Internal Server Error response
///
/// The body is generic; fault details stay in the local log.
pub fn build_500_response() -> Response<Full<Bytes>> {
    build_error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}

fn build_error_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    let body = Bytes::from(format!("{} {message}\n", status.as_u16()));
    finish(
        status,
        base(status).header("Content-Type", "text/plain; charset=utf-8"),
        body,
    )
}

/// Attach the body, falling back to a bare response that still carries the
/// fixed header set if the builder rejected a header value
fn finish(status: StatusCode, builder: Builder, body: Bytes) -> Response<Full<Bytes>> {
    builder.body(Full::new(body)).unwrap_or_else(|e| {
        log_build_error(status, &e);
        let mut resp = Response::new(Full::new(Bytes::new()));
        *resp.status_mut() = status;
        headers::insert_into(resp.headers_mut());
        resp
    })
}

/// Log response build error
fn log_build_error(status: StatusCode, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
