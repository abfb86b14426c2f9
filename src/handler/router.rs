//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation and dispatch
//! to the static responder or the preflight responder.

use crate::config::AppState;
use crate::handler::static_files;
use crate::http;
use crate::logger::{self, RequestOutcome};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;

/// Main entry point for HTTP request handling
///
/// Generic over the request body: neither GET nor OPTIONS reads it.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let (parts, _) = req.into_parts();
    let method = &parts.method;
    let path = parts.uri.path();

    let response = match *method {
        Method::GET => static_files::serve(path, &state).await,
        Method::OPTIONS => {
            logger::log_request(&RequestOutcome::Preflight { path });
            http::build_options_response()
        }
        _ => {
            logger::log_request(&RequestOutcome::MethodNotAllowed {
                method: method.as_str(),
                path,
            });
            http::build_405_response()
        }
    };

    Ok(response)
}
