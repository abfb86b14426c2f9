//! HTTP protocol layer module
//!
//! Provides the fixed header set, MIME detection and response builders,
//! decoupled from request routing.

pub mod headers;
pub mod mime;
pub mod response;

// Re-export commonly used builders
pub use response::{
    build_404_response, build_405_response, build_500_response, build_file_response,
    build_options_response,
};
