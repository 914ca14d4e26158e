//! HTTP protocol layer module
//!
//! Header parsing and response building shared by the request handlers,
//! decoupled from the listing/retrieval business logic.

pub mod cookie;
pub mod mime;
pub mod response;
pub mod url;

// Re-export commonly used items
pub use response::{
    build_error_response, build_forbidden_response, build_html_response,
    build_not_found_response, build_object_response, ResponseBody,
};
