//! Typed wrappers around the backend's REST endpoints.
//!
//! All of them go through the shared [`ApiClient`](crate::request::ApiClient).

pub mod admin_api;
pub mod auth_api;
pub mod website_api;

pub use admin_api::AdminApi;
pub use auth_api::{AuthApi, RegisterRequest};
pub use website_api::{WebsiteApi, WebsiteRequest};

/// Query parameters for paginated listings.
pub(crate) fn page_query(page: u32, page_size: u32) -> Vec<(&'static str, String)> {
    vec![
        ("page", page.to_string()),
        ("page_size", page_size.to_string()),
    ]
}
