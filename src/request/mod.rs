//! Outbound request pipeline.
//!
//! Every backend call goes through [`ApiClient`]: it attaches the session
//! token, unwraps successful bodies and turns failures into [`ApiError`]s
//! while reporting them on the application shell.

mod error;
mod pipeline;

pub use error::{ApiError, GENERIC_ERROR_MESSAGE, NETWORK_ERROR_MESSAGE, SESSION_EXPIRED_MESSAGE};
pub use pipeline::{ApiClient, LOGIN_PATH};
