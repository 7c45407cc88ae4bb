pub mod service;
pub mod store;

pub use service::AuthService;
pub use store::SessionStore;
