pub mod session;
pub mod user;

pub use session::{Session, SessionState};
pub use user::{Group, LoginResponse, User};
