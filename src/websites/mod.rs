pub mod store;

pub use store::{WebsiteState, WebsiteStore};
