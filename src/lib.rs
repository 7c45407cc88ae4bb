//! Library exports for the aq3stat client, shared between the binary and tests.

pub mod api;
pub mod config;
pub mod models;
pub mod request;
pub mod router;
pub mod session;
pub mod shell;
pub mod startup;
pub mod state;
pub mod storage;
pub mod utils;
pub mod websites;
