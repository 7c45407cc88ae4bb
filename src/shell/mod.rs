//! Application shell: the event bus UI layers subscribe to.
//!
//! Notices, navigation requests and loading-indicator changes are all
//! published here instead of reaching into shared globals.

mod events;
mod loading;

pub use events::{Notice, NoticeLevel, Shell, ShellEvent};
pub use loading::{LoadingEvent, LoadingGuard, DEFAULT_LOADING_TEXT};
