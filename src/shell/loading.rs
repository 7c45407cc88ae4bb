use std::future::Future;

use tracing::trace;

use super::events::{Shell, ShellEvent};

pub const DEFAULT_LOADING_TEXT: &str = "Loading...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadingEvent {
    Show(String),
    Hide,
}

/// Hides the loading indicator when dropped, so an early return, an error
/// or a cancelled future never leaves it on screen.
pub struct LoadingGuard<'a> {
    shell: &'a Shell,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.shell.hide_loading();
    }
}

impl Shell {
    pub fn show_loading(&self, text: impl Into<String>) {
        let text = text.into();
        trace!("Loading indicator on: {}", text);
        self.publish(ShellEvent::Loading(LoadingEvent::Show(text)));
    }

    pub fn hide_loading(&self) {
        trace!("Loading indicator off");
        self.publish(ShellEvent::Loading(LoadingEvent::Hide));
    }

    /// Shows the indicator until the returned guard goes out of scope.
    pub fn loading(&self, text: impl Into<String>) -> LoadingGuard<'_> {
        self.show_loading(text);
        LoadingGuard { shell: self }
    }

    /// Runs `fut` with the loading indicator shown. The indicator is hidden
    /// whatever the outcome.
    pub async fn with_loading<F, T>(&self, text: Option<&str>, fut: F) -> T
    where
        F: Future<Output = T>,
    {
        let _guard = self.loading(text.unwrap_or(DEFAULT_LOADING_TEXT));
        fut.await
    }
}
