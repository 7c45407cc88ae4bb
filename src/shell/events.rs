use std::time::Duration;

use tokio::sync::broadcast;
use tracing::{debug, info};

use super::loading::LoadingEvent;

const EVENT_CAPACITY: usize = 64;

/// Severity of a transient notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Error,
    Info,
    Success,
}

/// A transient, user-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub duration: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    Notice(Notice),
    /// Someone outside the router asked to go to this path.
    Navigate(String),
    Loading(LoadingEvent),
}

/// Broadcasts [`ShellEvent`]s to every subscriber.
#[derive(Clone)]
pub struct Shell {
    sender: broadcast::Sender<ShellEvent>,
    notice_duration: Duration,
}

impl Shell {
    pub fn new(notice_duration: Duration) -> Self {
        let (sender, _) = broadcast::channel(EVENT_CAPACITY);
        Shell {
            sender,
            notice_duration,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ShellEvent> {
        self.sender.subscribe()
    }

    /// Publishing with nobody listening is fine; the event is simply dropped.
    pub fn publish(&self, event: ShellEvent) {
        if self.sender.send(event).is_err() {
            debug!("No shell subscribers; event dropped");
        }
    }

    pub fn notify(&self, level: NoticeLevel, message: impl Into<String>) {
        let message = message.into();
        info!(
            event_name = "shell.notice",
            event_domain = "shell",
            level = ?level,
            "{}",
            message
        );
        self.publish(ShellEvent::Notice(Notice {
            level,
            message,
            duration: self.notice_duration,
        }));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.notify(NoticeLevel::Error, message);
    }

    pub fn navigate(&self, path: impl Into<String>) {
        self.publish(ShellEvent::Navigate(path.into()));
    }
}

impl Default for Shell {
    fn default() -> Self {
        Shell::new(Duration::from_secs(5))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_without_subscribers_is_ok() {
        let shell = Shell::default();
        shell.error("nobody listens");
        shell.navigate("/login");
    }

    #[test]
    fn test_notice_carries_configured_duration() {
        let shell = Shell::new(Duration::from_millis(1500));
        let mut rx = shell.subscribe();
        shell.error("boom");
        match rx.try_recv().unwrap() {
            ShellEvent::Notice(notice) => {
                assert_eq!(notice.level, NoticeLevel::Error);
                assert_eq!(notice.message, "boom");
                assert_eq!(notice.duration, Duration::from_millis(1500));
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_every_subscriber_sees_navigation() {
        let shell = Shell::default();
        let mut a = shell.subscribe();
        let mut b = shell.subscribe();
        shell.navigate("/login");
        assert_eq!(a.try_recv().unwrap(), ShellEvent::Navigate("/login".into()));
        assert_eq!(b.try_recv().unwrap(), ShellEvent::Navigate("/login".into()));
    }
}
