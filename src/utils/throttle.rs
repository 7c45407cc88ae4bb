use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

#[derive(Debug)]
struct WindowState {
    window_started_at: Instant,
    suppressed: u64,
}

/// Lets the first event per key through, then swallows repeats until
/// `interval` has elapsed since the window opened.
#[derive(Debug)]
pub struct Throttle {
    interval: Duration,
    windows: Mutex<HashMap<String, WindowState>>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Throttle {
            interval,
            windows: Mutex::new(HashMap::new()),
        }
    }

    fn windows(&self) -> MutexGuard<'_, HashMap<String, WindowState>> {
        self.windows.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Returns `Some(suppressed_count)` when the event for `key` should go
    /// through, otherwise `None` and the event is counted as suppressed for
    /// the active window. A zero interval lets everything through.
    pub fn should_emit(&self, key: &str) -> Option<u64> {
        let mut map = self.windows();
        let now = Instant::now();

        match map.get_mut(key) {
            Some(state) => {
                if now.duration_since(state.window_started_at) >= self.interval {
                    let suppressed = state.suppressed;
                    state.window_started_at = now;
                    state.suppressed = 0;
                    Some(suppressed)
                } else {
                    state.suppressed += 1;
                    None
                }
            }
            None => {
                map.insert(
                    key.to_string(),
                    WindowState {
                        window_started_at: now,
                        suppressed: 0,
                    },
                );
                Some(0)
            }
        }
    }
}
