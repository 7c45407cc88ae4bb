use std::sync::Mutex;

use async_trait::async_trait;

use super::{StorageError, TokenStorage};

/// An in-process token slot. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryTokenStorage {
    slot: Mutex<Option<String>>,
}

impl MemoryTokenStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// A slot that already holds a token, as if persisted by an earlier run.
    pub fn with_token(token: impl Into<String>) -> Self {
        MemoryTokenStorage {
            slot: Mutex::new(Some(token.into())),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl TokenStorage for MemoryTokenStorage {
    async fn get(&self) -> Result<Option<String>, StorageError> {
        Ok(self.slot().clone())
    }

    async fn set(&self, token: &str) -> Result<(), StorageError> {
        *self.slot() = Some(token.to_string());
        Ok(())
    }

    async fn remove(&self) -> Result<(), StorageError> {
        self.slot().take();
        Ok(())
    }

    fn is_persistent(&self) -> bool {
        false
    }
}
