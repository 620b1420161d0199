use serde_json::Value;
use tokio::sync::broadcast;

use crate::error::{EmptyTokenSnafu, Result};
use crate::github::constants::{AUTO_ASK_KEY, TOKEN_KEY};

mod file;
mod memory;

pub use self::file::FileStore;
pub use self::memory::MemoryStore;

/// Capacity of the change broadcast; slow listeners see `Lagged` past this.
pub(crate) const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Notification that a stored key was written or removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageChange {
    pub key: String,
}

/// Async key/value storage owned by the host (extension storage, a file...).
pub trait SettingsStore {
    /// Read a value; `None` when the key was never stored.
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Store a value and notify listeners.
    async fn set(&self, key: &str, value: Value) -> Result<()>;

    /// Remove a value and notify listeners. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Subscribe to change notifications.
    fn changes(&self) -> broadcast::Receiver<StorageChange>;
}

/// Read the stored access token. Empty strings count as no token.
pub async fn read_token<S: SettingsStore>(store: &S) -> Result<Option<String>> {
    match store.get(TOKEN_KEY).await? {
        Some(Value::String(token)) if !token.is_empty() => Ok(Some(token)),
        _ => Ok(None),
    }
}

/// Whether to prompt for a token on private repositories.
///
/// Only an explicitly stored `false` disables the prompt.
pub async fn read_auto_ask<S: SettingsStore>(store: &S) -> Result<bool> {
    let stored = store.get(AUTO_ASK_KEY).await?;
    Ok(auto_ask_enabled(stored.as_ref()))
}

pub(crate) fn auto_ask_enabled(stored: Option<&Value>) -> bool {
    !matches!(stored, Some(Value::Bool(false)))
}

pub async fn save_token<S: SettingsStore>(store: &S, token: &str) -> Result<()> {
    let token = token.trim();
    if token.is_empty() {
        return EmptyTokenSnafu.fail();
    }
    store.set(TOKEN_KEY, Value::String(token.to_string())).await
}

pub async fn clear_token<S: SettingsStore>(store: &S) -> Result<()> {
    store.remove(TOKEN_KEY).await
}

pub async fn set_auto_ask<S: SettingsStore>(store: &S, enabled: bool) -> Result<()> {
    store.set(AUTO_ASK_KEY, Value::Bool(enabled)).await
}
