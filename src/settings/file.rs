use serde_json::{Map, Value};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::{Mutex, broadcast};

use super::{CHANGE_CHANNEL_CAPACITY, SettingsStore, StorageChange};
use crate::error::{Error, Result};
use crate::wrap_err;

/// Settings persisted as a single JSON object on disk.
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
    changes: broadcast::Sender<StorageChange>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
            changes,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Map<String, Value>> {
        let raw = match fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => {
                return Err(Error::SettingsReadFailed {
                    path: self.path.clone(),
                    source: Box::new(e.into()),
                });
            }
        };
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(Map::new());
        }

        let value: Value = wrap_err!(
            serde_json::from_slice(&raw),
            SettingsReadFailed {
                path: self.path.clone()
            }
        )?;
        match value {
            Value::Object(map) => Ok(map),
            _ => Err(Error::MalformedSettings {
                path: self.path.clone(),
            }),
        }
    }

    async fn store(&self, map: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            wrap_err!(
                fs::create_dir_all(parent).await,
                SettingsWriteFailed {
                    path: self.path.clone()
                }
            )?;
        }
        // Readers skip the write lock and must only ever see a whole file
        let raw = serde_json::to_vec_pretty(map)?;
        let staging = self.staging_path();
        wrap_err!(
            fs::write(&staging, raw).await,
            SettingsWriteFailed {
                path: staging.clone()
            }
        )?;
        wrap_err!(
            fs::rename(&staging, &self.path).await,
            SettingsWriteFailed {
                path: self.path.clone()
            }
        )
    }

    fn staging_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.path.with_file_name(format!(".{name}.{}.tmp", std::process::id()))
    }

    async fn update(&self, key: &str, value: Option<Value>) -> Result<()> {
        {
            let _guard = self.write_lock.lock().await;
            let mut map = self.load().await?;
            match value {
                Some(value) => map.insert(key.to_string(), value),
                None => map.remove(key),
            };
            self.store(&map).await?;
        }
        log::debug!("settings updated path={} key={}", self.path.display(), key);
        let _ = self.changes.send(StorageChange {
            key: key.to_string(),
        });
        Ok(())
    }
}

impl SettingsStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.load().await?.remove(key))
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        self.update(key, Some(value)).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.update(key, None).await
    }

    fn changes(&self) -> broadcast::Receiver<StorageChange> {
        self.changes.subscribe()
    }
}
