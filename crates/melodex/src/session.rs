use std::{
    collections::BTreeMap,
    fmt,
    io::Write,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use crate::error::StorageError;

pub const ACCESS_TOKEN: &str = "accessToken";
pub const REFRESH_TOKEN: &str = "refreshToken";

/// Durable string key/value storage backing the session.
pub trait Storage: Send + Sync + fmt::Debug {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// A single JSON object on disk. Every read goes back to the file, so all
/// processes pointed at the same path see each other's writes on their next
/// access.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    // serializes read-modify-write within this process
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// `<data_local_dir>/melodex/storage.json`, falling back to the working
    /// directory when the platform has no data dir.
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .map(|dir| dir.join("melodex"))
            .unwrap_or_default()
            .join("storage.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match std::fs::read(&self.path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(BTreeMap::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, map: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        // uniquely named per writer, so processes never share a temp file
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&serde_json::to_vec_pretty(map)?)?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    fn update(
        &self,
        f: impl FnOnce(&mut BTreeMap<String, String>),
    ) -> Result<(), StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        let mut map = self.read()?;
        f(&mut map);
        self.write(&map)
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.update(|map| {
            map.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.update(|map| {
            map.remove(key);
        })
    }
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    map: Mutex<BTreeMap<String, String>>,
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let map = self.map.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(map.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut map = self.map.lock().map_err(|_| StorageError::Poisoned)?;
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut map = self.map.lock().map_err(|_| StorageError::Poisoned)?;
        map.remove(key);
        Ok(())
    }
}

/// The bearer token pair and the one signal the rest of the client trusts:
/// an access token is present. Tokens are never inspected for expiry.
#[derive(Debug, Clone)]
pub struct Session {
    storage: Arc<dyn Storage>,
}

impl Session {
    pub fn new(storage: impl Storage + 'static) -> Self {
        Self {
            storage: Arc::new(storage),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::default())
    }

    pub fn set_session(&self, access_token: &str, refresh_token: &str) -> Result<(), StorageError> {
        self.storage.set(ACCESS_TOKEN, access_token)?;
        self.storage.set(REFRESH_TOKEN, refresh_token)?;
        tracing::debug!("session stored");
        Ok(())
    }

    pub fn clear_session(&self) -> Result<(), StorageError> {
        // drop both even if the first removal fails
        let access = self.storage.remove(ACCESS_TOKEN);
        let refresh = self.storage.remove(REFRESH_TOKEN);
        tracing::debug!("session cleared");
        access.and(refresh)
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some()
    }

    pub fn access_token(&self) -> Option<String> {
        self.read(ACCESS_TOKEN)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.read(REFRESH_TOKEN)
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read session storage");
                None
            }
        }
    }
}
