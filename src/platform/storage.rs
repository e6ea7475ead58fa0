//! Key-value persistence backends
//!
//! The core only needs string get/set. LocalStorage on the web, a JSON file
//! natively, and an in-memory map for tests.

use std::collections::HashMap;

use crate::error::Result;

/// Opaque durable key-value store
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Volatile store (tests, or when no durable backend is available)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::FileStore;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::collections::BTreeMap;
    use std::fs;
    use std::path::{Path, PathBuf};

    use super::KeyValueStore;
    use crate::error::Result;

    /// Whole-map JSON file, rewritten on every `set`
    #[derive(Debug, Clone)]
    pub struct FileStore {
        path: PathBuf,
        entries: BTreeMap<String, String>,
    }

    impl FileStore {
        /// Open (or lazily create) the store at `path`
        pub fn open(path: impl AsRef<Path>) -> Result<Self> {
            let path = path.as_ref().to_path_buf();
            let entries = match fs::read_to_string(&path) {
                Ok(json) => serde_json::from_str(&json)?,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
                Err(e) => return Err(e.into()),
            };
            log::info!("Opened stats file {} ({} keys)", path.display(), entries.len());
            Ok(Self { path, entries })
        }

        pub fn path(&self) -> &Path {
            &self.path
        }
    }

    impl KeyValueStore for FileStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            Ok(self.entries.get(key).cloned())
        }

        fn set(&mut self, key: &str, value: &str) -> Result<()> {
            self.entries.insert(key.to_string(), value.to_string());
            let json = serde_json::to_string_pretty(&self.entries)?;
            fs::write(&self.path, json)?;
            Ok(())
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::LocalStore;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::KeyValueStore;
    use crate::error::{GameError, Result};

    /// Browser LocalStorage
    #[derive(Debug, Clone, Default)]
    pub struct LocalStore;

    impl LocalStore {
        pub fn new() -> Self {
            Self
        }

        fn storage() -> Result<web_sys::Storage> {
            web_sys::window()
                .and_then(|w| w.local_storage().ok())
                .flatten()
                .ok_or_else(|| GameError::Storage("LocalStorage not available".to_string()))
        }
    }

    impl KeyValueStore for LocalStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            Self::storage()?
                .get_item(key)
                .map_err(|e| GameError::Storage(format!("{:?}", e)))
        }

        fn set(&mut self, key: &str, value: &str) -> Result<()> {
            Self::storage()?
                .set_item(key, value)
                .map_err(|e| GameError::Storage(format!("{:?}", e)))
        }
    }
}
