//! Session Store
//!
//! Holds the bearer credential and persists it across restarts. The token is
//! opaque: it is never inspected, only stored, returned and cleared.

use std::sync::{PoisonError, RwLock};

/// Storage key (file name on native, localStorage key in the browser)
pub const TOKEN_KEY: &str = "niq_token";

/// Durable holder of the bearer credential
pub trait SessionStore: Send + Sync {
    /// Current credential, if one is resident
    fn get(&self) -> Option<String>;

    /// Replace the credential; `None` removes the persisted entry
    fn set(&self, token: Option<&str>);
}

/// In-process store, nothing survives a restart
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    token: RwLock<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a credential
    pub fn with_token(token: &str) -> Self {
        Self {
            token: RwLock::new(Some(token.to_string())),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set(&self, token: Option<&str>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = token.map(str::to_string);
    }
}

#[cfg(feature = "native")]
pub use file::FileSessionStore;

#[cfg(feature = "native")]
mod file {
    use super::{SessionStore, TOKEN_KEY};
    use std::path::{Path, PathBuf};
    use std::sync::{PoisonError, RwLock};

    /// Token persisted as a single file under the data directory
    ///
    /// Reads go to disk once and are cached afterwards; writes go through.
    #[derive(Debug)]
    pub struct FileSessionStore {
        path: PathBuf,
        cached: RwLock<Option<Option<String>>>,
    }

    impl FileSessionStore {
        pub fn new(data_dir: impl AsRef<Path>) -> Self {
            Self {
                path: data_dir.as_ref().join(TOKEN_KEY),
                cached: RwLock::new(None),
            }
        }

        /// Location of the token file
        pub fn path(&self) -> &Path {
            &self.path
        }

        fn read_from_disk(&self) -> Option<String> {
            match std::fs::read_to_string(&self.path) {
                Ok(content) => {
                    let token = content.trim();
                    (!token.is_empty()).then(|| token.to_string())
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
                Err(e) => {
                    tracing::warn!("Failed to read session file {:?}: {}", self.path, e);
                    None
                }
            }
        }

        fn write_to_disk(&self, token: Option<&str>) -> std::io::Result<()> {
            match token {
                Some(token) => {
                    if let Some(parent) = self.path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&self.path, token)?;
                    restrict_permissions(&self.path)
                }
                None => match std::fs::remove_file(&self.path) {
                    Ok(()) => Ok(()),
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                    Err(e) => Err(e),
                },
            }
        }
    }

    #[cfg(unix)]
    fn restrict_permissions(path: &Path) -> std::io::Result<()> {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
    }

    #[cfg(not(unix))]
    fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
        Ok(())
    }

    impl SessionStore for FileSessionStore {
        fn get(&self) -> Option<String> {
            if let Some(cached) = self
                .cached
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
            {
                return cached;
            }

            let token = self.read_from_disk();
            *self.cached.write().unwrap_or_else(PoisonError::into_inner) = Some(token.clone());
            token
        }

        fn set(&self, token: Option<&str>) {
            if let Err(e) = self.write_to_disk(token) {
                tracing::warn!("Failed to persist session to {:?}: {}", self.path, e);
            }
            *self.cached.write().unwrap_or_else(PoisonError::into_inner) =
                Some(token.map(str::to_string));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemorySessionStore::new();
        assert!(store.get().is_none());

        store.set(Some("abc"));
        assert_eq!(store.get().as_deref(), Some("abc"));

        store.set(None);
        assert!(store.get().is_none());
    }

    #[cfg(feature = "native")]
    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();

        let store = FileSessionStore::new(dir.path());
        store.set(Some("tok-123"));
        assert!(store.path().exists());

        let reopened = FileSessionStore::new(dir.path());
        assert_eq!(reopened.get().as_deref(), Some("tok-123"));
    }

    #[cfg(feature = "native")]
    #[test]
    fn test_file_store_clear_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("nested"));

        store.set(Some("tok"));
        store.set(None);

        assert!(!store.path().exists());
        assert!(store.get().is_none());
        assert!(FileSessionStore::new(dir.path().join("nested")).get().is_none());
    }
}
