//! Currency selection store.
//!
//! Holds the shopper's active currency, persists it under the
//! `preferred-currency` key and publishes changes to subscribers. The store
//! is injected into whatever renders prices rather than read from a global.
//!
//! Initialization reads the persisted value; a missing, unreadable or
//! unrecognized value falls back to the base currency.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use krona_core::CurrencyCode;
use thiserror::Error;
use tokio::sync::watch;

/// Storage key for the persisted currency preference.
pub const PREFERRED_CURRENCY_KEY: &str = "preferred-currency";

/// Errors that can occur when changing the selection.
#[derive(Debug, Error)]
pub enum SelectionError {
    /// The preference could not be persisted; the selection is unchanged.
    #[error("Failed to persist currency preference: {0}")]
    Storage(#[from] io::Error),
}

// =============================================================================
// Preference Storage
// =============================================================================

/// Durable key/value storage for plain-text client preferences.
pub trait PreferenceStorage: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the backing store cannot be read.
    fn load(&self, key: &str) -> io::Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the value cannot be written.
    fn save(&self, key: &str, value: &str) -> io::Result<()>;
}

/// Stores each key as a plain-text file in a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Storage rooted at `dir`; the directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl PreferenceStorage for FileStorage {
    fn load(&self, key: &str) -> io::Result<Option<String>> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn save(&self, key: &str, value: &str) -> io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        // Write then rename so readers never see a partial value.
        let tmp = self.path_for(&format!(".{key}.tmp"));
        std::fs::write(&tmp, value)?;
        std::fs::rename(tmp, self.path_for(key))
    }
}

/// In-memory storage for tests and sessions that should not persist.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStorage for MemoryStorage {
    fn load(&self, key: &str) -> io::Result<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|_| io::Error::other("preference storage lock poisoned"))?;
        Ok(values.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> io::Result<()> {
        self.values
            .lock()
            .map_err(|_| io::Error::other("preference storage lock poisoned"))?
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

// =============================================================================
// CurrencyStore
// =============================================================================

/// Observable, persisted currency selection.
pub struct CurrencyStore {
    storage: Arc<dyn PreferenceStorage>,
    current: watch::Sender<CurrencyCode>,
}

impl std::fmt::Debug for CurrencyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurrencyStore")
            .field("current", &self.get())
            .finish_non_exhaustive()
    }
}

impl CurrencyStore {
    /// Initialize from the persisted preference, defaulting to the base
    /// currency.
    #[must_use]
    pub fn load(storage: Arc<dyn PreferenceStorage>) -> Self {
        let initial = match storage.load(PREFERRED_CURRENCY_KEY) {
            Ok(Some(value)) => value.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(value = %value.trim(), "ignoring unrecognized currency preference");
                CurrencyCode::BASE
            }),
            Ok(None) => CurrencyCode::BASE,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read currency preference");
                CurrencyCode::BASE
            }
        };

        let (current, _) = watch::channel(initial);
        Self { storage, current }
    }

    /// The active currency.
    #[must_use]
    pub fn get(&self) -> CurrencyCode {
        *self.current.borrow()
    }

    /// Select a currency.
    ///
    /// The value is persisted first; once this returns `Ok`, [`get`](Self::get)
    /// returns `code` and subscribers have been notified if it changed.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the preference cannot be written, in which case
    /// the selection is left unchanged.
    pub fn set(&self, code: CurrencyCode) -> Result<(), SelectionError> {
        self.storage.save(PREFERRED_CURRENCY_KEY, code.code())?;

        let changed = self.current.send_if_modified(|current| {
            if *current == code {
                false
            } else {
                *current = code;
                true
            }
        });

        if changed {
            tracing::info!(currency = %code, "currency selection changed");
        }
        Ok(())
    }

    /// Receive the current selection and every later change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CurrencyCode> {
        self.current.subscribe()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    struct FailingStorage;

    impl PreferenceStorage for FailingStorage {
        fn load(&self, _key: &str) -> io::Result<Option<String>> {
            Err(io::Error::other("unavailable"))
        }

        fn save(&self, _key: &str, _value: &str) -> io::Result<()> {
            Err(io::Error::other("read-only"))
        }
    }

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("krona-selection-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_defaults_to_base_currency() {
        let store = CurrencyStore::load(Arc::new(MemoryStorage::new()));
        assert_eq!(store.get(), CurrencyCode::SEK);
    }

    #[test]
    fn test_set_is_visible_immediately() {
        let store = CurrencyStore::load(Arc::new(MemoryStorage::new()));
        store.set(CurrencyCode::USD).unwrap();
        assert_eq!(store.get(), CurrencyCode::USD);
    }

    #[test]
    fn test_set_persists_plain_code() {
        let storage = Arc::new(MemoryStorage::new());
        let store = CurrencyStore::load(storage.clone());
        store.set(CurrencyCode::USD).unwrap();
        assert_eq!(storage.load(PREFERRED_CURRENCY_KEY).unwrap().as_deref(), Some("USD"));
    }

    #[test]
    fn test_reload_reads_persisted_value() {
        let storage: Arc<dyn PreferenceStorage> = Arc::new(MemoryStorage::new());
        CurrencyStore::load(storage.clone()).set(CurrencyCode::USD).unwrap();
        assert_eq!(CurrencyStore::load(storage).get(), CurrencyCode::USD);
    }

    #[test]
    fn test_unrecognized_preference_falls_back() {
        let storage = Arc::new(MemoryStorage::new());
        storage.save(PREFERRED_CURRENCY_KEY, "EUR").unwrap();
        assert_eq!(CurrencyStore::load(storage).get(), CurrencyCode::SEK);
    }

    #[test]
    fn test_unreadable_storage_falls_back() {
        assert_eq!(CurrencyStore::load(Arc::new(FailingStorage)).get(), CurrencyCode::SEK);
    }

    #[test]
    fn test_failed_persist_leaves_selection_unchanged() {
        let store = CurrencyStore::load(Arc::new(FailingStorage));
        assert!(matches!(store.set(CurrencyCode::USD), Err(SelectionError::Storage(_))));
        assert_eq!(store.get(), CurrencyCode::SEK);
    }

    #[test]
    fn test_subscribers_see_changes() {
        let store = CurrencyStore::load(Arc::new(MemoryStorage::new()));
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());

        store.set(CurrencyCode::USD).unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), CurrencyCode::USD);

        store.set(CurrencyCode::USD).unwrap();
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_file_storage_round_trip() {
        let dir = temp_dir();
        let storage = FileStorage::new(&dir);
        assert_eq!(storage.load(PREFERRED_CURRENCY_KEY).unwrap(), None);

        storage.save(PREFERRED_CURRENCY_KEY, "USD").unwrap();
        assert_eq!(
            std::fs::read_to_string(dir.join(PREFERRED_CURRENCY_KEY)).unwrap(),
            "USD"
        );
        assert_eq!(storage.load(PREFERRED_CURRENCY_KEY).unwrap().as_deref(), Some("USD"));

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_file_storage_tolerates_trailing_newline() {
        let dir = temp_dir();
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(PREFERRED_CURRENCY_KEY), "USD\n").unwrap();

        let store = CurrencyStore::load(Arc::new(FileStorage::new(&dir)));
        assert_eq!(store.get(), CurrencyCode::USD);

        std::fs::remove_dir_all(dir).unwrap();
    }
}
