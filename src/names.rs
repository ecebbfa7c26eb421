//! Unique config/alias names backed by a persisted key-value store.
//!
//! The store keeps a single key holding a JSON array of every name handed
//! out. Store failures never reach the caller: an unreadable or corrupt
//! value reads as an empty set and a failed write is logged and dropped.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Store key holding the issued names.
pub const NAMES_KEY: &str = "existing_crosshair_names_v1";

/// Prefix used when no explicit base is configured.
pub const DEFAULT_PREFIX: &str = "crosshair_";

/// Suffix symbols: lowercase ASCII letters and digits.
pub const SUFFIX_ALPHABET: &[u8; 36] = b"abcdefghijklmnopqrstuvwxyz0123456789";

pub const SUFFIX_LEN: usize = 5;

/// Retries after the first candidate before giving up on uniqueness.
pub const MAX_ATTEMPTS: usize = 1000;

/// Errors from a [`KeyValueStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("name store unavailable: {0}")]
    Unavailable(#[from] std::io::Error),
}

/// Minimal persisted key-value capability.
pub trait KeyValueStore {
    /// Value for `key`, `None` if it was never written.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// One file per key under a directory (`<dir>/<key>.json`).
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Does not create the directory; it is created on first write.
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Store under the platform data directory.
    /// Default: ~/.local/share/crosshair-cfg/
    pub fn with_default_dir() -> Self {
        Self::new(default_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path_for(key), value)?;
        Ok(())
    }
}

/// Default directory for [`FileStore`].
pub fn default_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from(".local/share"))
        .join("crosshair-cfg")
}

/// In-memory store, optionally failing on demand.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    fail_reads: bool,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose reads and writes always fail.
    pub fn unavailable() -> Self {
        Self {
            fail_reads: true,
            fail_writes: true,
            ..Self::default()
        }
    }

    /// Pre-populate `key`.
    pub fn with_entry(self, key: &str, value: &str) -> Self {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
        self
    }

    fn failure(op: &str) -> StoreError {
        StoreError::Unavailable(std::io::Error::other(format!("{} disabled", op)))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        if self.fail_reads {
            return Err(Self::failure("read"));
        }
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(Self::failure("write"));
        }
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Hands out `base + random suffix` names that have not been issued before.
pub struct NameAllocator<S, R = SmallRng> {
    store: S,
    rng: R,
}

impl<S: KeyValueStore> NameAllocator<S, SmallRng> {
    /// Allocator over `store` with an entropy-seeded RNG.
    pub fn new(store: S) -> Self {
        Self::with_rng(store, SmallRng::from_entropy())
    }
}

impl<S: KeyValueStore, R: Rng> NameAllocator<S, R> {
    /// Allocator with a caller-supplied RNG.
    ///
    /// # Arguments
    ///
    /// * `store` - Where the issued-name set is read from and written to
    /// * `rng` - Suffix source; pass a seeded RNG for reproducible names
    pub fn with_rng(store: S, rng: R) -> Self {
        Self { store, rng }
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Names issued so far, in issue order. Empty when the store is absent,
    /// unreadable or corrupt.
    pub fn issued_names(&self) -> Vec<String> {
        let content = match self.store.get(NAMES_KEY) {
            Ok(Some(content)) => content,
            Ok(None) => return Vec::new(),
            Err(e) => {
                log::warn!("{}; starting from an empty name set", e);
                return Vec::new();
            }
        };
        serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!("ignoring corrupt name store: {}", e);
            Vec::new()
        })
    }

    fn random_suffix(&mut self) -> String {
        (0..SUFFIX_LEN)
            .map(|_| char::from(SUFFIX_ALPHABET[self.rng.gen_range(0..SUFFIX_ALPHABET.len())]))
            .collect()
    }

    /// Allocate a name not present in the store and record it.
    ///
    /// Best effort: after [`MAX_ATTEMPTS`] colliding retries the last
    /// candidate is returned anyway. Persisting the updated set may fail
    /// silently.
    pub fn ensure_unique_name(&mut self, base: &str) -> String {
        let mut names = self.issued_names();
        let taken: HashSet<&str> = names.iter().map(String::as_str).collect();

        let mut candidate = format!("{}{}", base, self.random_suffix());
        let mut tries = 0;
        while taken.contains(candidate.as_str()) && tries < MAX_ATTEMPTS {
            candidate = format!("{}{}", base, self.random_suffix());
            tries += 1;
        }
        let fresh = !taken.contains(candidate.as_str());
        drop(taken);
        if fresh {
            names.push(candidate.clone());
        } else {
            log::warn!(
                "no unique name after {} attempts, reusing {}",
                MAX_ATTEMPTS,
                candidate
            );
        }

        match serde_json::to_string(&names) {
            Ok(json) => {
                if let Err(e) = self.store.set(NAMES_KEY, &json) {
                    log::warn!("could not persist issued names: {}", e);
                }
            }
            Err(e) => log::warn!("could not encode issued names: {}", e),
        }

        log::debug!("allocated name {}", candidate);
        candidate
    }
}
