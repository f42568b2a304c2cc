use std::fs;
use std::path::PathBuf;

use crate::error::StorageError;

/// Key-value persistence seam for the leaderboard.
///
/// The game treats storage as advisory: callers degrade to an empty set on
/// failed reads and drop failed writes after logging.
pub trait ScoreStore {
    /// Returns the stored value for `key`, or `None` if nothing was stored.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// File-backed store: one JSON file per key inside a base directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl ScoreStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }
}

/// In-memory store for tests.
#[cfg(test)]
#[derive(Default)]
pub struct MemStore {
    entries: std::collections::HashMap<String, String>,
}

#[cfg(test)]
impl ScoreStore for MemStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let _ = self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store that fails every operation, for degradation tests.
#[cfg(test)]
pub struct BrokenStore;

#[cfg(test)]
impl ScoreStore for BrokenStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Corrupt {
            key: key.to_string(),
            message: "store is broken".to_string(),
        })
    }

    fn write(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Io(std::io::Error::other("store is broken")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(hint: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!("cybersnake_store_{hint}_{}_{nanos}", std::process::id()))
    }

    #[test]
    fn file_store_round_trips_values() {
        let dir = temp_dir("roundtrip");
        let mut store = FileStore::new(&dir);

        assert!(store.read("scores").expect("read should succeed").is_none());
        store.write("scores", "[1,2,3]").expect("write should succeed");
        assert_eq!(
            store.read("scores").expect("read should succeed").as_deref(),
            Some("[1,2,3]")
        );

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn file_store_keys_do_not_collide() {
        let dir = temp_dir("keys");
        let mut store = FileStore::new(&dir);

        store.write("a", "first").expect("write a");
        store.write("b", "second").expect("write b");
        assert_eq!(store.read("a").expect("read a").as_deref(), Some("first"));
        assert_eq!(store.read("b").expect("read b").as_deref(), Some("second"));

        let _ = fs::remove_dir_all(dir);
    }
}
