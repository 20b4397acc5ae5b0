use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{StateStore, StoreError};

/// One `<key>.json` file per key inside a data directory.
///
/// The directory is created on first write. Writes go to a sibling temp file
/// which is then renamed over the target.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    dir: PathBuf,
}

impl FileStateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl StateStore for FileStateStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_err(&path)(e)),
        }
    }

    fn put(&self, key: &str, value: String) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(io_err(&self.dir))?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(io_err(&tmp))?;
        fs::rename(&tmp, &path).map_err(io_err(&path))?;

        tracing::debug!(key, path = %path.display(), "stored document");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("splitledger-store-{}", uuid::Uuid::now_v7()))
    }

    #[test]
    fn writes_one_file_per_key() {
        let dir = temp_dir();
        let store = FileStateStore::new(&dir);

        assert_eq!(store.get("participants").unwrap(), None);
        store.put("participants", "[]".to_string()).unwrap();
        assert_eq!(store.get("participants").unwrap().as_deref(), Some("[]"));
        assert!(dir.join("participants.json").exists());
        assert!(!dir.join("participants.json.tmp").exists());

        store.put("participants", "[1]".to_string()).unwrap();
        assert_eq!(store.get("participants").unwrap().as_deref(), Some("[1]"));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn unreadable_document_is_an_io_error_naming_the_path() {
        let dir = temp_dir();
        fs::create_dir_all(dir.join("expenses.json")).unwrap();
        let store = FileStateStore::new(&dir);

        match store.get("expenses") {
            Err(err @ StoreError::Io { .. }) => {
                let message = err.to_string();
                let cause = std::error::Error::source(&err).unwrap().to_string();
                assert!(message.contains("expenses.json"), "{message}");
                assert!(!message.contains(&cause), "{message}");
            }
            other => panic!("Expected Io error, got {other:?}"),
        }

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn rejects_path_like_keys() {
        let store = FileStateStore::new(temp_dir());
        for key in ["", "../escape", "a/b", ".hidden"] {
            assert!(matches!(store.get(key), Err(StoreError::InvalidKey(_))));
        }
    }
}
