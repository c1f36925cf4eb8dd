use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};
use serde_json::{from_reader, to_string};
use crate::host::{KeyValueStore, StorageError};

/// Key-value storage persisted as a single JSON object on disk.
///
/// Every write rewrites the whole file, so a value survives the process the
/// same way `localStorage` survives a page redirect.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        JsonFileStore {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_items(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(StorageError::Read(format!("Failed to open file: {}", e))),
        };

        from_reader(BufReader::new(file))
            .map_err(|e| StorageError::Read(format!("Failed to parse storage file: {}", e)))
    }

    fn write_items(&self, items: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .map_err(|e| StorageError::Write(format!("Failed to open file for writing: {}", e)))?;

        let json = to_string(items)
            .map_err(|e| StorageError::Write(format!("Failed to serialize storage: {}", e)))?;

        file.write_all(json.as_bytes())
            .map_err(|e| StorageError::Write(format!("Failed to write to file: {}", e)))?;

        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_items()?.remove(key))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.read_items()?;
        items.insert(key.to_string(), value.to_string());
        self.write_items(&items)
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        let mut items = self.read_items()?;
        if items.remove(key).is_some() {
            self.write_items(&items)?;
        }
        Ok(())
    }
}
