//! JSON file profile store
//!
//! One `<key>.json` file per profile in a flat directory, keyed by the
//! sanitized storage key so save and delete always agree on the file
//! name. A file that fails to parse is skipped with a warning instead of
//! taking the whole store down.

use std::fs;
use std::path::PathBuf;

use reflow_core::store::{storage_key, ProfileRecord, ProfileStore, StorageError, MAX_PROFILES};

pub struct JsonDirStore {
    dir: PathBuf,
}

impl JsonDirStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", storage_key(name)))
    }
}

impl ProfileStore for JsonDirStore {
    fn load_all(&mut self) -> Result<heapless::Vec<ProfileRecord, MAX_PROFILES>, StorageError> {
        let mut records = heapless::Vec::new();

        if !self.dir.exists() {
            return Ok(records);
        }

        let entries = fs::read_dir(&self.dir).map_err(|_| StorageError::ReadFailed)?;
        for entry in entries {
            let entry = entry.map_err(|_| StorageError::ReadFailed)?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            let contents = match fs::read_to_string(&path) {
                Ok(contents) => contents,
                Err(err) => {
                    eprintln!("warning: cannot read {}: {err}", path.display());
                    continue;
                }
            };

            match serde_json::from_str::<ProfileRecord>(&contents) {
                Ok(record) => {
                    if records.push(record).is_err() {
                        // Store holds more files than the runner can index
                        return Err(StorageError::Full);
                    }
                }
                Err(err) => {
                    eprintln!("warning: skipping {}: {err}", path.display());
                }
            }
        }

        Ok(records)
    }

    fn save(&mut self, record: &ProfileRecord) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir).map_err(|_| StorageError::WriteFailed)?;

        let json =
            serde_json::to_string_pretty(record).map_err(|_| StorageError::WriteFailed)?;
        fs::write(self.path_for(&record.name), json).map_err(|_| StorageError::WriteFailed)
    }

    fn delete(&mut self, name: &str) -> Result<(), StorageError> {
        let path = self.path_for(name);
        if !path.exists() {
            return Ok(());
        }
        fs::remove_file(path).map_err(|_| StorageError::DeleteFailed)
    }
}
