//! NVS (Non-Volatile Storage) adapter.
//!
//! Implements both [`ConfigPort`] and [`StoragePort`] for the node.
//!
//! - Permanent files live in the `"fs"` namespace, one blob per file keyed
//!   by its hex id (`"f40"`).  A blob always holds the whole slot.
//! - Node configuration is a postcard blob in the `"d7node"` namespace.
//! - Config is validated before it is persisted and again after it is loaded.
//!
//! The backing store is an in-memory map of `"namespace::key"` blobs, the
//! same layout a flash NVS partition presents.

use std::cell::RefCell;
use std::collections::HashMap;

use log::{info, warn};

use crate::app::ports::{ConfigError, ConfigPort, StorageError, StoragePort};
use crate::config::NodeConfig;
use crate::fs::{FileData, FileId, MAX_FILE_SIZE};

const CONFIG_NAMESPACE: &str = "d7node";
const CONFIG_KEY: &str = "nodecfg";
const FILE_NAMESPACE: &str = "fs";

/// Largest blob a single key may hold.
const MAX_BLOB_SIZE: usize = 4000;

pub struct NvsAdapter {
    store: RefCell<HashMap<String, Vec<u8>>>,
}

impl NvsAdapter {
    pub fn new() -> Self {
        info!("NvsAdapter: simulation backend");
        Self {
            store: RefCell::new(HashMap::new()),
        }
    }

    fn composite_key(namespace: &str, key: &str) -> String {
        format!("{}::{}", namespace, key)
    }

    fn file_key(file_id: FileId) -> String {
        format!("f{:02x}", file_id)
    }

    // ── Raw blob access ───────────────────────────────────────

    /// Copy the blob into `buf`, returning the number of bytes copied.
    pub fn read_blob(
        &self,
        namespace: &str,
        key: &str,
        buf: &mut [u8],
    ) -> Result<usize, StorageError> {
        let composite = Self::composite_key(namespace, key);
        match self.store.borrow().get(&composite) {
            Some(data) => {
                let len = data.len().min(buf.len());
                buf[..len].copy_from_slice(&data[..len]);
                Ok(len)
            }
            None => Err(StorageError::NotFound),
        }
    }

    pub fn write_blob(&self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        if data.len() > MAX_BLOB_SIZE {
            return Err(StorageError::Full);
        }
        let composite = Self::composite_key(namespace, key);
        self.store.borrow_mut().insert(composite, data.to_vec());
        Ok(())
    }

    /// Number of permanent files with a stored slot.
    pub fn file_count(&self) -> usize {
        let prefix = format!("{}::", FILE_NAMESPACE);
        self.store
            .borrow()
            .keys()
            .filter(|k| k.starts_with(&prefix))
            .count()
    }

    /// Erase every permanent file (factory reset).  Config is kept.
    pub fn erase_files(&self) {
        let prefix = format!("{}::", FILE_NAMESPACE);
        self.store
            .borrow_mut()
            .retain(|k: &String, _: &mut Vec<u8>| !k.starts_with(&prefix));
        info!("NvsAdapter: file namespace erased");
    }
}

impl Default for NvsAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigPort for NvsAdapter {
    fn load(&self) -> Result<NodeConfig, ConfigError> {
        let key = Self::composite_key(CONFIG_NAMESPACE, CONFIG_KEY);
        if let Some(bytes) = self.store.borrow().get(&key) {
            let cfg: NodeConfig = postcard::from_bytes(bytes).map_err(|_| ConfigError::Corrupted)?;
            cfg.validate()?;
            info!("NvsAdapter: loaded config from store ({} bytes)", bytes.len());
            Ok(cfg)
        } else {
            info!("NvsAdapter: no stored config, using defaults");
            Ok(NodeConfig::default())
        }
    }

    fn save(&self, config: &NodeConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let bytes = postcard::to_allocvec(config).map_err(|_| ConfigError::IoError)?;
        self.write_blob(CONFIG_NAMESPACE, CONFIG_KEY, &bytes)
            .map_err(|_| ConfigError::IoError)?;
        info!("NvsAdapter: config saved ({} bytes)", bytes.len());
        Ok(())
    }
}

impl StoragePort for NvsAdapter {
    fn persist(&mut self, file_id: FileId, offset: usize, data: &[u8]) -> Result<(), StorageError> {
        let Some(end) = offset.checked_add(data.len()).filter(|&end| end <= MAX_FILE_SIZE) else {
            warn!("NvsAdapter: file 0x{:02X} write at {} past slot", file_id, offset);
            return Err(StorageError::Full);
        };
        let composite = Self::composite_key(FILE_NAMESPACE, &Self::file_key(file_id));
        let mut store = self.store.borrow_mut();
        let blob = store.entry(composite).or_default();
        if blob.len() < end {
            blob.resize(end, 0);
        }
        blob[offset..end].copy_from_slice(data);
        Ok(())
    }

    fn load(
        &self,
        file_id: FileId,
        offset: usize,
        length: usize,
    ) -> Result<FileData, StorageError> {
        let mut buf = [0u8; MAX_FILE_SIZE];
        let stored = self.read_blob(FILE_NAMESPACE, &Self::file_key(file_id), &mut buf)?;
        let end = offset.checked_add(length).ok_or(StorageError::IoError)?;
        if end > stored {
            return Err(StorageError::IoError);
        }
        FileData::from_slice(&buf[offset..end]).map_err(|()| StorageError::IoError)
    }
}
