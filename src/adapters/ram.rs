//! RAM storage adapter for volatile files.
//!
//! One fixed slot per file.  Contents survive until [`RamStorage::clear`] or
//! until the file table resets volatile files.

use heapless::FnvIndexMap;

use crate::app::ports::{StorageError, StoragePort};
use crate::fs::{FileData, FileId, MAX_FILES};

#[derive(Debug, Default)]
pub struct RamStorage {
    slots: FnvIndexMap<FileId, FileData, MAX_FILES>,
}

impl RamStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Power loss.
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

impl StoragePort for RamStorage {
    fn persist(&mut self, file_id: FileId, offset: usize, data: &[u8]) -> Result<(), StorageError> {
        let end = offset.checked_add(data.len()).ok_or(StorageError::Full)?;
        if !self.slots.contains_key(&file_id) {
            self.slots
                .insert(file_id, FileData::new())
                .map_err(|_| StorageError::Full)?;
        }
        let slot = self.slots.get_mut(&file_id).ok_or(StorageError::IoError)?;
        if slot.len() < end {
            slot.resize(end, 0).map_err(|()| StorageError::Full)?;
        }
        slot[offset..end].copy_from_slice(data);
        Ok(())
    }

    fn load(
        &self,
        file_id: FileId,
        offset: usize,
        length: usize,
    ) -> Result<FileData, StorageError> {
        let slot = self.slots.get(&file_id).ok_or(StorageError::NotFound)?;
        let end = offset.checked_add(length).ok_or(StorageError::IoError)?;
        let bytes = slot.get(offset..end).ok_or(StorageError::IoError)?;
        FileData::from_slice(bytes).map_err(|()| StorageError::IoError)
    }
}
