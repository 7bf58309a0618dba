//! File descriptor table.
//!
//! Fixed-capacity registry mapping a [`FileId`] to its header.  File
//! contents are never cached here: every read goes to the storage backend
//! selected by the header's [`StorageClass`], so a reader always sees what
//! was last persisted.

use heapless::FnvIndexMap;
use log::{debug, warn};

use crate::app::ports::{StorageError, StoragePort};
use crate::error::FsError;

use super::header::{AccessLevel, FileHeader, StorageClass};
use super::{FileData, FileId, MAX_FILE_SIZE, MAX_FILES};

/// Internal bookkeeping for a registered file.
#[derive(Debug, Clone, Copy)]
struct FileEntry {
    header: FileHeader,
    /// Length at registration; restored by a volatile reset.
    init_length: u32,
}

/// The file table plus the two storage backends it mediates.
pub struct FileTable<V, P> {
    entries: FnvIndexMap<FileId, FileEntry, MAX_FILES>,
    volatile: V,
    permanent: P,
}

impl<V: StoragePort, P: StoragePort> FileTable<V, P> {
    pub fn new(volatile: V, permanent: P) -> Self {
        Self {
            entries: FnvIndexMap::new(),
            volatile,
            permanent,
        }
    }

    /// Register a file and persist its initial contents.
    ///
    /// The slot is zero-filled past `initial`.  The stored length is the
    /// larger of `header.length` and `initial.len()`.
    pub fn init_file(
        &mut self,
        id: FileId,
        mut header: FileHeader,
        initial: &[u8],
    ) -> Result<(), FsError> {
        if self.entries.contains_key(&id) {
            return Err(FsError::DuplicateId);
        }
        header.validate(id)?;
        if initial.len() > header.allocated_length as usize {
            return Err(FsError::CapacityExceeded);
        }
        if self.entries.len() == MAX_FILES {
            return Err(FsError::TableFull);
        }

        let mut slot = FileData::new();
        slot.extend_from_slice(initial)
            .map_err(|()| FsError::CapacityExceeded)?;
        slot.resize(header.allocated_length as usize, 0)
            .map_err(|()| FsError::CapacityExceeded)?;
        header.length = header.length.max(initial.len() as u32);

        self.backend_mut(header.storage_class())
            .persist(id, 0, &slot)
            .map_err(|e| storage_failure(id, e))?;

        self.entries
            .insert(
                id,
                FileEntry {
                    header,
                    init_length: header.length,
                },
            )
            .map_err(|_| FsError::TableFull)?;

        debug!(
            "fs: init file 0x{:02X} ({:?}, {}/{} bytes, action={})",
            id,
            header.storage_class(),
            header.length,
            header.allocated_length,
            header.properties.action_protocol_enabled()
        );
        Ok(())
    }

    /// Write `data` at `offset`, extending `length` when the write goes past it.
    pub fn write(
        &mut self,
        access: AccessLevel,
        id: FileId,
        offset: u32,
        data: &[u8],
    ) -> Result<(), FsError> {
        let header = self.entry(id)?.header;
        if !header.permissions.allows_write(access) {
            return Err(FsError::PermissionDenied);
        }
        let end = (offset as usize)
            .checked_add(data.len())
            .filter(|&end| end <= header.allocated_length as usize)
            .ok_or(FsError::OutOfBounds)?;

        self.backend_mut(header.storage_class())
            .persist(id, offset as usize, data)
            .map_err(|e| storage_failure(id, e))?;

        // An empty write touches no bytes and leaves the length alone.
        if data.is_empty() {
            return Ok(());
        }
        if let Some(entry) = self.entries.get_mut(&id) {
            entry.header.length = entry.header.length.max(end as u32);
        }
        Ok(())
    }

    /// Copy `length` bytes at `offset`; the range must lie within the current length.
    pub fn read(
        &self,
        access: AccessLevel,
        id: FileId,
        offset: u32,
        length: u32,
    ) -> Result<FileData, FsError> {
        let header = self.entry(id)?.header;
        if !header.permissions.allows_read(access) {
            return Err(FsError::PermissionDenied);
        }
        let in_bounds = (offset as usize)
            .checked_add(length as usize)
            .is_some_and(|end| end <= header.length as usize);
        if !in_bounds {
            return Err(FsError::OutOfBounds);
        }

        self.backend(header.storage_class())
            .load(id, offset as usize, length as usize)
            .map_err(|e| storage_failure(id, e))
    }

    /// The whole current contents of a file, read as root.
    pub fn read_all(&self, id: FileId) -> Result<FileData, FsError> {
        let length = self.entry(id)?.header.length;
        self.read(AccessLevel::Root, id, 0, length)
    }

    pub fn header(&self, id: FileId) -> Result<FileHeader, FsError> {
        Ok(self.entry(id)?.header)
    }

    pub fn contains(&self, id: FileId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn file_ids(&self) -> impl Iterator<Item = FileId> + '_ {
        self.entries.keys().copied()
    }

    /// Zero every volatile file and restore its registration-time length.
    pub fn reset_volatile(&mut self) -> Result<(), FsError> {
        let zeros = [0u8; MAX_FILE_SIZE];
        for (id, entry) in &mut self.entries {
            if entry.header.storage_class() != StorageClass::Volatile {
                continue;
            }
            let allocated = entry.header.allocated_length as usize;
            self.volatile
                .persist(*id, 0, &zeros[..allocated])
                .map_err(|e| storage_failure(*id, e))?;
            entry.header.length = entry.init_length;
        }
        Ok(())
    }

    pub fn volatile_backend(&self) -> &V {
        &self.volatile
    }

    pub fn permanent_backend(&self) -> &P {
        &self.permanent
    }

    // ── Internal ──────────────────────────────────────────────

    fn entry(&self, id: FileId) -> Result<&FileEntry, FsError> {
        self.entries.get(&id).ok_or(FsError::UnknownFile)
    }

    fn backend(&self, class: StorageClass) -> &dyn StoragePort {
        match class {
            StorageClass::Volatile => &self.volatile,
            StorageClass::Permanent => &self.permanent,
        }
    }

    fn backend_mut(&mut self, class: StorageClass) -> &mut dyn StoragePort {
        match class {
            StorageClass::Volatile => &mut self.volatile,
            StorageClass::Permanent => &mut self.permanent,
        }
    }
}

fn storage_failure(id: FileId, e: StorageError) -> FsError {
    warn!("fs: storage backend failed for file 0x{:02X}: {}", id, e);
    FsError::StorageFailure
}
