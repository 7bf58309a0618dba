//! Action-aware file system.
//!
//! ```text
//!   write_file ──▶ FileTable ──▶ StoragePort (RAM | NVS)
//!        │
//!        └──▶ ActionEngine ──▶ read cmd + interface files ──▶ TransportPort
//! ```
//!
//! [`FileSystem`] is the only entry point application code uses.  A write
//! is not complete until trigger evaluation for it has finished: by the time
//! `write_file` returns, any action the write fired has either been handed
//! to the transport or has failed and been reported through the event sink.
//! Trigger failures never change the write's own result.

pub mod header;
pub mod table;

use log::info;

use crate::actp::ActionEngine;
use crate::app::events::NodeEvent;
use crate::app::ports::{EventSink, StoragePort, TransportPort};
use crate::error::FsError;
use crate::session::InterfaceConfig;

use header::{AccessLevel, FileHeader, StorageClass};
use table::FileTable;

/// Numeric file identifier, unique within a table.
pub type FileId = u8;

/// Maximum number of registered files (power of two for the index map).
pub const MAX_FILES: usize = 32;

/// Largest slot a single file may reserve.
pub const MAX_FILE_SIZE: usize = 64;

/// Owned copy of (part of) a file's contents.
pub type FileData = heapless::Vec<u8, MAX_FILE_SIZE>;

/// File table plus the action engine that watches it.
pub struct FileSystem<V, P> {
    table: FileTable<V, P>,
    actions: ActionEngine,
}

impl<V: StoragePort, P: StoragePort> FileSystem<V, P> {
    /// `volatile` backs [`StorageClass::Volatile`] files, `permanent` the rest.
    pub fn new(volatile: V, permanent: P) -> Self {
        Self {
            table: FileTable::new(volatile, permanent),
            actions: ActionEngine::new(),
        }
    }

    // ── Bootstrap ─────────────────────────────────────────────

    pub fn init_file(
        &mut self,
        id: FileId,
        header: FileHeader,
        initial: &[u8],
    ) -> Result<(), FsError> {
        self.table.init_file(id, header, initial)
    }

    /// Register a permanent, non-action file holding an encoded interface config.
    pub fn init_file_with_interface_config(
        &mut self,
        id: FileId,
        config: &InterfaceConfig,
    ) -> Result<(), FsError> {
        let bytes = config.encode();
        let header = FileHeader::new(StorageClass::Permanent, bytes.len() as u32);
        self.table.init_file(id, header, &bytes)?;
        info!("fs: interface config stored in file 0x{:02X}", id);
        Ok(())
    }

    // ── Access ────────────────────────────────────────────────

    /// Write as the local application (root access).
    pub fn write_file(
        &mut self,
        id: FileId,
        offset: u32,
        data: &[u8],
        transport: &mut impl TransportPort,
        sink: &mut impl EventSink,
    ) -> Result<(), FsError> {
        self.write_file_as(AccessLevel::Root, id, offset, data, transport, sink)
    }

    /// Write on behalf of `access`, then run trigger evaluation for the file.
    pub fn write_file_as(
        &mut self,
        access: AccessLevel,
        id: FileId,
        offset: u32,
        data: &[u8],
        transport: &mut impl TransportPort,
        sink: &mut impl EventSink,
    ) -> Result<(), FsError> {
        self.table.write(access, id, offset, data)?;
        sink.emit(&NodeEvent::FileWritten {
            file_id: id,
            offset,
            len: data.len() as u32,
        });
        self.actions.on_write(&self.table, id, transport, sink);
        Ok(())
    }

    pub fn read_file(&self, id: FileId, offset: u32, length: u32) -> Result<FileData, FsError> {
        self.table.read(AccessLevel::Root, id, offset, length)
    }

    pub fn read_file_as(
        &self,
        access: AccessLevel,
        id: FileId,
        offset: u32,
        length: u32,
    ) -> Result<FileData, FsError> {
        self.table.read(access, id, offset, length)
    }

    pub fn header_of(&self, id: FileId) -> Result<FileHeader, FsError> {
        self.table.header(id)
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// System reset: volatile files lose their contents.
    pub fn reset_volatile(&mut self) -> Result<(), FsError> {
        info!("fs: volatile reset");
        self.table.reset_volatile()
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn table(&self) -> &FileTable<V, P> {
        &self.table
    }

    pub fn actions(&self) -> &ActionEngine {
        &self.actions
    }
}
