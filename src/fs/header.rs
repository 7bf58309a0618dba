//! File metadata: properties, permissions and the optional action binding.

use crate::error::FsError;

use super::{FileId, MAX_FILE_SIZE};

// ---------------------------------------------------------------------------
// Storage class
// ---------------------------------------------------------------------------

/// Durability class of a file's contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum StorageClass {
    /// Backed by RAM; cleared by a system reset.
    Volatile = 1,
    /// Backed by NVS; survives power loss.
    Permanent = 3,
}

// ---------------------------------------------------------------------------
// Action condition
// ---------------------------------------------------------------------------

/// Which file access fires the action (D7A `ACT_COND` values).
///
/// Only [`ActionCondition::Write`] fires in this core; the other conditions
/// are stored so headers round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ActionCondition {
    List = 0,
    Read = 1,
    Write = 2,
    WriteFlush = 3,
}

impl ActionCondition {
    pub fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::List),
            1 => Some(Self::Read),
            2 => Some(Self::Write),
            3 => Some(Self::WriteFlush),
            _ => None,
        }
    }
}

/// Present only on action-enabled files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionBinding {
    pub condition: ActionCondition,
    /// File holding the ALP command to execute.
    pub alp_cmd_file_id: FileId,
    /// File holding the interface configuration used for dispatch.
    pub interface_file_id: FileId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileProperties {
    pub action: Option<ActionBinding>,
    pub storage_class: StorageClass,
}

impl FileProperties {
    pub fn action_protocol_enabled(&self) -> bool {
        self.action.is_some()
    }
}

// ---------------------------------------------------------------------------
// Permissions
// ---------------------------------------------------------------------------

/// Who is accessing a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessLevel {
    /// Local application and the action engine; never restricted.
    Root,
    User,
    Guest,
}

/// D7A permission byte: `enc | exe | u_r u_w u_x | g_r g_w g_x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilePermissions(pub u8);

impl FilePermissions {
    pub const ENCRYPTED: u8 = 1 << 7;
    pub const EXECUTABLE: u8 = 1 << 6;
    pub const USER_READ: u8 = 1 << 5;
    pub const USER_WRITE: u8 = 1 << 4;
    pub const USER_RUN: u8 = 1 << 3;
    pub const GUEST_READ: u8 = 1 << 2;
    pub const GUEST_WRITE: u8 = 1 << 1;
    pub const GUEST_RUN: u8 = 1;

    /// No access for anyone but root.
    pub const NONE: Self = Self(0);
    /// Read and write for user and guest.
    pub const OPEN: Self =
        Self(Self::USER_READ | Self::USER_WRITE | Self::GUEST_READ | Self::GUEST_WRITE);

    pub fn allows_read(self, level: AccessLevel) -> bool {
        match level {
            AccessLevel::Root => true,
            AccessLevel::User => self.0 & Self::USER_READ != 0,
            AccessLevel::Guest => self.0 & Self::GUEST_READ != 0,
        }
    }

    pub fn allows_write(self, level: AccessLevel) -> bool {
        match level {
            AccessLevel::Root => true,
            AccessLevel::User => self.0 & Self::USER_WRITE != 0,
            AccessLevel::Guest => self.0 & Self::GUEST_WRITE != 0,
        }
    }
}

// ---------------------------------------------------------------------------
// File header
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    pub properties: FileProperties,
    pub permissions: FilePermissions,
    /// Current payload size in bytes.
    pub length: u32,
    /// Reserved slot capacity; `length <= allocated_length` always.
    pub allocated_length: u32,
}

impl FileHeader {
    /// Plain data file with `length == allocated_length == size`.
    pub fn new(storage_class: StorageClass, size: u32) -> Self {
        Self {
            properties: FileProperties {
                action: None,
                storage_class,
            },
            permissions: FilePermissions::NONE,
            length: size,
            allocated_length: size,
        }
    }

    /// Attach an action binding (enables D7AActP on this file).
    pub fn with_action(mut self, binding: ActionBinding) -> Self {
        self.properties.action = Some(binding);
        self
    }

    pub fn with_permissions(mut self, permissions: FilePermissions) -> Self {
        self.permissions = permissions;
        self
    }

    pub fn storage_class(&self) -> StorageClass {
        self.properties.storage_class
    }

    pub fn action(&self) -> Option<ActionBinding> {
        self.properties.action
    }

    /// Structural checks run once by `init_file`.
    pub(crate) fn validate(&self, id: FileId) -> Result<(), FsError> {
        if self.allocated_length as usize > MAX_FILE_SIZE || self.length > self.allocated_length {
            return Err(FsError::CapacityExceeded);
        }
        if let Some(binding) = self.properties.action {
            if binding.alp_cmd_file_id == id || binding.interface_file_id == id {
                return Err(FsError::InvalidHeader);
            }
        }
        Ok(())
    }
}
