//! ALP (Application Layer Protocol) commands held in action files.
//!
//! Every command starts with a control byte:
//! ```text
//!  7       6                    5..0
//! ┌───────┬────────────────────┬────────┐
//! │ group │ response requested │ opcode │
//! └───────┴────────────────────┴────────┘
//! ```
//! Only `READ_FILE_DATA` has a decoded operand; every other opcode is
//! carried verbatim so it reaches the interface byte-for-byte.

pub mod codec;

use crate::fs::{FileId, MAX_FILE_SIZE};

pub use codec::{decode, encode};

pub const OP_NOP: u8 = 0x00;
pub const OP_READ_FILE_DATA: u8 = 0x01;
pub const OP_READ_FILE_PROPERTIES: u8 = 0x02;
pub const OP_WRITE_FILE_DATA: u8 = 0x04;
pub const OP_RETURN_FILE_DATA: u8 = 0x20;

/// Longest command an action file may hold: a whole file.
pub const MAX_COMMAND_LEN: usize = MAX_FILE_SIZE;

/// Encoded command bytes.
pub type CommandBytes = heapless::Vec<u8, MAX_COMMAND_LEN>;

/// Decoded control byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlpControl {
    pub group: bool,
    pub response_requested: bool,
    /// 6-bit opcode.
    pub op: u8,
}

impl AlpControl {
    pub const fn new(op: u8) -> Self {
        Self {
            group: false,
            response_requested: false,
            op: op & 0x3F,
        }
    }

    pub fn from_byte(raw: u8) -> Self {
        Self {
            group: raw & 0x80 != 0,
            response_requested: raw & 0x40 != 0,
            op: raw & 0x3F,
        }
    }

    pub fn to_byte(self) -> u8 {
        (u8::from(self.group) << 7) | (u8::from(self.response_requested) << 6) | (self.op & 0x3F)
    }
}

/// File data request operand: `{file id, offset, length}`, one byte each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileDataRequest {
    pub file_id: FileId,
    pub offset: u8,
    pub length: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionCommand {
    /// `READ_FILE_DATA`: read `length` bytes of `file_id` from `offset`.
    ReadFileData {
        control: AlpControl,
        request: FileDataRequest,
    },
    /// Any other opcode, kept verbatim.  Never holds a read-file-data
    /// control byte; [`decode`] always yields `ReadFileData` for those.
    Other(CommandBytes),
}

impl ActionCommand {
    /// Plain read-file-data command with no control flags set.
    pub fn read_file_data(file_id: FileId, offset: u8, length: u8) -> Self {
        Self::ReadFileData {
            control: AlpControl::new(OP_READ_FILE_DATA),
            request: FileDataRequest {
                file_id,
                offset,
                length,
            },
        }
    }

    pub fn opcode(&self) -> u8 {
        match self {
            Self::ReadFileData { control, .. } => control.op,
            Self::Other(bytes) => {
                AlpControl::from_byte(bytes.first().copied().unwrap_or(OP_NOP)).op
            }
        }
    }
}
