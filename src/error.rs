//! Unified error types for the node core.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! trigger engine's failure reporting uniform.  All variants are `Copy` so
//! they can be carried inside [`NodeEvent`](crate::app::events::NodeEvent)s
//! and logged without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the core funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A file table operation failed.
    Fs(FsError),
    /// An ALP command or interface config could not be decoded.
    Codec(CodecError),
    /// The transport refused a dispatch job.
    Transport(TransportError),
    /// The scheduler could not accept a task.
    Schedule(&'static str),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fs(e) => write!(f, "fs: {e}"),
            Self::Codec(e) => write!(f, "codec: {e}"),
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Schedule(msg) => write!(f, "schedule: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// File system errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsError {
    /// No file is registered under the identifier.
    UnknownFile,
    /// The requested range lies outside the file.
    OutOfBounds,
    /// The requester's access level may not perform the operation.
    PermissionDenied,
    /// A file with this identifier is already registered.
    DuplicateId,
    /// Initial data or length does not fit the allocated slot.
    CapacityExceeded,
    /// The storage backend failed; the operation was not retried.
    StorageFailure,
    /// The header's action binding is malformed (e.g. references itself).
    InvalidHeader,
    /// Every file slot is already in use.
    TableFull,
}

impl fmt::Display for FsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownFile => write!(f, "unknown file"),
            Self::OutOfBounds => write!(f, "out of bounds"),
            Self::PermissionDenied => write!(f, "permission denied"),
            Self::DuplicateId => write!(f, "duplicate file id"),
            Self::CapacityExceeded => write!(f, "capacity exceeded"),
            Self::StorageFailure => write!(f, "storage failure"),
            Self::InvalidHeader => write!(f, "invalid file header"),
            Self::TableFull => write!(f, "file table full"),
        }
    }
}

impl From<FsError> for Error {
    fn from(e: FsError) -> Self {
        Self::Fs(e)
    }
}

// ---------------------------------------------------------------------------
// Codec errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    /// The command ended before its operand was complete.
    TruncatedCommand,
    /// A fixed-size command carried bytes after its operand.
    TrailingBytes,
    /// The command does not fit an action file slot.
    CommandTooLong,
    /// The interface file does not hold a recognised configuration.
    InvalidInterfaceConfig,
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TruncatedCommand => write!(f, "truncated command"),
            Self::TrailingBytes => write!(f, "trailing bytes after command"),
            Self::CommandTooLong => write!(f, "command too long"),
            Self::InvalidInterfaceConfig => write!(f, "invalid interface config"),
        }
    }
}

impl From<CodecError> for Error {
    fn from(e: CodecError) -> Self {
        Self::Codec(e)
    }
}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

/// Surfaced by the transport port; never retried by the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// The outbound queue has no room for another job.
    QueueFull,
    /// The interface is down or not configured.
    Unavailable,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QueueFull => write!(f, "transmit queue full"),
            Self::Unavailable => write!(f, "interface unavailable"),
        }
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
