//! Port traits: the hexagonal boundary between the node core and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ FileSystem / ActionEngine / SensorActionApp
//! ```
//!
//! Driven adapters (storage media, the radio session layer, the timer,
//! sensors, event sinks) implement these traits.  The core consumes them via
//! generics injected at call sites, so it never touches hardware directly.

use crate::actp::dispatch::DispatchJob;
use crate::config::NodeConfig;
use crate::error::TransportError;
use crate::fs::{FileData, FileId};

// ───────────────────────────────────────────────────────────────
// Storage port (driven adapter: file table ↔ RAM / NVS)
// ───────────────────────────────────────────────────────────────

/// Byte-range storage for file contents.
///
/// The file table owns one backend per storage class: a RAM backend for
/// volatile files and an NVS backend for permanent ones.  Calls are
/// synchronous and bounded; the core never retries a failed call.
pub trait StoragePort {
    /// Write `data` at `offset` within the file's slot.
    fn persist(&mut self, file_id: FileId, offset: usize, data: &[u8]) -> Result<(), StorageError>;

    /// Copy `length` bytes starting at `offset` out of the file's slot.
    fn load(&self, file_id: FileId, offset: usize, length: usize) -> Result<FileData, StorageError>;
}

// ───────────────────────────────────────────────────────────────
// Transport port (driven adapter: core → D7 session layer)
// ───────────────────────────────────────────────────────────────

/// Hand-off point for fired actions.  Fire-and-forget: the core does not
/// await completion and does not retry a rejected job.
pub trait TransportPort {
    fn submit(&mut self, job: &DispatchJob) -> Result<(), TransportError>;
}

// ───────────────────────────────────────────────────────────────
// Scheduler port (driven adapter: app → timer)
// ───────────────────────────────────────────────────────────────

/// Identifies a deferrable application task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub u8);

/// Defers application tasks.  Posting a task that is already pending
/// replaces its deadline.
pub trait SchedulerPort {
    fn schedule_after(&mut self, task: TaskId, delay_ticks: u32) -> Result<(), SchedulerError>;
}

/// Callback invoked by the [`Scheduler`](crate::scheduler::Scheduler) when
/// a task's delay has elapsed.  The main loop implements this to run the task.
pub trait SchedulerDelegate {
    fn on_task_due(&mut self, task: TaskId);
}

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → app)
// ───────────────────────────────────────────────────────────────

pub trait TemperaturePort {
    /// Temperature in decicelsius, or `None` when no sensor is fitted.
    fn read_decicelsius(&mut self) -> Option<i16>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: core → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The core emits structured [`NodeEvent`](super::events::NodeEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::NodeEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: app ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists node configuration.
///
/// Implementations MUST validate before persisting; invalid values are
/// rejected with [`ConfigError::ValidationFailed`], never clamped.
pub trait ConfigPort {
    /// Returns [`NodeConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<NodeConfig, ConfigError>;

    fn save(&self, config: &NodeConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug)]
pub enum ConfigError {
    /// Stored config failed deserialization.
    Corrupted,
    /// A config field failed validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

/// Errors from [`StoragePort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Nothing was ever persisted for this file.
    NotFound,
    /// The slot or partition cannot hold the data.
    Full,
    /// Generic I/O error.
    IoError,
}

/// Errors from [`SchedulerPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerError {
    /// Every timer slot is occupied.
    Full,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "file not persisted"),
            Self::Full => write!(f, "storage full"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl core::fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Full => write!(f, "timer slots exhausted"),
        }
    }
}
