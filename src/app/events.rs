//! Outbound node events.
//!
//! The file system, the action engine and the sensor application emit these
//! through the [`EventSink`](super::ports::EventSink) port.  Adapters on the
//! other side decide what to do with them: log to serial, count them, etc.

use crate::actp::TriggerState;
use crate::error::Error;
use crate::fs::FileId;

/// Structured events emitted by the node core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeEvent {
    /// The application finished bootstrapping its files.
    Started,

    /// A write completed and was persisted.
    FileWritten { file_id: FileId, offset: u32, len: u32 },

    /// A trigger instance moved between engine states.
    TriggerTransition {
        file_id: FileId,
        from: TriggerState,
        to: TriggerState,
    },

    /// A dispatch job was accepted by the transport.
    Dispatched {
        file_id: FileId,
        alp_cmd_file_id: FileId,
        interface_file_id: FileId,
    },

    /// A trigger instance ended in the Failed state.
    TriggerFailed { file_id: FileId, error: Error },

    /// The sensor task stored a new measurement.
    Measurement { decicelsius: i16 },
}
