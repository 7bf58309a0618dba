//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured node events to the
//! logger (serial console on a device, stderr in the simulator).

use log::{debug, info, warn};

use crate::app::events::NodeEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`NodeEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &NodeEvent) {
        match event {
            NodeEvent::Started => info!("START | user files ready"),
            NodeEvent::FileWritten { file_id, offset, len } => {
                debug!("WRITE | file=0x{:02X} offset={} len={}", file_id, offset, len);
            }
            NodeEvent::TriggerTransition { file_id, from, to } => {
                debug!("ACTP  | file=0x{:02X} {:?} -> {:?}", file_id, from, to);
            }
            NodeEvent::Dispatched {
                file_id,
                alp_cmd_file_id,
                interface_file_id,
            } => {
                info!(
                    "ACTP  | file=0x{:02X} dispatched cmd=0x{:02X} itf=0x{:02X}",
                    file_id, alp_cmd_file_id, interface_file_id
                );
            }
            NodeEvent::TriggerFailed { file_id, error } => {
                warn!("ACTP  | file=0x{:02X} failed: {}", file_id, error);
            }
            NodeEvent::Measurement { decicelsius } => {
                info!("TEMP  | {} dC", decicelsius);
            }
        }
    }
}
