//! D7AActP action trigger engine.
//!
//! Each qualifying mutation starts one trigger instance that walks:
//!
//! ```text
//!  Idle ──▶ Triggered ──▶ Decoded ──▶ DispatchReady ──▶ Idle
//!              │             │              │
//!              └─────────────┴──────────────┴──▶ Failed ──▶ Idle
//! ```
//!
//! * **Triggered**: the command file is read in full and decoded.
//! * **Decoded**: the interface file is read and parsed, the command runs
//!   locally and the dispatch job is built.
//! * **DispatchReady**: the job is handed to the transport.
//!
//! Instances run to completion on the caller's stack before
//! [`ActionEngine::on_write`] returns.  The engine is borrowed `&mut` for the
//! whole run, so a second instance cannot start until the first one is back
//! in Idle.  Command and interface files are re-read for every instance.

pub mod dispatch;

use log::{debug, info, warn};

use crate::alp;
use crate::app::events::NodeEvent;
use crate::app::ports::{EventSink, StoragePort, TransportPort};
use crate::error::Error;
use crate::fs::header::{ActionBinding, ActionCondition};
use crate::fs::table::FileTable;
use crate::fs::FileId;

/// States of a single trigger instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerState {
    Idle,
    Triggered,
    Decoded,
    DispatchReady,
    Failed,
}

#[derive(Debug, Clone, Copy)]
struct Trigger {
    file_id: FileId,
    binding: ActionBinding,
}

/// Counters for observability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    pub fired: u32,
    pub dispatched: u32,
    pub failed: u32,
}

pub struct ActionEngine {
    stats: EngineStats,
    last_failure: Option<(FileId, Error)>,
}

impl ActionEngine {
    pub fn new() -> Self {
        Self {
            stats: EngineStats::default(),
            last_failure: None,
        }
    }

    /// Evaluate the write trigger of `file_id` and run it if it fires.
    ///
    /// Failures are contained: they are logged and emitted as
    /// [`NodeEvent::TriggerFailed`], never returned.
    pub fn on_write<V: StoragePort, P: StoragePort>(
        &mut self,
        table: &FileTable<V, P>,
        file_id: FileId,
        transport: &mut impl TransportPort,
        sink: &mut impl EventSink,
    ) {
        let Ok(header) = table.header(file_id) else {
            return;
        };
        let Some(binding) = header.action() else {
            return;
        };
        if binding.condition != ActionCondition::Write {
            return;
        }

        self.run(table, Trigger { file_id, binding }, transport, sink);
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    /// The most recent trigger failure, if any.
    pub fn last_failure(&self) -> Option<(FileId, Error)> {
        self.last_failure
    }

    // ── Internal ──────────────────────────────────────────────

    fn run<V: StoragePort, P: StoragePort>(
        &mut self,
        table: &FileTable<V, P>,
        trigger: Trigger,
        transport: &mut impl TransportPort,
        sink: &mut impl EventSink,
    ) {
        let file_id = trigger.file_id;
        let mut state = TriggerState::Idle;
        self.stats.fired += 1;
        transition(file_id, &mut state, TriggerState::Triggered, sink);

        match Self::advance(table, trigger, &mut state, transport, sink) {
            Ok(()) => {
                self.stats.dispatched += 1;
                info!(
                    "actp: file 0x{:02X} action dispatched (cmd 0x{:02X}, itf 0x{:02X})",
                    file_id, trigger.binding.alp_cmd_file_id, trigger.binding.interface_file_id
                );
                sink.emit(&NodeEvent::Dispatched {
                    file_id,
                    alp_cmd_file_id: trigger.binding.alp_cmd_file_id,
                    interface_file_id: trigger.binding.interface_file_id,
                });
            }
            Err(error) => {
                self.stats.failed += 1;
                self.last_failure = Some((file_id, error));
                warn!("actp: file 0x{:02X} trigger failed in {:?}: {}", file_id, state, error);
                transition(file_id, &mut state, TriggerState::Failed, sink);
                sink.emit(&NodeEvent::TriggerFailed { file_id, error });
            }
        }
        transition(file_id, &mut state, TriggerState::Idle, sink);
    }

    /// Walk Triggered → Decoded → DispatchReady and submit.  Returns at the
    /// first error with `state` left where it failed.
    fn advance<V: StoragePort, P: StoragePort>(
        table: &FileTable<V, P>,
        trigger: Trigger,
        state: &mut TriggerState,
        transport: &mut impl TransportPort,
        sink: &mut impl EventSink,
    ) -> Result<(), Error> {
        let file_id = trigger.file_id;

        let raw = table.read_all(trigger.binding.alp_cmd_file_id)?;
        let command = alp::decode(&raw)?;
        debug!("actp: file 0x{:02X} decoded opcode 0x{:02X}", file_id, command.opcode());
        transition(file_id, state, TriggerState::Decoded, sink);

        let job = dispatch::bind(table, file_id, &trigger.binding, command)?;
        transition(file_id, state, TriggerState::DispatchReady, sink);

        transport.submit(&job)?;
        Ok(())
    }
}

impl Default for ActionEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn transition(
    file_id: FileId,
    state: &mut TriggerState,
    to: TriggerState,
    sink: &mut impl EventSink,
) {
    let from = *state;
    *state = to;
    debug!("actp: file 0x{:02X} {:?} -> {:?}", file_id, from, to);
    sink.emit(&NodeEvent::TriggerTransition { file_id, from, to });
}
