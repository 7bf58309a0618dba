//! Mock port adapters for integration tests.
//!
//! Record every transport submission and emitted event so tests can assert
//! on the full history.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use d7node::actp::TriggerState;
use d7node::actp::dispatch::DispatchJob;
use d7node::app::events::NodeEvent;
use d7node::app::ports::{
    EventSink, SchedulerError, SchedulerPort, StorageError, StoragePort, TaskId, TransportPort,
};
use d7node::error::TransportError;
use d7node::fs::{FileData, FileId};

// ── RecordingTransport ────────────────────────────────────────

#[derive(Default)]
pub struct RecordingTransport {
    pub jobs: Vec<DispatchJob>,
    /// Reject every submission with this error when set.
    pub reject_with: Option<TransportError>,
}

impl TransportPort for RecordingTransport {
    fn submit(&mut self, job: &DispatchJob) -> Result<(), TransportError> {
        if let Some(e) = self.reject_with {
            return Err(e);
        }
        self.jobs.push(job.clone());
        Ok(())
    }
}

// ── VecSink ───────────────────────────────────────────────────

#[derive(Default)]
pub struct VecSink {
    pub events: Vec<NodeEvent>,
}

#[allow(dead_code)]
impl VecSink {
    /// Target state of every trigger transition, in order.
    pub fn states(&self) -> Vec<TriggerState> {
        self.events
            .iter()
            .filter_map(|e| match e {
                NodeEvent::TriggerTransition { to, .. } => Some(*to),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&NodeEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for VecSink {
    fn emit(&mut self, event: &NodeEvent) {
        self.events.push(event.clone());
    }
}

// ── MockStorage ───────────────────────────────────────────────

/// Map-backed storage whose failures can be switched on after it has been
/// moved into a file system, through the handle from [`MockStorage::fail_switch`].
#[derive(Default)]
pub struct MockStorage {
    slots: HashMap<FileId, Vec<u8>>,
    fail: Rc<Cell<bool>>,
}

#[allow(dead_code)]
impl MockStorage {
    pub fn fail_switch(&self) -> Rc<Cell<bool>> {
        Rc::clone(&self.fail)
    }
}

impl StoragePort for MockStorage {
    fn persist(&mut self, file_id: FileId, offset: usize, data: &[u8]) -> Result<(), StorageError> {
        if self.fail.get() {
            return Err(StorageError::IoError);
        }
        let slot = self.slots.entry(file_id).or_default();
        if slot.len() < offset + data.len() {
            slot.resize(offset + data.len(), 0);
        }
        slot[offset..offset + data.len()].copy_from_slice(data);
        Ok(())
    }

    fn load(
        &self,
        file_id: FileId,
        offset: usize,
        length: usize,
    ) -> Result<FileData, StorageError> {
        if self.fail.get() {
            return Err(StorageError::IoError);
        }
        let slot = self.slots.get(&file_id).ok_or(StorageError::NotFound)?;
        let bytes = slot.get(offset..offset + length).ok_or(StorageError::IoError)?;
        FileData::from_slice(bytes).map_err(|()| StorageError::IoError)
    }
}

// ── RecordingScheduler ────────────────────────────────────────

#[derive(Default)]
pub struct RecordingScheduler {
    pub posted: Vec<(TaskId, u32)>,
}

impl SchedulerPort for RecordingScheduler {
    fn schedule_after(&mut self, task: TaskId, delay_ticks: u32) -> Result<(), SchedulerError> {
        self.posted.push((task, delay_ticks));
        Ok(())
    }
}
