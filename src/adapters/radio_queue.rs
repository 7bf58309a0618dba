//! Outbound radio queue.
//!
//! Implements [`TransportPort`] on top of a bounded `embassy-sync` channel.
//! The action engine enqueues [`DispatchJob`]s; the radio task drains them
//! at its own pace.  A full queue rejects the job instead of blocking.
//!
//! ```text
//! ┌──────────────┐ DispatchJob ┌────────────┐
//! │ ActionEngine │────────────▶│ Radio task │
//! │  (sync)      │             │            │
//! └──────────────┘             └────────────┘
//! ```

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::channel::Channel;
use log::{debug, warn};

use crate::actp::dispatch::DispatchJob;
use crate::app::ports::TransportPort;
use crate::error::TransportError;

/// Default queue depth.
pub const RADIO_QUEUE_DEPTH: usize = 4;

pub struct QueuedTransport<const N: usize = RADIO_QUEUE_DEPTH> {
    channel: Channel<NoopRawMutex, DispatchJob, N>,
}

impl<const N: usize> QueuedTransport<N> {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
        }
    }

    /// Next job for the radio, if any.
    pub fn try_receive(&self) -> Option<DispatchJob> {
        self.channel.try_receive().ok()
    }

    pub fn len(&self) -> usize {
        self.channel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }
}

impl<const N: usize> Default for QueuedTransport<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> TransportPort for QueuedTransport<N> {
    fn submit(&mut self, job: &DispatchJob) -> Result<(), TransportError> {
        match self.channel.try_send(job.clone()) {
            Ok(()) => {
                debug!("radio: queued job from file 0x{:02X}", job.origin_file_id);
                Ok(())
            }
            Err(_) => {
                warn!("radio: queue full, job from file 0x{:02X} rejected", job.origin_file_id);
                Err(TransportError::QueueFull)
            }
        }
    }
}
