//! Timer/scheduler engine.
//!
//! Deferred application tasks counted down in scheduler ticks
//! ([`TICKS_PER_SEC`](crate::config::TICKS_PER_SEC) per second).  The
//! scheduler notifies a [`SchedulerDelegate`] when a task is due; the main
//! loop implements the delegate and runs the task, which typically posts
//! itself again.
//!
//! ```text
//! ┌─────────────┐ schedule_after ┌───────────┐  tick(n)  ┌───────────┐
//! │ Application │───────────────▶│ Scheduler │◀──────────│ Main loop │
//! └─────────────┘                └─────┬─────┘           └───────────┘
//!        ▲                             │ on_task_due
//!        └─────────────────────────────┘ (SchedulerDelegate)
//! ```

use log::{debug, info, warn};

use crate::app::ports::{SchedulerDelegate, SchedulerError, SchedulerPort, TaskId};

/// Maximum number of concurrently pending tasks.
const MAX_TIMERS: usize = 4;

/// Internal bookkeeping for a pending task.
#[derive(Debug, Clone, Copy)]
struct TimerEntry {
    task: TaskId,
    remaining_ticks: u32,
}

/// The scheduler engine.
///
/// Decoupled from task execution: due tasks are reported through the
/// [`SchedulerDelegate`] callback, so the scheduler is testable on its own.
pub struct Scheduler {
    timers: [Option<TimerEntry>; MAX_TIMERS],
    /// Global enable flag.
    enabled: bool,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            timers: [None; MAX_TIMERS],
            enabled: true,
        }
    }

    /// Drop a pending task.  No-op if it is not pending.
    pub fn cancel(&mut self, task: TaskId) {
        for slot in self.timers.iter_mut() {
            if slot.is_some_and(|e| e.task == task) {
                info!("Scheduler: cancelled task {}", task.0);
                *slot = None;
            }
        }
    }

    pub fn is_pending(&self, task: TaskId) -> bool {
        self.timers.iter().flatten().any(|e| e.task == task)
    }

    /// Ticks until `task` is due, if pending.
    pub fn remaining(&self, task: TaskId) -> Option<u32> {
        self.timers
            .iter()
            .flatten()
            .find(|e| e.task == task)
            .map(|e| e.remaining_ticks)
    }

    /// Enable or disable the entire scheduler.  Disabled, time stands still.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Advance time by `elapsed_ticks`.
    ///
    /// Every task whose delay has run out is removed and reported through
    /// `delegate.on_task_due()`, in slot order.
    pub fn tick(&mut self, elapsed_ticks: u32, delegate: &mut dyn SchedulerDelegate) {
        if !self.enabled {
            return;
        }

        for slot in self.timers.iter_mut() {
            let Some(entry) = slot else {
                continue;
            };

            entry.remaining_ticks = entry.remaining_ticks.saturating_sub(elapsed_ticks);
            if entry.remaining_ticks == 0 {
                let task = entry.task;
                *slot = None;
                debug!("Scheduler: task {} due", task.0);
                delegate.on_task_due(task);
            }
        }
    }

    /// Number of pending tasks.
    pub fn active_count(&self) -> usize {
        self.timers.iter().flatten().count()
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl SchedulerPort for Scheduler {
    /// Post `task` to run after `delay_ticks`.  A task that is already
    /// pending gets its deadline replaced.
    fn schedule_after(&mut self, task: TaskId, delay_ticks: u32) -> Result<(), SchedulerError> {
        if let Some(entry) = self.timers.iter_mut().flatten().find(|e| e.task == task) {
            entry.remaining_ticks = delay_ticks;
            debug!("Scheduler: task {} re-armed ({} ticks)", task.0, delay_ticks);
            return Ok(());
        }

        for slot in self.timers.iter_mut() {
            if slot.is_none() {
                *slot = Some(TimerEntry {
                    task,
                    remaining_ticks: delay_ticks,
                });
                debug!("Scheduler: task {} armed ({} ticks)", task.0, delay_ticks);
                return Ok(());
            }
        }

        warn!("Scheduler: no free slot for task {}", task.0);
        Err(SchedulerError::Full)
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
