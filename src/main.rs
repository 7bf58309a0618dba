//! d7node simulator: host entry point.
//!
//! Runs the sensor action application against simulation adapters.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                      │
//! │                                                               │
//! │  RamStorage   NvsAdapter         QueuedTransport  LogEventSink │
//! │  (volatile)   (permanent+config) (radio queue)    (EventSink)  │
//! │  SimulatedTemperature                                          │
//! │                                                               │
//! │  ──────────────── Port Trait Boundary ───────────────────     │
//! │                                                               │
//! │  ┌─────────────────────────────────────────────────────┐      │
//! │  │  SensorActionApp ──▶ FileSystem ──▶ ActionEngine    │      │
//! │  └─────────────────────────────────────────────────────┘      │
//! │                                                               │
//! │  Scheduler (delegate-driven, TICKS_PER_SEC per second)        │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! Usage: `d7node-sim [config.json]`.  `D7NODE_RUN_SECS` sets how many
//! simulated seconds to run (default 10).

use anyhow::{Context, Result, anyhow};
use log::{info, warn};

use d7node::actp::dispatch::DispatchJob;
use d7node::adapters::log_sink::LogEventSink;
use d7node::adapters::nvs::NvsAdapter;
use d7node::adapters::radio_queue::QueuedTransport;
use d7node::adapters::ram::RamStorage;
use d7node::adapters::sensor::SimulatedTemperature;
use d7node::app::ports::{ConfigPort, SchedulerDelegate, TaskId};
use d7node::app::service::{MEASUREMENT_TASK, SensorActionApp};
use d7node::config::{NodeConfig, TICKS_PER_SEC};
use d7node::fs::FileSystem;
use d7node::scheduler::Scheduler;

const DEFAULT_RUN_SECS: u32 = 10;

// ── Scheduler delegate ────────────────────────────────────────
//
// The scheduler knows nothing about the application; due tasks are
// collected here and run by the main loop once the tick is over.

#[derive(Default)]
struct DueTasks(Vec<TaskId>);

impl SchedulerDelegate for DueTasks {
    fn on_task_due(&mut self, task: TaskId) {
        self.0.push(task);
    }
}

fn load_config(nvs: &NvsAdapter) -> Result<NodeConfig> {
    if let Some(path) = std::env::args().nth(1) {
        let text = std::fs::read_to_string(&path).with_context(|| format!("reading {}", path))?;
        let config: NodeConfig =
            serde_json::from_str(&text).map_err(|e| anyhow!("parsing {}: {}", path, e))?;
        config.validate().map_err(|e| anyhow!("{}: {}", path, e))?;
        info!("Config loaded from {}", path);
        return Ok(config);
    }
    match nvs.load() {
        Ok(cfg) => Ok(cfg),
        Err(e) => {
            warn!("NVS config load failed ({}), using defaults", e);
            Ok(NodeConfig::default())
        }
    }
}

fn run_secs() -> Result<u32> {
    match std::env::var("D7NODE_RUN_SECS") {
        Ok(v) => v
            .parse()
            .with_context(|| format!("D7NODE_RUN_SECS={} is not a number", v)),
        Err(_) => Ok(DEFAULT_RUN_SECS),
    }
}

fn log_job(job: &DispatchJob) {
    let d7node::session::InterfaceConfig::D7asp(session) = job.config;
    info!(
        "RADIO | from=0x{:02X} op=0x{:02X} resp={:?} ac=0x{:02X} payload={:02X?}",
        job.origin_file_id,
        job.command.opcode(),
        session.qos.resp_mode,
        session.addressee.access_class,
        job.response.as_deref().unwrap_or(&[]),
    );
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("d7node simulator v{}", env!("CARGO_PKG_VERSION"));

    // ── 1. Config ─────────────────────────────────────────────
    let nvs = NvsAdapter::new();
    let config = load_config(&nvs)?;
    let secs = run_secs()?;

    // ── 2. Adapters ───────────────────────────────────────────
    let mut fs = FileSystem::new(RamStorage::new(), nvs);
    let mut radio: QueuedTransport = QueuedTransport::new();
    let mut sensor = SimulatedTemperature::default();
    let mut sink = LogEventSink::new();
    let mut sched = Scheduler::new();
    let mut due = DueTasks::default();

    // ── 3. Bootstrap ──────────────────────────────────────────
    let mut app = SensorActionApp::new(config);
    app.bootstrap(&mut fs, &mut sched, &mut sink)
        .map_err(|e| anyhow!("bootstrap failed: {}", e))?;

    // ── 4. Main loop: one iteration per simulated second ──────
    for _ in 0..secs {
        sched.tick(TICKS_PER_SEC, &mut due);

        for task in due.0.drain(..) {
            if task == MEASUREMENT_TASK {
                let result = app.execute_sensor_measurement(
                    &mut fs,
                    &mut sensor,
                    &mut sched,
                    &mut radio,
                    &mut sink,
                );
                if let Err(e) = result {
                    warn!("measurement failed: {}", e);
                }
            } else {
                warn!("unknown task {}", task.0);
            }
        }

        while let Some(job) = radio.try_receive() {
            log_job(&job);
        }
    }

    let stats = fs.actions().stats();
    info!(
        "done: {} measurements, {} fired, {} dispatched, {} failed",
        app.measurements(),
        stats.fired,
        stats.dispatched,
        stats.failed
    );
    Ok(())
}
