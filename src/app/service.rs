//! Sensor action application: the node's user code.
//!
//! [`SensorActionApp`] owns nothing but its configuration.  It lays out
//! three user files and runs a periodic measurement task; the file system's
//! action engine does the rest.
//!
//! ```text
//!  TemperaturePort ──▶ ┌─────────────────┐ write  ┌────────────┐
//!                      │ SensorActionApp │───────▶│ FileSystem │──▶ TransportPort
//!  SchedulerPort   ◀── └─────────────────┘        └────────────┘
//! ```
//!
//! | File                | Class     | Contents                             |
//! |---------------------|-----------|--------------------------------------|
//! | `sensor_file_id`    | volatile  | temperature, i16 BE; action on write |
//! | `action_file_id`    | permanent | `READ_FILE_DATA sensor, 0, 2`        |
//! | `interface_file_id` | permanent | D7ASP session config                  |

use log::{info, warn};

use crate::alp::{self, ActionCommand};
use crate::config::NodeConfig;
use crate::error::{Error, Result};
use crate::fs::FileSystem;
use crate::fs::header::{ActionBinding, ActionCondition, FileHeader, StorageClass};
use crate::session::InterfaceConfig;

use super::events::NodeEvent;
use super::ports::{EventSink, SchedulerPort, StoragePort, TaskId, TemperaturePort, TransportPort};

/// The periodic measurement task.
pub const MEASUREMENT_TASK: TaskId = TaskId(1);

/// Size of one measurement in the sensor file.
const SENSOR_VALUE_LEN: u32 = 2;

pub struct SensorActionApp {
    config: NodeConfig,
    measurements: u32,
}

impl SensorActionApp {
    pub fn new(config: NodeConfig) -> Self {
        Self {
            config,
            measurements: 0,
        }
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// Number of measurements stored so far.
    pub fn measurements(&self) -> u32 {
        self.measurements
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Register the action, interface and sensor files.
    ///
    /// The sensor file goes last so both files its binding names already
    /// exist when it is registered.
    pub fn init_user_files<V: StoragePort, P: StoragePort>(
        &self,
        fs: &mut FileSystem<V, P>,
    ) -> Result<()> {
        let cfg = &self.config;

        let command = alp::encode(&ActionCommand::read_file_data(
            cfg.sensor_file_id,
            0,
            SENSOR_VALUE_LEN as u8,
        ));
        fs.init_file(
            cfg.action_file_id,
            FileHeader::new(StorageClass::Permanent, command.len() as u32),
            &command,
        )?;

        let interface = InterfaceConfig::D7asp(cfg.session);
        fs.init_file_with_interface_config(cfg.interface_file_id, &interface)?;

        let sensor_header =
            FileHeader::new(StorageClass::Volatile, SENSOR_VALUE_LEN).with_action(ActionBinding {
                condition: ActionCondition::Write,
                alp_cmd_file_id: cfg.action_file_id,
                interface_file_id: cfg.interface_file_id,
            });
        fs.init_file(cfg.sensor_file_id, sensor_header, &[])?;

        info!(
            "app: user files ready (sensor 0x{:02X}, action 0x{:02X}, interface 0x{:02X})",
            cfg.sensor_file_id, cfg.action_file_id, cfg.interface_file_id
        );
        Ok(())
    }

    /// Register the user files and arm the first measurement.
    pub fn bootstrap<V: StoragePort, P: StoragePort>(
        &self,
        fs: &mut FileSystem<V, P>,
        scheduler: &mut impl SchedulerPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        self.init_user_files(fs)?;
        self.schedule_next(scheduler)?;
        sink.emit(&NodeEvent::Started);
        Ok(())
    }

    // ── Tasks ─────────────────────────────────────────────────

    /// Take one reading and store it in the sensor file.
    ///
    /// The write fires the sensor file's action.  The next measurement is
    /// scheduled even when the write fails; the write error is returned
    /// afterwards.
    pub fn execute_sensor_measurement<V: StoragePort, P: StoragePort>(
        &mut self,
        fs: &mut FileSystem<V, P>,
        sensor: &mut impl TemperaturePort,
        scheduler: &mut impl SchedulerPort,
        transport: &mut impl TransportPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        let temperature = sensor.read_decicelsius().unwrap_or_else(|| {
            warn!("app: no temperature sensor, sending 0");
            0
        });
        info!("temp {} dC", temperature);
        sink.emit(&NodeEvent::Measurement {
            decicelsius: temperature,
        });

        let written = fs.write_file(
            self.config.sensor_file_id,
            0,
            &temperature.to_be_bytes(),
            transport,
            sink,
        );
        if written.is_ok() {
            self.measurements += 1;
        }

        self.schedule_next(scheduler)?;
        written.map_err(Error::from)
    }

    fn schedule_next(&self, scheduler: &mut impl SchedulerPort) -> Result<()> {
        scheduler
            .schedule_after(MEASUREMENT_TASK, self.config.sensor_interval_ticks)
            .map_err(|e| {
                warn!("app: cannot schedule measurement: {}", e);
                Error::Schedule("measurement task")
            })
    }
}
