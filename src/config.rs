//! Node configuration parameters
//!
//! File layout and timing for the sensor action application, plus the D7
//! session used for the interface file.  Values can be overridden via NVS
//! or a JSON file handed to the simulator.

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;
use crate::fs::FileId;
use crate::session::SessionConfig;

/// Timer resolution of the node scheduler.
pub const TICKS_PER_SEC: u32 = 1024;

/// Core node configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    // --- File layout ---
    /// File the sensor task writes its measurement into
    pub sensor_file_id: FileId,
    /// File holding the ALP command executed on each sensor write
    pub action_file_id: FileId,
    /// File holding the interface config the result is sent on
    pub interface_file_id: FileId,

    // --- Timing ---
    /// Delay between measurements (scheduler ticks)
    pub sensor_interval_ticks: u32,

    // --- Interface ---
    /// Session used to transmit sensor data
    pub session: SessionConfig,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            // File layout
            sensor_file_id: 0x40,
            action_file_id: 0x41,
            interface_file_id: 0x42,

            // Timing
            sensor_interval_ticks: TICKS_PER_SEC, // 1 Hz

            // Interface: no ack, no retry, access class 0x01
            session: SessionConfig::default(),
        }
    }
}

impl NodeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sensor_file_id == self.action_file_id
            || self.sensor_file_id == self.interface_file_id
            || self.action_file_id == self.interface_file_id
        {
            return Err(ConfigError::ValidationFailed("file ids must be distinct"));
        }
        if self.sensor_interval_ticks == 0 {
            return Err(ConfigError::ValidationFailed(
                "sensor_interval_ticks must be non-zero",
            ));
        }
        Ok(())
    }
}
