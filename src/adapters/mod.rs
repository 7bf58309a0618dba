//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements       | Connects to                 |
//! |---------------|------------------|-----------------------------|
//! | `log_sink`    | EventSink        | Serial log output           |
//! | `nvs`         | ConfigPort       | NVS / in-memory store       |
//! |               | StoragePort      | permanent files             |
//! | `radio_queue` | TransportPort    | D7 session layer queue      |
//! | `ram`         | StoragePort      | volatile files              |
//! | `sensor`      | TemperaturePort  | temperature sensor / sim    |

pub mod log_sink;
pub mod nvs;
pub mod radio_queue;
pub mod ram;
pub mod sensor;
