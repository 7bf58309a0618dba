//! d7node library.
//!
//! DASH7 sensor node core: a small file store whose files can carry
//! D7AActP action bindings.  Writing such a file decodes the ALP command
//! held in a second file and dispatches it on the interface described by a
//! third one.
//!
//! ```text
//!  app ──▶ fs ──▶ actp ──▶ alp / session ──▶ TransportPort
//! ```

#![deny(unused_must_use)]

pub mod actp;
pub mod adapters;
pub mod alp;
pub mod app;
pub mod config;
pub mod error;
pub mod fs;
pub mod scheduler;
pub mod session;
