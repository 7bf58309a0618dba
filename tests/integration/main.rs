//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against mock ports.  All tests run on the host with no radio or flash
//! required.

mod action_trigger_tests;
mod file_table_tests;
mod mock_ports;
