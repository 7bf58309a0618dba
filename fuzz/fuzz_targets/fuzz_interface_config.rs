//! Fuzz target: `InterfaceConfig::decode`
//!
//! Interface files can be rewritten remotely, so the parser sees
//! arbitrary bytes.  Accepted configs must re-encode bit-exactly.
//!
//! cargo fuzz run fuzz_interface_config

#![no_main]

use d7node::session::InterfaceConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(config) = InterfaceConfig::decode(data) {
        assert_eq!(&config.encode()[..], data);
    }
});
