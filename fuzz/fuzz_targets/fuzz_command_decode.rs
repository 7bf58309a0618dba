//! Fuzz target: `alp::decode`
//!
//! Arbitrary action-file contents must decode to a command or a typed
//! error, never panic.  Every decoded command re-encodes to the exact
//! input bytes.
//!
//! cargo fuzz run fuzz_command_decode

#![no_main]

use d7node::alp;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(cmd) = alp::decode(data) {
        let encoded = alp::encode(&cmd);
        assert_eq!(&encoded[..], data, "encode must invert decode");
        assert_eq!(alp::decode(&encoded), Ok(cmd));
    }
});
