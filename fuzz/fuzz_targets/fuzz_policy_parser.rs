//! Fuzz target for policy document parsing and resolution.
//!
//! Goal: parsing and validation may reject any input, but must never panic.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_policy_parser
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use swaudit_settings::{DocumentFormat, parse_policy, resolve_policy};

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        for format in [DocumentFormat::Json, DocumentFormat::Toml] {
            if let Ok(doc) = parse_policy(text, format) {
                let _ = resolve_policy(doc);
            }
        }
    }
});
