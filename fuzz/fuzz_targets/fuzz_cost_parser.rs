//! Fuzz target for free-text cost parsing.
//!
//! Goal: cost normalization and parsing should **never panic** on any input.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_cost_parser
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use swaudit_domain::cost::{normalize_cost, parse_cost};

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let normalized = normalize_cost(text);
        // Parsing an already normalized value must agree with parsing the raw text.
        assert_eq!(parse_cost(text).ok(), parse_cost(&normalized).ok());
    }
});
