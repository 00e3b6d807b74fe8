//! Fuzz target for CSV and JSON submission intake.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_submission_intake
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use swaudit_intake::{parse_csv, parse_json};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(config) = swaudit_settings::resolve_policy(swaudit_settings::default_document()) else {
        return;
    };
    let columns = &config.intake.columns;

    let _ = parse_csv(text, columns, "fuzz.csv");
    let _ = parse_json(text, columns, "fuzz.json");
});
