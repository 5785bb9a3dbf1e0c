//! Fuzz target for per-library dataset decoding.
//!
//! Library JSON comes straight from the pipeline dump, so decoding and
//! validation must reject bad input with an error, never a panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use lv_common::{LibraryLabel, LibraryReport};

fuzz_target!(|data: &[u8]| {
    let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };
    let Ok(label) = LibraryLabel::parse("FUZZ") else {
        return;
    };
    if let Ok(report) = LibraryReport::from_value(&label, &value) {
        // Anything that decodes must also pass validation.
        assert!(report.validate(&label).is_ok());
    }
});
