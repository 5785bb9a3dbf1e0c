//! Fuzz target for report configuration parsing.

#![no_main]

use libfuzzer_sys::fuzz_target;
use lv_report::ReportConfig;

fuzz_target!(|data: &[u8]| {
    let Ok(json) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(config) = ReportConfig::from_json(json) {
        if config.validate().is_ok() {
            // A valid config always yields a usable color table.
            assert!(config.colors.build_table().is_ok());
        }
    }
});
