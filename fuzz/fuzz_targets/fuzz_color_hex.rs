//! Fuzz target for hex color parsing.

#![no_main]

use libfuzzer_sys::fuzz_target;
use lv_color::Color;

fuzz_target!(|data: &str| {
    if let Ok(color) = Color::from_hex(data) {
        let hex = color.to_hex();
        assert_eq!(Color::from_hex(&hex).ok(), Some(color));
    }
});
