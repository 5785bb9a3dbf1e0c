//! Fuzz target for gradient shading.
//!
//! Shades never darken the base and always come back in the requested
//! number.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use lv_color::{shades, Color, Hsl};

#[derive(Debug, Arbitrary)]
struct ShadeInput {
    r: u8,
    g: u8,
    b: u8,
    count: u8,
}

fuzz_target!(|input: ShadeInput| {
    let base = Color::rgb(input.r, input.g, input.b);
    let out = shades(base, input.count as usize);
    assert_eq!(out.len(), input.count as usize);

    let base_l = Hsl::from(base).l;
    for shade in out {
        assert!(Hsl::from(shade).l + 0.01 >= base_l);
    }
});
