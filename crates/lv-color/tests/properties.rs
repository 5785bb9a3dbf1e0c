//! Property-based tests for category coloring and gradient shading.
//!
//! Uses proptest to verify the color contract holds across many random inputs.

use lv_color::{shades, Color, ColorTable, Hsl, DEFAULT_KNOWN_REGIONS, DEFAULT_PALETTE};
use proptest::prelude::*;

/// Per-channel tolerance for an HSL round trip.
const CHANNEL_TOL: u8 = 1;

fn any_color() -> impl Strategy<Value = Color> {
    (any::<u8>(), any::<u8>(), any::<u8>()).prop_map(|(r, g, b)| Color::rgb(r, g, b))
}

fn unknown_label() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,11}".prop_filter("must not be a known region", |s| {
        !DEFAULT_KNOWN_REGIONS.iter().any(|(k, _)| k == s)
    })
}

// ============================================================================
// ColorTable properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Repeated lookups of the same label return the same color.
    #[test]
    fn color_for_is_idempotent(labels in prop::collection::vec("[A-Za-z0-9]{1,8}", 1..40)) {
        let mut table = ColorTable::default();
        let first: Vec<Color> = labels.iter().map(|l| table.color_for(l)).collect();
        let second: Vec<Color> = labels.iter().map(|l| table.color_for(l)).collect();
        prop_assert_eq!(first, second);
    }

    /// Known regions return their fixed color whatever was assigned before.
    #[test]
    fn known_regions_ignore_history(noise in prop::collection::vec(unknown_label(), 0..30)) {
        let mut table = ColorTable::default();
        for label in &noise {
            table.color_for(label);
        }
        for (region, color) in DEFAULT_KNOWN_REGIONS.iter() {
            prop_assert_eq!(table.color_for(region), *color);
        }
    }

    /// Distinct unknown labels follow the palette order and stay distinct
    /// while the palette has not wrapped.
    #[test]
    fn unknown_labels_follow_palette(labels in prop::collection::hash_set(unknown_label(), 1..=10)) {
        let mut table = ColorTable::default();
        let labels: Vec<String> = labels.into_iter().collect();
        let colors: Vec<Color> = labels.iter().map(|l| table.color_for(l)).collect();
        for (i, color) in colors.iter().enumerate() {
            prop_assert_eq!(*color, DEFAULT_PALETTE[i % DEFAULT_PALETTE.len()]);
        }
        for i in 0..colors.len() {
            for j in (i + 1)..colors.len() {
                prop_assert_ne!(colors[i], colors[j]);
            }
        }
    }
}

// ============================================================================
// Gradient shading properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// A single shade is the base color up to round-trip rounding.
    #[test]
    fn single_shade_round_trips(base in any_color()) {
        let s = shades(base, 1);
        prop_assert_eq!(s.len(), 1);
        prop_assert!(s[0].max_channel_delta(&base) <= CHANNEL_TOL,
            "shades({}, 1) = {} drifted", base, s[0]);
    }

    /// Length is exact and lightness never decreases along the sequence.
    #[test]
    fn shades_len_and_monotone(base in any_color(), count in 1usize..24) {
        let s = shades(base, count);
        prop_assert_eq!(s.len(), count);
        let lightness: Vec<f64> = s.iter().map(|c| Hsl::from(*c).l).collect();
        for w in lightness.windows(2) {
            prop_assert!(w[1] + 1e-9 >= w[0], "lightness decreased: {:?}", lightness);
        }
    }

    /// Hex formatting and parsing are inverse.
    #[test]
    fn hex_round_trip(c in any_color()) {
        prop_assert_eq!(Color::from_hex(&c.to_hex()).unwrap(), c);
    }
}
