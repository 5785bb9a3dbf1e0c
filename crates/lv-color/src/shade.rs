//! Gradient shading.
//!
//! Derives `count` tonal variants of a base color by raising its HSL lightness
//! linearly from `+0` (first step) to `+MAX_LIGHTEN` (last step).

use crate::color::Color;
use crate::hsl::Hsl;

/// Lightness added at the final step.
pub const MAX_LIGHTEN: f64 = 0.5;

/// Return exactly `count` shades of `base`, non-decreasing in lightness.
///
/// Step 0 is the base color (up to HSL round-trip rounding). `count == 1`
/// yields the base color alone; `count == 0` yields an empty list.
pub fn shades(base: Color, count: usize) -> Vec<Color> {
    let hsl = Hsl::from(base);
    let denom = count.saturating_sub(1).max(1) as f64;

    (0..count)
        .map(|i| {
            let factor = (i as f64 / denom) * MAX_LIGHTEN;
            hsl.with_lightness(hsl.l + factor).to_color()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLUE: Color = Color::rgb(0x33, 0x66, 0xcc);

    #[test]
    fn test_single_shade_is_base() {
        let s = shades(BLUE, 1);
        assert_eq!(s.len(), 1);
        assert!(s[0].max_channel_delta(&BLUE) <= 1);
    }

    #[test]
    fn test_zero_count_is_empty() {
        assert!(shades(BLUE, 0).is_empty());
    }

    #[test]
    fn test_last_shade_is_lighter_by_half() {
        let s = shades(BLUE, 5);
        assert_eq!(s.len(), 5);
        let first = Hsl::from(s[0]).l;
        let last = Hsl::from(s[4]).l;
        assert!(last > first);
        // 0.5 + 0.5 clamps to white
        assert_eq!(s[4], Color::rgb(255, 255, 255));
    }

    #[test]
    fn test_dark_base_does_not_saturate() {
        let dark = Color::rgb(0x10, 0x20, 0x40);
        let s = shades(dark, 3);
        let l0 = Hsl::from(dark).l;
        let l2 = Hsl::from(s[2]).l;
        assert!((l2 - (l0 + MAX_LIGHTEN)).abs() < 0.01);
    }

    #[test]
    fn test_pair_for_overlay() {
        let s = shades(BLUE, 2);
        assert_eq!(s.len(), 2);
        assert_ne!(s[0], s[1]);
    }
}
