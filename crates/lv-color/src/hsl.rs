//! Hue/saturation/lightness conversion.
//!
//! Hue is in degrees `[0, 360)`; saturation and lightness are in `[0, 1]`.

use crate::color::Color;

/// HSL representation of a color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    /// Convert back to RGB, rounding each channel to the nearest integer.
    pub fn to_color(&self) -> Color {
        let l = self.l.clamp(0.0, 1.0);
        let s = self.s.clamp(0.0, 1.0);

        if s == 0.0 {
            let v = channel(l);
            return Color::rgb(v, v, v);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        let h = self.h.rem_euclid(360.0) / 360.0;

        Color::rgb(
            channel(hue_to_rgb(p, q, h + 1.0 / 3.0)),
            channel(hue_to_rgb(p, q, h)),
            channel(hue_to_rgb(p, q, h - 1.0 / 3.0)),
        )
    }

    /// Same hue and saturation with a different lightness.
    pub fn with_lightness(&self, l: f64) -> Self {
        Hsl {
            h: self.h,
            s: self.s,
            l: l.clamp(0.0, 1.0),
        }
    }
}

impl From<Color> for Hsl {
    fn from(c: Color) -> Self {
        let r = c.r as f64 / 255.0;
        let g = c.g as f64 / 255.0;
        let b = c.b as f64 / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;

        if max == min {
            return Hsl { h: 0.0, s: 0.0, l };
        }

        let d = max - min;
        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };
        let h = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };

        Hsl { h: h * 60.0, s, l }
    }
}

impl From<Hsl> for Color {
    fn from(hsl: Hsl) -> Self {
        hsl.to_color()
    }
}

fn hue_to_rgb(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn channel(v: f64) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}
