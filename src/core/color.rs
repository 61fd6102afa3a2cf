//! Color mixing for blend previews.
//!
//! Blends are mixed as weighted averages in RGB space (pigment-style,
//! subtractive) and then nudged in HSL space so the result looks like
//! juice rather than printer ink.

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Fallback swatch for empty or all-zero blends.
pub const DEFAULT_JUICE_COLOR: &str = "#16a34a";

const SATURATION_DAMPING: f64 = 0.85;
const MIN_LIGHTNESS: f64 = 20.0;
const MAX_LIGHTNESS: f64 = 80.0;
const MIN_OPACITY: f64 = 0.7;
const EDGE_DARKEN: f64 = 30.0;

/// One ingredient's contribution to the visual mix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorPortion {
    pub color: String,
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy)]
struct Rgb {
    r: f64,
    g: f64,
    b: f64,
}

#[derive(Debug, Clone, Copy)]
struct Hsl {
    h: f64,
    s: f64,
    l: f64,
}

impl Rgb {
    const BLACK: Rgb = Rgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    fn to_hex(self) -> String {
        format!(
            "#{:02x}{:02x}{:02x}",
            self.r.round() as u8,
            self.g.round() as u8,
            self.b.round() as u8
        )
    }

    fn to_hsl(self) -> Hsl {
        let r = self.r / 255.0;
        let g = self.g / 255.0;
        let b = self.b / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;

        if max == min {
            return Hsl {
                h: 0.0,
                s: 0.0,
                l: l * 100.0,
            };
        }

        let d = max - min;
        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };
        let h = if max == r {
            ((g - b) / d + if g < b { 6.0 } else { 0.0 }) / 6.0
        } else if max == g {
            ((b - r) / d + 2.0) / 6.0
        } else {
            ((r - g) / d + 4.0) / 6.0
        };

        Hsl {
            h: h * 360.0,
            s: s * 100.0,
            l: l * 100.0,
        }
    }
}

impl Hsl {
    fn to_rgb(self) -> Rgb {
        let h = self.h / 360.0;
        let s = self.s / 100.0;
        let l = self.l / 100.0;

        if s == 0.0 {
            return Rgb {
                r: l * 255.0,
                g: l * 255.0,
                b: l * 255.0,
            };
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;

        Rgb {
            r: hue_to_rgb(p, q, h + 1.0 / 3.0) * 255.0,
            g: hue_to_rgb(p, q, h) * 255.0,
            b: hue_to_rgb(p, q, h - 1.0 / 3.0) * 255.0,
        }
    }
}

fn hue_to_rgb(p: f64, q: f64, t: f64) -> f64 {
    let t = if t < 0.0 {
        t + 1.0
    } else if t > 1.0 {
        t - 1.0
    } else {
        t
    };

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

/// Parses `#rrggbb` (leading `#` optional). Unparseable input is treated
/// as black, matching what an opaque unknown ingredient would look like.
fn parse_hex(hex: &str) -> Option<Rgb> {
    let re = Regex::new(r"^#?([0-9a-fA-F]{2})([0-9a-fA-F]{2})([0-9a-fA-F]{2})$").unwrap();
    let caps = re.captures(hex)?;
    let channel = |i: usize| u8::from_str_radix(&caps[i], 16).ok().map(f64::from);

    Some(Rgb {
        r: channel(1)?,
        g: channel(2)?,
        b: channel(3)?,
    })
}

/// Mixes ingredient colors into the swatch shown for the whole blend.
///
/// Portions with a zero or negative percentage are ignored and the rest
/// are normalized, so `60/40` and `30/20` produce the same color. Empty
/// input falls back to [`DEFAULT_JUICE_COLOR`].
pub fn mix_juice_colors(portions: &[ColorPortion]) -> String {
    let valid: Vec<&ColorPortion> = portions.iter().filter(|p| p.percentage > 0.0).collect();
    let total: f64 = valid.iter().map(|p| p.percentage).sum();

    if valid.is_empty() || total == 0.0 {
        return DEFAULT_JUICE_COLOR.to_string();
    }

    let mut mixed = Rgb::BLACK;
    for portion in &valid {
        let rgb = parse_hex(&portion.color).unwrap_or(Rgb::BLACK);
        let weight = portion.percentage / total;
        mixed.r += rgb.r * weight;
        mixed.g += rgb.g * weight;
        mixed.b += rgb.b * weight;
    }

    let mut hsl = mixed.to_hsl();
    hsl.s *= SATURATION_DAMPING;
    hsl.l = hsl.l.clamp(MIN_LIGHTNESS, MAX_LIGHTNESS);

    hsl.to_rgb().to_hex()
}

/// Estimates how opaque the juice looks: darker and more saturated
/// blends read as less transparent.
pub fn estimate_opacity(color: &str) -> f64 {
    let hsl = parse_hex(color).unwrap_or(Rgb::BLACK).to_hsl();

    let lightness_opacity = 1.0 - (hsl.l / 100.0) * 0.3;
    let saturation_opacity = 0.7 + (hsl.s / 100.0) * 0.3;

    ((lightness_opacity + saturation_opacity) / 2.0).clamp(MIN_OPACITY, 1.0)
}

/// Suggests a garnish color: the complement of the juice hue, slightly
/// more saturated, at medium lightness.
pub fn suggest_garnish_color(juice_color: &str) -> String {
    let hsl = parse_hex(juice_color).unwrap_or(Rgb::BLACK).to_hsl();

    let garnish = Hsl {
        h: (hsl.h + 180.0) % 360.0,
        s: (hsl.s + 20.0).min(100.0),
        l: 50.0,
    };

    garnish.to_rgb().to_hex()
}

/// CSS gradient for the bottle fill animation. The fill percentage is
/// clamped to [0, 100]; an empty bottle renders as `transparent`.
pub fn get_bottle_fill_gradient(color: &str, fill_percentage: f64) -> String {
    let fill = fill_percentage.clamp(0.0, 100.0);
    if fill == 0.0 {
        return "transparent".to_string();
    }

    let rgb = parse_hex(color).unwrap_or(Rgb::BLACK);
    let darker = Rgb {
        r: (rgb.r - EDGE_DARKEN).max(0.0),
        g: (rgb.g - EDGE_DARKEN).max(0.0),
        b: (rgb.b - EDGE_DARKEN).max(0.0),
    }
    .to_hex();

    format!("linear-gradient(to top, {darker} 0%, {color} 20%, {color} 80%, {darker} 100%)")
}
