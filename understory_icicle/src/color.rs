// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Label contrast against a cell's fill color.

/// Decides whether a fill color is light, so labels on it stay dark.
pub trait Contrast {
    /// True if text drawn on `color` should be dark.
    fn is_light(&self, color: &str) -> bool;
}

/// Perceived-brightness contrast: a color is light when
/// `(299 r + 587 g + 114 b) / 1000 ≥ 128`.
///
/// Understands `#rgb`, `#rrggbb`, `rgb(r, g, b)`, `rgba(r, g, b, a)` and a
/// handful of CSS names. Anything else is treated as black.
#[derive(Copy, Clone, Debug, Default)]
pub struct Luminance;

impl Contrast for Luminance {
    fn is_light(&self, color: &str) -> bool {
        let (r, g, b) = parse(color).unwrap_or((0, 0, 0));
        let brightness = (299 * u32::from(r) + 587 * u32::from(g) + 114 * u32::from(b)) / 1000;
        brightness >= 128
    }
}

const NAMED: &[(&str, (u8, u8, u8))] = &[
    ("black", (0, 0, 0)),
    ("white", (255, 255, 255)),
    ("lightgrey", (211, 211, 211)),
    ("lightgray", (211, 211, 211)),
    ("grey", (128, 128, 128)),
    ("gray", (128, 128, 128)),
    ("darkgrey", (169, 169, 169)),
    ("darkgray", (169, 169, 169)),
    ("red", (255, 0, 0)),
    ("green", (0, 128, 0)),
    ("blue", (0, 0, 255)),
    ("yellow", (255, 255, 0)),
    ("orange", (255, 165, 0)),
    ("purple", (128, 0, 128)),
    ("steelblue", (70, 130, 180)),
    ("navy", (0, 0, 128)),
    ("teal", (0, 128, 128)),
];

fn parse(color: &str) -> Option<(u8, u8, u8)> {
    let c = color.trim().to_ascii_lowercase();
    if let Some(hex) = c.strip_prefix('#') {
        return parse_hex(hex);
    }
    if let Some(args) = c
        .strip_prefix("rgba(")
        .or_else(|| c.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'))
    {
        let mut parts = args.split(',').map(|p| p.trim().parse::<f64>().ok());
        let mut channel = || parts.next().flatten().map(clamp_channel);
        return Some((channel()?, channel()?, channel()?));
    }
    NAMED.iter().find(|(name, _)| *name == c).map(|(_, rgb)| *rgb)
}

fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let digit = |i: usize| u8::from_str_radix(hex.get(i..=i)?, 16).ok();
    let pair = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    match hex.len() {
        3 => Some((digit(0)? * 17, digit(1)? * 17, digit(2)? * 17)),
        6 => Some((pair(0)?, pair(2)?, pair(4)?)),
        _ => None,
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "The value is rounded and clamped to the u8 range first."
)]
fn clamp_channel(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_fill_is_light() {
        assert!(Luminance.is_light("lightgrey"));
        assert!(Luminance.is_light("#fff"));
        assert!(Luminance.is_light(" #FFFF00 "));
    }

    #[test]
    fn dark_fills_are_detected() {
        assert!(!Luminance.is_light("navy"));
        assert!(!Luminance.is_light("#333333"));
        assert!(!Luminance.is_light("rgb(20, 40, 60)"));
        assert!(!Luminance.is_light("steelblue"));
    }

    #[test]
    fn rgb_functions_are_parsed() {
        assert_eq!(parse("rgba(255, 128, 0, 0.5)"), Some((255, 128, 0)));
        assert_eq!(parse("rgb(300,-4,12.4)"), Some((255, 0, 12)));
        assert_eq!(parse("rgb(1, 2)"), None);
    }

    #[test]
    fn unknown_colors_count_as_black() {
        assert_eq!(parse("#12"), None);
        assert_eq!(parse("chartreuse-ish"), None);
        assert!(!Luminance.is_light("chartreuse-ish"));
    }
}
