// Copyright 2026 the Curtain Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Translucent color resolution for the backdrop layer.
//!
//! [`to_translucent`] accepts the color notations a page author is likely to
//! put in an attribute and always produces an [`Rgba`]:
//!
//! - `#rgb` shorthand hex (each digit doubled),
//! - `#rrggbb` / `rrggbb` hex,
//! - a raw `r,g,b` channel triple (`"12, 34, 56"`); channels may be
//!   fractional or out of range and are clamped to `0..=255`,
//! - one of the sixteen CSS Level 1 color keywords.
//!
//! Anything else resolves to white. A leading `#` commits the input to hex
//! notation, so `#12,34,56` is white rather than a channel triple. Shorthand
//! needs the `#`: a bare three-letter word such as `bad` is not a color.

use core::fmt;

/// An sRGB color with straight alpha, formatted as a CSS `rgba()` value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha in `[0, 1]`.
    pub a: f32,
}

impl Rgba {
    /// Opaque-channel white at the given alpha; the fallback for unparseable input.
    #[must_use]
    pub const fn white(a: f32) -> Self {
        Self {
            r: 255,
            g: 255,
            b: 255,
            a,
        }
    }

    /// Returns the channel triple.
    #[must_use]
    pub const fn channels(&self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// Resolves `spec` to a color with the given `opacity`.
///
/// `opacity` is clamped to `[0, 1]`. Never fails: malformed input yields
/// [`Rgba::white`].
#[must_use]
pub fn to_translucent(spec: &str, opacity: f32) -> Rgba {
    let a = if opacity.is_nan() {
        1.0
    } else {
        opacity.clamp(0.0, 1.0)
    };
    let spec = spec.trim();
    let channels = if spec.starts_with('#') {
        parse_hex(spec)
    } else {
        parse_bare_hex(spec)
            .or_else(|| parse_triple(spec))
            .or_else(|| keyword(spec))
    };
    match channels {
        Some((r, g, b)) => Rgba { r, g, b, a },
        None => Rgba::white(a),
    }
}

/// Parses `rrggbb`.
fn parse_bare_hex(digits: &str) -> Option<(u8, u8, u8)> {
    if digits.len() != 6 {
        return None;
    }
    parse_digits(digits)
}

/// Parses `#rgb` or `#rrggbb`.
fn parse_hex(spec: &str) -> Option<(u8, u8, u8)> {
    parse_digits(spec.strip_prefix('#')?)
}

fn parse_digits(digits: &str) -> Option<(u8, u8, u8)> {
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let bytes = digits.as_bytes();
    match bytes.len() {
        3 => Some((
            nibble(bytes[0]) * 0x11,
            nibble(bytes[1]) * 0x11,
            nibble(bytes[2]) * 0x11,
        )),
        6 => Some((
            (nibble(bytes[0]) << 4) | nibble(bytes[1]),
            (nibble(bytes[2]) << 4) | nibble(bytes[3]),
            (nibble(bytes[4]) << 4) | nibble(bytes[5]),
        )),
        _ => None,
    }
}

/// Value of a single ASCII hex digit. Callers check `is_ascii_hexdigit` first.
const fn nibble(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        b'A'..=b'F' => b - b'A' + 10,
        _ => 0,
    }
}

/// Parses a comma-separated `r,g,b` triple of numbers. Channels are clamped
/// to `0..=255` and rounded, as CSS does for `rgb()` arguments.
fn parse_triple(spec: &str) -> Option<(u8, u8, u8)> {
    let mut parts = spec.split(',').map(|p| channel(p.trim()));
    let r = parts.next()??;
    let g = parts.next()??;
    let b = parts.next()??;
    if parts.next().is_some() {
        return None;
    }
    Some((r, g, b))
}

fn channel(raw: &str) -> Option<u8> {
    let v = raw.parse::<f32>().ok().filter(|v| v.is_finite())?;
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "the value is clamped to 0..=255 and rounded first"
    )]
    let c = {
        // `f32::round` is unavailable in `no_std`; for the clamped,
        // non-negative range this is exactly round-half-away-from-zero.
        let v = v.clamp(0.0, 255.0);
        let t = v as u8;
        if v - f32::from(t) >= 0.5 { t + 1 } else { t }
    };
    Some(c)
}

fn keyword(spec: &str) -> Option<(u8, u8, u8)> {
    const KEYWORDS: [(&str, (u8, u8, u8)); 16] = [
        ("black", (0, 0, 0)),
        ("silver", (192, 192, 192)),
        ("gray", (128, 128, 128)),
        ("white", (255, 255, 255)),
        ("maroon", (128, 0, 0)),
        ("red", (255, 0, 0)),
        ("purple", (128, 0, 128)),
        ("fuchsia", (255, 0, 255)),
        ("green", (0, 128, 0)),
        ("lime", (0, 255, 0)),
        ("olive", (128, 128, 0)),
        ("yellow", (255, 255, 0)),
        ("navy", (0, 0, 128)),
        ("blue", (0, 0, 255)),
        ("teal", (0, 128, 128)),
        ("aqua", (0, 255, 255)),
    ];
    KEYWORDS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(spec))
        .map(|&(_, rgb)| rgb)
}
