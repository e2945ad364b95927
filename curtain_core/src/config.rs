// Copyright 2026 the Curtain Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Declarative configuration read from target-region attributes.
//!
//! [`OverlayConfig::resolve`] reads the `data-curtain-*` attributes through a
//! lookup closure and produces a fully-defaulted record. Every attribute has a
//! total parser: absent, empty, malformed and out-of-domain values all resolve
//! to the documented default, never to an error.
//!
//! | attribute | field | default |
//! |---|---|---|
//! | `data-curtain-type` | [`loader`](OverlayConfig::loader) | `spinner` |
//! | `data-curtain-color` | [`color`](OverlayConfig::color) | `#000000` |
//! | `data-curtain-duration` | [`min_duration`](OverlayConfig::min_duration) | `0` ms |
//! | `data-curtain-bg-color` | [`background_color`](OverlayConfig::background_color) | `white` |
//! | `data-curtain-bg-opacity` | [`background_opacity`](OverlayConfig::background_opacity) | `0.8` |
//! | `data-curtain-bg-blur` | [`background_blur_px`](OverlayConfig::background_blur_px) | `0` |
//! | `data-curtain-z-index` | [`z_index`](OverlayConfig::z_index) | `9999` |
//! | `data-curtain-image` | [`image_url`](OverlayConfig::image_url) | none |
//!
//! Numbers are read from a leading numeric prefix, so units and stray
//! punctuation after the value (`"750ms"`, `"0.5;"`) are ignored.

use alloc::borrow::ToOwned as _;
use alloc::string::String;

use crate::time::Duration;

/// Marker attribute identifying a target region.
pub const MARKER_ATTR: &str = "data-curtain";
/// Marker attribute identifying the global configuration element.
pub const GLOBAL_CONFIG_ATTR: &str = "data-curtain-config";

/// Loader variant attribute.
pub const TYPE_ATTR: &str = "data-curtain-type";
/// Loader color attribute.
pub const COLOR_ATTR: &str = "data-curtain-color";
/// Minimum display duration attribute, in milliseconds.
pub const DURATION_ATTR: &str = "data-curtain-duration";
/// Backdrop color attribute.
pub const BG_COLOR_ATTR: &str = "data-curtain-bg-color";
/// Backdrop opacity attribute.
pub const BG_OPACITY_ATTR: &str = "data-curtain-bg-opacity";
/// Backdrop blur radius attribute, in pixels.
pub const BG_BLUR_ATTR: &str = "data-curtain-bg-blur";
/// Overlay stacking order attribute.
pub const Z_INDEX_ATTR: &str = "data-curtain-z-index";
/// Image loader URL attribute.
pub const IMAGE_ATTR: &str = "data-curtain-image";

/// Default loader color.
pub const DEFAULT_COLOR: &str = "#000000";
/// Default backdrop color.
pub const DEFAULT_BACKGROUND: &str = "white";
/// Default backdrop opacity.
pub const DEFAULT_BACKGROUND_OPACITY: f32 = 0.8;
/// Default overlay z-index.
pub const DEFAULT_Z_INDEX: i32 = 9999;

/// Requested loader variant.
///
/// An unrecognized name is kept verbatim so the loader factory can report it
/// when it substitutes a spinner.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum LoaderVariant {
    /// Rotating ring.
    #[default]
    Spinner,
    /// Breathing filled circle.
    Pulse,
    /// Static image from [`OverlayConfig::image_url`].
    Image,
    /// A name that matched none of the above.
    Unknown(String),
}

impl LoaderVariant {
    /// Parses a variant name, trimmed and case-insensitive.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        let name = name.trim();
        if name.eq_ignore_ascii_case("spinner") {
            Self::Spinner
        } else if name.eq_ignore_ascii_case("pulse") {
            Self::Pulse
        } else if name.eq_ignore_ascii_case("image") {
            Self::Image
        } else {
            Self::Unknown(name.to_owned())
        }
    }
}

/// Where configuration attributes are read from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum AttributeScope {
    /// Each target region carries its own attributes.
    #[default]
    PerRegion,
    /// Every region uses the attributes of the single element marked with
    /// [`GLOBAL_CONFIG_ATTR`]. Regions fall back to their own attributes when
    /// no such element exists.
    Global,
}

/// Fully-defaulted configuration for one overlay.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayConfig {
    /// Loader variant to show when the region has no element content.
    pub loader: LoaderVariant,
    /// Loader stroke/fill color, passed through to the loader untouched.
    pub color: String,
    /// Floor on how long the overlay stays up after processing begins.
    pub min_duration: Duration,
    /// Backdrop color spec, resolved by [`to_translucent`](crate::color::to_translucent).
    pub background_color: String,
    /// Backdrop opacity in `[0, 1]`.
    pub background_opacity: f32,
    /// Backdrop blur radius in pixels; `0` disables the filter.
    pub background_blur_px: u32,
    /// Overlay root z-index.
    pub z_index: i32,
    /// Image URL for [`LoaderVariant::Image`].
    pub image_url: Option<String>,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            loader: LoaderVariant::Spinner,
            color: DEFAULT_COLOR.to_owned(),
            min_duration: Duration::ZERO,
            background_color: DEFAULT_BACKGROUND.to_owned(),
            background_opacity: DEFAULT_BACKGROUND_OPACITY,
            background_blur_px: 0,
            z_index: DEFAULT_Z_INDEX,
            image_url: None,
        }
    }
}

impl OverlayConfig {
    /// Resolves a configuration from an attribute lookup.
    ///
    /// `attr` is called with full attribute names (e.g. `data-curtain-color`)
    /// and returns the raw value, if present.
    #[must_use]
    pub fn resolve(attr: impl Fn(&str) -> Option<String>) -> Self {
        let d = Self::default();
        let text = |name: &str| attr(name).filter(|v| !v.trim().is_empty());

        Self {
            loader: text(TYPE_ATTR)
                .map(|v| LoaderVariant::parse(&v))
                .unwrap_or(d.loader),
            color: text(COLOR_ATTR).map_or(d.color, |v| v.trim().to_owned()),
            min_duration: text(DURATION_ATTR)
                .and_then(|v| parse_int(&v))
                .and_then(|ms| u64::try_from(ms).ok())
                .map_or(d.min_duration, Duration::from_millis),
            background_color: text(BG_COLOR_ATTR)
                .map_or(d.background_color, |v| v.trim().to_owned()),
            background_opacity: text(BG_OPACITY_ATTR)
                .and_then(|v| parse_float(&v))
                .filter(|o| (0.0..=1.0).contains(o))
                .unwrap_or(d.background_opacity),
            background_blur_px: text(BG_BLUR_ATTR)
                .and_then(|v| parse_int(&v))
                .and_then(|px| u32::try_from(px).ok())
                .unwrap_or(d.background_blur_px),
            z_index: text(Z_INDEX_ATTR)
                .and_then(|v| parse_int(&v))
                .and_then(|z| i32::try_from(z).ok())
                .unwrap_or(d.z_index),
            image_url: text(IMAGE_ATTR).map(|v| v.trim().to_owned()),
        }
    }

    /// Returns the image URL to preload, if this overlay shows an image.
    #[must_use]
    pub fn preload_url(&self) -> Option<&str> {
        match self.loader {
            LoaderVariant::Image => self.image_url.as_deref(),
            _ => None,
        }
    }
}

/// Parses a base-10 integer prefix: optional sign, then at least one digit.
/// Trailing text (`"500ms"`) is ignored.
fn parse_int(raw: &str) -> Option<i64> {
    let s = raw.trim();
    let (negative, digits) = match s.as_bytes().first()? {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    #[expect(
        clippy::from_str_radix_10,
        reason = "the radix is spelled out so the parse never depends on a prefix"
    )]
    let magnitude = i64::from_str_radix(&digits[..end], 10).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Parses a decimal float prefix: optional sign, digits with at most one
/// `.`, and an exponent only when digits follow it. Trailing text (`"0.5;"`)
/// is ignored, as with the integer parser.
fn parse_float(raw: &str) -> Option<f32> {
    let s = raw.trim();
    let b = s.as_bytes();
    let mut end = usize::from(matches!(b.first(), Some(b'-' | b'+')));
    let digits_at = |from: usize| b[from..].iter().take_while(|c| c.is_ascii_digit()).count();

    let whole = digits_at(end);
    end += whole;
    let mut fraction = 0;
    if b.get(end) == Some(&b'.') {
        fraction = digits_at(end + 1);
        if whole > 0 || fraction > 0 {
            end += 1 + fraction;
        }
    }
    if whole == 0 && fraction == 0 {
        return None;
    }
    if matches!(b.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(b.get(end + 1), Some(b'-' | b'+')));
        let exponent = digits_at(end + 1 + sign);
        if exponent > 0 {
            end += 1 + sign + exponent;
        }
    }
    s[..end].parse::<f32>().ok().filter(|v| v.is_finite())
}
