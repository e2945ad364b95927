// Copyright 2026 the Curtain Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Diagnostics for the overlay lifecycle.
//!
//! The [`Controller`](crate::controller::Controller) reports through a
//! [`TraceSink`]. All methods default to no-ops, so a sink implements only the
//! events it cares about.
//!
//! Warnings and asset errors are always delivered: they are how a page author
//! learns that a loader fell back. [`TransitionEvent`]s are delivered only
//! with the `trace` feature enabled.
//!
//! # Crate features
//!
//! - `trace`: enables lifecycle transition events.

use alloc::string::String;
use core::fmt;

use crate::region::{Phase, RegionId};
use crate::time::HostTime;

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// A region moved from one phase to the next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransitionEvent {
    /// Which region.
    pub region: RegionId,
    /// Phase before the transition.
    pub from: Phase,
    /// Phase after the transition.
    pub to: Phase,
    /// Host time of the transition.
    pub at: HostTime,
}

/// A recoverable problem that changed what the overlay shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Warning {
    /// `data-curtain-type` named no known loader; a spinner is shown.
    UnknownLoader {
        /// Which region.
        region: RegionId,
        /// The unrecognized name.
        name: String,
    },
    /// The image loader was requested without `data-curtain-image`; a spinner
    /// is shown.
    MissingImageUrl {
        /// Which region.
        region: RegionId,
    },
    /// The loader image failed to decode during preloading; a spinner is shown.
    PreloadFailed {
        /// Which region.
        region: RegionId,
        /// The image URL.
        url: String,
    },
}

impl Warning {
    /// Returns the region the warning concerns.
    #[must_use]
    pub const fn region(&self) -> RegionId {
        match self {
            Self::UnknownLoader { region, .. }
            | Self::MissingImageUrl { region }
            | Self::PreloadFailed { region, .. } => *region,
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownLoader { name, .. } => {
                write!(f, "unknown loader type \"{name}\", showing spinner")
            }
            Self::MissingImageUrl { .. } => {
                f.write_str("image loader needs data-curtain-image, showing spinner")
            }
            Self::PreloadFailed { url, .. } => {
                write!(f, "could not preload {url}, showing spinner")
            }
        }
    }
}

/// The loader image failed after it was placed in the overlay. The broken
/// element is removed and nothing replaces it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetError {
    /// Which region.
    pub region: RegionId,
    /// The image URL.
    pub url: String,
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not load image at {}", self.url)
    }
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives diagnostics from the controller.
pub trait TraceSink {
    /// Called on every phase change (requires the `trace` feature).
    fn on_transition(&mut self, e: &TransitionEvent) {
        _ = e;
    }

    /// Called when a loader falls back.
    fn on_warning(&mut self, w: &Warning) {
        _ = w;
    }

    /// Called when the displayed loader image fails.
    fn on_asset_error(&mut self, e: &AssetError) {
        _ = e;
    }
}

impl<S: TraceSink + ?Sized> TraceSink for &mut S {
    fn on_transition(&mut self, e: &TransitionEvent) {
        (**self).on_transition(e);
    }

    fn on_warning(&mut self, w: &Warning) {
        (**self).on_warning(w);
    }

    fn on_asset_error(&mut self, e: &AssetError) {
        (**self).on_asset_error(e);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

/// Emits a transition when the `trace` feature is on; compiles to nothing
/// otherwise.
#[inline]
pub(crate) fn transition(sink: &mut impl TraceSink, e: TransitionEvent) {
    #[cfg(feature = "trace")]
    sink.on_transition(&e);
    #[cfg(not(feature = "trace"))]
    {
        _ = (sink, e);
    }
}
