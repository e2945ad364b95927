// Copyright 2026 the Curtain Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Region identity and lifecycle phases.

use core::fmt;

/// Identifies one target region within a [`Controller`](crate::controller::Controller).
///
/// Ids are assigned in document order starting from zero when the controller
/// starts and are never reused.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RegionId(pub u32);

impl RegionId {
    /// Largest id a controller hands out. Timer tokens spend one bit on the
    /// wake kind, so ids are limited to 31 bits.
    pub const MAX: Self = Self(u32::MAX >> 1);

    /// Returns the raw index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RegionId({})", self.0)
    }
}

/// Lifecycle phase of a single region.
///
/// ```text
///   Pending ──► Preloading ──► Built ──► AwaitingRemoval ──► Removing ──► Removed
///      └─────────────────────────┘
/// ```
///
/// `Preloading` is skipped unless the region shows a preloadable image.
/// `AwaitingRemoval` is left immediately when the page has already loaded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Discovered; start time recorded.
    Pending,
    /// Waiting for the loader image to decode off-tree.
    Preloading,
    /// Overlay attached and visible.
    Built,
    /// Waiting for the page-load completion signal.
    AwaitingRemoval,
    /// Minimum-duration wait or fade-out in progress.
    Removing,
    /// Overlay detached. Terminal.
    Removed,
}

impl Phase {
    /// Returns a short lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Preloading => "preloading",
            Self::Built => "built",
            Self::AwaitingRemoval => "awaiting-removal",
            Self::Removing => "removing",
            Self::Removed => "removed",
        }
    }

    /// Returns `true` for [`Phase::Removed`].
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Removed)
    }
}
