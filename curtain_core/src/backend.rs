// Copyright 2026 the Curtain Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend contract for host integrations.
//!
//! Curtain splits host-specific work into *backend* crates. A backend
//! provides two pieces:
//!
//! - **Document access**: implements [`Dom`] over a native tree (browser
//!   `Element`s, or the in-memory tree in `curtain_harness`). The overlay
//!   builder and style installer are written purely against this trait.
//!
//! - **Scheduling and signals**: implements [`Host`] on top of `Dom`: a
//!   millisecond clock, one-shot timers, the document readiness flag, image
//!   preloading and display-time image error watching. Requests go out
//!   through `Host`; results come back by calling the matching
//!   [`Controller`](crate::controller::Controller) entry point:
//!
//! | request | delivered back through |
//! |---|---|
//! | [`Host::set_timeout`] | [`Controller::on_wake`](crate::controller::Controller::on_wake) |
//! | [`Host::preload_image`] | [`Controller::on_preload_settled`](crate::controller::Controller::on_preload_settled) |
//! | [`Host::watch_image`] | [`Controller::on_image_error`](crate::controller::Controller::on_image_error) |
//! | document `load` event | [`Controller::on_page_loaded`](crate::controller::Controller::on_page_loaded) |
//!
//! Backends must deliver these asynchronously, never from inside the `Host`
//! call that requested them.
//!
//! # Crate boundaries
//!
//! `curtain_core` owns configuration, overlay construction, and the lifecycle
//! state machine. Backend crates depend on `curtain_core` and provide host
//! glue. Application code calls a backend's install entry point.

use alloc::string::String;
use alloc::vec::Vec;

use crate::region::RegionId;
use crate::time::{Duration, HostTime};

/// Element kinds the overlay builder creates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// An HTML `<div>`.
    Div,
    /// An SVG `<svg>` root.
    Svg,
    /// An SVG `<circle>`.
    SvgCircle,
    /// An HTML `<img>`.
    Image,
}

impl ElementKind {
    /// Returns the local tag name.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Div => "div",
            Self::Svg => "svg",
            Self::SvgCircle => "circle",
            Self::Image => "img",
        }
    }

    /// Returns `true` for elements in the SVG namespace.
    #[must_use]
    pub const fn is_svg(self) -> bool {
        matches!(self, Self::Svg | Self::SvgCircle)
    }
}

/// SVG namespace URI for [`ElementKind::is_svg`] elements.
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Read and mutate access to a document tree.
///
/// Mutations are best-effort: a backend that cannot apply one (a detached
/// node, a host exception) ignores it rather than failing the lifecycle.
pub trait Dom {
    /// Handle to an element in the tree.
    type Node: Clone;

    /// Returns every element carrying `attribute`, in document order.
    fn query_marked(&self, attribute: &str) -> Vec<Self::Node>;

    /// Returns an attribute value, if present.
    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    /// Creates a detached element.
    fn create_element(&mut self, kind: ElementKind) -> Self::Node;

    /// Sets an attribute.
    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str);

    /// Sets an inline style property (`name` is the CSS property name).
    fn set_style(&mut self, node: &Self::Node, name: &str, value: &str);

    /// Appends `child` as the last child of `parent`.
    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node);

    /// Moves every child node (elements and text) of `from` to the end of
    /// `to`, preserving order. `from` stays in place, empty.
    fn move_children(&mut self, from: &Self::Node, to: &Self::Node);

    /// Returns the number of element children (text nodes excluded).
    fn element_child_count(&self, node: &Self::Node) -> usize;

    /// Appends `node` to the document body.
    fn append_to_body(&mut self, node: &Self::Node);

    /// Detaches `node` from its parent. No-op if already detached.
    fn detach(&mut self, node: &Self::Node);

    /// Returns `true` if `node` is connected to the document.
    fn is_attached(&self, node: &Self::Node) -> bool;

    /// Returns `true` if a stylesheet with this id is present.
    fn has_stylesheet(&self, id: &str) -> bool;

    /// Inserts a stylesheet with the given id ahead of the document's other
    /// styles.
    fn insert_stylesheet(&mut self, id: &str, css: &str);
}

/// What a timer wakes the controller for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Wake {
    /// The minimum duration has elapsed; begin hiding the overlay.
    Reveal(RegionId),
    /// The fade-out has finished; detach the overlay.
    Detach(RegionId),
}

impl Wake {
    /// Returns the region this wake-up is for.
    #[must_use]
    pub const fn region(self) -> RegionId {
        match self {
            Self::Reveal(r) | Self::Detach(r) => r,
        }
    }

    /// Packs this wake-up into a `u32` token for hosts that can only carry
    /// plain numbers through their timer API.
    ///
    /// The region id occupies the upper 31 bits, so it must not exceed
    /// [`RegionId::MAX`]; [`Controller::start`](crate::controller::Controller::start)
    /// never assigns a larger one.
    #[must_use]
    pub const fn to_token(self) -> u32 {
        match self {
            Self::Reveal(r) => r.0 << 1,
            Self::Detach(r) => (r.0 << 1) | 1,
        }
    }

    /// Inverse of [`to_token`](Self::to_token).
    #[must_use]
    pub const fn from_token(token: u32) -> Self {
        let region = RegionId(token >> 1);
        if token & 1 == 0 {
            Self::Reveal(region)
        } else {
            Self::Detach(region)
        }
    }
}

/// Scheduling and signal access on top of [`Dom`].
pub trait Host: Dom {
    /// Handle for cancelling a scheduled timer.
    type Timer;

    /// Returns the current host time.
    fn now(&self) -> HostTime;

    /// Returns `true` once the document has fully loaded.
    fn page_loaded(&self) -> bool;

    /// Schedules `wake` after `delay`.
    fn set_timeout(&mut self, delay: Duration, wake: Wake) -> Self::Timer;

    /// Cancels a timer that has not fired yet.
    fn clear_timeout(&mut self, timer: Self::Timer);

    /// Starts decoding `url` off-tree on behalf of `region`.
    fn preload_image(&mut self, region: RegionId, url: &str);

    /// Reports display-time load failures of `image` on behalf of `region`.
    fn watch_image(&mut self, region: RegionId, image: &Self::Node);
}
