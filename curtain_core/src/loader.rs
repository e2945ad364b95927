// Copyright 2026 the Curtain Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Loader variants and their element construction.
//!
//! [`Loader::select`] turns a requested [`LoaderVariant`] into a concrete
//! [`Loader`], substituting a spinner (and reporting a [`Fallback`]) when the
//! request cannot be honored. [`Loader::render`] builds the element subtree
//! through a [`Dom`].
//!
//! Both animated loaders draw into a `0 0 50 50` viewBox. Their footprint and
//! centering come from the shared stylesheet; the animation itself is set
//! inline so that it starts even if a page overrides the class rules.

use alloc::borrow::ToOwned as _;
use alloc::string::String;

use crate::backend::{Dom, ElementKind};
use crate::config::LoaderVariant;
use crate::style;

/// SVG viewBox shared by the animated loaders.
pub const VIEW_BOX: &str = "0 0 50 50";

/// Inline animation for the spinner.
pub const SPIN_ANIMATION: &str = "curtain-spin 1s linear infinite";
/// Inline animation for the pulse.
pub const PULSE_ANIMATION: &str = "curtain-pulse 1s ease-in-out infinite";

/// A concrete loader ready to render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Loader {
    /// Rotating arc stroked in `color`.
    Spinner {
        /// Stroke color.
        color: String,
    },
    /// Breathing circle filled with `color`.
    Pulse {
        /// Fill color.
        color: String,
    },
    /// Image element pointing at `url`.
    Image {
        /// Image source URL.
        url: String,
    },
}

/// Why [`Loader::select`] substituted a spinner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fallback {
    /// The variant name was not recognized.
    UnknownVariant(String),
    /// The image variant had no URL.
    MissingImageUrl,
}

impl Loader {
    /// Chooses the loader for a request.
    ///
    /// Returns the loader and, if the request could not be honored, the
    /// reason a spinner was used instead.
    #[must_use]
    pub fn select(
        variant: &LoaderVariant,
        color: &str,
        image_url: Option<&str>,
    ) -> (Self, Option<Fallback>) {
        let spinner = || Self::Spinner {
            color: color.to_owned(),
        };
        match variant {
            LoaderVariant::Spinner => (spinner(), None),
            LoaderVariant::Pulse => (
                Self::Pulse {
                    color: color.to_owned(),
                },
                None,
            ),
            LoaderVariant::Image => match image_url {
                Some(url) => (
                    Self::Image {
                        url: url.to_owned(),
                    },
                    None,
                ),
                None => (spinner(), Some(Fallback::MissingImageUrl)),
            },
            LoaderVariant::Unknown(name) => {
                (spinner(), Some(Fallback::UnknownVariant(name.clone())))
            }
        }
    }

    /// Returns the image URL for [`Loader::Image`].
    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        match self {
            Self::Image { url } => Some(url),
            _ => None,
        }
    }

    /// Builds the loader's element subtree and returns its root.
    pub fn render<D: Dom>(&self, dom: &mut D) -> D::Node {
        match self {
            Self::Spinner { color } => {
                let svg = animated_svg(dom, style::SPINNER_CLASS, SPIN_ANIMATION);
                let circle = ring(dom);
                dom.set_attribute(&circle, "fill", "none");
                dom.set_attribute(&circle, "stroke", color);
                dom.set_attribute(&circle, "stroke-width", "5");
                dom.set_attribute(&circle, "stroke-linecap", "round");
                // 80 of the ring's ~126 units drawn: an arc, not a circle.
                dom.set_attribute(&circle, "stroke-dasharray", "80, 200");
                dom.set_attribute(&circle, "stroke-dashoffset", "0");
                dom.append_child(&svg, &circle);
                svg
            }
            Self::Pulse { color } => {
                let svg = animated_svg(dom, style::PULSE_CLASS, PULSE_ANIMATION);
                let circle = ring(dom);
                dom.set_attribute(&circle, "fill", color);
                dom.append_child(&svg, &circle);
                svg
            }
            Self::Image { url } => {
                let img = dom.create_element(ElementKind::Image);
                dom.set_attribute(&img, "class", style::IMAGE_CLASS);
                dom.set_attribute(&img, "src", url);
                img
            }
        }
    }
}

fn animated_svg<D: Dom>(dom: &mut D, class: &str, animation: &str) -> D::Node {
    let svg = dom.create_element(ElementKind::Svg);
    dom.set_attribute(&svg, "class", class);
    dom.set_attribute(&svg, "viewBox", VIEW_BOX);
    dom.set_style(&svg, "animation", animation);
    svg
}

fn ring<D: Dom>(dom: &mut D) -> D::Node {
    let circle = dom.create_element(ElementKind::SvgCircle);
    dom.set_attribute(&circle, "cx", "25");
    dom.set_attribute(&circle, "cy", "25");
    dom.set_attribute(&circle, "r", "20");
    circle
}
