// Copyright 2026 the Curtain Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overlay subtree construction.
//!
//! ```text
//!   <body>
//!     ...
//!     <div class="curtain-overlay" style="z-index: …">
//!       <div class="curtain-backdrop" style="background-color: rgba(…)"></div>
//!       <div class="curtain-content">
//!         (target's former children, or one loader)
//!       </div>
//!     </div>
//! ```
//!
//! The overlay is appended to the body rather than nested in the target so
//! that it covers the viewport regardless of the target's own layout. The
//! target keeps its place in the tree and is left empty; its children are
//! not returned to it when the overlay is removed.

use alloc::format;

use crate::backend::{Dom, ElementKind};
use crate::color::to_translucent;
use crate::config::{LoaderVariant, OverlayConfig};
use crate::loader::{Fallback, Loader};
use crate::style;

/// A built overlay subtree.
#[derive(Clone, Debug)]
pub struct Overlay<N> {
    /// Overlay root, attached to the body.
    pub root: N,
    /// Translucent backdrop layer.
    pub backdrop: N,
    /// Content layer holding the relocated children or the loader.
    pub content: N,
    /// The loader element, if the target had no element children.
    pub loader: Option<LoaderElement<N>>,
}

/// A loader placed in an overlay's content layer.
#[derive(Clone, Debug)]
pub struct LoaderElement<N> {
    /// Root element of the loader.
    pub node: N,
    /// What was rendered.
    pub loader: Loader,
}

/// Result of [`build`].
#[derive(Clone, Debug)]
pub struct Built<N> {
    /// The overlay.
    pub overlay: Overlay<N>,
    /// Set when the configured loader could not be honored.
    pub fallback: Option<Fallback>,
}

/// Builds an overlay for `target` and attaches it to the body.
///
/// Existing children of `target` move into the content layer in order. A
/// loader is rendered only when none of them is an element. The loader shown
/// is `variant`, which is `config.loader` unless an image preload failed.
pub fn build<D: Dom>(
    dom: &mut D,
    target: &D::Node,
    config: &OverlayConfig,
    variant: &LoaderVariant,
) -> Built<D::Node> {
    let root = div(dom, style::OVERLAY_CLASS);
    let backdrop = div(dom, style::BACKDROP_CLASS);
    let content = div(dom, style::CONTENT_CLASS);
    dom.append_child(&root, &backdrop);
    dom.append_child(&root, &content);

    dom.move_children(target, &content);
    dom.append_to_body(&root);

    dom.set_style(&root, "z-index", &format!("{}", config.z_index));
    let fill = to_translucent(&config.background_color, config.background_opacity);
    dom.set_style(&backdrop, "background-color", &format!("{fill}"));
    if config.background_blur_px > 0 {
        let blur = format!("blur({}px)", config.background_blur_px);
        dom.set_style(&backdrop, "backdrop-filter", &blur);
        dom.set_style(&backdrop, "-webkit-backdrop-filter", &blur);
    }

    let mut fallback = None;
    let loader = if dom.element_child_count(&content) == 0 {
        let (loader, why) =
            Loader::select(variant, &config.color, config.image_url.as_deref());
        fallback = why;
        let node = loader.render(dom);
        dom.append_child(&content, &node);
        Some(LoaderElement { node, loader })
    } else {
        None
    };

    Built {
        overlay: Overlay {
            root,
            backdrop,
            content,
            loader,
        },
        fallback,
    }
}

fn div<D: Dom>(dom: &mut D, class: &str) -> D::Node {
    let node = dom.create_element(ElementKind::Div);
    dom.set_attribute(&node, "class", class);
    node
}
