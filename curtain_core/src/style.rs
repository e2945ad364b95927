// Copyright 2026 the Curtain Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared overlay stylesheet.
//!
//! Every overlay relies on the same class rules and keyframes. They are
//! installed once per document by [`ensure_installed`]; the stylesheet's id
//! is the guard, so the check survives repeated and re-entrant calls and
//! also holds when two controllers share a document.

use crate::backend::Dom;

/// Element id of the injected `<style>`.
pub const STYLESHEET_ID: &str = "curtain-styles";

/// Class of the overlay root.
pub const OVERLAY_CLASS: &str = "curtain-overlay";
/// Class of the backdrop layer.
pub const BACKDROP_CLASS: &str = "curtain-backdrop";
/// Class of the content layer.
pub const CONTENT_CLASS: &str = "curtain-content";
/// Class of the spinner loader.
pub const SPINNER_CLASS: &str = "curtain-spinner";
/// Class of the pulse loader.
pub const PULSE_CLASS: &str = "curtain-pulse";
/// Class of the image loader.
pub const IMAGE_CLASS: &str = "curtain-image";

/// The stylesheet text. The overlay's z-index, backdrop color and blur are
/// set inline per instance.
pub const STYLESHEET: &str = r"
.curtain-overlay {
  position: fixed !important;
  top: 0 !important;
  left: 0 !important;
  width: 100vw !important;
  height: 100vh !important;
  display: flex !important;
  justify-content: center !important;
  align-items: center !important;
}
.curtain-backdrop {
  position: absolute !important;
  top: 0 !important;
  left: 0 !important;
  width: 100% !important;
  height: 100% !important;
}
.curtain-content {
  position: relative !important;
  z-index: 1 !important;
}
.curtain-spinner, .curtain-pulse, .curtain-image {
  width: 50px !important;
  height: 50px !important;
  display: block;
  margin: auto;
}
@keyframes curtain-spin {
  0% { transform: rotate(0deg); }
  100% { transform: rotate(360deg); }
}
@keyframes curtain-pulse {
  0% { transform: scale(0.8); opacity: 0.5; }
  50% { transform: scale(1); opacity: 1; }
  100% { transform: scale(0.8); opacity: 0.5; }
}
";

/// Installs [`STYLESHEET`] unless the document already has it.
///
/// Returns `true` if this call inserted it.
pub fn ensure_installed<D: Dom>(dom: &mut D) -> bool {
    if dom.has_stylesheet(STYLESHEET_ID) {
        return false;
    }
    dom.insert_stylesheet(STYLESHEET_ID, STYLESHEET);
    true
}
