// Copyright 2026 the Curtain Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser console diagnostics.

use alloc::format;

use curtain_core::trace::{AssetError, TraceSink, TransitionEvent, Warning};
use wasm_bindgen::JsValue;
use web_sys::console;

/// A [`TraceSink`] that writes to the browser console.
///
/// Warnings go to `console.warn`, asset errors to `console.error`, and (with
/// the `trace` feature) transitions to `console.debug`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleSink;

impl TraceSink for ConsoleSink {
    fn on_transition(&mut self, e: &TransitionEvent) {
        let line = format!(
            "curtain: region {} {} -> {} at {}ms",
            e.region.index(),
            e.from.as_str(),
            e.to.as_str(),
            e.at.millis(),
        );
        console::debug_1(&JsValue::from_str(&line));
    }

    fn on_warning(&mut self, w: &Warning) {
        let line = format!("curtain: region {}: {w}", w.region().index());
        console::warn_1(&JsValue::from_str(&line));
    }

    fn on_asset_error(&mut self, e: &AssetError) {
        let line = format!("curtain: region {}: {e}", e.region.index());
        console::error_1(&JsValue::from_str(&line));
    }
}
