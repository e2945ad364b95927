// Copyright 2026 the Curtain Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web page demo: curtains over the four regions of `index.html`.
//!
//! The regions show a spinner, a pulse, the bundled `logo.svg` as an image
//! loader, and relocated content with no loader. Build with
//! `wasm-pack build --target web demos/web_page` and serve the directory; a
//! large remote image holds back the page's `load` event so the curtains
//! stay up long enough to see.

use curtain_backend_web::{ControllerOptions, Curtain};
use wasm_bindgen::prelude::*;

/// Entry point for the demo.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() -> Result<(), JsValue> {
    let curtain = Curtain::install(ControllerOptions::web())?;
    // Keep the curtains alive for the page's lifetime.
    core::mem::forget(curtain);
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    const PAGE: &str = include_str!("../index.html");

    #[test]
    fn page_marks_four_regions() {
        let regions = PAGE
            .split(|c: char| c.is_whitespace() || c == '>')
            .filter(|token| *token == "data-curtain")
            .count();
        assert_eq!(regions, 4, "regions marked in index.html");
    }

    #[test]
    fn image_loaders_are_bundled() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR"));
        let images: Vec<&str> = PAGE
            .split("data-curtain-image=\"")
            .skip(1)
            .filter_map(|rest| rest.split('"').next())
            .collect();
        assert!(!images.is_empty(), "the demo shows an image loader");
        for image in images {
            assert!(dir.join(image).is_file(), "{image} is missing from the demo");
        }
    }
}
