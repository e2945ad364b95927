// Copyright 2026 the Curtain Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web backend for curtain.
//!
//! This crate provides integration with browser APIs:
//!
//! - [`Curtain`]: installs curtains on the current page and owns their
//!   lifecycle
//! - [`WebDom`]: overlay construction over `web_sys` elements
//! - [`WebHost`]: `setTimeout` timers, document readiness, image events
//! - [`ConsoleSink`]: diagnostics to the browser console
//!
//! # Crate features
//!
//! - `trace` (disabled by default): Logs every lifecycle transition with
//!   `console.debug`.

#![no_std]

extern crate alloc;

mod console;
mod curtain;
mod dom;
mod host;

pub use console::ConsoleSink;
pub use curtain::Curtain;
pub use curtain_core::controller::ControllerOptions;
pub use dom::WebDom;
pub use host::{REGION_ATTR, WebHost};

use curtain_core::time::HostTime;

/// Returns the current host time from `performance.now()`, in whole
/// milliseconds.
#[must_use]
pub fn now() -> HostTime {
    let ms = host::performance_now();
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "performance.now() returns a small positive f64; ms fits in u64"
    )]
    let ms = ms as u64;
    HostTime(ms)
}
