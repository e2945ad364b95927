// Copyright 2026 the Curtain Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core lifecycle, configuration and overlay construction for page-load
//! curtains.
//!
//! A *curtain* is a full-viewport overlay shown over a marked region of a
//! page while the page finishes loading. `curtain_core` holds everything
//! that does not depend on a particular host: it is `no_std` compatible
//! (with `alloc`) and talks to the document only through the traits in
//! [`backend`].
//!
//! # Architecture
//!
//! ```text
//!   Host (backend crate)
//!       │  query_marked / attribute
//!       ▼
//!   Controller::start() ──► OverlayConfig::resolve() ──► overlay::build()
//!       ▲                                                      │
//!       │  on_page_loaded / on_wake / on_preload_settled       ▼
//!   Host events ◄────────── set_timeout / preload_image ── Dom mutations
//! ```
//!
//! **[`controller`]**: Per-region state machine: discovery, optional image
//! preload, build, wait for page load and minimum duration, fade, detach.
//!
//! **[`config`]**: Attribute names, defaults and total parsers producing an
//! [`OverlayConfig`](config::OverlayConfig).
//!
//! **[`overlay`]**: Builds the root/backdrop/content subtree and relocates
//! the region's children into it.
//!
//! **[`loader`]**: Spinner, pulse and image loaders with spinner fallback.
//!
//! **[`color`]**: Hex, channel-triple and keyword colors to translucent
//! `rgba()`.
//!
//! **[`style`]**: The shared stylesheet and its install-once guard.
//!
//! **[`signal`]**: One-shot broadcast for page-load completion.
//!
//! **[`backend`]**: The [`Dom`](backend::Dom) and [`Host`](backend::Host)
//! traits that platform backends implement.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) for warnings, asset
//! errors and phase transitions.
//!
//! # Crate features
//!
//! - `trace` (disabled by default): Emits phase transition events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod backend;
pub mod color;
pub mod config;
pub mod controller;
pub mod loader;
pub mod overlay;
pub mod region;
pub mod signal;
pub mod style;
pub mod time;
pub mod trace;
