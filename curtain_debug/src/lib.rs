// Copyright 2026 the Curtain Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, and Chrome trace export for curtain
//! diagnostics.
//!
//! This crate provides [`TraceSink`](curtain_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`]: in-memory event log with typed accessors.
//! - [`chrome::export`]: writes Chrome Trace Event Format JSON from a
//!   recorded log, one track per region.

pub mod chrome;
pub mod pretty;
pub mod recorder;
