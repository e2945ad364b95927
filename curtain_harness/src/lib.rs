// Copyright 2026 the Curtain Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory document and simulated host for exercising curtain lifecycles.
//!
//! - [`MemoryDom`]: an arena document tree implementing
//!   [`Dom`](curtain_core::backend::Dom).
//! - [`SimHost`]: a [`Host`](curtain_core::backend::Host) with a virtual
//!   clock and a deterministic event queue.
//! - [`Simulation`]: steps a
//!   [`Controller`](curtain_core::controller::Controller) against a
//!   `SimHost`, recording diagnostics.

mod dom;
mod host;
mod sim;

#[cfg(test)]
mod scenarios;

pub use dom::{MemoryDom, NodeId};
pub use host::{SimEvent, SimHost, SimTimer};
pub use sim::Simulation;
