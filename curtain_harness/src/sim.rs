// Copyright 2026 the Curtain Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drives a [`Controller`] against a [`SimHost`].

use curtain_core::backend::Host as _;
use curtain_core::controller::{Controller, ControllerOptions};
use curtain_core::time::HostTime;
use curtain_core::trace::TraceSink;
use curtain_debug::recorder::RecorderSink;

use crate::dom::MemoryDom;
use crate::host::{SimEvent, SimHost};

/// A controller and its simulated host, stepped on a virtual clock.
///
/// ```
/// use curtain_core::controller::ControllerOptions;
/// use curtain_core::time::HostTime;
/// use curtain_harness::{MemoryDom, Simulation};
///
/// let mut dom = MemoryDom::new();
/// let body = dom.body();
/// dom.add_div(body, &[("data-curtain", ""), ("data-curtain-duration", "300")]);
///
/// let mut sim = Simulation::new(dom, ControllerOptions::instant());
/// assert_eq!(sim.start(), 1);
/// sim.load_page_at(HostTime(50));
/// assert_eq!(sim.run_until_idle(), HostTime(300));
/// assert!(sim.controller().is_finished());
/// ```
#[derive(Debug)]
pub struct Simulation<S: TraceSink = RecorderSink> {
    host: SimHost,
    controller: Controller<SimHost, S>,
}

impl Simulation {
    /// Creates a simulation that records every diagnostic.
    #[must_use]
    pub fn new(dom: MemoryDom, options: ControllerOptions) -> Self {
        Self::with_sink(dom, options, RecorderSink::new())
    }

    /// Returns the recorded diagnostics.
    #[must_use]
    pub fn recorder(&self) -> &RecorderSink {
        self.controller.sink()
    }
}

impl<S: TraceSink> Simulation<S> {
    /// Creates a simulation reporting to `sink`.
    #[must_use]
    pub fn with_sink(dom: MemoryDom, options: ControllerOptions, sink: S) -> Self {
        Self {
            host: SimHost::new(dom),
            controller: Controller::with_sink(options, sink),
        }
    }

    /// Returns the host.
    #[must_use]
    pub const fn host(&self) -> &SimHost {
        &self.host
    }

    /// Returns the host mutably, for configuring it before [`start`](Self::start).
    pub fn host_mut(&mut self) -> &mut SimHost {
        &mut self.host
    }

    /// Returns the document.
    #[must_use]
    pub const fn dom(&self) -> &MemoryDom {
        self.host.dom()
    }

    /// Returns the controller.
    #[must_use]
    pub const fn controller(&self) -> &Controller<SimHost, S> {
        &self.controller
    }

    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> HostTime {
        self.host.now()
    }

    /// Starts the controller at the current time.
    pub fn start(&mut self) -> usize {
        self.controller.start(&mut self.host)
    }

    /// Queues the page `load` event.
    pub fn load_page_at(&mut self, at: HostTime) {
        self.host.schedule_page_load(at);
    }

    /// Delivers every event due at or before `to`, then sets the clock to
    /// `to`. Returns the number of events delivered.
    pub fn advance_to(&mut self, to: HostTime) -> usize {
        let mut delivered = 0;
        while let Some(event) = self.host.pop_due(to) {
            self.dispatch(event);
            delivered += 1;
        }
        self.host.advance_clock(to);
        delivered
    }

    /// Delivers events until the queue is empty and returns the final time.
    pub fn run_until_idle(&mut self) -> HostTime {
        while let Some(due) = self.host.next_due() {
            self.advance_to(due);
        }
        self.host.now()
    }

    /// Tears the controller down at the current time.
    pub fn teardown(&mut self) {
        self.controller.teardown(&mut self.host);
    }

    fn dispatch(&mut self, event: SimEvent) {
        let host = &mut self.host;
        match event {
            SimEvent::Wake(wake) => self.controller.on_wake(host, wake),
            SimEvent::PageLoad => self.controller.on_page_loaded(host),
            SimEvent::PreloadSettled { region, loaded } => {
                self.controller.on_preload_settled(host, region, loaded);
            }
            SimEvent::ImageError(region) => self.controller.on_image_error(host, region),
        }
    }
}
