// Copyright 2026 the Curtain Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A deterministic [`Host`] with a virtual clock.
//!
//! [`SimHost`] wraps a [`MemoryDom`] and queues every asynchronous result the
//! controller asks for (timers, image decodes, image errors, the page `load`
//! event) on a single timeline ordered by due time, then by insertion. Nothing
//! is delivered until [`pop_due`](SimHost::pop_due) hands it to the driver.

use std::collections::{BTreeMap, BTreeSet};

use curtain_core::backend::{Dom, ElementKind, Host, Wake};
use curtain_core::region::RegionId;
use curtain_core::time::{Duration, HostTime};

use crate::dom::{MemoryDom, NodeId};

/// Something the simulated host will deliver to the controller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SimEvent {
    /// A timer fired.
    Wake(Wake),
    /// The document finished loading.
    PageLoad,
    /// An image preload finished.
    PreloadSettled {
        /// Which region asked for it.
        region: RegionId,
        /// Whether the image decoded.
        loaded: bool,
    },
    /// A displayed loader image failed.
    ImageError(RegionId),
}

/// Handle for a timer scheduled on a [`SimHost`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimTimer((HostTime, u64));

/// A [`Host`] over a [`MemoryDom`] with a virtual clock and event queue.
#[derive(Debug)]
pub struct SimHost {
    dom: MemoryDom,
    now: HostTime,
    page_loaded: bool,
    queue: BTreeMap<(HostTime, u64), SimEvent>,
    next_seq: u64,
    broken_urls: BTreeSet<String>,
    decode_latency: Duration,
    timers_cleared: usize,
}

impl SimHost {
    /// Creates a host at time zero over `dom`, with the page still loading.
    #[must_use]
    pub fn new(dom: MemoryDom) -> Self {
        Self {
            dom,
            now: HostTime(0),
            page_loaded: false,
            queue: BTreeMap::new(),
            next_seq: 0,
            broken_urls: BTreeSet::new(),
            decode_latency: Duration(10),
            timers_cleared: 0,
        }
    }

    /// Returns the document.
    #[must_use]
    pub const fn dom(&self) -> &MemoryDom {
        &self.dom
    }

    /// Returns the document mutably.
    pub fn dom_mut(&mut self) -> &mut MemoryDom {
        &mut self.dom
    }

    /// Marks the document as already loaded, as if the script ran after the
    /// `load` event.
    pub fn set_page_loaded(&mut self, loaded: bool) {
        self.page_loaded = loaded;
    }

    /// Makes every image request for `url` fail, both preloads and
    /// displayed images.
    pub fn break_url(&mut self, url: &str) {
        self.broken_urls.insert(url.to_owned());
    }

    /// Sets how long image requests take to settle.
    pub fn set_decode_latency(&mut self, latency: Duration) {
        self.decode_latency = latency;
    }

    /// Queues the page `load` event at `at`.
    pub fn schedule_page_load(&mut self, at: HostTime) {
        self.push(at, SimEvent::PageLoad);
    }

    /// Number of events still queued.
    #[must_use]
    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    /// Number of timers cancelled through [`Host::clear_timeout`].
    #[must_use]
    pub const fn timers_cleared(&self) -> usize {
        self.timers_cleared
    }

    /// Due time of the earliest queued event.
    #[must_use]
    pub fn next_due(&self) -> Option<HostTime> {
        self.queue.keys().next().map(|&(at, _)| at)
    }

    /// Removes the earliest event due at or before `limit`, advancing the
    /// clock to its due time. `PageLoad` also sets the readiness flag.
    pub fn pop_due(&mut self, limit: HostTime) -> Option<SimEvent> {
        let (&(at, _), _) = self.queue.first_key_value()?;
        if at > limit {
            return None;
        }
        let (_, event) = self.queue.pop_first()?;
        if at > self.now {
            self.now = at;
        }
        if event == SimEvent::PageLoad {
            self.page_loaded = true;
        }
        Some(event)
    }

    /// Moves the clock forward to `to`. Never moves it backwards.
    pub fn advance_clock(&mut self, to: HostTime) {
        if to > self.now {
            self.now = to;
        }
    }

    fn push(&mut self, at: HostTime, event: SimEvent) -> (HostTime, u64) {
        let key = (at, self.next_seq);
        self.next_seq += 1;
        self.queue.insert(key, event);
        key
    }
}

impl Dom for SimHost {
    type Node = NodeId;

    fn query_marked(&self, attribute: &str) -> Vec<NodeId> {
        self.dom.query_marked(attribute)
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.dom.attribute(node, name)
    }

    fn create_element(&mut self, kind: ElementKind) -> NodeId {
        self.dom.create_element(kind)
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) {
        self.dom.set_attribute(node, name, value);
    }

    fn set_style(&mut self, node: &NodeId, name: &str, value: &str) {
        self.dom.set_style(node, name, value);
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) {
        self.dom.append_child(parent, child);
    }

    fn move_children(&mut self, from: &NodeId, to: &NodeId) {
        self.dom.move_children(from, to);
    }

    fn element_child_count(&self, node: &NodeId) -> usize {
        self.dom.element_child_count(node)
    }

    fn append_to_body(&mut self, node: &NodeId) {
        self.dom.append_to_body(node);
    }

    fn detach(&mut self, node: &NodeId) {
        self.dom.detach(node);
    }

    fn is_attached(&self, node: &NodeId) -> bool {
        self.dom.is_attached(node)
    }

    fn has_stylesheet(&self, id: &str) -> bool {
        self.dom.has_stylesheet(id)
    }

    fn insert_stylesheet(&mut self, id: &str, css: &str) {
        self.dom.insert_stylesheet(id, css);
    }
}

impl Host for SimHost {
    type Timer = SimTimer;

    fn now(&self) -> HostTime {
        self.now
    }

    fn page_loaded(&self) -> bool {
        self.page_loaded
    }

    fn set_timeout(&mut self, delay: Duration, wake: Wake) -> SimTimer {
        SimTimer(self.push(self.now + delay, SimEvent::Wake(wake)))
    }

    fn clear_timeout(&mut self, timer: SimTimer) {
        if self.queue.remove(&timer.0).is_some() {
            self.timers_cleared += 1;
        }
    }

    fn preload_image(&mut self, region: RegionId, url: &str) {
        let loaded = !self.broken_urls.contains(url);
        self.push(
            self.now + self.decode_latency,
            SimEvent::PreloadSettled { region, loaded },
        );
    }

    fn watch_image(&mut self, region: RegionId, image: &NodeId) {
        let broken = self
            .dom
            .attr(*image, "src")
            .is_some_and(|src| self.broken_urls.contains(src));
        if broken {
            self.push(self.now + self.decode_latency, SimEvent::ImageError(region));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_pop_in_due_then_insertion_order() {
        let mut host = SimHost::new(MemoryDom::new());
        host.set_timeout(Duration(50), Wake::Reveal(RegionId(0)));
        host.schedule_page_load(HostTime(20));
        host.set_timeout(Duration(20), Wake::Reveal(RegionId(1)));

        assert_eq!(host.next_due(), Some(HostTime(20)));
        assert_eq!(host.pop_due(HostTime(10)), None);
        assert_eq!(host.pop_due(HostTime(100)), Some(SimEvent::PageLoad));
        assert!(host.page_loaded());
        assert_eq!(host.now(), HostTime(20));
        assert_eq!(
            host.pop_due(HostTime(100)),
            Some(SimEvent::Wake(Wake::Reveal(RegionId(1))))
        );
        assert_eq!(
            host.pop_due(HostTime(100)),
            Some(SimEvent::Wake(Wake::Reveal(RegionId(0))))
        );
        assert_eq!(host.now(), HostTime(50));
        assert_eq!(host.pending_events(), 0);
    }

    #[test]
    fn cleared_timer_never_fires() {
        let mut host = SimHost::new(MemoryDom::new());
        let t = host.set_timeout(Duration(5), Wake::Detach(RegionId(0)));
        host.clear_timeout(t);
        host.clear_timeout(t);
        assert_eq!(host.timers_cleared(), 1);
        assert_eq!(host.pop_due(HostTime(1000)), None);
    }

    #[test]
    fn broken_urls_fail_preload() {
        let mut host = SimHost::new(MemoryDom::new());
        host.break_url("/bad.png");
        host.set_decode_latency(Duration(3));
        host.preload_image(RegionId(0), "/bad.png");
        host.preload_image(RegionId(1), "/good.png");
        assert_eq!(
            host.pop_due(HostTime(3)),
            Some(SimEvent::PreloadSettled {
                region: RegionId(0),
                loaded: false
            })
        );
        assert_eq!(
            host.pop_due(HostTime(3)),
            Some(SimEvent::PreloadSettled {
                region: RegionId(1),
                loaded: true
            })
        );
    }
}
