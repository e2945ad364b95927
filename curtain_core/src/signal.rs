// Copyright 2026 the Curtain Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One-shot broadcast for the page-load completion signal.
//!
//! Every region waits on the same signal. Subscribers that arrive after it
//! fired are told so immediately instead of waiting forever, and each
//! subscriber is notified at most once.

use alloc::vec::Vec;

use crate::region::RegionId;

/// Result of [`LoadSignal::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Subscription {
    /// The signal already fired; proceed now.
    Ready,
    /// Registered; the id will be returned by [`LoadSignal::fire`].
    Waiting,
}

/// An "already fired" flag plus the list of waiting regions.
#[derive(Clone, Debug, Default)]
pub struct LoadSignal {
    fired: bool,
    waiting: Vec<RegionId>,
}

impl LoadSignal {
    /// Creates an unfired signal.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fired: false,
            waiting: Vec::new(),
        }
    }

    /// Returns `true` once [`fire`](Self::fire) has been called.
    #[must_use]
    pub const fn has_fired(&self) -> bool {
        self.fired
    }

    /// Registers `region`, or reports that the signal already fired.
    ///
    /// Subscribing the same region twice before the signal fires registers
    /// it once.
    pub fn subscribe(&mut self, region: RegionId) -> Subscription {
        if self.fired {
            return Subscription::Ready;
        }
        if !self.waiting.contains(&region) {
            self.waiting.push(region);
        }
        Subscription::Waiting
    }

    /// Drops a pending registration.
    pub fn unsubscribe(&mut self, region: RegionId) {
        self.waiting.retain(|&r| r != region);
    }

    /// Fires the signal, returning the waiting regions in subscription order.
    ///
    /// Firing again returns nothing.
    pub fn fire(&mut self) -> Vec<RegionId> {
        self.fired = true;
        core::mem::take(&mut self.waiting)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn waiters_are_notified_once_in_order() {
        let mut s = LoadSignal::new();
        assert_eq!(s.subscribe(RegionId(2)), Subscription::Waiting);
        assert_eq!(s.subscribe(RegionId(0)), Subscription::Waiting);
        assert_eq!(s.subscribe(RegionId(2)), Subscription::Waiting);
        assert_eq!(s.fire(), vec![RegionId(2), RegionId(0)]);
        assert!(s.fire().is_empty());
    }

    #[test]
    fn late_subscriber_is_ready() {
        let mut s = LoadSignal::new();
        assert!(!s.has_fired());
        assert!(s.fire().is_empty());
        assert!(s.has_fired());
        assert_eq!(s.subscribe(RegionId(5)), Subscription::Ready);
        assert!(s.fire().is_empty());
    }

    #[test]
    fn unsubscribed_region_is_not_notified() {
        let mut s = LoadSignal::new();
        s.subscribe(RegionId(1));
        s.subscribe(RegionId(3));
        s.unsubscribe(RegionId(1));
        assert_eq!(s.fire(), vec![RegionId(3)]);
    }
}
