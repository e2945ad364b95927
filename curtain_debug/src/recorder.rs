// Copyright 2026 the Curtain Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory event recording.
//!
//! [`RecorderSink`] implements [`TraceSink`] and keeps every event it receives,
//! in arrival order, for later inspection or export.

use curtain_core::region::{Phase, RegionId};
use curtain_core::time::HostTime;
use curtain_core::trace::{AssetError, TraceSink, TransitionEvent, Warning};

/// One recorded diagnostic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordedEvent {
    /// A phase transition.
    Transition(TransitionEvent),
    /// A loader fallback warning.
    Warning(Warning),
    /// A display-time image failure.
    AssetError(AssetError),
}

/// A [`TraceSink`] that keeps every event in a `Vec`.
#[derive(Clone, Debug, Default)]
pub struct RecorderSink {
    events: Vec<RecordedEvent>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every event in arrival order.
    #[must_use]
    pub fn events(&self) -> &[RecordedEvent] {
        &self.events
    }

    /// Consumes the recorder and returns its events.
    #[must_use]
    pub fn into_events(self) -> Vec<RecordedEvent> {
        self.events
    }

    /// Discards everything recorded so far.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Iterates over recorded transitions.
    pub fn transitions(&self) -> impl Iterator<Item = &TransitionEvent> + '_ {
        self.events.iter().filter_map(|e| match e {
            RecordedEvent::Transition(t) => Some(t),
            _ => None,
        })
    }

    /// Iterates over recorded warnings.
    pub fn warnings(&self) -> impl Iterator<Item = &Warning> + '_ {
        self.events.iter().filter_map(|e| match e {
            RecordedEvent::Warning(w) => Some(w),
            _ => None,
        })
    }

    /// Iterates over recorded asset errors.
    pub fn asset_errors(&self) -> impl Iterator<Item = &AssetError> + '_ {
        self.events.iter().filter_map(|e| match e {
            RecordedEvent::AssetError(a) => Some(a),
            _ => None,
        })
    }

    /// Returns when `region` entered `phase`, if it did.
    #[must_use]
    pub fn entered(&self, region: RegionId, phase: Phase) -> Option<HostTime> {
        self.transitions()
            .find(|t| t.region == region && t.to == phase)
            .map(|t| t.at)
    }

    /// Returns the phases `region` passed through, in order.
    #[must_use]
    pub fn path(&self, region: RegionId) -> Vec<Phase> {
        self.transitions()
            .filter(|t| t.region == region)
            .map(|t| t.to)
            .collect()
    }
}

impl TraceSink for RecorderSink {
    fn on_transition(&mut self, e: &TransitionEvent) {
        self.events.push(RecordedEvent::Transition(*e));
    }

    fn on_warning(&mut self, w: &Warning) {
        self.events.push(RecordedEvent::Warning(w.clone()));
    }

    fn on_asset_error(&mut self, e: &AssetError) {
        self.events.push(RecordedEvent::AssetError(e.clone()));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn step(region: u32, from: Phase, to: Phase, at: u64) -> TransitionEvent {
        TransitionEvent {
            region: RegionId(region),
            from,
            to,
            at: HostTime(at),
        }
    }

    #[test]
    fn keeps_arrival_order() {
        let mut rec = RecorderSink::new();
        rec.on_transition(&step(0, Phase::Pending, Phase::Built, 1));
        rec.on_warning(&Warning::MissingImageUrl {
            region: RegionId(0),
        });
        rec.on_transition(&step(0, Phase::Built, Phase::AwaitingRemoval, 1));

        assert_eq!(rec.events().len(), 3);
        assert!(matches!(rec.events()[1], RecordedEvent::Warning(_)));
        assert_eq!(rec.warnings().count(), 1);
        assert_eq!(rec.asset_errors().count(), 0);
    }

    #[test]
    fn path_and_entry_times_are_per_region() {
        let mut rec = RecorderSink::new();
        rec.on_transition(&step(0, Phase::Pending, Phase::Built, 5));
        rec.on_transition(&step(1, Phase::Pending, Phase::Preloading, 6));
        rec.on_transition(&step(0, Phase::Built, Phase::AwaitingRemoval, 5));
        rec.on_transition(&step(1, Phase::Preloading, Phase::Built, 40));

        assert_eq!(
            rec.path(RegionId(0)),
            vec![Phase::Built, Phase::AwaitingRemoval]
        );
        assert_eq!(rec.entered(RegionId(1), Phase::Built), Some(HostTime(40)));
        assert_eq!(rec.entered(RegionId(1), Phase::Removed), None);

        rec.clear();
        assert!(rec.events().is_empty());
    }
}
