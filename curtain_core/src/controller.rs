// Copyright 2026 the Curtain Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-region overlay lifecycle.
//!
//! The [`Controller`] discovers target regions, builds one overlay per
//! region, and removes each overlay once the page has loaded *and* that
//! region's minimum duration has elapsed. Regions run independently: each has
//! its own start time, configuration, overlay and timer.
//!
//! The controller never blocks and never calls back into itself. Every
//! suspension point is a request made through [`Host`], and the backend
//! resumes the controller by calling one of the `on_*` entry points:
//!
//! ```text
//!   start() ──► Pending ──(image?)──► Preloading ──on_preload_settled()──┐
//!                  │                                                     │
//!                  └─────────────────────────────────────────────────────┤
//!                                                                        ▼
//!                                        AwaitingRemoval ◄── Built (overlay attached)
//!                                               │
//!                      on_page_loaded() (or already loaded)
//!                                               ▼
//!                  Removing ── wait max(0, min_duration − elapsed) ──► on_wake(Reveal)
//!                                               │
//!                          fade: opacity → 0, wait fade ──► on_wake(Detach)
//!                                               ▼
//!                                            Removed
//! ```

use alloc::borrow::ToOwned;
use alloc::format;
use alloc::vec::Vec;
use core::fmt;

use crate::backend::{Host, Wake};
use crate::config::{AttributeScope, GLOBAL_CONFIG_ATTR, LoaderVariant, MARKER_ATTR, OverlayConfig};
use crate::loader::{Fallback, Loader};
use crate::overlay::{self, Overlay};
use crate::region::{Phase, RegionId};
use crate::signal::{LoadSignal, Subscription};
use crate::style;
use crate::time::{Duration, HostTime};
use crate::trace::{self, AssetError, NoopSink, TraceSink, TransitionEvent, Warning};

/// How an overlay leaves the page once its wait is over.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RemovalStyle {
    /// Transition the root's opacity to zero, then detach it.
    Fade {
        /// Length of the opacity transition.
        duration: Duration,
    },
    /// Detach the root immediately.
    Detach,
}

/// Configuration for the [`Controller`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControllerOptions {
    /// Removal behavior, applied uniformly to every overlay.
    pub removal: RemovalStyle,
    /// Where region attributes are read from.
    pub scope: AttributeScope,
    /// Decode image loaders off-tree before building their overlay.
    pub preload_images: bool,
}

impl ControllerOptions {
    /// Default options for pages: 500 ms fade, per-region attributes,
    /// preloading on.
    #[must_use]
    pub const fn web() -> Self {
        Self {
            removal: RemovalStyle::Fade {
                duration: Duration(500),
            },
            scope: AttributeScope::PerRegion,
            preload_images: true,
        }
    }

    /// Like [`web`](Self::web) but overlays are detached without a fade.
    #[must_use]
    pub const fn instant() -> Self {
        Self {
            removal: RemovalStyle::Detach,
            ..Self::web()
        }
    }
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self::web()
    }
}

struct Region<N, T> {
    target: N,
    started: HostTime,
    phase: Phase,
    config: OverlayConfig,
    overlay: Option<Overlay<N>>,
    timer: Option<T>,
    fading: bool,
    /// The image could not be decoded; a spinner stands in for it.
    preload_failed: bool,
}

/// Drives every target region from discovery to removal.
///
/// `S` receives warnings, asset errors and (with the `trace` feature) phase
/// transitions.
pub struct Controller<H: Host, S: TraceSink = NoopSink> {
    options: ControllerOptions,
    regions: Vec<Region<H::Node, H::Timer>>,
    signal: LoadSignal,
    started: bool,
    sink: S,
}

impl<H: Host, S: TraceSink> fmt::Debug for Controller<H, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("options", &self.options)
            .field("regions", &self.regions.len())
            .field("page_loaded", &self.signal.has_fired())
            .field("started", &self.started)
            .finish_non_exhaustive()
    }
}

impl<H: Host> Controller<H> {
    /// Creates a controller that discards diagnostics.
    #[must_use]
    pub fn new(options: ControllerOptions) -> Self {
        Self::with_sink(options, NoopSink)
    }
}

impl<H: Host, S: TraceSink> Controller<H, S> {
    /// Creates a controller reporting to `sink`.
    #[must_use]
    pub fn with_sink(options: ControllerOptions, sink: S) -> Self {
        Self {
            options,
            regions: Vec::new(),
            signal: LoadSignal::new(),
            started: false,
            sink,
        }
    }

    /// Returns the options this controller was created with.
    #[must_use]
    pub const fn options(&self) -> &ControllerOptions {
        &self.options
    }

    /// Returns the diagnostics sink.
    #[must_use]
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// Returns the diagnostics sink mutably.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Number of regions discovered by [`start`](Self::start).
    #[must_use]
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Returns the phase of `region`.
    #[must_use]
    pub fn phase(&self, region: RegionId) -> Option<Phase> {
        self.region(region).map(|r| r.phase)
    }

    /// Returns the resolved configuration of `region`.
    #[must_use]
    pub fn config(&self, region: RegionId) -> Option<&OverlayConfig> {
        self.region(region).map(|r| &r.config)
    }

    /// Returns the overlay of `region`, once built. Removed overlays stay
    /// inspectable.
    #[must_use]
    pub fn overlay(&self, region: RegionId) -> Option<&Overlay<H::Node>> {
        self.region(region).and_then(|r| r.overlay.as_ref())
    }

    /// Returns the time `region` began processing.
    #[must_use]
    pub fn started_at(&self, region: RegionId) -> Option<HostTime> {
        self.region(region).map(|r| r.started)
    }

    /// Number of overlays built and not yet removed.
    #[must_use]
    pub fn live_overlays(&self) -> usize {
        self.regions
            .iter()
            .filter(|r| r.overlay.is_some() && !r.phase.is_terminal())
            .count()
    }

    /// Returns `true` once every discovered region is [`Phase::Removed`].
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.regions.iter().all(|r| r.phase.is_terminal())
    }

    /// Discovers every target region and starts its lifecycle.
    ///
    /// Installs the shared stylesheet, then processes regions in document
    /// order. Returns the number of regions found; a second call does nothing
    /// and returns zero.
    pub fn start(&mut self, host: &mut H) -> usize {
        if self.started {
            return 0;
        }
        self.started = true;

        style::ensure_installed(host);
        if host.page_loaded() {
            self.signal.fire();
        }

        let global = match self.options.scope {
            AttributeScope::Global => host.query_marked(GLOBAL_CONFIG_ATTR).into_iter().next(),
            AttributeScope::PerRegion => None,
        };

        let targets = host.query_marked(MARKER_ATTR);
        let mut found = 0;
        for target in targets {
            let Some(id) = u32::try_from(self.regions.len())
                .ok()
                .filter(|&i| i <= RegionId::MAX.0)
                .map(RegionId)
            else {
                break;
            };
            let started = host.now();
            let source = global.as_ref().unwrap_or(&target);
            let config = OverlayConfig::resolve(|name| host.attribute(source, name));
            let preload = if self.options.preload_images {
                config.preload_url().map(ToOwned::to_owned)
            } else {
                None
            };

            self.regions.push(Region {
                target,
                started,
                phase: Phase::Pending,
                config,
                overlay: None,
                timer: None,
                fading: false,
                preload_failed: false,
            });
            found += 1;

            match preload {
                Some(url) => {
                    self.set_phase(host, id, Phase::Preloading);
                    host.preload_image(id, &url);
                }
                None => self.build(host, id),
            }
        }
        found
    }

    /// Resumes `region` after its image preload finished.
    ///
    /// A failed preload is reported and the region shows a spinner instead.
    /// Calls for regions that are not preloading are ignored.
    pub fn on_preload_settled(&mut self, host: &mut H, region: RegionId, loaded: bool) {
        let Some(r) = self.region_mut(region) else {
            return;
        };
        if r.phase != Phase::Preloading {
            return;
        }
        if !loaded {
            let url = r.config.image_url.clone().unwrap_or_default();
            r.preload_failed = true;
            self.sink.on_warning(&Warning::PreloadFailed { region, url });
        }
        self.build(host, region);
    }

    /// Delivers the page-load completion signal.
    ///
    /// Every region waiting for it begins removal. Regions discovered later
    /// treat the signal as already satisfied.
    pub fn on_page_loaded(&mut self, host: &mut H) {
        for id in self.signal.fire() {
            if self.phase(id) == Some(Phase::AwaitingRemoval) {
                self.begin_removal(host, id);
            }
        }
    }

    /// Delivers a timer scheduled through [`Host::set_timeout`].
    pub fn on_wake(&mut self, host: &mut H, wake: Wake) {
        let id = wake.region();
        let removal = self.options.removal;
        let Some(r) = self.region_mut(id) else {
            return;
        };
        if r.phase != Phase::Removing {
            return;
        }
        match (wake, r.fading) {
            (Wake::Reveal(_), false) => {
                r.timer = None;
                match removal {
                    RemovalStyle::Fade { duration } if !duration.is_zero() => {
                        r.fading = true;
                        if let Some(o) = &r.overlay {
                            let transition = format!("opacity {}ms ease", duration.millis());
                            host.set_style(&o.root, "transition", &transition);
                            host.set_style(&o.root, "opacity", "0");
                        }
                        r.timer = Some(host.set_timeout(duration, Wake::Detach(id)));
                    }
                    _ => self.detach(host, id),
                }
            }
            (Wake::Detach(_), true) => {
                r.timer = None;
                self.detach(host, id);
            }
            _ => {}
        }
    }

    /// Reports that the displayed loader image of `region` failed to load.
    ///
    /// The broken image is removed; nothing replaces it.
    pub fn on_image_error(&mut self, host: &mut H, region: RegionId) {
        let Some(r) = self.region_mut(region) else {
            return;
        };
        if r.phase.is_terminal() {
            return;
        }
        let Some(o) = r.overlay.as_mut() else {
            return;
        };
        let Some(url) = o
            .loader
            .as_ref()
            .and_then(|l| l.loader.image_url())
            .map(ToOwned::to_owned)
        else {
            return;
        };
        if let Some(l) = o.loader.take() {
            host.detach(&l.node);
        }
        self.sink.on_asset_error(&AssetError { region, url });
    }

    /// Cancels pending timers and detaches every overlay still attached.
    ///
    /// Every region ends [`Phase::Removed`]; late backend callbacks are
    /// ignored afterwards.
    pub fn teardown(&mut self, host: &mut H) {
        let ids: Vec<RegionId> = (0..self.regions.len())
            .filter_map(|i| u32::try_from(i).ok())
            .map(RegionId)
            .collect();
        for id in ids {
            let Some(r) = self.region_mut(id) else {
                continue;
            };
            if r.phase.is_terminal() {
                continue;
            }
            if let Some(timer) = r.timer.take() {
                host.clear_timeout(timer);
            }
            self.signal.unsubscribe(id);
            self.detach(host, id);
        }
    }

    // -- internals ---------------------------------------------------------

    fn region(&self, id: RegionId) -> Option<&Region<H::Node, H::Timer>> {
        self.regions.get(id.0 as usize)
    }

    fn region_mut(&mut self, id: RegionId) -> Option<&mut Region<H::Node, H::Timer>> {
        self.regions.get_mut(id.0 as usize)
    }

    fn set_phase(&mut self, host: &H, id: RegionId, to: Phase) {
        let Some(r) = self.region_mut(id) else {
            return;
        };
        let from = r.phase;
        r.phase = to;
        trace::transition(
            &mut self.sink,
            TransitionEvent {
                region: id,
                from,
                to,
                at: host.now(),
            },
        );
    }

    fn build(&mut self, host: &mut H, id: RegionId) {
        let Some(r) = self.region_mut(id) else {
            return;
        };
        let spinner = LoaderVariant::Spinner;
        let variant = if r.preload_failed {
            &spinner
        } else {
            &r.config.loader
        };
        let built = overlay::build(host, &r.target, &r.config, variant);
        if let Some(l) = &built.overlay.loader
            && let Loader::Image { .. } = l.loader
        {
            host.watch_image(id, &l.node);
        }
        r.overlay = Some(built.overlay);

        match built.fallback {
            Some(Fallback::UnknownVariant(name)) => {
                self.sink
                    .on_warning(&Warning::UnknownLoader { region: id, name });
            }
            Some(Fallback::MissingImageUrl) => {
                self.sink.on_warning(&Warning::MissingImageUrl { region: id });
            }
            None => {}
        }

        self.set_phase(host, id, Phase::Built);
        self.set_phase(host, id, Phase::AwaitingRemoval);
        if self.signal.subscribe(id) == Subscription::Ready {
            self.begin_removal(host, id);
        }
    }

    fn begin_removal(&mut self, host: &mut H, id: RegionId) {
        self.set_phase(host, id, Phase::Removing);
        let now = host.now();
        let Some(r) = self.region_mut(id) else {
            return;
        };
        let elapsed = now.saturating_duration_since(r.started);
        let remaining = r.config.min_duration.saturating_sub(elapsed);
        r.timer = Some(host.set_timeout(remaining, Wake::Reveal(id)));
    }

    fn detach(&mut self, host: &mut H, id: RegionId) {
        if let Some(o) = self.region(id).and_then(|r| r.overlay.as_ref()) {
            host.detach(&o.root);
        }
        self.set_phase(host, id, Phase::Removed);
    }
}
