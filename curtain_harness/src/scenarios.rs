// Copyright 2026 the Curtain Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end lifecycle tests.

use curtain_core::backend::Dom as _;
use curtain_core::config::{AttributeScope, LoaderVariant};
use curtain_core::controller::{ControllerOptions, RemovalStyle};
use curtain_core::loader::Loader;
use curtain_core::region::{Phase, RegionId};
use curtain_core::style::{self, STYLESHEET_ID};
use curtain_core::time::{Duration, HostTime};
use curtain_core::trace::{AssetError, Warning};

use crate::{MemoryDom, NodeId, Simulation};

const R0: RegionId = RegionId(0);
const R1: RegionId = RegionId(1);

fn page(regions: &[&[(&str, &str)]]) -> (MemoryDom, Vec<NodeId>) {
    let mut dom = MemoryDom::new();
    let body = dom.body();
    let targets = regions
        .iter()
        .map(|attrs| {
            let mut all = vec![("data-curtain", "")];
            all.extend_from_slice(attrs);
            dom.add_div(body, &all)
        })
        .collect();
    (dom, targets)
}

fn root(sim: &Simulation, region: RegionId) -> NodeId {
    sim.controller().overlay(region).unwrap().root
}

#[test]
fn one_overlay_per_region_until_load_and_minimum() {
    let (dom, targets) = page(&[&[], &[("data-curtain-duration", "1000")]]);
    let mut sim = Simulation::new(dom, ControllerOptions::web());

    assert_eq!(sim.start(), 2);
    assert_eq!(sim.controller().live_overlays(), 2);
    assert_eq!(sim.dom().find_by_class(style::OVERLAY_CLASS).len(), 2);
    for t in &targets {
        assert!(sim.dom().is_attached(t));
    }

    sim.load_page_at(HostTime(100));
    sim.advance_to(HostTime(100));
    // Region 0 has no minimum and starts fading at load.
    let r0 = root(&sim, R0);
    assert_eq!(sim.dom().style(r0, "opacity"), Some("0"));
    assert_eq!(sim.dom().style(r0, "transition"), Some("opacity 500ms ease"));
    assert_eq!(sim.controller().phase(R0), Some(Phase::Removing));

    assert_eq!(sim.run_until_idle(), HostTime(1500));
    assert!(sim.controller().is_finished());
    assert_eq!(sim.controller().live_overlays(), 0);
    assert!(sim.dom().find_by_class(style::OVERLAY_CLASS).is_empty());

    let rec = sim.recorder();
    assert_eq!(rec.entered(R0, Phase::Removed), Some(HostTime(600)));
    assert_eq!(rec.entered(R1, Phase::Removing), Some(HostTime(100)));
    assert_eq!(rec.entered(R1, Phase::Removed), Some(HostTime(1500)));
    assert_eq!(
        rec.path(R0),
        vec![
            Phase::Built,
            Phase::AwaitingRemoval,
            Phase::Removing,
            Phase::Removed
        ]
    );
}

#[test]
fn minimum_duration_outlasts_early_load() {
    let (dom, _) = page(&[&[("data-curtain-duration", "500")]]);
    let mut sim = Simulation::new(dom, ControllerOptions::instant());
    sim.start();
    sim.load_page_at(HostTime(100));

    sim.advance_to(HostTime(499));
    assert!(sim.dom().is_attached(&root(&sim, R0)));

    sim.advance_to(HostTime(500));
    assert!(!sim.dom().is_attached(&root(&sim, R0)));
    assert_eq!(sim.recorder().entered(R0, Phase::Removed), Some(HostTime(500)));
}

#[test]
fn late_load_removes_after_minimum_only() {
    let (dom, _) = page(&[&[("data-curtain-duration", "200")]]);
    let mut sim = Simulation::new(dom, ControllerOptions::instant());
    sim.load_page_at(HostTime(900));
    sim.start();

    assert_eq!(sim.run_until_idle(), HostTime(900));
    assert_eq!(sim.recorder().entered(R0, Phase::Removed), Some(HostTime(900)));
}

#[test]
fn already_loaded_document_still_removes_asynchronously() {
    let (dom, _) = page(&[&[]]);
    let mut sim = Simulation::new(dom, ControllerOptions::instant());
    sim.host_mut().set_page_loaded(true);
    sim.start();

    // The wake-up is queued, not run inside start().
    assert_eq!(sim.controller().phase(R0), Some(Phase::Removing));
    assert!(sim.dom().is_attached(&root(&sim, R0)));

    assert_eq!(sim.run_until_idle(), HostTime(0));
    assert!(sim.controller().is_finished());
}

#[test]
fn children_move_into_content_and_suppress_loader() {
    let (mut dom, targets) = page(&[&[], &[]]);
    let heading = dom.add_element(targets[0], "h1");
    let text = dom.add_text(targets[0], "welcome");
    dom.add_text(targets[1], "only text");
    let mut sim = Simulation::new(dom, ControllerOptions::web());
    sim.start();

    let o0 = sim.controller().overlay(R0).unwrap();
    assert!(o0.loader.is_none());
    assert_eq!(sim.dom().children(o0.content), &[heading, text]);
    assert!(sim.dom().children(targets[0]).is_empty());
    // The target keeps its place in the document.
    assert!(sim.dom().is_attached(&targets[0]));

    let o1 = sim.controller().overlay(R1).unwrap();
    let loader = o1.loader.as_ref().unwrap();
    assert_eq!(
        loader.loader,
        Loader::Spinner {
            color: "#000000".to_string()
        }
    );
    // Text stays alongside the loader, which comes last.
    let content = sim.dom().children(o1.content);
    assert_eq!(content.len(), 2);
    assert_eq!(content[1], loader.node);
}

#[test]
fn overlay_layers_and_styles() {
    let (dom, _) = page(&[&[
        ("data-curtain-bg-color", "#f00"),
        ("data-curtain-bg-opacity", "0.5"),
        ("data-curtain-bg-blur", "4"),
        ("data-curtain-z-index", "50"),
    ]]);
    let mut sim = Simulation::new(dom, ControllerOptions::web());
    sim.start();

    let o = sim.controller().overlay(R0).unwrap().clone();
    let dom = sim.dom();
    assert_eq!(dom.parent(o.root), Some(dom.body()));
    assert_eq!(dom.children(o.root), &[o.backdrop, o.content]);
    assert_eq!(dom.attr(o.root, "class"), Some(style::OVERLAY_CLASS));
    assert_eq!(dom.attr(o.backdrop, "class"), Some(style::BACKDROP_CLASS));
    assert_eq!(dom.attr(o.content, "class"), Some(style::CONTENT_CLASS));
    assert_eq!(dom.style(o.root, "z-index"), Some("50"));
    assert_eq!(
        dom.style(o.backdrop, "background-color"),
        Some("rgba(255, 0, 0, 0.5)")
    );
    assert_eq!(dom.style(o.backdrop, "backdrop-filter"), Some("blur(4px)"));
    assert_eq!(
        dom.style(o.backdrop, "-webkit-backdrop-filter"),
        Some("blur(4px)")
    );
}

#[test]
fn defaults_give_white_backdrop_without_blur() {
    let (dom, _) = page(&[&[]]);
    let mut sim = Simulation::new(dom, ControllerOptions::web());
    sim.start();

    let o = sim.controller().overlay(R0).unwrap().clone();
    let dom = sim.dom();
    assert_eq!(dom.style(o.root, "z-index"), Some("9999"));
    assert_eq!(
        dom.style(o.backdrop, "background-color"),
        Some("rgba(255, 255, 255, 0.8)")
    );
    assert_eq!(dom.style(o.backdrop, "backdrop-filter"), None);
}

#[test]
fn pulse_loader_uses_configured_color() {
    let (dom, _) = page(&[&[
        ("data-curtain-type", "Pulse"),
        ("data-curtain-color", "teal"),
    ]]);
    let mut sim = Simulation::new(dom, ControllerOptions::web());
    sim.start();

    let o = sim.controller().overlay(R0).unwrap();
    let node = o.loader.as_ref().unwrap().node;
    let dom = sim.dom();
    assert_eq!(dom.tag(node), Some("svg"));
    assert_eq!(dom.attr(node, "class"), Some(style::PULSE_CLASS));
    let circle = dom.children(node)[0];
    assert_eq!(dom.attr(circle, "fill"), Some("teal"));
    assert!(sim.recorder().warnings().next().is_none());
}

#[test]
fn image_without_url_falls_back_to_spinner() {
    let (dom, _) = page(&[&[("data-curtain-type", "image")]]);
    let mut sim = Simulation::new(dom, ControllerOptions::web());
    sim.start();

    let o = sim.controller().overlay(R0).unwrap();
    assert!(matches!(
        o.loader.as_ref().unwrap().loader,
        Loader::Spinner { .. }
    ));
    let warnings: Vec<_> = sim.recorder().warnings().cloned().collect();
    assert_eq!(warnings, vec![Warning::MissingImageUrl { region: R0 }]);
}

#[test]
fn unknown_type_falls_back_to_spinner() {
    let (dom, _) = page(&[&[("data-curtain-type", "dots")]]);
    let mut sim = Simulation::new(dom, ControllerOptions::web());
    sim.start();

    let o = sim.controller().overlay(R0).unwrap();
    assert!(matches!(
        o.loader.as_ref().unwrap().loader,
        Loader::Spinner { .. }
    ));
    let warnings: Vec<_> = sim.recorder().warnings().cloned().collect();
    assert_eq!(
        warnings,
        vec![Warning::UnknownLoader {
            region: R0,
            name: "dots".to_string()
        }]
    );
}

#[test]
fn stylesheet_is_installed_once() {
    let (mut dom, _) = page(&[&[], &[]]);
    dom.insert_stylesheet(STYLESHEET_ID, "/* already here */");
    let mut sim = Simulation::new(dom, ControllerOptions::web());

    assert_eq!(sim.start(), 2);
    assert_eq!(sim.start(), 0);
    assert_eq!(sim.dom().stylesheet_count(STYLESHEET_ID), 1);
    assert_eq!(sim.controller().region_count(), 2);
}

#[test]
fn stylesheet_is_installed_without_regions() {
    let mut sim = Simulation::new(MemoryDom::new(), ControllerOptions::web());
    assert_eq!(sim.start(), 0);
    assert_eq!(sim.dom().stylesheet_count(STYLESHEET_ID), 1);
    assert!(sim.controller().is_finished());
}

#[test]
fn image_is_preloaded_before_build() {
    let (dom, _) = page(&[&[
        ("data-curtain-type", "image"),
        ("data-curtain-image", "/logo.png"),
    ]]);
    let mut sim = Simulation::new(dom, ControllerOptions::web());
    sim.host_mut().set_decode_latency(Duration(40));
    sim.start();

    assert_eq!(sim.controller().phase(R0), Some(Phase::Preloading));
    assert!(sim.controller().overlay(R0).is_none());
    assert!(sim.dom().find_by_class(style::OVERLAY_CLASS).is_empty());

    sim.advance_to(HostTime(40));
    let o = sim.controller().overlay(R0).unwrap();
    let img = o.loader.as_ref().unwrap().node;
    assert_eq!(sim.dom().tag(img), Some("img"));
    assert_eq!(sim.dom().attr(img, "src"), Some("/logo.png"));
    assert_eq!(sim.dom().attr(img, "class"), Some(style::IMAGE_CLASS));
    assert_eq!(sim.recorder().entered(R0, Phase::Built), Some(HostTime(40)));
}

#[test]
fn failed_preload_shows_spinner() {
    let (dom, _) = page(&[&[
        ("data-curtain-type", "image"),
        ("data-curtain-image", "/missing.png"),
    ]]);
    let mut sim = Simulation::new(dom, ControllerOptions::web());
    sim.host_mut().break_url("/missing.png");
    sim.start();
    let resolved = sim.controller().config(R0).unwrap().clone();
    sim.advance_to(HostTime(10));

    let o = sim.controller().overlay(R0).unwrap();
    assert!(matches!(
        o.loader.as_ref().unwrap().loader,
        Loader::Spinner { .. }
    ));
    assert_eq!(sim.dom().tag(o.loader.as_ref().unwrap().node), Some("svg"));
    // The resolved configuration still names the image.
    assert_eq!(sim.controller().config(R0), Some(&resolved));
    assert_eq!(resolved.loader, LoaderVariant::Image);
    let warnings: Vec<_> = sim.recorder().warnings().cloned().collect();
    assert_eq!(
        warnings,
        vec![Warning::PreloadFailed {
            region: R0,
            url: "/missing.png".to_string()
        }]
    );
}

#[test]
fn broken_displayed_image_is_removed() {
    let (dom, _) = page(&[&[
        ("data-curtain-type", "image"),
        ("data-curtain-image", "/missing.png"),
    ]]);
    let options = ControllerOptions {
        preload_images: false,
        ..ControllerOptions::web()
    };
    let mut sim = Simulation::new(dom, options);
    sim.host_mut().break_url("/missing.png");
    sim.start();

    let o = sim.controller().overlay(R0).unwrap().clone();
    let img = o.loader.as_ref().unwrap().node;
    assert!(sim.dom().is_attached(&img));

    sim.advance_to(HostTime(10));
    assert!(!sim.dom().is_attached(&img));
    assert!(sim.dom().children(o.content).is_empty());
    assert!(sim.controller().overlay(R0).unwrap().loader.is_none());
    // The overlay itself stays up.
    assert!(sim.dom().is_attached(&o.root));
    let errors: Vec<_> = sim.recorder().asset_errors().cloned().collect();
    assert_eq!(
        errors,
        vec![AssetError {
            region: R0,
            url: "/missing.png".to_string()
        }]
    );
}

#[test]
fn teardown_cancels_pending_timers() {
    let (dom, _) = page(&[&[("data-curtain-duration", "5000")], &[]]);
    let mut sim = Simulation::new(dom, ControllerOptions::web());
    sim.start();
    sim.load_page_at(HostTime(100));
    sim.advance_to(HostTime(200));

    // Region 1 is mid-fade, region 0 still waits out its minimum.
    assert_eq!(sim.host().pending_events(), 2);
    sim.teardown();

    assert!(sim.controller().is_finished());
    assert_eq!(sim.host().timers_cleared(), 2);
    assert_eq!(sim.host().pending_events(), 0);
    assert!(sim.dom().find_by_class(style::OVERLAY_CLASS).is_empty());
    assert_eq!(sim.recorder().entered(R0, Phase::Removed), Some(HostTime(200)));
}

#[test]
fn teardown_before_load_ignores_late_signal() {
    let (dom, _) = page(&[&[]]);
    let mut sim = Simulation::new(dom, ControllerOptions::web());
    sim.start();
    sim.teardown();
    let transitions = sim.recorder().transitions().count();

    sim.load_page_at(HostTime(50));
    sim.run_until_idle();

    assert_eq!(sim.recorder().transitions().count(), transitions);
    assert_eq!(sim.controller().phase(R0), Some(Phase::Removed));
}

#[test]
fn global_scope_reads_one_config_element() {
    let (mut dom, _) = page(&[
        &[("data-curtain-type", "image")],
        &[("data-curtain-duration", "9000")],
    ]);
    let body = dom.body();
    dom.add_div(
        body,
        &[
            ("data-curtain-config", ""),
            ("data-curtain-type", "pulse"),
            ("data-curtain-duration", "250"),
        ],
    );
    let options = ControllerOptions {
        scope: AttributeScope::Global,
        removal: RemovalStyle::Detach,
        ..ControllerOptions::web()
    };
    let mut sim = Simulation::new(dom, options);

    // The config element is not itself a region.
    assert_eq!(sim.start(), 2);
    for id in [R0, R1] {
        let config = sim.controller().config(id).unwrap();
        assert_eq!(config.loader, LoaderVariant::Pulse);
        assert_eq!(config.min_duration, Duration(250));
    }

    sim.load_page_at(HostTime(10));
    assert_eq!(sim.run_until_idle(), HostTime(250));
}

#[test]
fn nested_regions_are_processed_in_document_order() {
    let mut dom = MemoryDom::new();
    let body = dom.body();
    let outer = dom.add_div(body, &[("data-curtain", "")]);
    let inner = dom.add_div(outer, &[("data-curtain", "")]);
    let mut sim = Simulation::new(dom, ControllerOptions::web());

    assert_eq!(sim.start(), 2);
    // The outer overlay took the inner region with it; both overlays are
    // attached to the body.
    let inner_content = sim.controller().overlay(R0).unwrap().content;
    assert_eq!(sim.dom().parent(inner), Some(inner_content));
    assert_eq!(sim.dom().parent(root(&sim, R1)), Some(body));
    assert!(sim.controller().overlay(R0).unwrap().loader.is_none());
    assert!(sim.dom().is_attached(&outer));
}

#[test]
fn timers_stay_independent_per_region() {
    let (dom, _) = page(&[
        &[("data-curtain-duration", "300")],
        &[("data-curtain-duration", "100")],
    ]);
    let mut sim = Simulation::new(dom, ControllerOptions::instant());
    sim.start();
    sim.load_page_at(HostTime(0));
    sim.run_until_idle();

    let rec = sim.recorder();
    assert_eq!(rec.entered(R1, Phase::Removed), Some(HostTime(100)));
    assert_eq!(rec.entered(R0, Phase::Removed), Some(HostTime(300)));
}
