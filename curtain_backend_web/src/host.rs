// Copyright 2026 the Curtain Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`Host`] over the browser: `setTimeout` timers, document readiness, and
//! image `load`/`error` events.
//!
//! Every asynchronous result funnels through a handful of long-lived JS
//! closures owned by [`WebHost`]. They hold only a weak reference back to the
//! runtime, so the host can live inside the runtime it calls into.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::format;
use alloc::rc::Weak;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;

use curtain_core::backend::{Dom, ElementKind, Host, Wake};
use curtain_core::region::RegionId;
use curtain_core::time::{Duration, HostTime};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, Window};

use crate::curtain::Runtime;
use crate::dom::WebDom;

/// Attribute recording which region an image element belongs to.
pub const REGION_ATTR: &str = "data-curtain-region";

// Direct global bindings: the timer token rides along as the extra
// `setTimeout` argument, so a single closure serves every timer.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = performance, js_name = "now")]
    pub(crate) fn performance_now() -> f64;

    #[wasm_bindgen(js_name = "setTimeout")]
    fn set_timeout_with_token(handler: &JsValue, timeout: i32, token: u32) -> i32;

    #[wasm_bindgen(js_name = "clearTimeout")]
    fn clear_timeout_id(id: i32);
}

type EventClosure = Closure<dyn FnMut(Event)>;

/// Browser implementation of [`Host`].
pub struct WebHost {
    dom: WebDom,
    window: Window,
    on_timer: Closure<dyn FnMut(u32)>,
    on_load: EventClosure,
    on_ready: EventClosure,
    on_preload_load: EventClosure,
    on_preload_error: EventClosure,
    on_image_error: EventClosure,
    /// Off-tree images kept alive until their decode settles.
    preloads: BTreeMap<RegionId, Element>,
    /// Displayed loader images with an `error` listener.
    watched: Vec<Element>,
}

impl core::fmt::Debug for WebHost {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WebHost")
            .field("dom", &self.dom)
            .field("preloads", &self.preloads.len())
            .finish_non_exhaustive()
    }
}

impl WebHost {
    pub(crate) fn new(window: Window, document: Document, runtime: &Weak<RefCell<Runtime>>) -> Self {
        let rt = runtime.clone();
        let on_timer = Closure::wrap(Box::new(move |token: u32| {
            Runtime::dispatch(&rt, |host, controller| {
                controller.on_wake(host, Wake::from_token(token));
            });
        }) as Box<dyn FnMut(u32)>);

        let rt = runtime.clone();
        let on_load = Closure::wrap(Box::new(move |_event: Event| {
            Runtime::dispatch(&rt, |host, controller| controller.on_page_loaded(host));
        }) as Box<dyn FnMut(_)>);

        let rt = runtime.clone();
        let on_ready = Closure::wrap(Box::new(move |_event: Event| {
            Runtime::dispatch(&rt, |host, controller| {
                controller.start(host);
            });
        }) as Box<dyn FnMut(_)>);

        let on_preload_load = preload_closure(runtime.clone(), true);
        let on_preload_error = preload_closure(runtime.clone(), false);

        let rt = runtime.clone();
        let on_image_error = Closure::wrap(Box::new(move |event: Event| {
            let Some(region) = event_region(&event) else {
                return;
            };
            Runtime::dispatch(&rt, |host, controller| {
                controller.on_image_error(host, region);
            });
        }) as Box<dyn FnMut(_)>);

        Self {
            dom: WebDom::new(document),
            window,
            on_timer,
            on_load,
            on_ready,
            on_preload_load,
            on_preload_error,
            on_image_error,
            preloads: BTreeMap::new(),
            watched: Vec::new(),
        }
    }

    /// Returns `true` once the document has been parsed, i.e. regions can be
    /// discovered.
    pub(crate) fn dom_ready(&self) -> bool {
        self.dom.document().ready_state() != "loading"
    }

    pub(crate) fn has_body(&self) -> bool {
        self.dom.document().body().is_some()
    }

    /// Subscribes to the window `load` event.
    pub(crate) fn listen_for_load(&self) -> Result<(), JsValue> {
        self.window
            .add_event_listener_with_callback("load", self.on_load.as_ref().unchecked_ref())
    }

    /// Subscribes to `DOMContentLoaded` to start a deferred controller.
    pub(crate) fn listen_for_ready(&self) -> Result<(), JsValue> {
        self.dom.document().add_event_listener_with_callback(
            "DOMContentLoaded",
            self.on_ready.as_ref().unchecked_ref(),
        )
    }

    /// Removes every listener this host registered.
    pub(crate) fn unlisten(&mut self) {
        let pending: Vec<RegionId> = self.preloads.keys().copied().collect();
        for region in pending {
            self.settle_preload(region);
        }
        for image in core::mem::take(&mut self.watched) {
            let _ = image.remove_event_listener_with_callback(
                "error",
                self.on_image_error.as_ref().unchecked_ref(),
            );
        }
        let _ = self
            .window
            .remove_event_listener_with_callback("load", self.on_load.as_ref().unchecked_ref());
        let _ = self.dom.document().remove_event_listener_with_callback(
            "DOMContentLoaded",
            self.on_ready.as_ref().unchecked_ref(),
        );
    }

    fn settle_preload(&mut self, region: RegionId) {
        if let Some(img) = self.preloads.remove(&region) {
            let _ = img.remove_event_listener_with_callback(
                "load",
                self.on_preload_load.as_ref().unchecked_ref(),
            );
            let _ = img.remove_event_listener_with_callback(
                "error",
                self.on_preload_error.as_ref().unchecked_ref(),
            );
        }
    }
}

fn preload_closure(rt: Weak<RefCell<Runtime>>, loaded: bool) -> EventClosure {
    Closure::wrap(Box::new(move |event: Event| {
        let Some(region) = event_region(&event) else {
            return;
        };
        Runtime::dispatch(&rt, |host, controller| {
            host.settle_preload(region);
            controller.on_preload_settled(host, region, loaded);
        });
    }) as Box<dyn FnMut(_)>)
}

fn event_region(event: &Event) -> Option<RegionId> {
    let target: Element = event.target()?.dyn_into().ok()?;
    parse_region(&target.get_attribute(REGION_ATTR)?)
}

fn parse_region(value: &str) -> Option<RegionId> {
    value.parse().ok().map(RegionId)
}

/// Converts a delay to the `i32` milliseconds `setTimeout` takes.
fn timeout_ms(delay: Duration) -> i32 {
    i32::try_from(delay.millis()).unwrap_or(i32::MAX)
}

impl Dom for WebHost {
    type Node = Element;

    fn query_marked(&self, attribute: &str) -> Vec<Element> {
        self.dom.query_marked(attribute)
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        self.dom.attribute(node, name)
    }

    fn create_element(&mut self, kind: ElementKind) -> Element {
        self.dom.create_element(kind)
    }

    fn set_attribute(&mut self, node: &Element, name: &str, value: &str) {
        self.dom.set_attribute(node, name, value);
    }

    fn set_style(&mut self, node: &Element, name: &str, value: &str) {
        self.dom.set_style(node, name, value);
    }

    fn append_child(&mut self, parent: &Element, child: &Element) {
        self.dom.append_child(parent, child);
    }

    fn move_children(&mut self, from: &Element, to: &Element) {
        self.dom.move_children(from, to);
    }

    fn element_child_count(&self, node: &Element) -> usize {
        self.dom.element_child_count(node)
    }

    fn append_to_body(&mut self, node: &Element) {
        self.dom.append_to_body(node);
    }

    fn detach(&mut self, node: &Element) {
        self.dom.detach(node);
    }

    fn is_attached(&self, node: &Element) -> bool {
        self.dom.is_attached(node)
    }

    fn has_stylesheet(&self, id: &str) -> bool {
        self.dom.has_stylesheet(id)
    }

    fn insert_stylesheet(&mut self, id: &str, css: &str) {
        self.dom.insert_stylesheet(id, css);
    }
}

impl Host for WebHost {
    type Timer = i32;

    fn now(&self) -> HostTime {
        crate::now()
    }

    fn page_loaded(&self) -> bool {
        self.dom.document().ready_state() == "complete"
    }

    fn set_timeout(&mut self, delay: Duration, wake: Wake) -> i32 {
        set_timeout_with_token(
            self.on_timer.as_ref().unchecked_ref(),
            timeout_ms(delay),
            wake.to_token(),
        )
    }

    fn clear_timeout(&mut self, timer: i32) {
        clear_timeout_id(timer);
    }

    fn preload_image(&mut self, region: RegionId, url: &str) {
        let img = self.dom.create_element(ElementKind::Image);
        let _ = img.set_attribute(REGION_ATTR, &format!("{}", region.index()));
        let _ = img
            .add_event_listener_with_callback("load", self.on_preload_load.as_ref().unchecked_ref());
        let _ = img.add_event_listener_with_callback(
            "error",
            self.on_preload_error.as_ref().unchecked_ref(),
        );
        // Setting `src` starts the request; the element never enters the tree.
        let _ = img.set_attribute("src", url);
        self.preloads.insert(region, img);
    }

    fn watch_image(&mut self, region: RegionId, image: &Element) {
        let _ = image.set_attribute(REGION_ATTR, &format!("{}", region.index()));
        let _ = image
            .add_event_listener_with_callback("error", self.on_image_error.as_ref().unchecked_ref());
        self.watched.push(image.clone());
    }
}
