// Copyright 2026 the Curtain Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Installing curtains on the current page.

use alloc::rc::{Rc, Weak};
use core::cell::RefCell;

use curtain_core::backend::Host as _;
use curtain_core::controller::{Controller, ControllerOptions};
use wasm_bindgen::JsValue;

use crate::console::ConsoleSink;
use crate::host::WebHost;

/// Controller and host, shared between the [`Curtain`] handle and the JS
/// callbacks.
pub(crate) struct Runtime {
    host: WebHost,
    controller: Controller<WebHost, ConsoleSink>,
}

impl Runtime {
    /// Runs `f` against the runtime if it is still alive and not already
    /// borrowed. Browser events that arrive after the handle is dropped are
    /// discarded.
    pub(crate) fn dispatch(
        runtime: &Weak<RefCell<Self>>,
        f: impl FnOnce(&mut WebHost, &mut Controller<WebHost, ConsoleSink>),
    ) {
        let Some(runtime) = runtime.upgrade() else {
            return;
        };
        let Ok(mut rt) = runtime.try_borrow_mut() else {
            return;
        };
        let Self { host, controller } = &mut *rt;
        f(host, controller);
    }
}

/// Handle to the curtains installed on the current page.
///
/// Dropping the handle tears everything down; call
/// `core::mem::forget` on it to keep curtains running for the page's
/// lifetime.
pub struct Curtain {
    runtime: Rc<RefCell<Runtime>>,
}

impl core::fmt::Debug for Curtain {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.runtime.try_borrow() {
            Ok(rt) => f
                .debug_struct("Curtain")
                .field("controller", &rt.controller)
                .finish(),
            Err(_) => f.debug_struct("Curtain").finish_non_exhaustive(),
        }
    }
}

impl Curtain {
    /// Installs curtains on every `[data-curtain]` region of the current
    /// document.
    ///
    /// If the document is still being parsed, discovery waits for
    /// `DOMContentLoaded`. Overlays are removed after the window `load` event
    /// and each region's minimum duration.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no window, document or body, or if an
    /// event listener cannot be registered.
    pub fn install(options: ControllerOptions) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("curtain: no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("curtain: no document"))?;

        let runtime = Rc::new_cyclic(|weak| {
            RefCell::new(Runtime {
                host: WebHost::new(window, document, weak),
                controller: Controller::with_sink(options, ConsoleSink),
            })
        });

        {
            let mut rt = runtime.borrow_mut();
            let Runtime { host, controller } = &mut *rt;
            if host.dom_ready() && !host.has_body() {
                return Err(JsValue::from_str("curtain: no body"));
            }
            if !host.page_loaded() {
                host.listen_for_load()?;
            }
            if host.dom_ready() {
                controller.start(host);
            } else if let Err(e) = host.listen_for_ready() {
                host.unlisten();
                return Err(e);
            }
        }

        Ok(Self { runtime })
    }

    /// Number of regions discovered so far.
    #[must_use]
    pub fn region_count(&self) -> usize {
        self.runtime
            .try_borrow()
            .map_or(0, |rt| rt.controller.region_count())
    }

    /// Returns `true` once every discovered overlay has been removed.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.runtime
            .try_borrow()
            .is_ok_and(|rt| rt.controller.is_finished())
    }

    /// Cancels pending timers, removes every event listener and detaches
    /// every overlay still attached.
    pub fn teardown(&self) {
        let Ok(mut rt) = self.runtime.try_borrow_mut() else {
            return;
        };
        let Runtime { host, controller } = &mut *rt;
        host.unlisten();
        controller.teardown(host);
    }
}

impl Drop for Curtain {
    fn drop(&mut self) {
        self.teardown();
    }
}
