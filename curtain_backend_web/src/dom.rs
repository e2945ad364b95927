// Copyright 2026 the Curtain Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`Dom`] over the live browser document.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use curtain_core::backend::{Dom, ElementKind, SVG_NAMESPACE};
use wasm_bindgen::JsCast as _;
use web_sys::{CssStyleDeclaration, Document, Element, HtmlElement, SvgElement};

/// Applies overlay mutations to a `web_sys::Document`.
///
/// Mutations are best-effort: a failed DOM call is ignored, leaving the
/// lifecycle to continue with whatever was applied.
pub struct WebDom {
    document: Document,
}

impl core::fmt::Debug for WebDom {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WebDom")
            .field("document", &"Document")
            .finish()
    }
}

impl WebDom {
    /// Wraps `document`.
    #[must_use]
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    /// Returns the wrapped document.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }
}

fn inline_style(node: &Element) -> Option<CssStyleDeclaration> {
    if let Some(el) = node.dyn_ref::<HtmlElement>() {
        Some(el.style())
    } else {
        node.dyn_ref::<SvgElement>().map(SvgElement::style)
    }
}

impl Dom for WebDom {
    type Node = Element;

    fn query_marked(&self, attribute: &str) -> Vec<Element> {
        let Ok(list) = self.document.query_selector_all(&format!("[{attribute}]")) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|n| n.dyn_into::<Element>().ok())
            .collect()
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    /// # Panics
    ///
    /// Panics if the browser rejects one of the fixed tag names, which only
    /// happens when no document is usable at all.
    fn create_element(&mut self, kind: ElementKind) -> Element {
        let created = if kind.is_svg() {
            self.document
                .create_element_ns(Some(SVG_NAMESPACE), kind.tag())
        } else {
            self.document.create_element(kind.tag())
        };
        created.expect("create_element failed")
    }

    fn set_attribute(&mut self, node: &Element, name: &str, value: &str) {
        let _ = node.set_attribute(name, value);
    }

    fn set_style(&mut self, node: &Element, name: &str, value: &str) {
        if let Some(style) = inline_style(node) {
            let _ = style.set_property(name, value);
        }
    }

    fn append_child(&mut self, parent: &Element, child: &Element) {
        let _ = parent.append_child(child);
    }

    fn move_children(&mut self, from: &Element, to: &Element) {
        while let Some(child) = from.first_child() {
            if to.append_child(&child).is_err() {
                break;
            }
        }
    }

    fn element_child_count(&self, node: &Element) -> usize {
        node.child_element_count() as usize
    }

    fn append_to_body(&mut self, node: &Element) {
        if let Some(body) = self.document.body() {
            let _ = body.append_child(node);
        }
    }

    fn detach(&mut self, node: &Element) {
        node.remove();
    }

    fn is_attached(&self, node: &Element) -> bool {
        node.is_connected()
    }

    fn has_stylesheet(&self, id: &str) -> bool {
        self.document.get_element_by_id(id).is_some()
    }

    fn insert_stylesheet(&mut self, id: &str, css: &str) {
        let Some(head) = self.document.head() else {
            return;
        };
        let Ok(style) = self.document.create_element("style") else {
            return;
        };
        style.set_id(id);
        style.set_text_content(Some(css));
        let _ = head.insert_before(&style, head.first_child().as_ref());
    }
}
