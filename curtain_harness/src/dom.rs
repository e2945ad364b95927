// Copyright 2026 the Curtain Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An arena-backed document tree implementing [`Dom`].
//!
//! [`MemoryDom`] models the subset of a browser document the overlay builder
//! touches: elements with attributes and inline styles, text nodes, a
//! `<head>` for stylesheets and a `<body>` for overlays. Nodes are never freed;
//! detaching a node only unlinks it from its parent, so tests can still
//! inspect it afterwards.

use curtain_core::backend::{Dom, ElementKind};

/// Handle to a node in a [`MemoryDom`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

#[derive(Debug)]
enum NodeData {
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
        styles: Vec<(String, String)>,
    },
    Text(String),
}

#[derive(Debug)]
struct NodeRecord {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// An in-memory document: `<html>` containing `<head>` and `<body>`.
#[derive(Debug)]
pub struct MemoryDom {
    nodes: Vec<NodeRecord>,
    html: NodeId,
    head: NodeId,
    body: NodeId,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    /// Creates a document with an empty head and body.
    #[must_use]
    pub fn new() -> Self {
        let mut dom = Self {
            nodes: Vec::new(),
            html: NodeId(0),
            head: NodeId(0),
            body: NodeId(0),
        };
        dom.html = dom.alloc_element("html");
        dom.head = dom.add_element(dom.html, "head");
        dom.body = dom.add_element(dom.html, "body");
        dom
    }

    /// Returns the `<html>` element.
    #[must_use]
    pub const fn document_element(&self) -> NodeId {
        self.html
    }

    /// Returns the `<head>` element.
    #[must_use]
    pub const fn head(&self) -> NodeId {
        self.head
    }

    /// Returns the `<body>` element.
    #[must_use]
    pub const fn body(&self) -> NodeId {
        self.body
    }

    /// Creates an element and appends it to `parent`.
    pub fn add_element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let id = self.alloc_element(tag);
        self.link(parent, id);
        id
    }

    /// Creates a text node and appends it to `parent`.
    pub fn add_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let id = self.alloc(NodeData::Text(text.to_owned()));
        self.link(parent, id);
        id
    }

    /// Creates a `<div>` under `parent` with the given attributes.
    pub fn add_div(&mut self, parent: NodeId, attributes: &[(&str, &str)]) -> NodeId {
        let id = self.add_element(parent, "div");
        for (name, value) in attributes {
            self.set_attribute(&id, name, value);
        }
        id
    }

    /// Returns the children of `node`, in order.
    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node.0)
            .map_or(&[][..], |n| n.children.as_slice())
    }

    /// Returns the parent of `node`.
    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|n| n.parent)
    }

    /// Returns the tag name, or `None` for text nodes.
    #[must_use]
    pub fn tag(&self, node: NodeId) -> Option<&str> {
        match &self.nodes.get(node.0)?.data {
            NodeData::Element { tag, .. } => Some(tag),
            NodeData::Text(_) => None,
        }
    }

    /// Returns the content of a text node.
    #[must_use]
    pub fn text(&self, node: NodeId) -> Option<&str> {
        match &self.nodes.get(node.0)?.data {
            NodeData::Text(text) => Some(text),
            NodeData::Element { .. } => None,
        }
    }

    /// Returns an attribute value.
    #[must_use]
    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        match &self.nodes.get(node.0)?.data {
            NodeData::Element { attributes, .. } => lookup(attributes, name),
            NodeData::Text(_) => None,
        }
    }

    /// Returns an inline style value.
    #[must_use]
    pub fn style(&self, node: NodeId, name: &str) -> Option<&str> {
        match &self.nodes.get(node.0)?.data {
            NodeData::Element { styles, .. } => lookup(styles, name),
            NodeData::Text(_) => None,
        }
    }

    /// Counts attached `<style>` elements with the given id.
    #[must_use]
    pub fn stylesheet_count(&self, id: &str) -> usize {
        self.descendants(self.html)
            .into_iter()
            .filter(|&n| self.tag(n) == Some("style") && self.attr(n, "id") == Some(id))
            .count()
    }

    /// Returns the attached elements whose `class` attribute is exactly
    /// `class`, in document order.
    #[must_use]
    pub fn find_by_class(&self, class: &str) -> Vec<NodeId> {
        self.descendants(self.html)
            .into_iter()
            .filter(|&n| self.attr(n, "class") == Some(class))
            .collect()
    }

    /// Pre-order traversal of `root`'s subtree, `root` included.
    fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.children(n).iter().rev());
        }
        out
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeRecord {
            data,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    fn alloc_element(&mut self, tag: &str) -> NodeId {
        self.alloc(NodeData::Element {
            tag: tag.to_owned(),
            attributes: Vec::new(),
            styles: Vec::new(),
        })
    }

    fn unlink(&mut self, node: NodeId) {
        let Some(parent) = self.parent(node) else {
            return;
        };
        if let Some(p) = self.nodes.get_mut(parent.0) {
            p.children.retain(|&c| c != node);
        }
        if let Some(n) = self.nodes.get_mut(node.0) {
            n.parent = None;
        }
    }

    fn link(&mut self, parent: NodeId, child: NodeId) {
        self.unlink(child);
        if let Some(c) = self.nodes.get_mut(child.0) {
            c.parent = Some(parent);
        }
        if let Some(p) = self.nodes.get_mut(parent.0) {
            p.children.push(child);
        }
    }

    fn element_data_mut(
        &mut self,
        node: NodeId,
    ) -> Option<(&mut Vec<(String, String)>, &mut Vec<(String, String)>)> {
        match &mut self.nodes.get_mut(node.0)?.data {
            NodeData::Element {
                attributes, styles, ..
            } => Some((attributes, styles)),
            NodeData::Text(_) => None,
        }
    }
}

fn lookup<'a>(pairs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

fn upsert(pairs: &mut Vec<(String, String)>, name: &str, value: &str) {
    match pairs.iter_mut().find(|(k, _)| k == name) {
        Some((_, v)) => value.clone_into(v),
        None => pairs.push((name.to_owned(), value.to_owned())),
    }
}

impl Dom for MemoryDom {
    type Node = NodeId;

    fn query_marked(&self, attribute: &str) -> Vec<NodeId> {
        self.descendants(self.html)
            .into_iter()
            .filter(|&n| self.attr(n, attribute).is_some())
            .collect()
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.attr(*node, name).map(ToOwned::to_owned)
    }

    fn create_element(&mut self, kind: ElementKind) -> NodeId {
        self.alloc_element(kind.tag())
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) {
        if let Some((attributes, _)) = self.element_data_mut(*node) {
            upsert(attributes, name, value);
        }
    }

    fn set_style(&mut self, node: &NodeId, name: &str, value: &str) {
        if let Some((_, styles)) = self.element_data_mut(*node) {
            upsert(styles, name, value);
        }
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) {
        self.link(*parent, *child);
    }

    fn move_children(&mut self, from: &NodeId, to: &NodeId) {
        let moved = self.children(*from).to_vec();
        for child in moved {
            self.link(*to, child);
        }
    }

    fn element_child_count(&self, node: &NodeId) -> usize {
        self.children(*node)
            .iter()
            .filter(|&&c| self.tag(c).is_some())
            .count()
    }

    fn append_to_body(&mut self, node: &NodeId) {
        self.link(self.body, *node);
    }

    fn detach(&mut self, node: &NodeId) {
        self.unlink(*node);
    }

    fn is_attached(&self, node: &NodeId) -> bool {
        let mut current = Some(*node);
        while let Some(n) = current {
            if n == self.html {
                return true;
            }
            current = self.parent(n);
        }
        false
    }

    fn has_stylesheet(&self, id: &str) -> bool {
        self.stylesheet_count(id) > 0
    }

    fn insert_stylesheet(&mut self, id: &str, css: &str) {
        let style = self.alloc_element("style");
        self.set_attribute(&style, "id", id);
        self.add_text(style, css);
        if let Some(c) = self.nodes.get_mut(style.0) {
            c.parent = Some(self.head);
        }
        if let Some(h) = self.nodes.get_mut(self.head.0) {
            h.children.insert(0, style);
        }
    }
}
