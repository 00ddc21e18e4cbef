//! View model for the page: an arena-backed element tree.
//!
//! The engine never touches a real browser. Everything the controllers need
//! from a rendering surface — element lookup, show/hide, measured image
//! heights, scroll offsets — is carried by this tree, which a host embeds
//! and keeps in sync with whatever actually paints. Tests substitute a
//! hand-built tree for the same effect.
//!
//! ## Shape
//!
//! Elements live in a flat arena ([`Document::nodes`]) addressed by
//! [`NodeId`]. Child order is document order; every traversal here is
//! depth-first preorder, so "DOM order" semantics (gallery sequencing,
//! prev/next adjacency) fall out of plain iteration.
//!
//! Text is represented as pseudo-elements with the reserved tag `#text`,
//! which keeps mixed content (`<p>plain <em>rich</em></p>`) ordered without
//! a separate node kind.
//!
//! ## Measured metrics
//!
//! Layout inputs (bounding-box height, layout-box height, scroll extents,
//! the image `complete` flag) are plain fields on [`Metrics`]. The engine
//! only ever reads them; the host (or a test fixture) writes them.

use std::collections::BTreeMap;

/// Index of an element in the document arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

/// Reserved tag name for text pseudo-elements.
pub const TEXT_TAG: &str = "#text";

/// How a section is displayed when shown.
///
/// The landing and notebook-index sections are flex containers; every other
/// section is a plain block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    Flex,
    Block,
}

impl DisplayMode {
    pub fn as_str(self) -> &'static str {
        match self {
            DisplayMode::Flex => "flex",
            DisplayMode::Block => "block",
        }
    }
}

/// Measured layout metrics for an element.
///
/// Defaults are "unmeasured": `None` heights, zero extents, image not
/// complete. The layout engine treats unmeasured heights as 0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metrics {
    /// Bounding-box width (`getBoundingClientRect().width`).
    pub rect_width: Option<f64>,
    /// Bounding-box height (`getBoundingClientRect().height`).
    pub rect_height: Option<f64>,
    /// Layout-box height (`offsetHeight`) fallback.
    pub offset_height: Option<f64>,
    /// Vertical document offset of the element's top edge.
    pub offset_top: f64,
    /// Horizontal scroll position of a scroll container.
    pub scroll_left: f64,
    /// Total scrollable width of a scroll container.
    pub scroll_width: f64,
    /// Visible width of a scroll container.
    pub client_width: f64,
    /// Whether an image element has finished loading.
    pub complete: bool,
}

/// One element (or `#text` pseudo-element) in the tree.
#[derive(Debug, Clone)]
pub struct Element {
    pub tag: String,
    pub classes: Vec<String>,
    pub attrs: BTreeMap<String, String>,
    pub style: BTreeMap<String, String>,
    /// Text payload; only meaningful for `#text` nodes.
    pub text: String,
    pub metrics: Metrics,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl Element {
    fn new(tag: &str) -> Self {
        Element {
            tag: tag.to_string(),
            classes: Vec::new(),
            attrs: BTreeMap::new(),
            style: BTreeMap::new(),
            text: String::new(),
            metrics: Metrics::default(),
            children: Vec::new(),
            parent: None,
        }
    }

    pub fn is_text(&self) -> bool {
        self.tag == TEXT_TAG
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        self.attrs.insert(name.to_string(), value.to_string());
    }

    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    pub fn style(&self, prop: &str) -> Option<&str> {
        self.style.get(prop).map(String::as_str)
    }

    pub fn set_style(&mut self, prop: &str, value: &str) {
        self.style.insert(prop.to_string(), value.to_string());
    }

    pub fn remove_style(&mut self, prop: &str) {
        self.style.remove(prop);
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

/// The element tree. One per page session.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Element>,
    root: NodeId,
}

impl Document {
    /// Create a document with a single root element.
    pub fn new(root_tag: &str) -> Self {
        Document {
            nodes: vec![Element::new(root_tag)],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn get(&self, node: NodeId) -> &Element {
        &self.nodes[node.0]
    }

    pub fn get_mut(&mut self, node: NodeId) -> &mut Element {
        &mut self.nodes[node.0]
    }

    /// Create a detached element. It joins the tree on `append_child`.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.nodes.push(Element::new(tag));
        NodeId(self.nodes.len() - 1)
    }

    /// Create a detached `#text` pseudo-element.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        let id = self.create_element(TEXT_TAG);
        self.nodes[id.0].text = text.to_string();
        id
    }

    /// Detach a node from its parent, if any. The node stays in the arena.
    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent {
            self.nodes[parent.0].children.retain(|&c| c != node);
            self.nodes[node.0].parent = None;
        }
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Insert `child` into `parent` before `reference`, or at the end when
    /// `reference` is `None` or not a child of `parent`.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        self.detach(child);
        let pos = reference
            .and_then(|r| self.nodes[parent.0].children.iter().position(|&c| c == r));
        match pos {
            Some(i) => self.nodes[parent.0].children.insert(i, child),
            None => self.nodes[parent.0].children.push(child),
        }
        self.nodes[child.0].parent = Some(parent);
    }

    // ------------------------------------------------------------------
    // Queries — all depth-first preorder, i.e. document order
    // ------------------------------------------------------------------

    /// All descendants of `scope`, excluding `scope` itself, in DOM order.
    pub fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[scope.0]
            .children
            .iter()
            .rev()
            .copied()
            .collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.nodes[node.0].children.iter().rev().copied());
        }
        out
    }

    /// First element anywhere in the document with the given `id` attribute.
    pub fn by_id(&self, id: &str) -> Option<NodeId> {
        if self.nodes[self.root.0].id() == Some(id) {
            return Some(self.root);
        }
        self.descendants(self.root)
            .into_iter()
            .find(|&n| self.nodes[n.0].id() == Some(id))
    }

    /// Descendants of `scope` with the given tag, in DOM order.
    pub fn query_tag(&self, scope: NodeId, tag: &str) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|&n| self.nodes[n.0].tag == tag)
            .collect()
    }

    /// Descendants of `scope` carrying the given class, in DOM order.
    pub fn query_class(&self, scope: NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|&n| self.nodes[n.0].has_class(class))
            .collect()
    }

    /// First descendant with the given tag.
    pub fn find_tag(&self, scope: NodeId, tag: &str) -> Option<NodeId> {
        self.query_tag(scope, tag).into_iter().next()
    }

    /// First descendant carrying the given class.
    pub fn find_class(&self, scope: NodeId, class: &str) -> Option<NodeId> {
        self.query_class(scope, class).into_iter().next()
    }

    /// `node` and its ancestors, nearest first.
    pub fn ancestors_inclusive(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = vec![node];
        let mut cur = node;
        while let Some(parent) = self.nodes[cur.0].parent {
            out.push(parent);
            cur = parent;
        }
        out
    }

    /// The sibling immediately after `node`, if any.
    pub fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.nodes[node.0].parent?;
        let siblings = &self.nodes[parent.0].children;
        let pos = siblings.iter().position(|&c| c == node)?;
        siblings.get(pos + 1).copied()
    }

    /// Nearest ancestor (or self) matching the tag, `closest('a')` style.
    pub fn closest_tag(&self, node: NodeId, tag: &str) -> Option<NodeId> {
        self.ancestors_inclusive(node)
            .into_iter()
            .find(|&n| self.nodes[n.0].tag == tag)
    }

    // ------------------------------------------------------------------
    // Content helpers
    // ------------------------------------------------------------------

    /// Concatenated text of the subtree rooted at `node`.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        if self.nodes[node.0].is_text() {
            out.push_str(&self.nodes[node.0].text);
        }
        for n in self.descendants(node) {
            if self.nodes[n.0].is_text() {
                out.push_str(&self.nodes[n.0].text);
            }
        }
        out
    }

    /// Replace the children of `node` with a single text child.
    pub fn set_text(&mut self, node: NodeId, text: &str) {
        self.nodes[node.0].children.clear();
        let t = self.create_text(text);
        self.append_child(node, t);
    }

    /// Remove all children of `node`.
    pub fn clear_children(&mut self, node: NodeId) {
        let children: Vec<NodeId> = self.nodes[node.0].children.clone();
        for c in children {
            self.detach(c);
        }
    }

    /// Deep-copy the children of `from` and append the copies to `to`.
    ///
    /// Used to inject rich description templates into the detail panel
    /// without consuming the template.
    pub fn clone_children_into(&mut self, from: NodeId, to: NodeId) {
        let children: Vec<NodeId> = self.nodes[from.0].children.clone();
        for child in children {
            let copy = self.deep_clone(child);
            self.append_child(to, copy);
        }
    }

    fn deep_clone(&mut self, node: NodeId) -> NodeId {
        let mut cloned = self.nodes[node.0].clone();
        let children = std::mem::take(&mut cloned.children);
        cloned.parent = None;
        self.nodes.push(cloned);
        let copy = NodeId(self.nodes.len() - 1);
        for child in children {
            let child_copy = self.deep_clone(child);
            self.append_child(copy, child_copy);
        }
        copy
    }

    // ------------------------------------------------------------------
    // Visibility
    // ------------------------------------------------------------------

    pub fn show(&mut self, node: NodeId, mode: DisplayMode) {
        self.nodes[node.0].set_style("display", mode.as_str());
    }

    pub fn hide(&mut self, node: NodeId) {
        self.nodes[node.0].set_style("display", "none");
    }

    /// Whether the element's own display style allows it to render.
    /// Elements with no explicit display are visible.
    pub fn is_shown(&self, node: NodeId) -> bool {
        self.nodes[node.0].style("display") != Some("none")
    }
}

/// Scroll state of the window viewing the document.
#[derive(Debug, Clone, Default)]
pub struct Viewport {
    pub scroll_y: f64,
}

impl Viewport {
    /// Immediate (non-animated) scroll. Clamped at the document top.
    pub fn scroll_to(&mut self, y: f64) {
        self.scroll_y = y.max(0.0);
    }
}
