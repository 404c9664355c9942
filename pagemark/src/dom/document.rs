//! Arena-based document tree.

use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

use super::node::{ElementData, NodeData, NodeId};

/// The externally-owned handle to a live document.
///
/// The host and the search engine both hold clones; all mutation goes
/// through the write lock, so a scheduler batch excludes host reads for
/// its whole duration.
pub type SharedDocument = Arc<RwLock<Document>>;

#[derive(Debug)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

/// An in-memory document tree with the fixed skeleton
/// `#document > html > (head > title, body > main)`.
///
/// The `main` element is the content root: the subtree the engine searches
/// and highlights. Node ids are stable for the document's lifetime, and all
/// operations on stale or detached ids degrade to no-ops so that deferred
/// mutation closures never fail.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    head: NodeId,
    title: NodeId,
    body: NodeId,
    content_root: NodeId,
    title_rev: watch::Sender<u64>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates an empty document with the standard skeleton.
    #[must_use]
    pub fn new() -> Self {
        let (title_rev, _) = watch::channel(0);
        let mut document = Self {
            nodes: Vec::new(),
            root: NodeId::new(0),
            head: NodeId::new(0),
            title: NodeId::new(0),
            body: NodeId::new(0),
            content_root: NodeId::new(0),
            title_rev,
        };

        let root = document.alloc(None, NodeData::Element(ElementData::new("#document")));
        let html = document.alloc(Some(root), NodeData::Element(ElementData::new("html")));
        let head = document.alloc(Some(html), NodeData::Element(ElementData::new("head")));
        let title = document.alloc(Some(head), NodeData::Element(ElementData::new("title")));
        let body = document.alloc(Some(html), NodeData::Element(ElementData::new("body")));
        let main = document.alloc(Some(body), NodeData::Element(ElementData::new("main")));
        document.set_attribute(main, "role", "main");

        document.root = root;
        document.head = head;
        document.title = title;
        document.body = body;
        document.content_root = main;
        document
    }

    /// Wraps the document in the shared handle used by the engine.
    #[must_use]
    pub fn into_shared(self) -> SharedDocument {
        Arc::new(RwLock::new(self))
    }

    fn alloc(&mut self, parent: Option<NodeId>, data: NodeData) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(Node {
            parent,
            children: Vec::new(),
            data,
        });
        if let Some(parent) = parent {
            if let Some(node) = self.node_mut(parent) {
                node.children.push(id);
            }
        }
        id
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// The document root node.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The `head` element, target of style injection.
    #[must_use]
    pub fn head(&self) -> NodeId {
        self.head
    }

    /// The `body` element.
    #[must_use]
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// The content root (`main`): the searchable subtree.
    #[must_use]
    pub fn content_root(&self) -> NodeId {
        self.content_root
    }

    /// Appends a new element under `parent` and returns its id.
    ///
    /// If `parent` is unknown the element is created detached.
    pub fn append_element(&mut self, parent: NodeId, tag: impl Into<String>) -> NodeId {
        if self.node(parent).is_none() {
            debug!(?parent, "append_element: unknown parent, creating detached node");
            return self.alloc(None, NodeData::Element(ElementData::new(tag)));
        }
        self.alloc(Some(parent), NodeData::Element(ElementData::new(tag)))
    }

    /// Appends a new text node under `parent` and returns its id.
    pub fn append_text(&mut self, parent: NodeId, text: impl Into<String>) -> NodeId {
        if self.node(parent).is_none() {
            debug!(?parent, "append_text: unknown parent, creating detached node");
            return self.alloc(None, NodeData::Text(text.into()));
        }
        self.alloc(Some(parent), NodeData::Text(text.into()))
    }

    /// Detaches every child of `id`, leaving the children (and their
    /// subtrees) orphaned in the arena.
    pub fn detach_children(&mut self, id: NodeId) {
        let children = match self.node_mut(id) {
            Some(node) => std::mem::take(&mut node.children),
            None => return,
        };
        for child in children {
            if let Some(node) = self.node_mut(child) {
                node.parent = None;
            }
        }
    }

    /// Returns the parent of `id`, if attached to one.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|node| node.parent)
    }

    /// Returns the children of `id` in document order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map_or(&[], |node| node.children.as_slice())
    }

    /// Returns the tag name when `id` is an element.
    #[must_use]
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match self.node(id).map(|node| &node.data) {
            Some(NodeData::Element(element)) => Some(element.tag()),
            _ => None,
        }
    }

    /// Returns the text when `id` is a text node.
    #[must_use]
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.node(id).map(|node| &node.data) {
            Some(NodeData::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Returns whether `id` refers to an element node.
    #[must_use]
    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(
            self.node(id).map(|node| &node.data),
            Some(NodeData::Element(_))
        )
    }

    /// Returns an attribute value on an element.
    #[must_use]
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        match self.node(id).map(|node| &node.data) {
            Some(NodeData::Element(element)) => element.attribute(name),
            _ => None,
        }
    }

    /// Sets an attribute on an element. No-op for text or unknown nodes.
    pub fn set_attribute(&mut self, id: NodeId, name: impl Into<String>, value: impl Into<String>) {
        if let Some(NodeData::Element(element)) = self.node_mut(id).map(|node| &mut node.data) {
            element.set_attribute(name, value);
        }
    }

    /// Removes an attribute from an element. No-op for text or unknown nodes.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) {
        if let Some(NodeData::Element(element)) = self.node_mut(id).map(|node| &mut node.data) {
            element.remove_attribute(name);
        }
    }

    /// Sets the rendering visibility flag of an element.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        if let Some(NodeData::Element(element)) = self.node_mut(id).map(|node| &mut node.data) {
            element.set_visible(visible);
        }
    }

    /// Returns whether `id` is rendered: its own flag and every ancestor
    /// element's flag must be set. Text nodes inherit from their ancestors.
    #[must_use]
    pub fn is_visible(&self, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let Some(node) = self.node(current) else {
                return false;
            };
            if let NodeData::Element(element) = &node.data {
                if !element.is_visible() {
                    return false;
                }
            }
            cursor = node.parent;
        }
        true
    }

    /// Returns whether `id` is still reachable from the document root.
    #[must_use]
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut cursor = id;
        loop {
            if cursor == self.root {
                return true;
            }
            match self.node(cursor).and_then(|node| node.parent) {
                Some(parent) => cursor = parent,
                None => return false,
            }
        }
    }

    /// Returns the concatenated text of `id` and its descendants.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.node(id) else {
            return;
        };
        match &node.data {
            NodeData::Text(text) => out.push_str(text),
            NodeData::Element(_) => {
                for &child in &node.children {
                    self.collect_text(child, out);
                }
            }
        }
    }

    /// Collects descendant elements of `root` with the given tag, in
    /// document order. `root` itself is not considered.
    #[must_use]
    pub fn elements_by_tag(&self, root: NodeId, tag: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = self.children(root).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if self.tag(id) == Some(tag) {
                found.push(id);
            }
            stack.extend(self.children(id).iter().rev().copied());
        }
        found
    }

    /// Returns the current document title.
    #[must_use]
    pub fn title(&self) -> String {
        self.text_content(self.title)
    }

    /// Replaces the document title and notifies title observers.
    pub fn set_title(&mut self, title: impl Into<String>) {
        let title_el = self.title;
        self.detach_children(title_el);
        self.append_text(title_el, title);
        self.title_rev.send_modify(|revision| *revision += 1);
    }

    /// Subscribes to title mutations. The receiver observes a revision
    /// counter bumped on every [`set_title`](Self::set_title).
    #[must_use]
    pub fn title_signal(&self) -> watch::Receiver<u64> {
        self.title_rev.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn skeleton_is_wired_up() {
        let document = Document::new();
        assert_eq!(document.tag(document.content_root()), Some("main"));
        assert_eq!(document.attribute(document.content_root(), "role"), Some("main"));
        assert!(document.is_attached(document.content_root()));
        assert!(document.is_attached(document.head()));
        assert_eq!(document.title(), "");
    }

    #[test]
    fn append_and_read_text_content() {
        let mut document = Document::new();
        let main = document.content_root();
        let p = document.append_element(main, "p");
        document.append_text(p, "hello ");
        let em = document.append_element(p, "em");
        document.append_text(em, "world");

        assert_eq!(document.text_content(p), "hello world");
        assert_eq!(document.text_content(main), "hello world");
    }

    #[test]
    fn detach_children_orphans_the_subtree() {
        let mut document = Document::new();
        let main = document.content_root();
        let p = document.append_element(main, "p");
        let text = document.append_text(p, "gone soon");

        assert!(document.is_attached(text));
        document.detach_children(p);
        assert!(!document.is_attached(text));
        assert!(document.children(p).is_empty());
        // The orphan keeps its payload.
        assert_eq!(document.text(text), Some("gone soon"));
    }

    #[test]
    fn visibility_inherits_from_ancestors() {
        let mut document = Document::new();
        let main = document.content_root();
        let section = document.append_element(main, "section");
        let p = document.append_element(section, "p");
        let text = document.append_text(p, "text");

        assert!(document.is_visible(text));
        document.set_visible(section, false);
        assert!(!document.is_visible(text));
        assert!(!document.is_visible(p));
        assert!(document.is_visible(main));
    }

    #[test]
    fn elements_by_tag_in_document_order() {
        let mut document = Document::new();
        let main = document.content_root();
        let first = document.append_element(main, "p");
        let inner = document.append_element(first, "p");
        let second = document.append_element(main, "p");

        assert_eq!(document.elements_by_tag(main, "p"), vec![first, inner, second]);
    }

    #[tokio::test]
    async fn title_signal_observes_mutations() {
        let mut document = Document::new();
        let mut revisions = document.title_signal();

        document.set_title("Page One");
        revisions.changed().await.ok();
        assert_eq!(*revisions.borrow_and_update(), 1);
        assert_eq!(document.title(), "Page One");

        document.set_title("Page Two");
        revisions.changed().await.ok();
        assert_eq!(*revisions.borrow_and_update(), 2);
        assert_eq!(document.title(), "Page Two");
    }

    #[test]
    fn stale_ids_are_tolerated() {
        let mut document = Document::new();
        let stale = NodeId::new(9999);
        assert_eq!(document.parent(stale), None);
        assert!(document.children(stale).is_empty());
        assert!(!document.is_attached(stale));
        assert!(!document.is_visible(stale));
        document.set_attribute(stale, "class", "x");
        document.remove_attribute(stale, "class");
        document.detach_children(stale);
        assert_eq!(document.text_content(stale), "");
    }
}
