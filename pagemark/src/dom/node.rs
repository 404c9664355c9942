//! Node identity and payload types.

use std::collections::BTreeMap;
use std::fmt;

/// A stable handle to a node in a [`Document`](super::Document) arena.
///
/// Ids are never reused for the lifetime of the document, so they are safe
/// to keep in side tables (backups, marker queues) while the tree mutates.
/// A detached node keeps its id; attachment must be re-checked before use.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub(crate) fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// The payload of a document node.
#[derive(Debug, Clone)]
pub enum NodeData {
    /// An element with a tag name, attributes and a visibility flag.
    Element(ElementData),
    /// A text leaf.
    Text(String),
}

/// Element payload: tag name, attributes and rendering visibility.
#[derive(Debug, Clone)]
pub struct ElementData {
    tag: String,
    attributes: BTreeMap<String, String>,
    visible: bool,
}

impl ElementData {
    /// Creates a visible element with no attributes.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            visible: true,
        }
    }

    /// Returns the tag name.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Returns an attribute value, if set.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Sets an attribute, replacing any previous value.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Removes an attribute. Returns the previous value, if any.
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        self.attributes.remove(name)
    }

    /// Returns whether this element is rendered.
    ///
    /// This is the element's own flag; effective visibility also depends on
    /// ancestors, see [`Document::is_visible`](super::Document::is_visible).
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Sets the rendering visibility flag.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn element_attributes_round_trip() {
        let mut element = ElementData::new("p");
        assert_eq!(element.tag(), "p");
        assert_eq!(element.attribute("class"), None);

        element.set_attribute("class", "intro");
        assert_eq!(element.attribute("class"), Some("intro"));

        assert_eq!(element.remove_attribute("class"), Some("intro".to_string()));
        assert_eq!(element.attribute("class"), None);
        assert_eq!(element.remove_attribute("class"), None);
    }

    #[test]
    fn element_visibility_defaults_on() {
        let mut element = ElementData::new("div");
        assert!(element.is_visible());
        element.set_visible(false);
        assert!(!element.is_visible());
    }
}
