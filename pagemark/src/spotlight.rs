//! Cyclic navigation over the live markers of the active term.
//!
//! The spotlight holds the markers of the current search in insertion
//! (document) order and rotates through them one step per advance,
//! wrapping around forever. Markers are referenced by id only, so each
//! construction re-validates attachment against the live document.

use std::collections::VecDeque;
use std::sync::Arc;
use tracing::debug;

use crate::dom::{Document, NodeId};
use crate::highlight::Mutation;

/// Class applied to the marker currently under the spotlight.
pub const CURRENT_CLASS: &str = "dd-macos-current";

/// Attribute carrying the marker's class.
pub const CLASS_ATTR: &str = "class";

/// Host-page scroll-into-view collaborator.
pub trait Scroller: Send + Sync {
    /// Requests that `marker` be scrolled into the viewport.
    fn scroll_to(&self, marker: NodeId);
}

/// A scroller that does nothing; the default when the host provides none.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpScroller;

impl Scroller for NoOpScroller {
    fn scroll_to(&self, _marker: NodeId) {}
}

/// The circular marker queue for one active search term.
#[derive(Debug)]
pub struct Spotlight {
    term: String,
    markers: VecDeque<NodeId>,
}

impl Spotlight {
    /// Creates a spotlight over `markers`, keeping only the ones still
    /// attached to `document` and preserving their order.
    ///
    /// Detached ids here would mean a highlight batch overwrote its own
    /// output; the session prevents that by de-duplicating targets, but
    /// the filter stays as a guard against host mutations racing the
    /// batch.
    #[must_use]
    pub fn new(term: impl Into<String>, markers: Vec<NodeId>, document: &Document) -> Self {
        let term = term.into();
        let total = markers.len();
        let attached: VecDeque<NodeId> = markers
            .into_iter()
            .filter(|&marker| document.is_attached(marker))
            .collect();
        if attached.len() < total {
            debug!(
                term = %term,
                dropped = total - attached.len(),
                "dropped markers detached from the document"
            );
        }
        Self {
            term,
            markers: attached,
        }
    }

    /// The term this spotlight was built for.
    #[must_use]
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Exact string equality against the held term; decides whether a new
    /// search call reuses this cycle instead of rebuilding.
    #[must_use]
    pub fn matches_term(&self, term: &str) -> bool {
        self.term == term
    }

    /// Number of live markers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Returns whether the spotlight holds no markers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// The marker most recently stepped to, if any.
    #[must_use]
    pub fn current(&self) -> Option<NodeId> {
        self.markers.back().copied()
    }

    /// Rotates one step and returns the `(previous, next)` marker pair for
    /// the accompanying visual update, or `None` when empty.
    ///
    /// `next` is the head of the queue and `previous` the tail; the head
    /// then moves to the tail. With a single marker the pair is the same
    /// node and the visual update is a harmless re-apply.
    pub fn step(&mut self) -> Option<(NodeId, NodeId)> {
        let next = *self.markers.front()?;
        let previous = *self.markers.back()?;
        self.markers.rotate_left(1);
        Some((previous, next))
    }
}

/// Builds the deferred visual update for one spotlight step: clear the
/// current-class from `previous`, set it on `next`, and ask the host to
/// scroll `next` into view.
pub fn advance_mutation(previous: NodeId, next: NodeId, scroller: Arc<dyn Scroller>) -> Mutation {
    Box::new(move |document| {
        document.remove_attribute(previous, CLASS_ATTR);
        document.set_attribute(next, CLASS_ATTR, CURRENT_CLASS);
        scroller.scroll_to(next);
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;
    use crate::highlight::MARK_TAG;
    use pretty_assertions::assert_eq;

    fn document_with_marks(count: usize) -> (Document, Vec<NodeId>) {
        let mut document = Document::new();
        let main = document.content_root();
        let p = document.append_element(main, "p");
        let marks = (0..count)
            .map(|i| {
                let mark = document.append_element(p, MARK_TAG);
                document.append_text(mark, format!("m{i}"));
                mark
            })
            .collect();
        (document, marks)
    }

    #[test]
    fn step_visits_every_marker_once_per_cycle() {
        let (document, marks) = document_with_marks(3);
        let mut spotlight = Spotlight::new("m", marks.clone(), &document);

        let mut visited = Vec::new();
        for _ in 0..3 {
            let (_, next) = spotlight.step().unwrap();
            visited.push(next);
        }
        assert_eq!(visited, marks);

        // The fourth step wraps around to the first marker.
        let (previous, next) = spotlight.step().unwrap();
        assert_eq!(next, marks[0]);
        assert_eq!(previous, marks[2]);
    }

    #[test]
    fn single_marker_is_stable() {
        let (document, marks) = document_with_marks(1);
        let mut spotlight = Spotlight::new("m", marks.clone(), &document);

        for _ in 0..4 {
            let (previous, next) = spotlight.step().unwrap();
            assert_eq!(previous, marks[0]);
            assert_eq!(next, marks[0]);
        }
        assert_eq!(spotlight.current(), Some(marks[0]));
    }

    #[test]
    fn empty_spotlight_never_steps() {
        let document = Document::new();
        let mut spotlight = Spotlight::new("m", Vec::new(), &document);
        assert!(spotlight.is_empty());
        assert_eq!(spotlight.step(), None);
        assert_eq!(spotlight.current(), None);
    }

    #[test]
    fn detached_markers_are_filtered_out() {
        let (mut document, marks) = document_with_marks(3);
        // Detach the middle marker's parent chain by rebuilding the element.
        let parent = document.parent(marks[1]).unwrap();
        document.detach_children(parent);
        let replacement = document.append_element(parent, MARK_TAG);
        document.append_text(replacement, "mX");

        let spotlight = Spotlight::new("m", marks.clone(), &document);
        assert_eq!(spotlight.len(), 0, "all original marks were detached");

        let spotlight = Spotlight::new("m", vec![replacement], &document);
        assert_eq!(spotlight.len(), 1);
    }

    #[test]
    fn matches_term_is_exact_and_case_sensitive() {
        let document = Document::new();
        let spotlight = Spotlight::new("Foo", Vec::new(), &document);
        assert!(spotlight.matches_term("Foo"));
        assert!(!spotlight.matches_term("foo"));
        assert!(!spotlight.matches_term("Foo "));
    }

    #[test]
    fn advance_mutation_moves_the_current_class() {
        let (mut document, marks) = document_with_marks(2);
        advance_mutation(marks[1], marks[0], Arc::new(NoOpScroller))(&mut document);
        assert_eq!(document.attribute(marks[0], CLASS_ATTR), Some(CURRENT_CLASS));
        assert_eq!(document.attribute(marks[1], CLASS_ATTR), None);

        advance_mutation(marks[0], marks[1], Arc::new(NoOpScroller))(&mut document);
        assert_eq!(document.attribute(marks[0], CLASS_ATTR), None);
        assert_eq!(document.attribute(marks[1], CLASS_ATTR), Some(CURRENT_CLASS));
    }
}
