//! Typed document traversal.
//!
//! A traversal visits the descendants of a root in document order and asks
//! a classifier for a three-way decision per node. The two classifiers the
//! engine uses — search mode and reset mode — live here next to the walk.

use crate::dom::{Document, NodeId};
use crate::highlight::{BackupTable, MARK_TAG};
use crate::matcher::TermMatcher;

/// The classifier's verdict for one visited node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalDecision {
    /// Collect this node and keep descending.
    Accept,
    /// Ignore this node but keep descending.
    Skip,
    /// Ignore this node and its whole subtree.
    RejectSubtree,
}

/// Collects the descendants of `root` accepted by `classify`, in document
/// order. `root` itself is not visited.
pub fn collect<F>(document: &Document, root: NodeId, mut classify: F) -> Vec<NodeId>
where
    F: FnMut(&Document, NodeId) -> TraversalDecision,
{
    let mut found = Vec::new();
    let mut stack: Vec<NodeId> = document.children(root).iter().rev().copied().collect();
    while let Some(id) = stack.pop() {
        match classify(document, id) {
            TraversalDecision::Accept => {
                found.push(id);
                stack.extend(document.children(id).iter().rev().copied());
            }
            TraversalDecision::Skip => {
                stack.extend(document.children(id).iter().rev().copied());
            }
            TraversalDecision::RejectSubtree => {}
        }
    }
    found
}

/// Search-mode classifier: accepts text nodes whose effective content
/// contains the term.
///
/// Subtrees under marker elements are rejected so already-highlighted text
/// is never re-matched, and invisible subtrees are rejected entirely. When
/// a text node's parent holds a backup entry, the backed-up original (not
/// the live, mutated text) is what gets tested.
pub fn search_filter<'a>(
    matcher: &'a TermMatcher,
    backups: &'a BackupTable,
) -> impl FnMut(&Document, NodeId) -> TraversalDecision + 'a {
    move |document, id| {
        if document.is_element(id) {
            if document.tag(id) == Some(MARK_TAG) {
                return TraversalDecision::RejectSubtree;
            }
            if !document.is_visible(id) {
                return TraversalDecision::RejectSubtree;
            }
            return TraversalDecision::Skip;
        }

        let Some(parent) = document.parent(id) else {
            return TraversalDecision::Skip;
        };
        let content = match backups.original(parent) {
            Some(original) => original,
            None => document.text(id).unwrap_or_default().to_string(),
        };
        if matcher.is_match(&content) {
            TraversalDecision::Accept
        } else {
            TraversalDecision::Skip
        }
    }
}

/// Reset-mode classifier: accepts exactly the elements holding a backup
/// entry, i.e. the ones currently mutated for highlighting.
pub fn reset_filter(backups: &BackupTable) -> impl FnMut(&Document, NodeId) -> TraversalDecision + '_ {
    move |document, id| {
        if document.is_element(id) && backups.contains(id) {
            TraversalDecision::Accept
        } else {
            TraversalDecision::Skip
        }
    }
}
