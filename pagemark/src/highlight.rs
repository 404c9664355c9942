//! Highlight and restore mutations, and the backup side table.
//!
//! Both operations are built as deferred [`Mutation`] closures so a whole
//! search or reset lands in a single scheduler batch. The original text of
//! every mutated element is kept in a [`BackupTable`] keyed by node id — an
//! explicit side table rather than an attribute smuggled onto the node —
//! and its presence is the sole signal that an element is currently
//! highlighted.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use crate::dom::{Document, NodeId};
use crate::matcher::{Segment, TermMatcher};

/// Tag name of the marker element wrapped around each match.
pub const MARK_TAG: &str = "mark";

/// A deferred document write. Executed by a scheduler inside a batch,
/// never synchronously with its creation. Returns the marker ids the write
/// created, if any.
pub type Mutation = Box<dyn FnOnce(&mut Document) -> Vec<NodeId> + Send>;

/// Side table mapping a highlighted element to its original text content.
///
/// Invariants: at most one entry per element, and an entry exists exactly
/// while the element's children are replaced by highlight output. Entries
/// are consumed by the restore mutation.
#[derive(Debug, Default)]
pub struct BackupTable {
    entries: Mutex<HashMap<NodeId, String>>,
}

impl BackupTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the backed-up original content for `id`, if present.
    #[must_use]
    pub fn original(&self, id: NodeId) -> Option<String> {
        self.entries.lock().get(&id).cloned()
    }

    /// Records the original content for `id` unless an entry already
    /// exists; the first backup wins across repeated highlight passes.
    pub fn record(&self, id: NodeId, content: String) {
        self.entries.lock().entry(id).or_insert(content);
    }

    /// Removes and returns the entry for `id`.
    pub fn take(&self, id: NodeId) -> Option<String> {
        self.entries.lock().remove(&id)
    }

    /// Returns whether `id` currently has a backup entry.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.entries.lock().contains_key(&id)
    }

    /// Number of currently backed-up elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

/// Builds the deferred highlight for one element.
///
/// When run, the closure reads the element's backed-up original if one
/// exists (guarding against reading already-mutated text on a repeated
/// pass), records the backup otherwise, and rebuilds the element's children
/// as interleaved text nodes and `mark` elements at each occurrence of the
/// term. It returns the ids of the markers it created.
///
/// A target already detached when the closure runs is left alone, so the
/// table only ever holds entries the reset traversal can find.
pub fn highlight_mutation(
    target: NodeId,
    matcher: TermMatcher,
    backups: Arc<BackupTable>,
) -> Mutation {
    Box::new(move |document| {
        // An earlier mutation in the same batch may have rebuilt an
        // ancestor, orphaning this element; a backup recorded for it would
        // be unreachable from the reset traversal.
        if !document.is_attached(target) {
            return Vec::new();
        }

        let content = match backups.original(target) {
            Some(original) => original,
            None => {
                let live = document.text_content(target);
                backups.record(target, live.clone());
                live
            }
        };

        document.detach_children(target);
        let mut markers = Vec::new();
        for segment in matcher.segments(&content) {
            match segment {
                Segment::Plain(text) => {
                    document.append_text(target, text);
                }
                Segment::Matched(text) => {
                    let mark = document.append_element(target, MARK_TAG);
                    document.append_text(mark, text);
                    markers.push(mark);
                }
            }
        }
        markers
    })
}

/// Builds the deferred restore for one element: put the backed-up original
/// text back and drop the entry. Idempotent — without an entry the closure
/// is a no-op.
pub fn restore_mutation(target: NodeId, backups: Arc<BackupTable>) -> Mutation {
    Box::new(move |document| {
        if let Some(original) = backups.take(target) {
            document.detach_children(target);
            document.append_text(target, original);
        }
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn matcher(term: &str) -> TermMatcher {
        TermMatcher::new(term).unwrap()
    }

    #[test]
    fn highlight_wraps_each_occurrence() {
        let mut document = Document::new();
        let main = document.content_root();
        let p = document.append_element(main, "p");
        document.append_text(p, "foo bar Foo");

        let backups = Arc::new(BackupTable::new());
        let mutation = highlight_mutation(p, matcher("foo"), Arc::clone(&backups));
        let markers = mutation(&mut document);

        assert_eq!(markers.len(), 2);
        for &mark in &markers {
            assert_eq!(document.tag(mark), Some(MARK_TAG));
            assert!(document.is_attached(mark));
        }
        // Overall text is unchanged, only the structure differs.
        assert_eq!(document.text_content(p), "foo bar Foo");
        assert_eq!(backups.original(p), Some("foo bar Foo".to_string()));
    }

    #[test]
    fn highlight_is_deferred_until_run() {
        let mut document = Document::new();
        let main = document.content_root();
        let p = document.append_element(main, "p");
        document.append_text(p, "foo");

        let backups = Arc::new(BackupTable::new());
        let mutation = highlight_mutation(p, matcher("foo"), Arc::clone(&backups));

        // Building the closure must not touch the document or the table.
        assert!(document.elements_by_tag(p, MARK_TAG).is_empty());
        assert!(backups.is_empty());

        mutation(&mut document);
        assert_eq!(document.elements_by_tag(p, MARK_TAG).len(), 1);
    }

    #[test]
    fn repeated_highlight_reads_the_backup() {
        let mut document = Document::new();
        let main = document.content_root();
        let p = document.append_element(main, "p");
        document.append_text(p, "one foo two");

        let backups = Arc::new(BackupTable::new());
        highlight_mutation(p, matcher("foo"), Arc::clone(&backups))(&mut document);
        // Second pass over the already-mutated element.
        let markers = highlight_mutation(p, matcher("foo"), Arc::clone(&backups))(&mut document);

        assert_eq!(markers.len(), 1);
        assert_eq!(document.text_content(p), "one foo two");
        assert_eq!(backups.original(p), Some("one foo two".to_string()));
        assert_eq!(document.elements_by_tag(p, MARK_TAG).len(), 1);
    }

    #[test]
    fn restore_round_trips_byte_identical() {
        let mut document = Document::new();
        let main = document.content_root();
        let p = document.append_element(main, "p");
        document.append_text(p, "exact Original\ttext");

        let backups = Arc::new(BackupTable::new());
        highlight_mutation(p, matcher("original"), Arc::clone(&backups))(&mut document);
        restore_mutation(p, Arc::clone(&backups))(&mut document);

        assert_eq!(document.text_content(p), "exact Original\ttext");
        assert!(document.elements_by_tag(p, MARK_TAG).is_empty());
        assert!(backups.is_empty());
    }

    #[test]
    fn restore_is_idempotent() {
        let mut document = Document::new();
        let main = document.content_root();
        let p = document.append_element(main, "p");
        document.append_text(p, "plain");

        let backups = Arc::new(BackupTable::new());
        restore_mutation(p, Arc::clone(&backups))(&mut document);
        restore_mutation(p, Arc::clone(&backups))(&mut document);
        assert_eq!(document.text_content(p), "plain");
    }

    #[test]
    fn detached_targets_are_left_alone() {
        let mut document = Document::new();
        let main = document.content_root();
        let p = document.append_element(main, "p");
        document.append_text(p, "needle ");
        let em = document.append_element(p, "em");
        document.append_text(em, "needle");

        let backups = Arc::new(BackupTable::new());
        // Rebuilding the parent flattens it and orphans `em`.
        highlight_mutation(p, matcher("needle"), Arc::clone(&backups))(&mut document);
        assert!(!document.is_attached(em));

        let markers = highlight_mutation(em, matcher("needle"), Arc::clone(&backups))(&mut document);
        assert!(markers.is_empty());
        assert_eq!(backups.len(), 1);
        assert!(!backups.contains(em));
    }

    #[test]
    fn first_backup_wins() {
        let backups = BackupTable::new();
        let id = {
            let mut document = Document::new();
            let main = document.content_root();
            document.append_element(main, "p")
        };
        backups.record(id, "first".to_string());
        backups.record(id, "second".to_string());
        assert_eq!(backups.original(id), Some("first".to_string()));
        assert_eq!(backups.len(), 1);
    }
}
