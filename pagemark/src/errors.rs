//! Error types for the search engine.
//!
//! The error surface is deliberately small: unusable search terms are a
//! silent `Ok(false)` from the public entry points, and deferred mutation
//! closures are infallible by construction (document operations tolerate
//! stale ids). What remains is the loss of an injected collaborator.

use thiserror::Error;

/// The main error type for search operations.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The frame clock driving the mutation scheduler was dropped before
    /// the pending batch could run.
    #[error("frame clock closed before the batch could run")]
    FrameClockClosed,

    /// The document-changed signal source was dropped.
    #[error("document change signal closed")]
    SignalClosed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_display_a_reason() {
        assert_eq!(
            SearchError::FrameClockClosed.to_string(),
            "frame clock closed before the batch could run"
        );
        assert_eq!(
            SearchError::SignalClosed.to_string(),
            "document change signal closed"
        );
    }
}
