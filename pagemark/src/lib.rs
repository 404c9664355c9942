//! # Pagemark
//!
//! An in-page incremental text search and highlight engine.
//!
//! Pagemark operates over a live, externally-owned document tree: it
//! locates occurrences of a search term within visible text, wraps each
//! match in a `mark` element without disturbing unrelated structure, and
//! cycles a spotlight through the matches one step per call, asking the
//! host to scroll each into view. Every mutation is undoable: the original
//! text of each touched element is kept in a side table and restored on
//! reset, on a route change, or before highlighting a different term.
//!
//! Key properties:
//!
//! - **Batched writes**: all document mutations of one operation are
//!   deferred and run together at one scheduling boundary
//! - **Idempotent reset**: a reset restores byte-identical text content
//!   and leaves no bookkeeping behind
//! - **Literal matching**: terms match as case-insensitive substrings,
//!   regex metacharacters carry no meaning
//! - **Injected collaborators**: the scheduler, scroller, change signal
//!   and event sink are all substitutable, so the engine runs under a real
//!   render loop or a synchronous test harness alike
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pagemark::prelude::*;
//!
//! let document = Document::new().into_shared();
//! // ... host builds page content under document.content_root() ...
//!
//! let session = SearchSession::builder(document).build();
//! session.search("needle").await?;   // highlight + spotlight first match
//! session.search("needle").await?;   // advance to the next match
//! session.reset_search().await?;     // restore the original page
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod dom;
pub mod errors;
pub mod events;
pub mod highlight;
pub mod matcher;
pub mod schedule;
pub mod session;
pub mod spotlight;
pub mod style;
pub mod testing;
pub mod traverse;
pub mod watch;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::dom::{Document, ElementData, NodeData, NodeId, SharedDocument};
    pub use crate::errors::SearchError;
    pub use crate::events::{
        CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink, SearchEvent,
    };
    pub use crate::highlight::{BackupTable, Mutation, MARK_TAG};
    pub use crate::matcher::{Segment, TermMatcher};
    pub use crate::schedule::{
        FrameClock, FrameScheduler, ImmediateScheduler, MutationScheduler,
    };
    pub use crate::session::{SearchSession, SearchSessionBuilder, SessionState};
    pub use crate::spotlight::{
        NoOpScroller, Scroller, Spotlight, CLASS_ATTR, CURRENT_CLASS,
    };
    pub use crate::style::{install_styles, STYLE_MARKER_ATTR};
    pub use crate::traverse::TraversalDecision;
    pub use crate::watch::{ChangeSignal, RouteWatcher, TitleSignal};
}
