//! The search session: public entry points and state glue.
//!
//! A [`SearchSession`] owns the single live search context for one
//! document: the backup side table, the spotlight queue, and the injected
//! collaborators (scheduler, scroller, event sink). The host drives it
//! through exactly two operations, [`search`](SearchSession::search) and
//! [`reset_search`](SearchSession::reset_search).

use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

use crate::dom::{NodeId, SharedDocument};
use crate::errors::SearchError;
use crate::events::{EventSink, NoOpEventSink, SearchEvent};
use crate::highlight::{highlight_mutation, restore_mutation, BackupTable, Mutation};
use crate::matcher::TermMatcher;
use crate::schedule::{ImmediateScheduler, MutationScheduler};
use crate::spotlight::{advance_mutation, NoOpScroller, Scroller, Spotlight};
use crate::style::install_styles;
use crate::traverse;


/// The session's search context. Exactly one is live per session.
#[derive(Debug)]
pub enum SessionState {
    /// No active search; the document carries no highlight mutations
    /// owned by this session.
    Idle,
    /// An active term with its circular marker queue.
    Searching(Spotlight),
}

/// Builder for [`SearchSession`], wiring the injected collaborators.
pub struct SearchSessionBuilder {
    document: SharedDocument,
    scheduler: Arc<dyn MutationScheduler>,
    scroller: Arc<dyn Scroller>,
    events: Arc<dyn EventSink>,
}

impl SearchSessionBuilder {
    fn new(document: SharedDocument) -> Self {
        Self {
            document,
            scheduler: Arc::new(ImmediateScheduler),
            scroller: Arc::new(NoOpScroller),
            events: Arc::new(NoOpEventSink),
        }
    }

    /// Sets the mutation scheduler (default: [`ImmediateScheduler`]).
    #[must_use]
    pub fn with_scheduler(mut self, scheduler: impl MutationScheduler + 'static) -> Self {
        self.scheduler = Arc::new(scheduler);
        self
    }

    /// Sets the host scroll-into-view collaborator.
    #[must_use]
    pub fn with_scroller(mut self, scroller: impl Scroller + 'static) -> Self {
        self.scroller = Arc::new(scroller);
        self
    }

    /// Sets the event sink receiving lifecycle events.
    #[must_use]
    pub fn with_events(mut self, events: impl EventSink + 'static) -> Self {
        self.events = Arc::new(events);
        self
    }

    /// Builds the session and installs the highlight styles.
    #[must_use]
    pub fn build(self) -> SearchSession {
        install_styles(&mut self.document.write());
        SearchSession {
            document: self.document,
            scheduler: self.scheduler,
            scroller: self.scroller,
            events: self.events,
            backups: Arc::new(BackupTable::new()),
            state: Mutex::new(SessionState::Idle),
        }
    }
}

/// The incremental search-and-highlight engine for one live document.
pub struct SearchSession {
    document: SharedDocument,
    scheduler: Arc<dyn MutationScheduler>,
    scroller: Arc<dyn Scroller>,
    events: Arc<dyn EventSink>,
    backups: Arc<BackupTable>,
    state: Mutex<SessionState>,
}

impl SearchSession {
    /// Starts building a session over `document`.
    #[must_use]
    pub fn builder(document: SharedDocument) -> SearchSessionBuilder {
        SearchSessionBuilder::new(document)
    }

    /// Creates a session with default collaborators.
    #[must_use]
    pub fn new(document: SharedDocument) -> Self {
        Self::builder(document).build()
    }

    /// The shared document handle this session operates on.
    #[must_use]
    pub fn document(&self) -> &SharedDocument {
        &self.document
    }

    /// The configured event sink.
    #[must_use]
    pub fn events(&self) -> &Arc<dyn EventSink> {
        &self.events
    }

    /// The active search term, if a search is live.
    #[must_use]
    pub fn active_term(&self) -> Option<String> {
        match &*self.state.lock() {
            SessionState::Searching(spotlight) => Some(spotlight.term().to_string()),
            SessionState::Idle => None,
        }
    }

    /// Number of live markers held by the active search.
    #[must_use]
    pub fn marker_count(&self) -> usize {
        match &*self.state.lock() {
            SessionState::Searching(spotlight) => spotlight.len(),
            SessionState::Idle => 0,
        }
    }

    /// Searches for `term`, highlighting every visible occurrence and
    /// spotlighting the first.
    ///
    /// Returns `Ok(false)` without touching the document when the term is
    /// empty after trimming. When `term` equals the active term exactly,
    /// only the spotlight advances — highlights are reused. Otherwise any
    /// previous search is fully undone first, then the document is
    /// re-highlighted in one batch and a fresh cycle starts.
    pub async fn search(&self, term: &str) -> Result<bool, SearchError> {
        let Some(matcher) = TermMatcher::new(term) else {
            debug!("rejecting unusable search term");
            return Ok(false);
        };

        let reuse = matches!(
            &*self.state.lock(),
            SessionState::Searching(spotlight) if spotlight.matches_term(matcher.term())
        );
        if reuse {
            self.advance().await?;
            return Ok(true);
        }

        self.events.try_emit(SearchEvent::started(matcher.term()));
        self.restore_all().await?;

        let batch: Vec<Mutation> = self
            .highlight_targets(&matcher)
            .into_iter()
            .map(|target| highlight_mutation(target, matcher.clone(), Arc::clone(&self.backups)))
            .collect();
        let outcomes = self.scheduler.run(&self.document, batch).await?;
        let markers: Vec<NodeId> = outcomes.into_iter().flatten().collect();

        let spotlight = {
            let doc = self.document.read();
            Spotlight::new(matcher.term(), markers, &doc)
        };
        info!(term = %matcher.term(), markers = spotlight.len(), "search highlighted");
        self.events
            .try_emit(SearchEvent::completed(matcher.term(), spotlight.len()));
        *self.state.lock() = SessionState::Searching(spotlight);

        self.advance().await?;
        Ok(true)
    }

    /// Undoes every highlight mutation and returns the session to idle.
    pub async fn reset_search(&self) -> Result<bool, SearchError> {
        self.restore_all().await?;
        *self.state.lock() = SessionState::Idle;
        Ok(true)
    }

    /// Collects the elements to highlight: parents of accepted text nodes,
    /// de-duplicated in document order.
    ///
    /// The de-duplication matters: an element with several matching text
    /// children would otherwise be rebuilt once per child within the same
    /// batch, and every rebuild after the first detaches the markers the
    /// previous one returned.
    fn highlight_targets(&self, matcher: &TermMatcher) -> Vec<NodeId> {
        let doc = self.document.read();
        let accepted = traverse::collect(
            &doc,
            doc.content_root(),
            traverse::search_filter(matcher, &self.backups),
        );
        let mut seen = HashSet::new();
        accepted
            .into_iter()
            .filter_map(|text| doc.parent(text))
            .filter(|&parent| seen.insert(parent))
            .collect()
    }

    /// Rotates the spotlight one step and applies the visual update.
    async fn advance(&self) -> Result<bool, SearchError> {
        let stepped = {
            let mut state = self.state.lock();
            match &mut *state {
                SessionState::Searching(spotlight) => spotlight
                    .step()
                    .map(|pair| (pair, spotlight.term().to_string())),
                SessionState::Idle => None,
            }
        };
        let Some(((previous, next), term)) = stepped else {
            return Ok(false);
        };

        let mutation = advance_mutation(previous, next, Arc::clone(&self.scroller));
        self.scheduler.run(&self.document, vec![mutation]).await?;
        self.events.try_emit(SearchEvent::advanced(&term));
        Ok(true)
    }

    /// Restores every element the session has mutated, in one batch.
    async fn restore_all(&self) -> Result<(), SearchError> {
        let targets = {
            let doc = self.document.read();
            traverse::collect(
                &doc,
                doc.content_root(),
                traverse::reset_filter(&self.backups),
            )
        };
        let restored = targets.len();
        let batch: Vec<Mutation> = targets
            .into_iter()
            .map(|target| restore_mutation(target, Arc::clone(&self.backups)))
            .collect();
        self.scheduler.run(&self.document, batch).await?;
        if restored > 0 {
            debug!(restored, "restored highlighted elements");
            self.events.try_emit(SearchEvent::reset(restored));
        }
        Ok(())
    }
}
