//! Route-change watching.
//!
//! The hosted page offers no structured navigation event, so the engine
//! subscribes to a pluggable "document changed" signal — by default the
//! document title, whose mutation is the best-effort proxy for the
//! content root having been replaced — and fully resets on every firing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::dom::Document;
use crate::errors::SearchError;
use crate::events::SearchEvent;
use crate::session::SearchSession;

/// A source of "the visible document changed" notifications.
#[async_trait]
pub trait ChangeSignal: Send {
    /// Resolves on the next document change after the call.
    async fn changed(&mut self) -> Result<(), SearchError>;
}

/// The default signal source: document title mutations.
#[derive(Debug, Clone)]
pub struct TitleSignal {
    revisions: watch::Receiver<u64>,
}

impl TitleSignal {
    /// Subscribes to title mutations of `document`.
    #[must_use]
    pub fn new(document: &Document) -> Self {
        Self {
            revisions: document.title_signal(),
        }
    }
}

#[async_trait]
impl ChangeSignal for TitleSignal {
    async fn changed(&mut self) -> Result<(), SearchError> {
        self.revisions
            .changed()
            .await
            .map_err(|_| SearchError::SignalClosed)
    }
}

/// Resets the search session whenever the change signal fires.
pub struct RouteWatcher {
    session: Arc<SearchSession>,
    signal: Box<dyn ChangeSignal>,
}

impl RouteWatcher {
    /// Creates a watcher resetting `session` on every firing of `signal`.
    #[must_use]
    pub fn new(session: Arc<SearchSession>, signal: impl ChangeSignal + 'static) -> Self {
        Self {
            session,
            signal: Box::new(signal),
        }
    }

    /// Watches until the signal source closes, resetting on each change.
    ///
    /// Only returns `Err`: a closed signal is the sole way out of the loop.
    pub async fn run(mut self) -> Result<(), SearchError> {
        loop {
            self.signal.changed().await?;
            debug!("document change observed, resetting search state");
            self.session.events().try_emit(SearchEvent::route_changed());
            self.session.reset_search().await?;
        }
    }

    /// Spawns the watch loop on the current runtime.
    pub fn spawn(self) -> JoinHandle<Result<(), SearchError>> {
        tokio::spawn(self.run())
    }
}
