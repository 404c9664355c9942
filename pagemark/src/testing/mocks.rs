//! Mock collaborators.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::dom::NodeId;
use crate::errors::SearchError;
use crate::spotlight::Scroller;
use crate::watch::ChangeSignal;

/// A scroller that records every scroll request, in order.
///
/// Clones share the same recording, so a handle can be kept after moving
/// one into a session builder.
#[derive(Debug, Clone, Default)]
pub struct RecordingScroller {
    targets: Arc<Mutex<Vec<NodeId>>>,
}

impl RecordingScroller {
    /// Creates a new recording scroller.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded scroll targets.
    #[must_use]
    pub fn targets(&self) -> Vec<NodeId> {
        self.targets.lock().clone()
    }

    /// Number of scroll requests recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.lock().len()
    }

    /// Returns true if nothing was scrolled yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.lock().is_empty()
    }
}

impl Scroller for RecordingScroller {
    fn scroll_to(&self, marker: NodeId) {
        self.targets.lock().push(marker);
    }
}

/// Creates a manually-fired change signal, proving the route watcher is
/// not tied to title mutations.
#[must_use]
pub fn manual_signal() -> (ManualTrigger, ManualSignal) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ManualTrigger { tx }, ManualSignal { rx })
}

/// The firing half of [`manual_signal`].
#[derive(Debug, Clone)]
pub struct ManualTrigger {
    tx: mpsc::UnboundedSender<()>,
}

impl ManualTrigger {
    /// Fires the signal once.
    pub fn fire(&self) {
        let _ = self.tx.send(());
    }
}

/// The listening half of [`manual_signal`].
#[derive(Debug)]
pub struct ManualSignal {
    rx: mpsc::UnboundedReceiver<()>,
}

#[async_trait]
impl ChangeSignal for ManualSignal {
    async fn changed(&mut self) -> Result<(), SearchError> {
        self.rx.recv().await.ok_or(SearchError::SignalClosed)
    }
}
