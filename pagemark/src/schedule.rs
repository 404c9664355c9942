//! Deferred mutation batching.
//!
//! All document writes of one logical operation go through a
//! [`MutationScheduler`]: the scheduler executes the whole batch under a
//! single document write lock, in order, and resolves with each closure's
//! return value. The production [`FrameScheduler`] defers the batch to the
//! next repaint boundary announced by a [`FrameClock`]; the
//! [`ImmediateScheduler`] substitutes a synchronous boundary for tests.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::trace;

use crate::dom::{NodeId, SharedDocument};
use crate::errors::SearchError;
use crate::highlight::Mutation;

/// Executes deferred mutation batches against the shared document.
#[async_trait]
pub trait MutationScheduler: Send + Sync {
    /// Runs every closure of `batch` in order at one scheduling boundary
    /// and resolves with their ordered return values.
    async fn run(
        &self,
        document: &SharedDocument,
        batch: Vec<Mutation>,
    ) -> Result<Vec<Vec<NodeId>>, SearchError>;
}

fn apply_batch(document: &SharedDocument, batch: Vec<Mutation>) -> Vec<Vec<NodeId>> {
    let mut doc = document.write();
    batch.into_iter().map(|mutation| mutation(&mut doc)).collect()
}

/// A repaint-boundary announcer.
///
/// The host's render loop calls [`tick`](Self::tick) once per frame, or
/// [`spawn_driver`](Self::spawn_driver) runs a fixed-period stand-in when
/// the host has no loop of its own.
#[derive(Debug, Clone)]
pub struct FrameClock {
    revision: Arc<watch::Sender<u64>>,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    /// Creates a clock at frame zero.
    #[must_use]
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            revision: Arc::new(revision),
        }
    }

    /// Announces the next frame, releasing every pending batch.
    pub fn tick(&self) {
        self.revision.send_modify(|frame| *frame += 1);
    }

    /// Subscribes to frame announcements.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Spawns a task ticking the clock every `period`. Dropping the clock
    /// does not stop the driver; abort the handle to stop it.
    pub fn spawn_driver(&self, period: Duration) -> JoinHandle<()> {
        let clock = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                clock.tick();
            }
        })
    }
}

/// Scheduler that defers each batch to the next [`FrameClock`] tick.
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    frames: watch::Receiver<u64>,
}

impl FrameScheduler {
    /// Creates a scheduler bound to `clock`.
    #[must_use]
    pub fn new(clock: &FrameClock) -> Self {
        Self {
            frames: clock.subscribe(),
        }
    }
}

#[async_trait]
impl MutationScheduler for FrameScheduler {
    async fn run(
        &self,
        document: &SharedDocument,
        batch: Vec<Mutation>,
    ) -> Result<Vec<Vec<NodeId>>, SearchError> {
        let mut frames = self.frames.clone();
        // Wait for a frame strictly after this call, not one already seen.
        frames.mark_unchanged();
        frames
            .changed()
            .await
            .map_err(|_| SearchError::FrameClockClosed)?;
        trace!(mutations = batch.len(), "running batch at frame boundary");
        Ok(apply_batch(document, batch))
    }
}

/// Scheduler that runs the batch at once, without waiting for a frame.
///
/// The substitutable synchronous boundary for tests and hosts that batch
/// elsewhere. Ordering guarantees are identical to [`FrameScheduler`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateScheduler;

#[async_trait]
impl MutationScheduler for ImmediateScheduler {
    async fn run(
        &self,
        document: &SharedDocument,
        batch: Vec<Mutation>,
    ) -> Result<Vec<Vec<NodeId>>, SearchError> {
        Ok(apply_batch(document, batch))
    }
}
