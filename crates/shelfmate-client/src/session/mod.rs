//! Client-side reading-session tracking with an offline queue.
//!
//! The tracker owns at most one running session. Every transition is applied
//! locally first and recorded as a [`PendingOperation`]; [`ReadingSessionTracker::sync`]
//! later replays the queue against the server in order. State and queue are
//! persisted in the [`KeyValueStore`] so a restart loses neither.

mod state;

pub use state::{PendingOperation, TrackerState};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shelfmate_types::{Failure, ReadingSession, ValidationFailure};
use std::collections::VecDeque;
use std::sync::Arc;

use crate::storage::KeyValueStore;
use state::{transition, Action};

const STATE_KEY: &str = "reading_session.state";
const QUEUE_KEY: &str = "reading_session.queue";

/// Destination for queued session changes.
#[async_trait]
pub trait SessionSink: Send + Sync {
    async fn apply(&self, op: &PendingOperation) -> Result<(), Failure>;
}

/// Outcome of [`ReadingSessionTracker::sync`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Operations accepted by the server
    pub sent: usize,
    /// Operations permanently rejected and discarded
    pub dropped: usize,
    /// Operations still queued
    pub remaining: usize,
    /// Failure that stopped the drain early
    pub halted_by: Option<Failure>,
}

pub struct ReadingSessionTracker {
    store: Arc<KeyValueStore>,
    state: TrackerState,
    queue: VecDeque<PendingOperation>,
}

impl ReadingSessionTracker {
    /// Restore state and queue from `store`.
    pub async fn load(store: Arc<KeyValueStore>) -> Result<Self, Failure> {
        let state = store.get(STATE_KEY).await?.unwrap_or_default();
        let queue = store.get(QUEUE_KEY).await?.unwrap_or_default();
        Ok(Self { store, state, queue })
    }

    pub const fn state(&self) -> &TrackerState {
        &self.state
    }

    /// Session being tracked, if any.
    pub const fn current(&self) -> Option<&ReadingSession> {
        self.state.session()
    }

    /// Number of changes waiting for the server.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn pending_operations(&self) -> impl Iterator<Item = &PendingOperation> {
        self.queue.iter()
    }

    /// Active reading time of the current session up to now.
    pub fn elapsed_seconds(&self) -> u64 {
        self.state.active_seconds_at(Utc::now())
    }

    pub async fn start(&mut self, book_id: &str, start_page: u32) -> Result<&ReadingSession, Failure> {
        self.start_at(book_id, start_page, Utc::now()).await
    }

    pub async fn start_at(
        &mut self,
        book_id: &str,
        start_page: u32,
        now: DateTime<Utc>,
    ) -> Result<&ReadingSession, Failure> {
        let action = Action::Start { book_id: book_id.to_string(), start_page };
        self.apply(action, now).await
    }

    pub async fn pause(&mut self) -> Result<&ReadingSession, Failure> {
        self.pause_at(Utc::now()).await
    }

    pub async fn pause_at(&mut self, now: DateTime<Utc>) -> Result<&ReadingSession, Failure> {
        self.apply(Action::Pause, now).await
    }

    pub async fn resume(&mut self) -> Result<&ReadingSession, Failure> {
        self.resume_at(Utc::now()).await
    }

    pub async fn resume_at(&mut self, now: DateTime<Utc>) -> Result<&ReadingSession, Failure> {
        self.apply(Action::Resume, now).await
    }

    /// Close the current session on `end_page`, returning the final record.
    pub async fn finish(&mut self, end_page: u32) -> Result<ReadingSession, Failure> {
        self.finish_at(end_page, Utc::now()).await
    }

    pub async fn finish_at(
        &mut self,
        end_page: u32,
        now: DateTime<Utc>,
    ) -> Result<ReadingSession, Failure> {
        let (next, op) = transition(&self.state, Action::Finish { end_page }, now)?;
        let PendingOperation::Update { session } = &op else {
            return Err(Failure::unknown("finish produced an unexpected operation"));
        };
        let finished = session.clone();
        self.commit(next, op).await?;
        tracing::info!(
            "Finished session {} ({} pages, {}s)",
            finished.id,
            finished.pages_read(),
            finished.active_seconds
        );
        Ok(finished)
    }

    /// Abandon the current session. If the server never saw it, its queued
    /// operations are dropped; otherwise a delete is queued.
    pub async fn discard(&mut self) -> Result<(), Failure> {
        let Some(id) = self.current().map(|s| s.id) else {
            return Err(ValidationFailure::InvalidTransition {
                from: self.state.name().to_string(),
                action: "discard".to_string(),
            }
            .into());
        };

        let never_sent = self
            .queue
            .iter()
            .any(|op| matches!(op, PendingOperation::Create { session } if session.id == id));
        self.queue.retain(|op| op.session_id() != id);
        if !never_sent {
            self.queue.push_back(PendingOperation::Delete { id });
        }
        self.state = TrackerState::Idle;
        self.persist().await?;
        tracing::info!("Discarded session {}", id);
        Ok(())
    }

    /// Replay queued operations in order.
    ///
    /// Transient and authentication failures stop the drain and keep the
    /// remaining operations. Other rejections are logged and dropped.
    pub async fn sync(&mut self, sink: &dyn SessionSink) -> Result<SyncReport, Failure> {
        let mut report = SyncReport::default();

        while let Some(op) = self.queue.front() {
            match sink.apply(op).await {
                Ok(()) => {
                    let _ = self.queue.pop_front();
                    report.sent += 1;
                },
                Err(failure) if failure.is_transient() || failure.requires_login() => {
                    tracing::debug!("Session sync paused: {}", failure);
                    report.halted_by = Some(failure);
                    break;
                },
                Err(failure) => {
                    tracing::warn!(
                        "Dropping queued session change for {}: {}",
                        op.session_id(),
                        failure
                    );
                    let _ = self.queue.pop_front();
                    report.dropped += 1;
                },
            }
            self.persist_queue().await?;
        }

        report.remaining = self.queue.len();
        if report.sent > 0 || report.dropped > 0 {
            tracing::info!(
                "Session sync: {} sent, {} dropped, {} remaining",
                report.sent,
                report.dropped,
                report.remaining
            );
        }
        Ok(report)
    }

    async fn apply(&mut self, action: Action, now: DateTime<Utc>) -> Result<&ReadingSession, Failure> {
        let (next, op) = transition(&self.state, action, now)?;
        self.commit(next, op).await?;
        self.current().ok_or_else(|| Failure::unknown("no session after transition"))
    }

    async fn commit(&mut self, next: TrackerState, op: PendingOperation) -> Result<(), Failure> {
        tracing::debug!("Session {} -> {}", self.state.name(), next.name());
        self.state = next;
        self.enqueue(op);
        self.persist().await
    }

    /// Consecutive updates of the same session collapse into the latest one.
    fn enqueue(&mut self, op: PendingOperation) {
        if let (
            PendingOperation::Update { session: new },
            Some(PendingOperation::Update { session: last }),
        ) = (&op, self.queue.back_mut())
        {
            if last.id == new.id {
                *last = new.clone();
                return;
            }
        }
        self.queue.push_back(op);
    }

    async fn persist(&self) -> Result<(), Failure> {
        self.store.set(STATE_KEY, &self.state).await?;
        self.persist_queue().await
    }

    async fn persist_queue(&self) -> Result<(), Failure> {
        Ok(self.store.set(QUEUE_KEY, &self.queue).await?)
    }
}
