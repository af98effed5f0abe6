//! Debounced, dirty-tracking sync of local edits.
//!
//! Marking an id restarts a 600ms quiet period. When it elapses the queue
//! builds one request from the *current* record of every dirty upsert id
//! plus every dirty delete id. Only one request is in flight at a time. On
//! success exactly the flushed ids are cleared; on failure nothing is, and
//! the ids go out again with the next flush.

use std::sync::Arc;
use std::time::Duration;

use guest_core::Household;
use guest_core::wire::{SaveResponse, SyncBatch};

use crate::clock::{Clock, Debouncer};
use crate::dirty::{DirtyKind, DirtySet, DirtySnapshot};
use crate::error::ClientError;

pub const SYNC_DELAY: Duration = Duration::from_millis(600);

/// Remote status shown next to the list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncStatus {
    #[default]
    Idle,
    Loading,
    Saving,
    Saved,
    /// The last request failed; edits are kept locally.
    Offline,
}

impl SyncStatus {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "",
            Self::Loading => "Loading…",
            Self::Saving => "Saving…",
            Self::Saved => "Saved",
            Self::Offline => "Offline (not saved)",
        }
    }
}

/// A flush that has been started and must be finished.
#[derive(Debug, Clone)]
pub struct PendingFlush {
    pub batch: SyncBatch,
    snapshot: DirtySnapshot,
}

pub struct SyncQueue {
    dirty: DirtySet,
    debounce: Debouncer,
    clock: Arc<dyn Clock>,
    in_flight: bool,
    status: SyncStatus,
}

impl SyncQueue {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_delay(clock, SYNC_DELAY)
    }

    pub fn with_delay(clock: Arc<dyn Clock>, delay: Duration) -> Self {
        Self {
            dirty: DirtySet::new(),
            debounce: Debouncer::new(delay),
            clock,
            in_flight: false,
            status: SyncStatus::Idle,
        }
    }

    pub fn mark(&mut self, id: &str, kind: DirtyKind) {
        self.dirty.mark(id, kind);
        self.debounce.touch(self.clock.now());
    }

    #[must_use]
    pub const fn dirty(&self) -> &DirtySet {
        &self.dirty
    }

    #[must_use]
    pub const fn status(&self) -> SyncStatus {
        self.status
    }

    pub fn set_status(&mut self, status: SyncStatus) {
        self.status = status;
    }

    #[must_use]
    pub const fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Whether the quiet period has elapsed and a flush may start.
    #[must_use]
    pub fn is_due(&self) -> bool {
        !self.in_flight && self.debounce.is_due(self.clock.now())
    }

    /// Time until the debounce fires, if armed.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.debounce.remaining(self.clock.now())
    }

    /// Snapshot the dirty ids and build the request from `households`.
    ///
    /// Returns `None` while another flush is in flight or nothing is dirty.
    /// Upsert ids with no current record are not sent but still settle.
    pub fn begin_flush(&mut self, households: &[Household]) -> Option<PendingFlush> {
        if self.in_flight {
            return None;
        }
        self.debounce.cancel();
        if self.dirty.is_empty() {
            return None;
        }

        let snapshot = self.dirty.snapshot();
        let upserts = households
            .iter()
            .filter(|h| snapshot.upsert_ids().any(|id| id == h.id))
            .cloned()
            .collect();
        let deletes = snapshot.delete_ids().map(String::from).collect();

        self.in_flight = true;
        self.status = SyncStatus::Saving;
        Some(PendingFlush {
            batch: SyncBatch { upserts, deletes },
            snapshot,
        })
    }

    /// Record the outcome of a flush started with [`Self::begin_flush`].
    pub fn finish_flush(&mut self, flush: &PendingFlush, result: &Result<SaveResponse, ClientError>) {
        self.in_flight = false;
        match result {
            Ok(response) => {
                self.dirty.settle(&flush.snapshot, &response.failed);
                if response.failed.is_empty() {
                    self.status = SyncStatus::Saved;
                } else {
                    tracing::warn!(failed = ?response.failed, "some households were not saved");
                    self.status = SyncStatus::Offline;
                }
            }
            Err(error) => {
                tracing::warn!(%error, pending = self.dirty.len(), "guest list save failed");
                self.status = SyncStatus::Offline;
            }
        }
    }
}
