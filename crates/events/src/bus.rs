//! In-process change bus backed by a `tokio::sync::broadcast` channel.
//!
//! Handlers publish a [`TableChange`] after every successful write.
//! Subscribers treat a change as a signal to re-read the whole collection,
//! so a dropped or repeated notification never leaves them with stale or
//! duplicated rows.

use chrono::{DateTime, Utc};
use convex_core::types::DbId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// TableChange
// ---------------------------------------------------------------------------

/// What happened to a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// A committed write to one of the collections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableChange {
    /// Table name, e.g. `"inquiries"`.
    pub table: String,
    pub kind: ChangeKind,
    pub row_id: DbId,
    pub timestamp: DateTime<Utc>,
}

impl TableChange {
    pub fn new(table: impl Into<String>, kind: ChangeKind, row_id: DbId) -> Self {
        Self {
            table: table.into(),
            kind,
            row_id,
            timestamp: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// In-process fan-out bus for table changes.
///
/// Shared via `Arc<EventBus>` in the application state.
pub struct EventBus {
    sender: broadcast::Sender<TableChange>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest messages are dropped and slow
    /// receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish a change to all current subscribers.
    pub fn publish(&self, change: TableChange) {
        // A send error only means nobody is listening.
        let _ = self.sender.send(change);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TableChange> {
        self.sender.subscribe()
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Refresh decision
// ---------------------------------------------------------------------------

/// What a full-refresh subscriber should do with one receive result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshAction {
    /// Re-read the collection and push it.
    Refetch,
    /// Not our table.
    Ignore,
    /// The bus is gone; stop listening.
    Stop,
}

impl RefreshAction {
    /// Decide how to react to `result` when watching `table`.
    ///
    /// A lagged receiver missed some changes, but since every refresh
    /// re-reads the full list one refetch covers all of them.
    pub fn for_table(
        result: &Result<TableChange, broadcast::error::RecvError>,
        table: &str,
    ) -> Self {
        match result {
            Ok(change) if change.table == table => Self::Refetch,
            Ok(_) => Self::Ignore,
            Err(broadcast::error::RecvError::Lagged(_)) => Self::Refetch,
            Err(broadcast::error::RecvError::Closed) => Self::Stop,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
