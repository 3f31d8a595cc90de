use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, error, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::error::StorageResult;
use crate::message::Message;
use crate::metrics::Metrics;
use crate::queue::{Queue, QueueName, QueueStats};
use crate::storage::keys::{self, DeliveryKey};
use crate::storage::{Storage, WriteBatchOp};

mod directory;
mod index;
mod messages;

/// Queue storage engine. Turns the raw `Storage` capabilities into queue
/// semantics: a queue directory, per-queue ordered message partitions and an
/// identity index kept in lockstep with them.
///
/// The engine is shared across request threads. Every read-decide-write
/// sequence runs under a single writer lock and commits as one `write_batch`,
/// so concurrent callers never observe a half-applied mutation. Plain reads
/// (`list_queues`, `get_queue`) do not take the lock.
pub struct QueueEngine {
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
    writer: Mutex<()>,
    metrics: Metrics,
}

impl QueueEngine {
    /// Create an engine over the given storage using the system wall clock.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self::with_clock(storage, Arc::new(SystemClock))
    }

    pub fn with_clock(storage: Arc<dyn Storage>, clock: Arc<dyn Clock>) -> Self {
        info!("queue engine started");
        Self {
            storage,
            clock,
            writer: Mutex::new(()),
            metrics: Metrics::new(),
        }
    }

    /// Acquire the writer lock. The guard protects no data of its own, so a
    /// panic in another writer leaves nothing to repair and poisoning is ignored.
    fn lock_writer(&self) -> MutexGuard<'_, ()> {
        self.writer.lock().unwrap_or_else(|poisoned| {
            warn!("writer lock poisoned by an earlier panic, continuing");
            poisoned.into_inner()
        })
    }

    /// Parse `name` and confirm its partitions are provisioned. Returns the
    /// validated name and the last sequence assigned in it. Names that fail
    /// validation cannot exist, so they resolve to `None` as well.
    fn resolve_queue(&self, name: &str) -> StorageResult<Option<(QueueName, u64)>> {
        let Ok(queue) = QueueName::parse(name) else {
            return Ok(None);
        };
        Ok(self
            .storage
            .get_sequence(&keys::sequence_key(&queue))?
            .map(|last| (queue, last)))
    }
}

#[cfg(test)]
mod tests;
