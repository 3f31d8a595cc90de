use super::*;

use crate::error::{CreateQueueError, LookupError, StorageError};

impl QueueEngine {
    /// Create a queue, or return the existing one unchanged.
    ///
    /// The sequence counter (the partition marker) and the updated directory
    /// record are committed in one batch, so a queue is either fully
    /// provisioned or absent.
    #[tracing::instrument(skip_all, fields(queue = %name))]
    pub fn create_queue(&self, name: &str) -> Result<Queue, CreateQueueError> {
        let queue_name = QueueName::parse(name)?;

        let _guard = self.lock_writer();
        let mut directory = self.storage.get_directory()?;
        if let Some(existing) = directory.get(&queue_name) {
            debug!("queue already exists");
            return Ok(existing.clone());
        }

        let sequence_key = keys::sequence_key(&queue_name);
        let counter_exists = self.storage.get_sequence(&sequence_key)?.is_some();
        if counter_exists {
            // Never reset a counter that outlived its directory entry.
            warn!("sequence counter present without directory entry, keeping it");
        }

        let queue = Queue {
            name: queue_name.clone(),
            created_at: self.clock.now_ms(),
        };
        directory.insert(queue.clone());

        let mut batch = Vec::with_capacity(2);
        if !counter_exists {
            batch.push(WriteBatchOp::PutSequence {
                key: sequence_key,
                value: keys::encode_sequence(0).to_vec(),
            });
        }
        batch.push(WriteBatchOp::PutDirectory {
            value: serde_json::to_vec(&directory).map_err(StorageError::from)?,
        });
        self.storage.write_batch(batch)?;

        self.metrics.record_queue_created(queue_name.as_str());
        info!("queue created");
        Ok(queue)
    }

    /// All queue names, sorted.
    #[tracing::instrument(skip_all)]
    pub fn list_queues(&self) -> StorageResult<Vec<QueueName>> {
        let names = self.storage.get_directory()?.names();
        debug!(count = names.len(), "listed queues");
        Ok(names)
    }

    /// Queue names starting with `prefix`, sorted. An empty prefix lists everything.
    pub fn list_queues_with_prefix(&self, prefix: &str) -> StorageResult<Vec<QueueName>> {
        Ok(self
            .list_queues()?
            .into_iter()
            .filter(|name| name.as_str().starts_with(prefix))
            .collect())
    }

    /// Metadata for a single queue.
    pub fn get_queue(&self, name: &str) -> Result<Queue, LookupError> {
        let Ok(queue_name) = QueueName::parse(name) else {
            return Err(LookupError::QueueNotFound(name.to_string()));
        };
        self.storage
            .get_directory()?
            .get(&queue_name)
            .cloned()
            .ok_or_else(|| LookupError::QueueNotFound(name.to_string()))
    }
}
