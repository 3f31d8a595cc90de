use super::*;

use crate::error::{LookupError, ReceiveError, SendError};

impl QueueEngine {
    /// Append a message to a queue. It is immediately eligible for delivery.
    ///
    /// The next sequence number, the message record and its identity index
    /// entry are committed together. A blind retry after an error may create
    /// a duplicate; delivery is at-least-once.
    #[tracing::instrument(skip_all, fields(queue = %queue_name, payload_len = payload.len()))]
    pub fn send(&self, queue_name: &str, payload: Vec<u8>) -> Result<uuid::Uuid, SendError> {
        let _guard = self.lock_writer();
        let (queue, last_sequence) = self
            .resolve_queue(queue_name)?
            .ok_or_else(|| SendError::QueueNotFound(queue_name.to_string()))?;

        let sequence = last_sequence
            .checked_add(1)
            .ok_or_else(|| SendError::SequenceExhausted(queue_name.to_string()))?;
        let now = self.clock.now_ms();
        let message = Message::new(payload, now);
        let key = DeliveryKey::new(now, sequence);

        let mut batch = Vec::with_capacity(3);
        self.stage_insert(&mut batch, &queue, &message, key)?;
        batch.push(WriteBatchOp::PutSequence {
            key: keys::sequence_key(&queue),
            value: keys::encode_sequence(sequence).to_vec(),
        });
        self.storage.write_batch(batch)?;

        self.metrics.record_send(queue.as_str());
        debug!(msg_id = %message.id, sequence, "message sent");
        Ok(message.id)
    }

    /// Return up to `max_messages` eligible messages in delivery order.
    ///
    /// With `visibility_timeout_secs > 0` each returned message is moved to a
    /// key visible `visibility_timeout_secs` after now, hiding it from later
    /// calls until then. With a zero timeout messages stay where they are and
    /// are immediately deliverable again. Never waits for new messages.
    #[tracing::instrument(skip_all, fields(queue = %queue_name, max = max_messages, timeout_secs = visibility_timeout_secs))]
    pub fn receive(
        &self,
        queue_name: &str,
        max_messages: usize,
        visibility_timeout_secs: u64,
    ) -> Result<Vec<Message>, ReceiveError> {
        let _guard = self.lock_writer();
        let (queue, _) = self
            .resolve_queue(queue_name)?
            .ok_or_else(|| ReceiveError::QueueNotFound(queue_name.to_string()))?;
        if max_messages == 0 {
            return Ok(Vec::new());
        }

        let now = self.clock.now_ms();
        let prefix = keys::partition_prefix(&queue);
        // Keys sort by visible_after first, so everything past (now, MAX) is hidden.
        let up_to = keys::message_key(&queue, DeliveryKey::new(now, u64::MAX));
        let eligible = self
            .storage
            .list_messages_up_to(&prefix, &up_to, max_messages)?;

        let mut batch = Vec::with_capacity(eligible.len() * 3);
        let mut received = Vec::with_capacity(eligible.len());
        let mut hidden = 0u64;
        for (raw_key, mut message) in eligible {
            let current = keys::parse_message_key(&prefix, &raw_key).map_err(|e| {
                error!(error = %e, "corrupt delivery key in message partition");
                e
            })?;
            message.receive_count = message.receive_count.saturating_add(1);

            let target = if visibility_timeout_secs > 0 {
                hidden += 1;
                current
                    .rebased(now)
                    .extend_invisibility(visibility_timeout_secs)
            } else {
                current
            };
            self.stage_move(&mut batch, &queue, &message, current, target)?;
            received.push(message);
        }

        if !batch.is_empty() {
            self.storage.write_batch(batch)?;
        }

        self.metrics
            .record_receive(queue.as_str(), received.len() as u64, hidden);
        debug!(count = received.len(), hidden, "messages received");
        Ok(received)
    }

    /// Pending messages in a queue, visible and hidden.
    pub fn queue_depth(&self, queue_name: &str) -> Result<usize, LookupError> {
        let (queue, _) = self
            .resolve_queue(queue_name)?
            .ok_or_else(|| LookupError::QueueNotFound(queue_name.to_string()))?;
        let depth = self
            .storage
            .count_index(&keys::partition_prefix(&queue))?;
        self.metrics.set_queue_depth(queue.as_str(), depth as u64);
        Ok(depth)
    }

    /// Visible and hidden message counts, from a full scan of the partition.
    #[tracing::instrument(skip_all, fields(queue = %queue_name))]
    pub fn queue_stats(&self, queue_name: &str) -> Result<QueueStats, LookupError> {
        let (queue, _) = self
            .resolve_queue(queue_name)?
            .ok_or_else(|| LookupError::QueueNotFound(queue_name.to_string()))?;
        let now = self.clock.now_ms();
        let prefix = keys::partition_prefix(&queue);

        let mut stats = QueueStats::default();
        for (raw_key, _) in self.storage.list_messages(&prefix)? {
            let key = keys::parse_message_key(&prefix, &raw_key)?;
            if key.visible_after <= now {
                stats.visible += 1;
            } else {
                stats.hidden += 1;
            }
        }
        self.metrics
            .set_queue_depth(queue.as_str(), (stats.visible + stats.hidden) as u64);
        Ok(stats)
    }

    /// Current delivery key of a pending message, resolved through the
    /// identity index without scanning the partition.
    pub fn locate_message(
        &self,
        queue_name: &str,
        msg_id: &uuid::Uuid,
    ) -> Result<Option<DeliveryKey>, LookupError> {
        let (queue, _) = self
            .resolve_queue(queue_name)?
            .ok_or_else(|| LookupError::QueueNotFound(queue_name.to_string()))?;
        Ok(self.index_get(&queue, msg_id)?)
    }
}
