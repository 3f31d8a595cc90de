use super::*;

/// Identity index bookkeeping: `msg_id -> current DeliveryKey`, one entry per
/// pending message. Writes are only ever emitted into the same batch as the
/// matching message store write.
pub(super) fn put_entry(
    batch: &mut Vec<WriteBatchOp>,
    queue: &QueueName,
    msg_id: &uuid::Uuid,
    key: DeliveryKey,
) {
    batch.push(WriteBatchOp::PutIndex {
        key: keys::index_key(queue, msg_id),
        value: key.encode().to_vec(),
    });
}

impl QueueEngine {
    /// Look up where a pending message currently lives.
    pub(super) fn index_get(
        &self,
        queue: &QueueName,
        msg_id: &uuid::Uuid,
    ) -> StorageResult<Option<DeliveryKey>> {
        match self.storage.get_index(&keys::index_key(queue, msg_id))? {
            Some(raw) => DeliveryKey::decode(&raw).map(Some).map_err(|e| {
                error!(queue = %queue, %msg_id, error = %e, "corrupt identity index entry");
                e
            }),
            None => Ok(None),
        }
    }

    /// Stage a new message: record at `key` plus its index entry.
    pub(super) fn stage_insert(
        &self,
        batch: &mut Vec<WriteBatchOp>,
        queue: &QueueName,
        message: &Message,
        key: DeliveryKey,
    ) -> StorageResult<()> {
        batch.push(WriteBatchOp::PutMessage {
            key: keys::message_key(queue, key),
            value: serde_json::to_vec(message)?,
        });
        put_entry(batch, queue, &message.id, key);
        Ok(())
    }

    /// Stage a move of `message` from `from` to `to`: delete the old record,
    /// write it at the new key and repoint the index. When the keys are equal
    /// the record is rewritten in place and the index is left alone.
    pub(super) fn stage_move(
        &self,
        batch: &mut Vec<WriteBatchOp>,
        queue: &QueueName,
        message: &Message,
        from: DeliveryKey,
        to: DeliveryKey,
    ) -> StorageResult<()> {
        let value = serde_json::to_vec(message)?;
        if from == to {
            batch.push(WriteBatchOp::PutMessage {
                key: keys::message_key(queue, from),
                value,
            });
            return Ok(());
        }
        batch.push(WriteBatchOp::DeleteMessage {
            key: keys::message_key(queue, from),
        });
        batch.push(WriteBatchOp::PutMessage {
            key: keys::message_key(queue, to),
            value,
        });
        put_entry(batch, queue, &message.id, to);
        Ok(())
    }

    /// Stage removal of a message and its index entry.
    #[cfg_attr(not(test), allow(dead_code))]
    pub(super) fn stage_remove(
        &self,
        batch: &mut Vec<WriteBatchOp>,
        queue: &QueueName,
        msg_id: &uuid::Uuid,
        at: DeliveryKey,
    ) {
        batch.push(WriteBatchOp::DeleteMessage {
            key: keys::message_key(queue, at),
        });
        batch.push(WriteBatchOp::DeleteIndex {
            key: keys::index_key(queue, msg_id),
        });
    }
}
