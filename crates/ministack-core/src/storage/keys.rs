//! Key encoding for RocksDB column families.
//!
//! All numeric values use big-endian encoding for correct lexicographic ordering.
//! Partition prefixes are a 1-byte length followed by the queue name and `:` (0x3A).

use uuid::Uuid;

use crate::error::{StorageError, StorageResult};
use crate::queue::QueueName;

const SEPARATOR: u8 = b':';

/// Width of an encoded [`DeliveryKey`]: two big-endian u64 fields.
pub const DELIVERY_KEY_LEN: usize = 16;

/// Composite `(visible_after, sequence)` key. Its encoding is both the storage
/// location of a pending message and the gate deciding when it can be delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeliveryKey {
    /// Epoch milliseconds after which the message may be received.
    pub visible_after: u64,
    /// Per-queue send order, assigned once and never reused.
    pub sequence: u64,
}

impl DeliveryKey {
    pub fn new(visible_after: u64, sequence: u64) -> Self {
        Self {
            visible_after,
            sequence,
        }
    }

    pub fn encode(&self) -> [u8; DELIVERY_KEY_LEN] {
        let mut buf = [0u8; DELIVERY_KEY_LEN];
        buf[..8].copy_from_slice(&self.visible_after.to_be_bytes());
        buf[8..].copy_from_slice(&self.sequence.to_be_bytes());
        buf
    }

    pub fn decode(bytes: &[u8]) -> StorageResult<Self> {
        if bytes.len() != DELIVERY_KEY_LEN {
            return Err(StorageError::MalformedKey(format!(
                "delivery key must be {DELIVERY_KEY_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        let mut visible_after = [0u8; 8];
        let mut sequence = [0u8; 8];
        visible_after.copy_from_slice(&bytes[..8]);
        sequence.copy_from_slice(&bytes[8..]);
        Ok(Self {
            visible_after: u64::from_be_bytes(visible_after),
            sequence: u64::from_be_bytes(sequence),
        })
    }

    /// Push `visible_after` forward by `timeout_secs`, keeping the sequence.
    pub fn extend_invisibility(self, timeout_secs: u64) -> Self {
        Self {
            visible_after: self
                .visible_after
                .saturating_add(timeout_secs.saturating_mul(1000)),
            sequence: self.sequence,
        }
    }

    /// Same sequence, visible from `now_ms` instead of the original time.
    pub fn rebased(self, now_ms: u64) -> Self {
        Self {
            visible_after: self.visible_after.max(now_ms),
            sequence: self.sequence,
        }
    }
}

/// Build the partition prefix shared by a queue's message and index keys:
/// `{len}{queue_name}:`
pub fn partition_prefix(queue: &QueueName) -> Vec<u8> {
    let name = queue.as_str().as_bytes();
    let mut prefix = Vec::with_capacity(2 + name.len());
    // QueueName guarantees at most 80 bytes.
    prefix.push(name.len() as u8);
    prefix.extend_from_slice(name);
    prefix.push(SEPARATOR);
    prefix
}

/// Build a message key: `{partition_prefix}{visible_after}{sequence}`
pub fn message_key(queue: &QueueName, key: DeliveryKey) -> Vec<u8> {
    let mut buf = partition_prefix(queue);
    buf.extend_from_slice(&key.encode());
    buf
}

/// Recover the delivery key from a full message key read back from storage.
pub fn parse_message_key(prefix: &[u8], raw: &[u8]) -> StorageResult<DeliveryKey> {
    let tail = raw.strip_prefix(prefix).ok_or_else(|| {
        StorageError::MalformedKey("message key outside its queue partition".to_string())
    })?;
    DeliveryKey::decode(tail)
}

/// Build an identity index key: `{partition_prefix}{msg_id}`
pub fn index_key(queue: &QueueName, msg_id: &Uuid) -> Vec<u8> {
    let mut buf = partition_prefix(queue);
    buf.extend_from_slice(msg_id.as_bytes());
    buf
}

/// Build the sequence counter key for a queue. Its presence marks the queue's
/// partitions as provisioned.
pub fn sequence_key(queue: &QueueName) -> Vec<u8> {
    queue.as_str().as_bytes().to_vec()
}

pub fn encode_sequence(value: u64) -> [u8; 8] {
    value.to_be_bytes()
}

pub fn decode_sequence(bytes: &[u8]) -> StorageResult<u64> {
    let arr: [u8; 8] = bytes.try_into().map_err(|_| {
        StorageError::MalformedKey(format!("sequence must be 8 bytes, got {}", bytes.len()))
    })?;
    Ok(u64::from_be_bytes(arr))
}
