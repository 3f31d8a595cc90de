use crate::error::StorageResult;
use crate::message::Message;
use crate::queue::QueueDirectory;

/// Represents a single operation in an atomic write batch.
#[derive(Debug)]
pub enum WriteBatchOp {
    PutDirectory { value: Vec<u8> },
    PutSequence { key: Vec<u8>, value: Vec<u8> },
    PutMessage { key: Vec<u8>, value: Vec<u8> },
    DeleteMessage { key: Vec<u8> },
    PutIndex { key: Vec<u8>, value: Vec<u8> },
    DeleteIndex { key: Vec<u8> },
}

/// Storage trait for all persistence operations. Implementations must be thread-safe.
///
/// Point reads observe only committed batches. Callers that read, decide and
/// then write must serialize themselves; `write_batch` is the only atomic
/// multi-key primitive.
pub trait Storage: Send + Sync {
    // --- Directory ---

    /// Read the queue directory record, or an empty directory if none exists yet.
    fn get_directory(&self) -> StorageResult<QueueDirectory>;

    // --- Sequences ---

    /// Last sequence assigned in a queue partition, `None` if the partition
    /// was never provisioned.
    fn get_sequence(&self, key: &[u8]) -> StorageResult<Option<u64>>;

    // --- Messages ---

    /// Retrieve a message by its full key.
    fn get_message(&self, key: &[u8]) -> StorageResult<Option<Message>>;

    /// List messages whose keys start with the given prefix, in lexicographic order.
    fn list_messages(&self, prefix: &[u8]) -> StorageResult<Vec<(Vec<u8>, Message)>>;

    /// List at most `limit` messages under `prefix` whose keys are <= `up_to`,
    /// in lexicographic order. Iteration stops at the first key past the bound.
    fn list_messages_up_to(
        &self,
        prefix: &[u8],
        up_to: &[u8],
        limit: usize,
    ) -> StorageResult<Vec<(Vec<u8>, Message)>>;

    // --- Identity index ---

    /// Retrieve the raw delivery key an index entry points at.
    fn get_index(&self, key: &[u8]) -> StorageResult<Option<Vec<u8>>>;

    /// Count index entries under a partition prefix.
    fn count_index(&self, prefix: &[u8]) -> StorageResult<usize>;

    // --- Batch operations ---

    /// Atomically apply a batch of write operations across column families.
    fn write_batch(&self, ops: Vec<WriteBatchOp>) -> StorageResult<()>;
}
