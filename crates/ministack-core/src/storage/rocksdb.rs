use std::path::Path;
use std::sync::Arc;

use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, Direction, IteratorMode,
    MultiThreaded, Options, WriteBatch,
};

use crate::error::{StorageError, StorageResult};
use crate::message::Message;
use crate::queue::QueueDirectory;
use crate::storage::keys;
use crate::storage::traits::{Storage, WriteBatchOp};

const CF_DIRECTORY: &str = "directory";
const CF_SEQUENCES: &str = "sequences";
const CF_MESSAGES: &str = "messages";
const CF_MESSAGE_INDEX: &str = "message_index";

/// Fixed key of the single queue directory record.
const DIRECTORY_KEY: &[u8] = b"queue_list";

/// All column family names (excluding `default` which RocksDB creates automatically).
const COLUMN_FAMILIES: &[&str] = &[CF_DIRECTORY, CF_SEQUENCES, CF_MESSAGES, CF_MESSAGE_INDEX];

type DB = DBWithThreadMode<MultiThreaded>;

/// RocksDB-backed storage implementation.
pub struct RocksDbStorage {
    db: DB,
}

impl RocksDbStorage {
    /// Open or create a RocksDB database at the given path with all column families.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let mut db_opts = Options::default();
        db_opts.create_if_missing(true);
        db_opts.create_missing_column_families(true);

        let cf_descriptors: Vec<ColumnFamilyDescriptor> = COLUMN_FAMILIES
            .iter()
            .map(|name| ColumnFamilyDescriptor::new(*name, Options::default()))
            .collect();

        let db = DB::open_cf_descriptors(&db_opts, path, cf_descriptors)?;
        Ok(Self { db })
    }

    fn cf(&self, name: &str) -> StorageResult<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StorageError::RocksDb(format!("column family not found: {name}")))
    }
}

impl Storage for RocksDbStorage {
    fn get_directory(&self) -> StorageResult<QueueDirectory> {
        let cf = self.cf(CF_DIRECTORY)?;
        match self.db.get_cf(&cf, DIRECTORY_KEY)? {
            Some(value) => Ok(serde_json::from_slice(&value)?),
            None => Ok(QueueDirectory::default()),
        }
    }

    fn get_sequence(&self, key: &[u8]) -> StorageResult<Option<u64>> {
        let cf = self.cf(CF_SEQUENCES)?;
        self.db
            .get_cf(&cf, key)?
            .map(|value| keys::decode_sequence(&value))
            .transpose()
    }

    fn get_message(&self, key: &[u8]) -> StorageResult<Option<Message>> {
        let cf = self.cf(CF_MESSAGES)?;
        match self.db.get_cf(&cf, key)? {
            Some(value) => Ok(Some(serde_json::from_slice(&value)?)),
            None => Ok(None),
        }
    }

    fn list_messages(&self, prefix: &[u8]) -> StorageResult<Vec<(Vec<u8>, Message)>> {
        let cf = self.cf(CF_MESSAGES)?;
        let iter = self
            .db
            .iterator_cf(&cf, IteratorMode::From(prefix, Direction::Forward));
        let mut results = Vec::new();
        for item in iter {
            let (key, value) = item?;
            if !key.starts_with(prefix) {
                break;
            }
            let msg: Message = serde_json::from_slice(&value)?;
            results.push((key.to_vec(), msg));
        }
        Ok(results)
    }

    fn list_messages_up_to(
        &self,
        prefix: &[u8],
        up_to: &[u8],
        limit: usize,
    ) -> StorageResult<Vec<(Vec<u8>, Message)>> {
        let cf = self.cf(CF_MESSAGES)?;
        let iter = self
            .db
            .iterator_cf(&cf, IteratorMode::From(prefix, Direction::Forward));
        let mut results = Vec::new();
        for item in iter {
            if results.len() >= limit {
                break;
            }
            let (key, value) = item?;
            if !key.starts_with(prefix) || key.as_ref() > up_to {
                break;
            }
            let msg: Message = serde_json::from_slice(&value)?;
            results.push((key.to_vec(), msg));
        }
        Ok(results)
    }

    fn get_index(&self, key: &[u8]) -> StorageResult<Option<Vec<u8>>> {
        let cf = self.cf(CF_MESSAGE_INDEX)?;
        Ok(self.db.get_cf(&cf, key)?.map(|v| v.to_vec()))
    }

    fn count_index(&self, prefix: &[u8]) -> StorageResult<usize> {
        let cf = self.cf(CF_MESSAGE_INDEX)?;
        let iter = self
            .db
            .iterator_cf(&cf, IteratorMode::From(prefix, Direction::Forward));
        let mut count = 0;
        for item in iter {
            let (key, _) = item?;
            if !key.starts_with(prefix) {
                break;
            }
            count += 1;
        }
        Ok(count)
    }

    fn write_batch(&self, ops: Vec<WriteBatchOp>) -> StorageResult<()> {
        let directory = self.cf(CF_DIRECTORY)?;
        let sequences = self.cf(CF_SEQUENCES)?;
        let messages = self.cf(CF_MESSAGES)?;
        let index = self.cf(CF_MESSAGE_INDEX)?;

        let mut batch = WriteBatch::default();
        for op in ops {
            match op {
                WriteBatchOp::PutDirectory { value } => {
                    batch.put_cf(&directory, DIRECTORY_KEY, &value);
                }
                WriteBatchOp::PutSequence { key, value } => {
                    batch.put_cf(&sequences, &key, &value);
                }
                WriteBatchOp::PutMessage { key, value } => {
                    batch.put_cf(&messages, &key, &value);
                }
                WriteBatchOp::DeleteMessage { key } => {
                    batch.delete_cf(&messages, &key);
                }
                WriteBatchOp::PutIndex { key, value } => {
                    batch.put_cf(&index, &key, &value);
                }
                WriteBatchOp::DeleteIndex { key } => {
                    batch.delete_cf(&index, &key);
                }
            }
        }

        self.db.write(batch)?;
        Ok(())
    }
}
