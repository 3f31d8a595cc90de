pub mod keys;
mod rocksdb;
mod traits;

pub use self::rocksdb::RocksDbStorage;
pub use keys::DeliveryKey;
pub use traits::{Storage, WriteBatchOp};
