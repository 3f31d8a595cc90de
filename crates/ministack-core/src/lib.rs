pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod message;
pub mod metrics;
pub mod queue;
pub mod storage;
pub mod telemetry;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::MinistackConfig;
pub use engine::QueueEngine;
pub use error::{
    CreateQueueError, InvalidName, LookupError, ReceiveError, SendError, StorageError,
    StorageResult,
};
pub use message::Message;
pub use queue::{Queue, QueueDirectory, QueueName, QueueStats};
pub use storage::{DeliveryKey, RocksDbStorage, Storage, WriteBatchOp};
