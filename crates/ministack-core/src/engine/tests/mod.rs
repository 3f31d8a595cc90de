use super::*;
use crate::clock::ManualClock;
use crate::error::{CreateQueueError, LookupError, ReceiveError, SendError};
use crate::storage::RocksDbStorage;

mod common;
use common::*;

mod concurrency;
