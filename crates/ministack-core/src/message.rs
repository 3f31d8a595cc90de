use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A pending message as stored in the `messages` column family. The record
/// itself never carries its delivery key; the key is where it lives.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub id: Uuid,
    /// Epoch milliseconds at send time.
    pub created_at: u64,
    pub payload: Vec<u8>,
    /// How many times `receive` has returned this message.
    #[serde(default)]
    pub receive_count: u32,
}

impl Message {
    /// Generate a new random (UUIDv4) message ID.
    pub fn new_id() -> Uuid {
        Uuid::new_v4()
    }

    pub fn new(payload: Vec<u8>, created_at: u64) -> Self {
        Self {
            id: Self::new_id(),
            created_at,
            payload,
            receive_count: 0,
        }
    }
}
