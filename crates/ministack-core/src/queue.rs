use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::InvalidName;

/// Longest queue name accepted, in bytes of UTF-8.
pub const MAX_QUEUE_NAME_LEN: usize = 80;

/// A validated queue name: 1-80 bytes of letters, digits, `-` or `_`.
/// Letters and digits may be any Unicode alphabetic or numeric character.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QueueName(String);

impl QueueName {
    pub fn parse(name: impl Into<String>) -> Result<Self, InvalidName> {
        let name = name.into();
        let reason = if name.is_empty() {
            Some("queue name cannot be empty")
        } else if name.len() > MAX_QUEUE_NAME_LEN {
            Some("queue name cannot be longer than 80 bytes")
        } else if !name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
        {
            Some("queue name may only contain letters, digits, '-' and '_'")
        } else {
            None
        };
        match reason {
            Some(reason) => Err(InvalidName { name, reason }),
            None => Ok(Self(name)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueueName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl TryFrom<String> for QueueName {
    type Error = InvalidName;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<QueueName> for String {
    fn from(value: QueueName) -> Self {
        value.0
    }
}

/// Queue metadata stored in the queue directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Queue {
    pub name: QueueName,
    /// Epoch milliseconds of the first successful `create_queue`.
    pub created_at: u64,
}

/// Snapshot of a queue's pending messages split by eligibility at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueStats {
    /// Receivable now.
    pub visible: usize,
    /// Hidden by a visibility timeout (or sent with a clock ahead of now).
    pub hidden: usize,
}

/// The queue directory record: every provisioned queue, keyed by name.
/// Persisted as one serialized value in the `directory` column family.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct QueueDirectory {
    pub queues: BTreeMap<QueueName, Queue>,
}

impl QueueDirectory {
    pub fn get(&self, name: &QueueName) -> Option<&Queue> {
        self.queues.get(name)
    }

    pub fn insert(&mut self, queue: Queue) {
        self.queues.insert(queue.name.clone(), queue);
    }

    /// Queue names in sorted order.
    pub fn names(&self) -> Vec<QueueName> {
        self.queues.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_letters_digits_dash_underscore() {
        let name = QueueName::parse("valid_Name-1").unwrap();
        assert_eq!(name.as_str(), "valid_Name-1");
        assert!(QueueName::parse("a".repeat(80)).is_ok());
    }

    #[test]
    fn accepts_unicode_letters_and_digits() {
        assert!(QueueName::parse("caf\u{e9}").is_ok());
        assert!(QueueName::parse("\u{65e5}\u{672c}-\u{0663}").is_ok());
    }

    #[test]
    fn length_limit_counts_bytes() {
        // 40 two-byte characters fit exactly, one more goes over.
        assert!(QueueName::parse("\u{e9}".repeat(40)).is_ok());
        let err = QueueName::parse("\u{e9}".repeat(41)).unwrap_err();
        assert!(err.reason.contains("80 bytes"));
        // 27 three-byte characters are 81 bytes.
        assert!(QueueName::parse("\u{65e5}".repeat(27)).is_err());
    }

    #[test]
    fn rejects_empty_long_and_bad_chars() {
        assert!(QueueName::parse("").is_err());
        assert!(QueueName::parse("a".repeat(81)).is_err());
        assert!(QueueName::parse("bad name!").is_err());
        assert!(QueueName::parse("dots.not.allowed").is_err());
        assert!(QueueName::parse("emoji\u{1f600}").is_err());
    }

    #[test]
    fn error_carries_name_and_reason() {
        let err = QueueName::parse("bad name!").unwrap_err();
        assert_eq!(err.name, "bad name!");
        assert!(err.reason.contains("letters"));
    }

    #[test]
    fn directory_serde_rejects_invalid_names() {
        let json = r#"{"queues":{"bad name":{"name":"bad name","created_at":0}}}"#;
        assert!(serde_json::from_str::<QueueDirectory>(json).is_err());
    }

    #[test]
    fn directory_names_are_sorted() {
        let mut dir = QueueDirectory::default();
        for n in ["zeta", "alpha", "mid"] {
            let name = QueueName::parse(n).unwrap();
            dir.insert(Queue {
                name,
                created_at: 0,
            });
        }
        let names: Vec<String> = dir.names().into_iter().map(String::from).collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }
}
