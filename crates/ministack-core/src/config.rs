use serde::Deserialize;

/// Top-level configuration, deserializable from TOML.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MinistackConfig {
    pub storage: StorageConfig,
    pub receive: ReceiveConfig,
}

/// Where the RocksDB data directory lives.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: String,
}

/// Defaults applied when a receive call does not specify its own values.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReceiveConfig {
    pub max_messages: usize,
    pub visibility_timeout_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
        }
    }
}

impl Default for ReceiveConfig {
    fn default() -> Self {
        Self {
            max_messages: 1,
            visibility_timeout_secs: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = MinistackConfig::default();
        assert_eq!(config.storage.data_dir, "data");
        assert_eq!(config.receive.max_messages, 1);
        assert_eq!(config.receive.visibility_timeout_secs, 30);
    }

    #[test]
    fn toml_parsing_with_overrides() {
        let toml_str = r#"
            [storage]
            data_dir = "/var/lib/ministack"

            [receive]
            max_messages = 10
            visibility_timeout_secs = 5
        "#;
        let config: MinistackConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.storage.data_dir, "/var/lib/ministack");
        assert_eq!(config.receive.max_messages, 10);
        assert_eq!(config.receive.visibility_timeout_secs, 5);
    }

    #[test]
    fn toml_parsing_empty_uses_defaults() {
        let config: MinistackConfig = toml::from_str("").unwrap();
        assert_eq!(config.storage.data_dir, "data");
        assert_eq!(config.receive.visibility_timeout_secs, 30);
    }

    #[test]
    fn toml_parsing_partial_config() {
        let toml_str = r#"
            [receive]
            visibility_timeout_secs = 0
        "#;
        let config: MinistackConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.receive.visibility_timeout_secs, 0);
        // Untouched sections keep their defaults
        assert_eq!(config.receive.max_messages, 1);
        assert_eq!(config.storage.data_dir, "data");
    }
}
