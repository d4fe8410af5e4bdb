//! Process configuration (C9): the YAML file named on the CLI's `--config`
//! flag, deserialized once at startup and threaded down to the pieces that
//! need it (logging init, the HTTP facade's default sink configs).

use std::path::Path;

use eventer_core::{KafkaConfig, PostgresConfig};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub instance_id: String,
    #[serde(default)]
    pub kafka: KafkaConfig,
    #[serde(default)]
    pub postgres: PostgresConfig,
    pub service: ServiceConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub listen: String,
}

/// Loads and parses the YAML config file at `path`. Any failure here is
/// fatal to process startup (§7: "Panics are reserved for unrecoverable
/// startup").
pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Config> {
    let raw = std::fs::read_to_string(path.as_ref())
        .map_err(|e| anyhow::anyhow!("failed to read config file {:?}: {e}", path.as_ref()))?;
    let config: Config = serde_yaml::from_str(&raw)
        .map_err(|e| anyhow::anyhow!("failed to parse config file {:?}: {e}", path.as_ref()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_minimal_config() {
        let yaml = r#"
instance_id: "inst-1"
service:
  listen: "0.0.0.0:8080"
kafka:
  bootstrap_servers: "localhost:9092"
  topic: "events"
postgres:
  host: "localhost"
  port: 5432
  user: "postgres"
  password: "postgres"
  db: "eventer"
  table: "events"
  ssl: false
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.instance_id, "inst-1");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.service.listen, "0.0.0.0:8080");
    }
}
