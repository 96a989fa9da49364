//! Configuration module
//!
//! Everything is read from the environment once at start-up (after loading an
//! optional `.env` file) and handed to constructors explicitly.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::{DEFAULT_CONSUMER_GROUP, DEFAULT_PRODUCT_TOPIC, SUPPORTED_OUTPUT_EXTENSIONS};

const SERVER_PORT: u16 = 4000;
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const PUBLISH_TIMEOUT_SECS: u64 = 30;
const EVENT_QUEUE_CAPACITY: usize = 100;
const IMAGE_TARGET_SIZE: u32 = 50;
const IMAGE_FETCH_TIMEOUT_SECS: u64 = 60;
const SHUTDOWN_DRAIN_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrokerBackend {
    Kafka,
    /// In-process channel; producer and consumer must share the process.
    Memory,
}

impl FromStr for BrokerBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kafka" => Ok(BrokerBackend::Kafka),
            "memory" | "in-memory" => Ok(BrokerBackend::Memory),
            other => Err(anyhow::anyhow!("Invalid broker backend: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(anyhow::anyhow!("Invalid log format: {}", other)),
        }
    }
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub timeout_seconds: u64,
}

#[derive(Clone, Debug)]
pub struct BrokerConfig {
    pub backend: BrokerBackend,
    pub brokers: String,
    pub topic: String,
    pub group_id: String,
    pub publish_timeout: Duration,
    /// `None` lets an idle worker wait for messages indefinitely.
    pub consume_timeout: Option<Duration>,
    pub queue_capacity: usize,
}

#[derive(Clone, Debug)]
pub struct ImageConfig {
    pub output_dir: String,
    pub target_width: u32,
    pub target_height: u32,
    pub output_extension: String,
    pub fetch_timeout: Duration,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub log_format: LogFormat,
    pub database: DatabaseConfig,
    pub broker: BrokerConfig,
    pub image: ImageConfig,
    pub shutdown_drain_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset numbers take their default; a set
    /// value that does not parse into the field's type is an error.
    pub fn from_lookup<F>(get: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secs = |key: &str, default: u64| -> Result<Duration, anyhow::Error> {
            parse_var(&get, key, default).map(Duration::from_secs)
        };

        let environment = get("ENVIRONMENT")
            .or_else(|| get("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let database_url =
            get("DATABASE_URL").ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?;

        let backend = get("BROKER_BACKEND")
            .unwrap_or_else(|| "kafka".to_string())
            .parse()?;

        let log_format = get("LOG_FORMAT")
            .unwrap_or_else(|| "pretty".to_string())
            .parse()?;

        let consume_timeout = Some(parse_var(&get, "BROKER_CONSUME_TIMEOUT_SECS", 0u64)?)
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Ok(Config {
            server_port: parse_var(&get, "PORT", SERVER_PORT)?,
            environment,
            log_format,
            database: DatabaseConfig {
                url: database_url,
                max_connections: parse_var(&get, "DB_MAX_CONNECTIONS", MAX_CONNECTIONS)?,
                timeout_seconds: parse_var(&get, "DB_TIMEOUT_SECONDS", CONNECTION_TIMEOUT_SECS)?,
            },
            broker: BrokerConfig {
                backend,
                brokers: get("KAFKA_BROKERS").unwrap_or_else(|| "localhost:9092".to_string()),
                topic: get("KAFKA_TOPIC").unwrap_or_else(|| DEFAULT_PRODUCT_TOPIC.to_string()),
                group_id: get("KAFKA_GROUP_ID")
                    .unwrap_or_else(|| DEFAULT_CONSUMER_GROUP.to_string()),
                publish_timeout: secs("BROKER_PUBLISH_TIMEOUT_SECS", PUBLISH_TIMEOUT_SECS)?,
                consume_timeout,
                queue_capacity: parse_var(&get, "EVENT_QUEUE_CAPACITY", EVENT_QUEUE_CAPACITY)?,
            },
            image: ImageConfig {
                output_dir: get("IMAGE_OUTPUT_DIR").unwrap_or_else(|| "Images".to_string()),
                target_width: parse_var(&get, "IMAGE_TARGET_WIDTH", IMAGE_TARGET_SIZE)?,
                target_height: parse_var(&get, "IMAGE_TARGET_HEIGHT", IMAGE_TARGET_SIZE)?,
                output_extension: get("IMAGE_OUTPUT_EXTENSION")
                    .map(|ext| ext.trim().trim_start_matches('.').to_ascii_lowercase())
                    .unwrap_or_else(|| "jpg".to_string()),
                fetch_timeout: secs("IMAGE_FETCH_TIMEOUT_SECS", IMAGE_FETCH_TIMEOUT_SECS)?,
            },
            shutdown_drain_timeout: secs("SHUTDOWN_DRAIN_TIMEOUT_SECS", SHUTDOWN_DRAIN_TIMEOUT_SECS)?,
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        matches!(
            self.environment.to_ascii_lowercase().as_str(),
            "production" | "prod"
        )
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !self.database.url.starts_with("postgres://")
            && !self.database.url.starts_with("postgresql://")
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.broker.backend == BrokerBackend::Kafka && self.broker.brokers.trim().is_empty() {
            return Err(anyhow::anyhow!(
                "KAFKA_BROKERS must be set when BROKER_BACKEND=kafka"
            ));
        }

        if self.broker.topic.trim().is_empty() {
            return Err(anyhow::anyhow!("KAFKA_TOPIC must not be empty"));
        }

        if self.broker.queue_capacity == 0 {
            return Err(anyhow::anyhow!("EVENT_QUEUE_CAPACITY must be at least 1"));
        }

        if self.image.target_width == 0 && self.image.target_height == 0 {
            return Err(anyhow::anyhow!(
                "IMAGE_TARGET_WIDTH and IMAGE_TARGET_HEIGHT cannot both be 0"
            ));
        }

        if !SUPPORTED_OUTPUT_EXTENSIONS.contains(&self.image.output_extension.as_str()) {
            return Err(anyhow::anyhow!(
                "IMAGE_OUTPUT_EXTENSION must be one of {:?}, got {}",
                SUPPORTED_OUTPUT_EXTENSIONS,
                self.image.output_extension
            ));
        }

        Ok(())
    }
}

/// Parse `key` into `T`, or `default` when unset.
fn parse_var<F, T>(get: &F, key: &str, default: T) -> Result<T, anyhow::Error>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match get(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid {key}={raw:?}: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, anyhow::Error> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_apply() {
        let config = config_from(&[("DATABASE_URL", "postgres://localhost/catalog")]).unwrap();
        assert_eq!(config.server_port, 4000);
        assert_eq!(config.broker.backend, BrokerBackend::Kafka);
        assert_eq!(config.broker.topic, "product-events");
        assert_eq!(config.broker.queue_capacity, 100);
        assert!(config.broker.consume_timeout.is_none());
        assert_eq!(config.image.target_width, 50);
        assert_eq!(config.image.target_height, 50);
        assert_eq!(config.image.output_dir, "Images");
        assert_eq!(config.image.output_extension, "jpg");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_database_url_fails() {
        assert!(config_from(&[]).is_err());
    }

    #[test]
    fn overrides_are_read() {
        let config = config_from(&[
            ("DATABASE_URL", "postgresql://db/catalog"),
            ("BROKER_BACKEND", "memory"),
            ("BROKER_CONSUME_TIMEOUT_SECS", "5"),
            ("IMAGE_OUTPUT_EXTENSION", ".PNG"),
            ("LOG_FORMAT", "json"),
            ("ENVIRONMENT", "prod"),
        ])
        .unwrap();
        assert_eq!(config.broker.backend, BrokerBackend::Memory);
        assert_eq!(config.broker.consume_timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.image.output_extension, "png");
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(config.is_production());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = config_from(&[("DATABASE_URL", "mysql://db")]).unwrap();
        assert!(config.validate().is_err());

        config.database.url = "postgres://db".into();
        config.image.output_extension = "gif".into();
        assert!(config.validate().is_err());

        config.image.output_extension = "png".into();
        config.image.target_width = 0;
        config.image.target_height = 0;
        assert!(config.validate().is_err());

        config.image.target_height = 50;
        config.broker.queue_capacity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn out_of_range_numbers_are_rejected() {
        let err = config_from(&[
            ("DATABASE_URL", "postgres://db"),
            ("IMAGE_TARGET_WIDTH", "4294967346"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("IMAGE_TARGET_WIDTH"));

        assert!(config_from(&[("DATABASE_URL", "postgres://db"), ("PORT", "70000")]).is_err());
        assert!(config_from(&[
            ("DATABASE_URL", "postgres://db"),
            ("EVENT_QUEUE_CAPACITY", "-1")
        ])
        .is_err());
        assert!(config_from(&[
            ("DATABASE_URL", "postgres://db"),
            ("BROKER_PUBLISH_TIMEOUT_SECS", "soon")
        ])
        .is_err());
    }

    #[test]
    fn unknown_backend_fails() {
        assert!(config_from(&[
            ("DATABASE_URL", "postgres://db"),
            ("BROKER_BACKEND", "rabbit")
        ])
        .is_err());
    }
}
