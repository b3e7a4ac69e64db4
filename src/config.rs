use std::{env, net::SocketAddr, str::FromStr};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid environment variable format for {0}: {1}")]
    InvalidVar(String, String),
}

/// Which `DeckRepository` implementation backs the service.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    DynamoDb,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dynamodb" => Ok(StorageBackend::DynamoDb),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(format!("unknown storage backend '{}'", other)),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub storage_backend: StorageBackend,
    pub decks_table_name: String,
    // Store region as string for simplicity here, aws_clients can convert
    pub aws_region: String,
    // Optional endpoint for LocalStack
    pub localstack_endpoint: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignores errors, relies on env vars otherwise)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_address_str = lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind_address = SocketAddr::from_str(&bind_address_str)
            .map_err(|e| ConfigError::InvalidVar("BIND_ADDRESS".into(), e.to_string()))?;

        let storage_backend = match lookup("STORAGE_BACKEND") {
            Some(raw) => raw
                .parse()
                .map_err(|e| ConfigError::InvalidVar("STORAGE_BACKEND".into(), e))?,
            None => StorageBackend::DynamoDb,
        };

        let decks_table_name = lookup("DECKS_TABLE_NAME").unwrap_or_else(|| "decks".to_string());
        if decks_table_name.trim().is_empty() {
            return Err(ConfigError::MissingVar("DECKS_TABLE_NAME".into()));
        }

        let aws_region = lookup("AWS_DEFAULT_REGION").unwrap_or_else(|| "ca-central-1".to_string());

        // Allow overriding endpoint for localstack/testing
        let localstack_endpoint = lookup("AWS_ENDPOINT_URL").filter(|url| !url.is_empty());

        Ok(Config {
            bind_address,
            storage_backend,
            decks_table_name,
            aws_region,
            localstack_endpoint,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.bind_address, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(config.storage_backend, StorageBackend::DynamoDb);
        assert_eq!(config.decks_table_name, "decks");
        assert_eq!(config.aws_region, "ca-central-1");
        assert!(config.localstack_endpoint.is_none());
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("BIND_ADDRESS", "127.0.0.1:8080"),
            ("STORAGE_BACKEND", "Memory"),
            ("DECKS_TABLE_NAME", "flashcarte-decks"),
            ("AWS_ENDPOINT_URL", "http://localhost:4566"),
        ]))
        .unwrap();

        assert_eq!(config.bind_address.port(), 8080);
        assert_eq!(config.storage_backend, StorageBackend::Memory);
        assert_eq!(config.decks_table_name, "flashcarte-decks");
        assert_eq!(config.localstack_endpoint.as_deref(), Some("http://localhost:4566"));
    }

    #[test]
    fn rejects_bad_bind_address() {
        let err = Config::from_lookup(lookup_from(&[("BIND_ADDRESS", "not-an-addr")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVar(ref var, _) if var == "BIND_ADDRESS"));
    }

    #[test]
    fn rejects_unknown_backend() {
        let err = Config::from_lookup(lookup_from(&[("STORAGE_BACKEND", "mongo")])).unwrap_err();
        assert!(err.to_string().contains("unknown storage backend 'mongo'"));
    }

    #[test]
    fn rejects_blank_table_name() {
        let err = Config::from_lookup(lookup_from(&[("DECKS_TABLE_NAME", "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(_)));
    }
}
