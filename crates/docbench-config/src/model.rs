//! Configuration schema for docbench.

use serde::{Deserialize, Serialize};

/// Root config shared by the `serve` and `seed` commands.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DocbenchConfig {
    #[serde(default, rename = "$schema")]
    pub schema: Option<String>,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub seed: SeedConfig,
}

impl DocbenchConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> DocbenchConfigBuilder {
        DocbenchConfigBuilder::new()
    }
}

/// Builder for assembling a `DocbenchConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct DocbenchConfigBuilder {
    config: DocbenchConfig,
}

impl DocbenchConfigBuilder {
    /// Create a new builder seeded with default config values.
    pub fn new() -> Self {
        Self {
            config: DocbenchConfig::default(),
        }
    }

    /// Replace the store connection settings.
    pub fn store(mut self, store: StoreConfig) -> Self {
        self.config.store = store;
        self
    }

    /// Replace the HTTP server settings.
    pub fn server(mut self, server: ServerConfig) -> Self {
        self.config.server = server;
        self
    }

    /// Replace the bulk seed settings.
    pub fn seed(mut self, seed: SeedConfig) -> Self {
        self.config.seed = seed;
        self
    }

    /// Finalize and return the built `DocbenchConfig`.
    pub fn build(self) -> DocbenchConfig {
        self.config
    }
}

/// Connection settings for the backing document store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreConfig {
    /// Connection string; the scheme selects the backend.
    #[serde(default = "default_store_uri")]
    pub uri: String,
    /// Logical database name.
    #[serde(default = "default_database")]
    pub database: String,
    /// Collection holding the records.
    #[serde(default = "default_collection")]
    pub collection: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            uri: default_store_uri(),
            database: default_database(),
            collection: default_collection(),
        }
    }
}

impl StoreConfig {
    /// Store settings for the given connection string with default names.
    pub fn with_uri(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            ..Self::default()
        }
    }
}

/// Whether `name` is usable as a collection name.
///
/// Collection names double as SQL table names and file stems, so only
/// `[A-Za-z_][A-Za-z0-9_]*` is accepted.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
        }
        _ => false,
    }
}

fn default_store_uri() -> String {
    "memory://".to_string()
}

fn default_database() -> String {
    "docbench".to_string()
}

fn default_collection() -> String {
    "records".to_string()
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Records generated per `POST /insert`.
    #[serde(default = "default_insert_batch_size")]
    pub insert_batch_size: usize,
    /// Limit used by `GET /records` when the query omits or garbles it.
    #[serde(default = "default_limit")]
    pub default_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            insert_batch_size: default_insert_batch_size(),
            default_limit: default_limit(),
        }
    }
}

impl ServerConfig {
    /// Socket address string the listener binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_insert_batch_size() -> usize {
    1000
}

fn default_limit() -> usize {
    100
}

/// Settings for the one-shot bulk seed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeedConfig {
    #[serde(default = "default_seed_count")]
    pub count: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            count: default_seed_count(),
        }
    }
}

fn default_seed_count() -> usize {
    10_000
}
