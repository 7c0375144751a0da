//! Layered configuration loader.
//!
//! Discovers configuration layers (user, cwd, runtime, environment), validates
//! each against the schema, merges them, and produces a final `DocbenchConfig`.

mod layer_io;
mod merge;
mod schema;
mod utils;

#[cfg(test)]
mod tests;

use crate::{ConfigError, DocbenchConfig};
use log::{debug, info};
use serde_json::{Value, json};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Default config filename in local layers.
const DEFAULT_CONFIG_FILE: &str = "docbench.json5";
/// Default config directory under the user's home.
const DEFAULT_CONFIG_DIR: &str = ".docbench";
/// Environment variable overriding `store.uri`.
pub const ENV_STORE_URI: &str = "DOCBENCH_STORE_URI";
/// Environment variable overriding `server.port`.
pub const ENV_PORT: &str = "DOCBENCH_PORT";

/// Effective config plus metadata about which layers were loaded.
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    /// The merged, validated config.
    pub config: DocbenchConfig,
    /// Metadata for each layer that contributed.
    pub layers: Vec<ConfigLayer>,
}

/// Origin for a single config layer in the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLayerSource {
    /// User-specific configuration.
    User,
    /// Current working directory configuration.
    Cwd,
    /// Explicit runtime config paths.
    Runtime,
    /// Environment variable overrides.
    Env,
    /// Command-line overrides (highest precedence).
    Cli,
}

/// Metadata about a loaded config layer.
#[derive(Debug, Clone)]
pub struct ConfigLayer {
    /// Layer origin.
    pub source: ConfigLayerSource,
    /// Location on disk if the layer came from a file.
    pub path: Option<PathBuf>,
}

/// Options controlling layered config discovery and overrides.
#[derive(Debug, Clone)]
pub struct LayeredConfigOptions {
    /// Working directory searched for `docbench.json5`.
    pub cwd: PathBuf,
    /// Optional user config path (defaults to `~/.docbench/docbench.json5`).
    pub user_config_path: Option<PathBuf>,
    /// Runtime override config paths applied after file layers.
    pub runtime_paths: Vec<PathBuf>,
    /// Environment overrides as `(name, value)` pairs.
    pub env: Vec<(String, String)>,
    /// Command-line overrides, merged last.
    cli: Value,
}

impl LayeredConfigOptions {
    /// Create options with default layer locations for the provided cwd,
    /// capturing the recognized environment overrides.
    pub fn new(cwd: impl AsRef<Path>) -> Self {
        let env = [ENV_STORE_URI, ENV_PORT]
            .iter()
            .filter_map(|key| std::env::var(key).ok().map(|value| (key.to_string(), value)))
            .collect();
        Self {
            cwd: cwd.as_ref().to_path_buf(),
            user_config_path: layer_io::default_user_config_path(),
            runtime_paths: Vec::new(),
            env,
            cli: Value::Object(serde_json::Map::new()),
        }
    }

    /// Add a runtime override config path.
    pub fn with_runtime_path(mut self, path: impl AsRef<Path>) -> Self {
        self.runtime_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Replace the environment overrides.
    pub fn with_env(mut self, env: Vec<(String, String)>) -> Self {
        self.env = env;
        self
    }

    /// Override `store.uri` from the command line.
    pub fn with_store_uri(self, uri: impl Into<String>) -> Self {
        self.with_cli(json!({ "store": { "uri": uri.into() } }))
    }

    /// Override `server.port` from the command line.
    pub fn with_port(self, port: u16) -> Self {
        self.with_cli(json!({ "server": { "port": port } }))
    }

    /// Override `seed.count` from the command line.
    pub fn with_seed_count(self, count: usize) -> Self {
        self.with_cli(json!({ "seed": { "count": count } }))
    }

    fn with_cli(mut self, overlay: Value) -> Self {
        merge::merge_json_values(&mut self.cli, &overlay);
        self
    }
}

impl DocbenchConfig {
    /// Load a single config from a path (no layering).
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        info!("loading config from path: {}", path.as_ref().display());
        let contents = fs::read_to_string(path)?;
        let value: Value = json5::from_str(&contents)?;
        config_from_value(value, "config")
    }

    /// Load a single config from JSON5 contents (no layering).
    pub fn load_from_str(contents: &str) -> Result<Self, ConfigError> {
        debug!("loading config from raw contents (len={})", contents.len());
        let value: Value = json5::from_str(contents)?;
        config_from_value(value, "config")
    }

    /// Load a layered config stack using the default layer locations.
    pub fn load_layered(cwd: impl AsRef<Path>) -> Result<LayeredConfig, ConfigError> {
        info!(
            "loading layered config with defaults (cwd={})",
            cwd.as_ref().display()
        );
        Self::load_layered_with_options(LayeredConfigOptions::new(cwd))
    }

    /// Load a layered config stack using explicit layer locations.
    ///
    /// Layer precedence (low -> high): user, cwd, runtime paths, environment,
    /// command line. Invariants are checked once, on the merged result.
    pub fn load_layered_with_options(
        options: LayeredConfigOptions,
    ) -> Result<LayeredConfig, ConfigError> {
        let cwd = utils::normalize_path(&options.cwd)?;
        debug!("normalized cwd for config load: {}", cwd.display());
        let mut layers = Vec::new();
        let mut merge_layers = Vec::new();
        let mut seen_paths = HashSet::new();

        let file_layers = [
            (ConfigLayerSource::User, options.user_config_path.clone()),
            (ConfigLayerSource::Cwd, Some(cwd.join(DEFAULT_CONFIG_FILE))),
        ];
        for (source, path) in file_layers {
            let Some(path) = path else {
                continue;
            };
            if !seen_paths.insert(utils::unique_path(&path)) {
                debug!(
                    "skipping duplicate layer (source={:?}, path={})",
                    source,
                    path.display()
                );
                continue;
            }
            if let Some(layer) = layer_io::load_optional_layer(source, &path)? {
                layers.push(layer.meta.clone());
                merge_layers.push(layer);
            }
        }

        for runtime_path in &options.runtime_paths {
            let loaded = layer_io::load_required_layer(ConfigLayerSource::Runtime, runtime_path)?;
            debug!("loaded runtime layer (path={})", runtime_path.display());
            layers.push(loaded.meta.clone());
            merge_layers.push(loaded);
        }

        if let Some(env_layer) = env_layer(&options.env)? {
            debug!("applying environment overrides (count={})", options.env.len());
            layers.push(env_layer.meta.clone());
            merge_layers.push(env_layer);
        }

        if options.cli.as_object().is_some_and(|map| !map.is_empty()) {
            schema::validate_layer_schema(&options.cli, "cli")?;
            debug!("applying command-line overrides");
            let cli_layer = LoadedLayer {
                meta: ConfigLayer {
                    source: ConfigLayerSource::Cli,
                    path: None,
                },
                value: options.cli,
            };
            layers.push(cli_layer.meta.clone());
            merge_layers.push(cli_layer);
        }

        let mut merged = Value::Object(serde_json::Map::new());
        for layer in merge_layers {
            merge::merge_json_values(&mut merged, &layer.value);
        }

        let config = config_from_value(merged, "effective")?;
        info!("layered config loaded (layers={})", layers.len());
        Ok(LayeredConfig { config, layers })
    }

    /// Validate configuration invariants that cannot be expressed in serde.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.uri.trim().is_empty() {
            return Err(ConfigError::Invalid("store.uri must not be empty".to_string()));
        }
        if self.server.insert_batch_size == 0 {
            return Err(ConfigError::Invalid(
                "server.insert_batch_size must be positive".to_string(),
            ));
        }
        if self.server.default_limit == 0 {
            return Err(ConfigError::Invalid(
                "server.default_limit must be positive".to_string(),
            ));
        }
        if self.seed.count == 0 {
            return Err(ConfigError::Invalid("seed.count must be positive".to_string()));
        }
        Ok(())
    }
}

/// Internal representation of a loaded config layer.
#[derive(Debug, Clone)]
struct LoadedLayer {
    meta: ConfigLayer,
    value: Value,
}

fn config_from_value(value: Value, label: &str) -> Result<DocbenchConfig, ConfigError> {
    schema::validate_layer_schema(&value, label)?;
    let config: DocbenchConfig = serde_json::from_value(value)?;
    config.validate()?;
    Ok(config)
}

/// Translate recognized environment variables into a partial config layer.
fn env_layer(env: &[(String, String)]) -> Result<Option<LoadedLayer>, ConfigError> {
    let mut value = Value::Object(serde_json::Map::new());
    for (key, raw) in env {
        let overlay = match key.as_str() {
            ENV_STORE_URI => json!({ "store": { "uri": raw } }),
            ENV_PORT => {
                let port: u16 = raw.trim().parse().map_err(|_| ConfigError::InvalidField {
                    path: format!("env:{ENV_PORT}"),
                    message: format!("expected port number, got {raw:?}"),
                })?;
                json!({ "server": { "port": port } })
            }
            _ => continue,
        };
        merge::merge_json_values(&mut value, &overlay);
    }
    if value.as_object().is_some_and(|map| map.is_empty()) {
        return Ok(None);
    }
    Ok(Some(LoadedLayer {
        meta: ConfigLayer {
            source: ConfigLayerSource::Env,
            path: None,
        },
        value,
    }))
}
