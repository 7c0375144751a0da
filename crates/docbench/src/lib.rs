//! docbench: bulk-insert and HTTP demos over a document store.
//!
//! This crate re-exports the building blocks and provides the one-shot seed
//! flow plus config resolution shared by the `docbench` binary.

/// Re-export for convenience.
pub use docbench_config as config;
/// Re-export for convenience.
pub use docbench_server as server;
/// Re-export for convenience.
pub use docbench_store as store;

use docbench_config::{DocbenchConfig, LayeredConfigOptions};
use docbench_store::{RecordStore, StoreError, generate_records};
use log::{error, info};
use std::path::{Path, PathBuf};

/// Initialize logging with env_logger, honoring `RUST_LOG`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp_millis()
        .parse_default_env()
        .try_init();
}

/// Command-line overrides applied on top of the layered config.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Explicit config file applied after the discovered layers.
    pub config_path: Option<PathBuf>,
    /// Store connection string.
    pub uri: Option<String>,
    /// Listener port.
    pub port: Option<u16>,
    /// Number of records the seed command inserts.
    pub seed_count: Option<usize>,
}

/// Resolve the effective config for `cwd` plus CLI overrides.
pub fn resolve_config(
    cwd: impl AsRef<Path>,
    overrides: &ConfigOverrides,
) -> Result<DocbenchConfig, docbench_config::ConfigError> {
    let mut options = LayeredConfigOptions::new(cwd);
    if let Some(path) = overrides.config_path.as_ref() {
        options = options.with_runtime_path(path);
    }
    resolve_with_options(options, overrides)
}

/// Resolve config from explicit layer options plus CLI overrides.
///
/// Overrides form the last layer, so validation sees the final values.
pub fn resolve_with_options(
    mut options: LayeredConfigOptions,
    overrides: &ConfigOverrides,
) -> Result<DocbenchConfig, docbench_config::ConfigError> {
    if let Some(uri) = overrides.uri.as_ref() {
        options = options.with_store_uri(uri.as_str());
    }
    if let Some(port) = overrides.port {
        options = options.with_port(port);
    }
    if let Some(count) = overrides.seed_count {
        options = options.with_seed_count(count);
    }
    Ok(DocbenchConfig::load_layered_with_options(options)?.config)
}

/// Insert `count` generated records in one bulk call.
///
/// The store is closed whether or not the insert succeeds.
pub async fn seed(store: &dyn RecordStore, count: usize) -> Result<usize, StoreError> {
    info!("inserting {count} records");
    let inserted = store.insert_many(generate_records(count)).await;
    match &inserted {
        Ok(inserted) => info!("{inserted} records inserted"),
        Err(err) => error!("bulk insert failed: {err}"),
    }
    let closed = store.close().await;
    match &closed {
        Ok(()) => info!("store connection closed"),
        Err(err) => error!("failed to close store connection: {err}"),
    }
    let inserted = inserted?;
    closed?;
    Ok(inserted)
}
