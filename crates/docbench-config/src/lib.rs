//! Configuration models and layered config loading.
//!
//! This crate owns the docbench config schema, validation, and the
//! layer-merging logic shared by the `serve` and `seed` commands.

mod error;
mod loader;
mod model;

/// Public error type returned by config loading and validation APIs.
pub use error::ConfigError;
/// Layered config types and loader options.
pub use loader::{
    ConfigLayer, ConfigLayerSource, ENV_PORT, ENV_STORE_URI, LayeredConfig,
    LayeredConfigOptions,
};
/// Configuration schema models.
pub use model::*;
