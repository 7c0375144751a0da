//! Tests for layered configuration loading.

use super::*;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Write JSON5 contents to a path, creating parent directories if needed.
fn write_json5(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("dir");
    }
    fs::write(path, contents).expect("write");
}

/// Options rooted at `cwd` with no user layer and no environment.
fn isolated_options(cwd: &Path) -> LayeredConfigOptions {
    let mut options = LayeredConfigOptions::new(cwd).with_env(Vec::new());
    options.user_config_path = None;
    options
}

/// Verify that an empty config parses with defaults.
#[test]
fn parse_minimal_config() {
    let config = DocbenchConfig::load_from_str("{}").expect("config");
    assert_eq!(config, DocbenchConfig::default());
    assert_eq!(config.store.uri, "memory://");
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.server.insert_batch_size, 1000);
    assert_eq!(config.server.default_limit, 100);
    assert_eq!(config.seed.count, 10_000);
}

#[test]
fn parse_full_config() {
    let json5 = r#"{
        // comments are allowed
        store: { uri: "sqlite://bench.db", database: "teste", collection: "insercoes" },
        server: { host: "127.0.0.1", port: 8080, insert_batch_size: 50, default_limit: 10 },
        seed: { count: 25 },
    }"#;
    let config = DocbenchConfig::load_from_str(json5).expect("config");
    assert_eq!(config.store.collection, "insercoes");
    assert_eq!(config.server.bind_addr(), "127.0.0.1:8080");
    assert_eq!(config.server.insert_batch_size, 50);
    assert_eq!(config.seed.count, 25);
}

/// Reject unexpected top-level config keys.
#[test]
fn rejects_unknown_top_level_key() {
    let err = DocbenchConfig::load_from_str(r#"{ unexpected: true }"#).unwrap_err();
    assert!(format!("{err}").contains("unknown key"));
}

#[test]
fn rejects_wrong_types() {
    let err = DocbenchConfig::load_from_str(r#"{ server: { port: "eighty" } }"#).unwrap_err();
    assert!(format!("{err}").contains("server.port"));

    let err = DocbenchConfig::load_from_str(r#"{ server: { port: 70000 } }"#).unwrap_err();
    assert!(format!("{err}").contains("expected port number"));

    let err = DocbenchConfig::load_from_str(r#"{ seed: { count: -1 } }"#).unwrap_err();
    assert!(format!("{err}").contains("seed.count"));
}

#[test]
fn rejects_collection_that_is_not_an_identifier() {
    let err = DocbenchConfig::load_from_str(r#"{ store: { collection: "drop table; --" } }"#)
        .unwrap_err();
    assert!(format!("{err}").contains("store.collection"));
}

#[test]
fn validate_rejects_zero_sizes() {
    let err = DocbenchConfig::load_from_str(r#"{ server: { insert_batch_size: 0 } }"#)
        .unwrap_err();
    assert!(format!("{err}").contains("insert_batch_size"));

    let err = DocbenchConfig::load_from_str(r#"{ server: { default_limit: 0 } }"#).unwrap_err();
    assert!(format!("{err}").contains("default_limit"));

    let err = DocbenchConfig::load_from_str(r#"{ store: { uri: "  " } }"#).unwrap_err();
    assert!(format!("{err}").contains("store.uri"));
}

#[test]
fn load_from_path_reads_file() {
    let temp = TempDir::new().expect("tmp");
    let path = temp.path().join("custom.json5");
    write_json5(&path, "{ seed: { count: 7 } }");
    let config = DocbenchConfig::load_from_path(&path).expect("config");
    assert_eq!(config.seed.count, 7);
}

/// Missing layers fall back to defaults.
#[test]
fn layered_config_without_files_uses_defaults() {
    let temp = TempDir::new().expect("tmp");
    let layered =
        DocbenchConfig::load_layered_with_options(isolated_options(temp.path())).expect("layered");
    assert_eq!(layered.config, DocbenchConfig::default());
    assert!(layered.layers.is_empty());
}

/// Later layers override earlier ones key by key.
#[test]
fn layered_config_precedence() {
    let temp = TempDir::new().expect("tmp");
    let root = temp.path();
    let cwd = root.join("work");
    fs::create_dir_all(&cwd).expect("cwd");

    let user_config = root.join("home").join(".docbench").join("docbench.json5");
    write_json5(
        &user_config,
        r#"{ store: { uri: "file:///tmp/user", database: "userdb" }, seed: { count: 5 } }"#,
    );
    write_json5(
        &cwd.join(DEFAULT_CONFIG_FILE),
        r#"{ store: { uri: "sqlite://cwd.db" }, server: { port: 4000 } }"#,
    );
    let runtime = root.join("runtime.json5");
    write_json5(&runtime, r#"{ server: { port: 5000 } }"#);

    let mut options = isolated_options(&cwd).with_runtime_path(&runtime);
    options.user_config_path = Some(user_config);

    let layered = DocbenchConfig::load_layered_with_options(options).expect("layered");
    let sources: Vec<_> = layered.layers.iter().map(|layer| layer.source).collect();
    assert_eq!(
        sources,
        vec![
            ConfigLayerSource::User,
            ConfigLayerSource::Cwd,
            ConfigLayerSource::Runtime
        ]
    );
    assert_eq!(layered.config.store.uri, "sqlite://cwd.db");
    assert_eq!(layered.config.store.database, "userdb");
    assert_eq!(layered.config.server.port, 5000);
    assert_eq!(layered.config.seed.count, 5);
}

#[test]
fn environment_overrides_win() {
    let temp = TempDir::new().expect("tmp");
    write_json5(
        &temp.path().join(DEFAULT_CONFIG_FILE),
        r#"{ store: { uri: "sqlite://cwd.db" }, server: { port: 4000 } }"#,
    );
    let options = isolated_options(temp.path()).with_env(vec![
        (ENV_STORE_URI.to_string(), "memory://".to_string()),
        (ENV_PORT.to_string(), "9090".to_string()),
    ]);

    let layered = DocbenchConfig::load_layered_with_options(options).expect("layered");
    assert_eq!(layered.config.store.uri, "memory://");
    assert_eq!(layered.config.server.port, 9090);
    assert_eq!(
        layered.layers.last().map(|layer| layer.source),
        Some(ConfigLayerSource::Env)
    );
}

#[test]
fn command_line_overrides_beat_environment_and_validate_once() {
    let temp = TempDir::new().expect("tmp");
    write_json5(
        &temp.path().join(DEFAULT_CONFIG_FILE),
        r#"{ store: { uri: "" }, seed: { count: 7 } }"#,
    );
    let options = isolated_options(temp.path())
        .with_env(vec![(ENV_PORT.to_string(), "9090".to_string())])
        .with_store_uri("memory://")
        .with_port(7070);

    let layered = DocbenchConfig::load_layered_with_options(options).expect("layered");
    assert_eq!(layered.config.store.uri, "memory://");
    assert_eq!(layered.config.server.port, 7070);
    assert_eq!(layered.config.seed.count, 7);
    assert_eq!(
        layered.layers.last().map(|layer| layer.source),
        Some(ConfigLayerSource::Cli)
    );
}

#[test]
fn zero_seed_count_from_command_line_is_rejected() {
    let temp = TempDir::new().expect("tmp");
    let options = isolated_options(temp.path()).with_seed_count(0);
    let err = DocbenchConfig::load_layered_with_options(options).unwrap_err();
    assert!(format!("{err}").contains("seed.count"), "{err}");
}

#[test]
fn invalid_port_in_environment_is_rejected() {
    let temp = TempDir::new().expect("tmp");
    let options = isolated_options(temp.path())
        .with_env(vec![(ENV_PORT.to_string(), "not-a-port".to_string())]);
    let err = DocbenchConfig::load_layered_with_options(options).unwrap_err();
    assert!(format!("{err}").contains(ENV_PORT));
}

#[test]
fn missing_runtime_layer_is_an_error() {
    let temp = TempDir::new().expect("tmp");
    let options = isolated_options(temp.path()).with_runtime_path(temp.path().join("nope.json5"));
    let err = DocbenchConfig::load_layered_with_options(options).unwrap_err();
    assert!(matches!(err, ConfigError::ReadFailed(_)));
}

#[test]
fn invalid_layer_reports_its_label() {
    let temp = TempDir::new().expect("tmp");
    write_json5(&temp.path().join(DEFAULT_CONFIG_FILE), r#"{ seed: { rows: 1 } }"#);
    let err = DocbenchConfig::load_layered_with_options(isolated_options(temp.path()))
        .unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("cwd("));
    assert!(msg.contains("seed.rows"));
}
