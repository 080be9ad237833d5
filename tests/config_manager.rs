//! End-to-end configuration loading scenarios.

use loadgate::config::{ConfigError, ConfigManager, MapEnv, Violation};

mod common;

use common::Workspace;

#[test]
fn test_environment_drives_effective_config() {
    let ws = Workspace::new();
    ws.write_settings("# present so no prompt is shown\n");
    let env = MapEnv::new()
        .with("PORT", "8080")
        .with("HOST", "127.0.0.1")
        .with("AUTH_KEY", "secret")
        .with("MAX_CONCURRENT_REQUESTS", "50");

    let manager = ConfigManager::new(ws.sources(env, "")).expect("config should load");

    let server = manager.effective_server_config();
    assert_eq!(server.host, "127.0.0.1");
    assert_eq!(server.port, 8080);
    assert_eq!(manager.performance_config().max_concurrent_requests, 50);
    assert!(manager.reload_config().is_ok());
}

#[test]
fn test_declined_bootstrap_uses_defaults() {
    let ws = Workspace::new();

    let manager = ConfigManager::new(ws.sources(MapEnv::new(), "n\n")).expect("defaults are valid");

    assert!(!ws.settings_path().exists());
    let server = manager.effective_server_config();
    assert_eq!(server.port, 3001);
    assert_eq!(server.host, "0.0.0.0");
    assert_eq!(manager.auth_config().key, "sk-123456");
}

#[test]
fn test_declined_bootstrap_keeps_existing_env() {
    let ws = Workspace::new();
    let env = MapEnv::new().with("AUTH_KEY", "from-env");

    let manager = ConfigManager::new(ws.sources(env, "no\n")).unwrap();

    assert_eq!(manager.auth_config().key, "from-env");
}

#[test]
fn test_accepted_bootstrap_writes_and_loads_file() {
    let ws = Workspace::new();

    let input = "y\n4000\n127.0.0.1\nkey-1\n";
    let manager = ConfigManager::new(ws.sources(MapEnv::new(), input)).unwrap();

    assert!(ws.settings_path().exists());
    let server = manager.effective_server_config();
    assert_eq!(server.port, 4000);
    assert_eq!(server.host, "127.0.0.1");
    assert_eq!(manager.auth_config().key, "key-1");
    // The template turns file logging on.
    assert!(manager.log_config().enable_file);
    assert!(manager.cors_config().enabled);
    assert!(manager.redis_dsn().is_empty());
}

#[test]
fn test_settings_file_without_auth_key_fails() {
    let ws = Workspace::new();
    ws.write_settings("PORT=3001\nHOST=0.0.0.0\n");

    let err = match ConfigManager::new(ws.sources(MapEnv::new(), "")) {
        Ok(_) => panic!("missing AUTH_KEY must be rejected"),
        Err(e) => e,
    };

    assert!(err.to_string().contains("AUTH_KEY"));
    let ConfigError::Validation(validation) = err;
    assert_eq!(validation.violations(), &[Violation::MissingAuthKey]);
}

#[test]
fn test_violations_are_joined() {
    let ws = Workspace::new();
    ws.write_settings("AUTH_KEY=\nMAX_CONCURRENT_REQUESTS=0\n");

    let err = ConfigManager::new(ws.sources(MapEnv::new(), ""))
        .err()
        .expect("two violations");

    assert_eq!(
        err.to_string(),
        "configuration validation failed: \
         max concurrent requests cannot be less than 1; AUTH_KEY is required and cannot be empty"
    );
}

#[test]
fn test_out_of_range_port_is_rejected() {
    let ws = Workspace::new();
    ws.write_settings("AUTH_KEY=secret\nPORT=70000\n");

    let err = ConfigManager::new(ws.sources(MapEnv::new(), "")).err().unwrap();

    assert!(err.to_string().contains("port must be between 1-65535"));
}

#[test]
fn test_short_graceful_timeout_is_raised() {
    let ws = Workspace::new();
    ws.write_settings("AUTH_KEY=secret\nSERVER_GRACEFUL_SHUTDOWN_TIMEOUT=3\n");

    let manager = ConfigManager::new(ws.sources(MapEnv::new(), "")).unwrap();

    assert_eq!(manager.server_config().graceful_shutdown_timeout_secs, 10);
}

#[test]
fn test_env_wins_over_settings_file() {
    let ws = Workspace::new();
    ws.write_settings("AUTH_KEY=from-file\nIS_SLAVE=true\nLOG_LEVEL=debug\n");
    let env = MapEnv::new().with("AUTH_KEY", "from-env");

    let manager = ConfigManager::new(ws.sources(env, "")).unwrap();

    assert_eq!(manager.auth_config().key, "from-env");
    assert!(!manager.is_master());
    assert_eq!(manager.log_config().level, "debug");
    assert_eq!(manager.database_config().dsn, "./data/loadgate.db");
}

#[test]
fn test_reload_sees_auth_key_removed_from_file() {
    let ws = Workspace::new();
    ws.write_settings("AUTH_KEY=secret\n");
    let manager = ConfigManager::new(ws.sources(MapEnv::new(), "")).unwrap();

    ws.write_settings("PORT=4000\n");
    let err = manager.reload_config().unwrap_err();

    assert!(err.to_string().contains("AUTH_KEY"));
    assert_eq!(manager.auth_config().key, "secret");
    assert_eq!(manager.server_config().port, 3001);
}
