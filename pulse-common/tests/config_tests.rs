//! Environment-sensitive configuration resolution tests
//!
//! These mutate process environment variables, so they are serialized.

use pulse_common::config::{
    resolve_data_dir, resolve_gemini_api_key, resolve_port, TomlConfig, DATA_DIR_ENV,
    DEFAULT_PORT, GEMINI_API_KEY_ENV, PORT_ENV,
};
use serial_test::serial;
use std::path::PathBuf;

fn clear_env() {
    std::env::remove_var(DATA_DIR_ENV);
    std::env::remove_var(PORT_ENV);
    std::env::remove_var(GEMINI_API_KEY_ENV);
}

#[test]
#[serial]
fn test_env_data_dir_beats_toml() {
    clear_env();
    std::env::set_var(DATA_DIR_ENV, "/from/env");

    let toml_config = TomlConfig {
        data_dir: Some("/from/toml".to_string()),
        ..Default::default()
    };
    assert_eq!(resolve_data_dir(None, &toml_config), PathBuf::from("/from/env"));

    clear_env();
    assert_eq!(resolve_data_dir(None, &toml_config), PathBuf::from("/from/toml"));
}

#[test]
#[serial]
fn test_port_resolution_order() {
    clear_env();
    std::env::set_var(PORT_ENV, "6200");

    let toml_config = TomlConfig {
        port: Some(6300),
        ..Default::default()
    };
    assert_eq!(resolve_port(None, &toml_config), 6200);
    assert_eq!(resolve_port(Some(6100), &toml_config), 6100);

    clear_env();
    assert_eq!(resolve_port(None, &toml_config), 6300);
    assert_eq!(resolve_port(None, &TomlConfig::default()), DEFAULT_PORT);
}

#[test]
#[serial]
fn test_non_numeric_port_env_is_ignored() {
    clear_env();
    std::env::set_var(PORT_ENV, "not-a-port");

    assert_eq!(resolve_port(None, &TomlConfig::default()), DEFAULT_PORT);
    clear_env();
}

#[test]
#[serial]
fn test_api_key_env_beats_toml() {
    clear_env();
    std::env::set_var(GEMINI_API_KEY_ENV, "env-key");

    let toml_config = TomlConfig {
        gemini_api_key: Some("toml-key".to_string()),
        ..Default::default()
    };
    assert_eq!(resolve_gemini_api_key(&toml_config).unwrap(), "env-key");

    clear_env();
    assert_eq!(resolve_gemini_api_key(&toml_config).unwrap(), "toml-key");
}

#[test]
#[serial]
fn test_missing_api_key_is_config_error() {
    clear_env();

    let err = resolve_gemini_api_key(&TomlConfig::default()).unwrap_err();
    let message = err.to_string();
    assert!(message.contains(GEMINI_API_KEY_ENV));
    assert!(message.contains("gemini_api_key"));
}

#[test]
#[serial]
fn test_whitespace_api_key_is_rejected() {
    clear_env();
    std::env::set_var(GEMINI_API_KEY_ENV, "   ");

    assert!(resolve_gemini_api_key(&TomlConfig::default()).is_err());
    clear_env();
}
