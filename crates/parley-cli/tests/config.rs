use std::path::PathBuf;

use parley_cli::config::{ParleyConfig, load_config_from, parse_config, save_config_to};

#[test]
fn pre_versioned_config_gains_timeout() {
    let config = parse_config(r#"{ "proxy_url": "http://proxy.test/api/chat" }"#).unwrap();

    assert_eq!(config.config_version, 1);
    assert_eq!(config.proxy_url, "http://proxy.test/api/chat");
    assert_eq!(config.request_timeout_secs, 60);
    assert_eq!(config.data_dir, None);
}

#[test]
fn migration_keeps_existing_timeout() {
    let config = parse_config(
        r#"{ "config_version": 0, "proxy_url": "http://p", "request_timeout_secs": 5 }"#,
    )
    .unwrap();

    assert_eq!(config.request_timeout_secs, 5);
    assert_eq!(config.request_timeout().as_secs(), 5);
}

#[test]
fn current_version_parses_as_is() {
    let config = parse_config(
        r#"{
            "config_version": 1,
            "proxy_url": "http://p",
            "data_dir": "/srv/parley",
            "request_timeout_secs": 30
        }"#,
    )
    .unwrap();

    assert_eq!(config.data_dir, Some(PathBuf::from("/srv/parley")));
    assert_eq!(config.resolved_data_dir().unwrap(), PathBuf::from("/srv/parley"));
}

#[test]
fn newer_version_is_rejected() {
    let err = parse_config(r#"{ "config_version": 9, "proxy_url": "http://p" }"#).unwrap_err();
    assert!(err.to_string().contains("newer than this build supports"));
}

#[test]
fn non_object_is_rejected() {
    assert!(parse_config("[1, 2, 3]").is_err());
    assert!(parse_config("not json").is_err());
}

#[test]
fn missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_config_from(&dir.path().join("config.json")).unwrap();
    assert_eq!(config, ParleyConfig::default());
}

#[test]
fn save_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.json");

    let config = ParleyConfig {
        config_version: 0,
        proxy_url: "https://chat.example.com/api/chat".to_string(),
        data_dir: Some(dir.path().join("data")),
        request_timeout_secs: 15,
    };
    save_config_to(&path, &config).unwrap();

    assert!(!path.with_extension("json.tmp").exists());

    let loaded = load_config_from(&path).unwrap();
    assert_eq!(loaded.config_version, 1);
    assert_eq!(loaded.proxy_url, config.proxy_url);
    assert_eq!(loaded.data_dir, config.data_dir);
    assert_eq!(loaded.request_timeout_secs, 15);
}
