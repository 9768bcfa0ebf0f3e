use std::path::PathBuf;

use mediatree_config::loader::read_file_config;
use mediatree_config::sources::EnvConfig;
use mediatree_config::{
    ConfigGuardRailError, ConfigLoadError, ConfigLoader, ConfigOverrides,
};
use tempfile::TempDir;

fn write_toml(dir: &TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("mediatree.toml");
    std::fs::write(&path, body).unwrap();
    path
}

#[test]
fn defaults_apply_when_only_media_root_is_set() {
    let media = TempDir::new().unwrap();
    let env = EnvConfig {
        media_root: Some(media.path().to_path_buf()),
        ..EnvConfig::default()
    };

    let load = ConfigLoader::new().compose(None, env, None, false).unwrap();
    let config = load.config;

    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.search.max_term_length, 256);
    assert_eq!(config.storage.data_dir, PathBuf::from("./data"));
    assert!(config.media.video_extensions.iter().any(|e| e == "mkv"));
    assert_eq!(config.media.root, std::fs::canonicalize(media.path()).unwrap());
    assert!(!load.warnings.is_empty(), "missing toml is reported");
}

#[test]
fn cli_beats_env_beats_file() {
    let media = TempDir::new().unwrap();
    let cfg_dir = TempDir::new().unwrap();
    let path = write_toml(
        &cfg_dir,
        &format!(
            r#"
            [server]
            host = "10.0.0.1"
            port = 4000

            [media]
            root = '{}'
            video_extensions = ["mkv"]

            [search]
            max_term_length = 32
            "#,
            media.path().display()
        ),
    );
    let file = read_file_config(&path).unwrap();

    let env = EnvConfig {
        server_port: Some(5000),
        ..EnvConfig::default()
    };
    let loader = ConfigLoader::new().with_overrides(ConfigOverrides {
        host: Some("127.0.0.1".to_string()),
        ..ConfigOverrides::default()
    });

    let config = loader
        .compose(Some(file), env, Some(path.clone()), false)
        .unwrap()
        .config;

    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 5000);
    assert_eq!(config.media.video_extensions, vec!["mkv".to_string()]);
    assert_eq!(config.search.max_term_length, 32);
    assert_eq!(config.metadata.config_path, Some(path));
}

#[test]
fn missing_media_root_is_a_hard_error() {
    let err = ConfigLoader::new()
        .compose(None, EnvConfig::default(), None, false)
        .unwrap_err();
    assert!(matches!(
        err,
        ConfigLoadError::GuardRail(ConfigGuardRailError::MissingMediaRoot)
    ));

    let env = EnvConfig {
        media_root: Some(PathBuf::from("/definitely/not/here")),
        ..EnvConfig::default()
    };
    let err = ConfigLoader::new().compose(None, env, None, false).unwrap_err();
    assert!(matches!(
        err,
        ConfigLoadError::GuardRail(ConfigGuardRailError::InvalidMediaRoot { .. })
    ));
}

#[test]
fn empty_extension_list_is_rejected() {
    let media = TempDir::new().unwrap();
    let env = EnvConfig {
        media_root: Some(media.path().to_path_buf()),
        video_extensions: Some(Vec::new()),
        ..EnvConfig::default()
    };
    let err = ConfigLoader::new().compose(None, env, None, false).unwrap_err();
    assert!(matches!(
        err,
        ConfigLoadError::GuardRail(ConfigGuardRailError::EmptyVideoExtensions)
    ));
}

#[test]
fn wildcard_cors_outside_dev_mode_warns() {
    let media = TempDir::new().unwrap();
    let env = EnvConfig {
        media_root: Some(media.path().to_path_buf()),
        cors_allowed_origins: Some(vec!["*".to_string()]),
        ..EnvConfig::default()
    };
    let load = ConfigLoader::new().compose(None, env, None, false).unwrap();
    assert!(
        load.warnings
            .items
            .iter()
            .any(|w| w.message.contains("CORS wildcard"))
    );
}

#[test]
fn explicit_missing_config_file_fails() {
    let err = ConfigLoader::new()
        .with_config_path("/nowhere/mediatree.toml")
        .with_env_file("/nowhere/.env")
        .load()
        .unwrap_err();
    assert!(matches!(err, ConfigLoadError::MissingConfig { .. }));
}
