use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::util::{non_empty_var, parse_bool_var, parse_csv_var};

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FileConfig {
    #[serde(default)]
    pub server: FileServerConfig,
    #[serde(default)]
    pub media: FileMediaConfig,
    #[serde(default)]
    pub search: FileSearchConfig,
    #[serde(default)]
    pub storage: FileStorageConfig,
    #[serde(default)]
    pub cors: FileCorsConfig,
    pub dev_mode: Option<bool>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileServerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileMediaConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_extensions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub mime_types: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hidden_names: Vec<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileSearchConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_term_length: Option<usize>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileStorageConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileCorsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_origins: Option<Vec<String>>,
}

/// Environment-derived configuration values.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub server_host: Option<String>,
    pub server_port: Option<u16>,
    pub media_root: Option<PathBuf>,
    pub video_extensions: Option<Vec<String>>,
    pub search_max_term_length: Option<usize>,
    pub data_dir: Option<PathBuf>,
    pub cors_allowed_origins: Option<Vec<String>>,
    pub dev_mode: Option<bool>,
}

impl EnvConfig {
    pub fn gather() -> Self {
        Self {
            config_path: non_empty_var("MEDIATREE_CONFIG").map(PathBuf::from),
            server_host: non_empty_var("SERVER_HOST"),
            server_port: std::env::var("SERVER_PORT")
                .ok()
                .and_then(|s| s.trim().parse().ok()),
            media_root: non_empty_var("MEDIA_ROOT").map(PathBuf::from),
            video_extensions: parse_csv_var("VIDEO_EXTENSIONS"),
            search_max_term_length: std::env::var("SEARCH_MAX_TERM_LENGTH")
                .ok()
                .and_then(|s| s.trim().parse().ok()),
            data_dir: non_empty_var("DATA_DIR").map(PathBuf::from),
            cors_allowed_origins: parse_csv_var("CORS_ALLOWED_ORIGINS"),
            dev_mode: parse_bool_var("DEV_MODE"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_toml() {
        let file: FileConfig = toml::from_str(
            r#"
            dev_mode = true

            [server]
            port = 8080

            [media]
            root = "/srv/media"
            video_extensions = ["mp4", "ts"]
            hidden_names = ["lost+found"]

            [media.mime_types]
            ts = "video/mp2t"
            "#,
        )
        .unwrap();

        assert_eq!(file.server.port, Some(8080));
        assert_eq!(file.server.host, None);
        assert_eq!(file.media.root, Some(PathBuf::from("/srv/media")));
        assert_eq!(file.media.mime_types.get("ts").map(String::as_str), Some("video/mp2t"));
        assert_eq!(file.dev_mode, Some(true));
        assert!(file.storage.data_dir.is_none());
    }
}
