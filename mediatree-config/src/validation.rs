use std::path::PathBuf;

use thiserror::Error;

use crate::models::Config;

#[derive(Debug, Error)]
pub enum ConfigGuardRailError {
    #[error("MEDIA_ROOT is not configured")]
    MissingMediaRoot,
    #[error("media root {path} is unusable: {reason}")]
    InvalidMediaRoot { path: PathBuf, reason: String },
    #[error("no video extensions configured")]
    EmptyVideoExtensions,
    #[error("search.max_term_length must be greater than zero")]
    InvalidSearchLimit,
}

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn extend(&mut self, other: ConfigWarnings) {
        self.items.extend(other.items);
    }

    /// Emits every warning through `tracing`.
    pub fn log(&self) {
        for warning in &self.items {
            match &warning.hint {
                Some(hint) => {
                    tracing::warn!(hint = %hint, "{}", warning.message)
                }
                None => tracing::warn!("{}", warning.message),
            }
        }
    }
}

/// Canonicalises the media root and checks the remaining hard limits.
pub fn apply_guard_rails(
    config: &mut Config,
) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let mut warnings = ConfigWarnings::default();

    if config.media.root.as_os_str().is_empty() {
        return Err(ConfigGuardRailError::MissingMediaRoot);
    }

    let canonical = std::fs::canonicalize(&config.media.root).map_err(|err| {
        ConfigGuardRailError::InvalidMediaRoot {
            path: config.media.root.clone(),
            reason: err.to_string(),
        }
    })?;
    if !canonical.is_dir() {
        return Err(ConfigGuardRailError::InvalidMediaRoot {
            path: canonical,
            reason: "not a directory".to_string(),
        });
    }
    config.media.root = canonical;

    if config.media.video_extensions.is_empty() {
        return Err(ConfigGuardRailError::EmptyVideoExtensions);
    }

    if config.search.max_term_length == 0 {
        return Err(ConfigGuardRailError::InvalidSearchLimit);
    }

    if !config.dev_mode && config.cors.is_wildcard_included() {
        warnings.push_with_hint(
            "CORS wildcard origin configured outside dev mode",
            "List explicit origins in CORS_ALLOWED_ORIGINS or set DEV_MODE=true",
        );
    }

    let data_inside_root = std::path::absolute(&config.storage.data_dir)
        .map(|dir| dir.starts_with(&config.media.root))
        .unwrap_or(false);
    if data_inside_root {
        warnings.push_with_hint(
            "data directory lives inside the media root and will show up in listings",
            "Point DATA_DIR outside MEDIA_ROOT",
        );
    }

    Ok(warnings)
}
