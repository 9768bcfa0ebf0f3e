//! Configuration library for mediatree.
//!
//! Settings come from CLI overrides, the environment (with `.env` support),
//! an optional TOML file and built-in defaults, in that order of precedence.
//! Guard rails run after merging so the server never starts with an unusable
//! media root.

pub mod loader;
pub mod models;
pub mod sources;
pub mod util;
pub mod validation;

pub use loader::{
    ConfigLoad, ConfigLoadError, ConfigLoader, ConfigLoaderOptions,
    ConfigOverrides,
};
pub use models::{
    Config, ConfigMetadata, CorsConfig, MediaConfig, SearchConfig,
    ServerConfig, StorageConfig,
};
pub use validation::{ConfigGuardRailError, ConfigWarning, ConfigWarnings};
