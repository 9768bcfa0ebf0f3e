macro_rules! v1_path {
    ($path:literal) => {
        concat!("/api/v1", $path)
    };
}

/// Unversioned liveness routes.
pub const PING: &str = "/ping";
pub const HEALTH: &str = "/health";

/// Versioned API route definitions shared by the server and the player
pub mod v1 {
    pub const ROOT: &str = "/api/v1";
    pub const VERSION: &str = "v1";

    pub const BROWSE: &str = v1_path!("/browse");
    pub const SEARCH: &str = v1_path!("/search");
    pub const VIDEO_INFO: &str = v1_path!("/video-info");
    pub const THUMBNAIL: &str = v1_path!("/thumbnail");

    pub mod media {
        /// Prefix clients prepend to a root-relative path.
        pub const PREFIX: &str = v1_path!("/media");
        pub const FILE: &str = v1_path!("/media/{*path}");
    }

    pub mod playlists {
        pub const COLLECTION: &str = v1_path!("/playlists");
        pub const ITEM: &str = v1_path!("/playlists/{id}");
    }

    pub mod favorites {
        pub const COLLECTION: &str = v1_path!("/favorites");
        pub const ITEM: &str = v1_path!("/favorites/{id}");
    }
}

/// Helper utilities for working with route templates
pub mod utils {
    /// Replace a single path parameter (e.g. `"{id}"`) with the provided value.
    pub fn replace_param(
        route: &str,
        param: &str,
        value: impl AsRef<str>,
    ) -> String {
        route.replace(param, value.as_ref())
    }
}
