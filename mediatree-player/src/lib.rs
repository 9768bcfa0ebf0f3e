//! # Mediatree Player
//!
//! The client-resident half of mediatree, without any GUI: the playback
//! state machine and its controller, resume positions, playlist
//! sequencing, guarded browse/search against the server, and the session
//! object that owns them.
//!
//! Rendering layers drive a [`Session`] with user commands and element
//! callbacks and subscribe to [`ControlsView`] changes; they never mutate
//! playback state directly.

pub mod domains;
pub mod error;
pub mod infra;
pub mod session;

pub use domains::library::{LibraryDomain, LibraryState, RequestOutcome};
pub use domains::player::{
    ControlsView, ElementEvent, MediaSource, Phase, PlaybackController,
    PlaybackElement, PlaybackState,
};
pub use domains::playlist::{PlaylistContext, PlaylistSequencer};
pub use domains::progress::{
    FileProgressStore, MemoryProgressStore, ProgressRecord, ProgressStore,
};
pub use error::{PlayerError, PlayerResult};
pub use infra::{api_client::ApiClient, services::ApiService};
pub use session::Session;
