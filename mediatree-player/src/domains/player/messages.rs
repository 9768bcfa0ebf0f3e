use super::state::MediaSource;

/// Input to the playback reducer: user intents and element lifecycle
/// events, processed one at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerMessage {
    // Source lifecycle
    Load {
        source: MediaSource,
        autoplay: bool,
    },
    /// A saved position was found for the source being loaded.
    ResumeAt(f64),
    Close,

    // Playback requests
    RequestPlay,
    RequestPause,
    TogglePlayPause,

    // Seeking
    RequestSeek(f64),
    SeekRelative(f64),

    // Audio and presentation
    SetVolume(f64),
    AdjustVolume(f64),
    SetMuted(bool),
    ToggleMute,
    SetPlaybackRate(f64),
    SetFullscreen(bool),
    ToggleFullscreen,

    /// Something the element reported.
    Element(ElementEvent),
}

/// Lifecycle events confirmed by the playback element.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementEvent {
    MetadataLoaded { duration: f64 },
    CanPlayThrough,
    Playing,
    Paused,
    /// The element refused a play request (autoplay policy and friends).
    PlayRejected(String),
    TimeUpdate(f64),
    Seeked(f64),
    VolumeChanged { volume: f64, muted: bool },
    RateChanged(f64),
    FullscreenChanged(bool),
    Ended,
    Error(String),
}

/// Work the reducer asks for. The controller carries these out against
/// the element, the progress store and the playlist.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEffect {
    // Element commands
    AssignSource(MediaSource),
    Unload,
    Play,
    Pause,
    Seek(f64),
    ApplyVolume(f64),
    ApplyMuted(bool),
    ApplyPlaybackRate(f64),
    ApplyFullscreen(bool),

    // Collaborators
    RestoreProgress { path: String },
    SaveProgress { path: String, position: f64 },
    ClearProgress { path: String },
    ItemEnded { path: String },
    ReportError(String),
}
