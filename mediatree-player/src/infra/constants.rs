pub mod player_controls {
    pub const MIN_VOLUME: f64 = 0.0;
    pub const MAX_VOLUME: f64 = 1.0;
    pub const DEFAULT_VOLUME: f64 = 1.0;
    pub const VOLUME_STEP: f64 = 0.1;

    pub const MIN_PLAYBACK_RATE: f64 = 0.25;
    pub const MAX_PLAYBACK_RATE: f64 = 3.0;
    pub const DEFAULT_PLAYBACK_RATE: f64 = 1.0;

    /// Rates offered by the rate selector.
    pub const PLAYBACK_RATE_PRESETS: &[f64] =
        &[0.25, 0.5, 0.75, 1.0, 1.25, 1.5, 2.0, 3.0];
}

pub mod seeking {
    pub const SEEK_FORWARD_FINE: f64 = 10.0;
    pub const SEEK_BACKWARD_FINE: f64 = -10.0;
    pub const SEEK_FORWARD_COURSE: f64 = 30.0;
    pub const SEEK_BACKWARD_COURSE: f64 = -30.0;
}

pub mod progress {
    /// File name of the resume-position store inside the data directory.
    pub const PROGRESS_FILE_NAME: &str = "progress.json";

    /// Saved positions this close to the start are not worth resuming.
    pub const MIN_RESUME_SECONDS: f64 = 1.0;
}
