use std::fmt::Debug;

use crate::error::PlayerResult;

use super::state::MediaSource;

/// The single media element the controller drives.
///
/// Every method is a request. The element answers later through
/// [`ElementEvent`](super::messages::ElementEvent)s fed back into the
/// controller, which is the only component allowed to call these.
pub trait PlaybackElement: Debug {
    fn assign_source(&mut self, source: &MediaSource);
    fn unload(&mut self);

    fn play(&mut self);
    fn pause(&mut self);
    fn seek(&mut self, position: f64);

    fn set_volume(&mut self, volume: f64);
    fn set_muted(&mut self, muted: bool);
    fn set_playback_rate(&mut self, rate: f64);

    /// Best effort; the platform may refuse.
    fn set_fullscreen(&mut self, fullscreen: bool) -> PlayerResult<()>;
}
