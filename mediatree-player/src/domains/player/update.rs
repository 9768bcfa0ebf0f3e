//! Pure playback reducer.
//!
//! `reduce` never touches the element, the progress store or the playlist.
//! It returns the next state plus the effects the controller must carry
//! out, which keeps every transition testable without a media element.

use log::{debug, trace, warn};

use super::{
    messages::{ElementEvent, PlayerEffect, PlayerMessage},
    state::{Phase, PlaybackState, clamp_playback_rate, clamp_volume},
};
use crate::infra::constants::progress::MIN_RESUME_SECONDS;

/// Result of one reducer step.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: PlaybackState,
    pub effects: Vec<PlayerEffect>,
}

impl Transition {
    fn unchanged(state: &PlaybackState) -> Self {
        Self {
            state: state.clone(),
            effects: Vec::new(),
        }
    }
}

pub fn reduce(state: &PlaybackState, message: PlayerMessage) -> Transition {
    let mut next = state.clone();
    let mut effects = Vec::new();

    match message {
        PlayerMessage::Load { source, autoplay } => {
            debug!("[Player] Loading {}", source.path);
            next = state.reset_for(Some(source.clone()));
            next.autoplay = autoplay;

            let path = source.path.clone();
            effects.push(PlayerEffect::AssignSource(source));
            effects.push(PlayerEffect::ApplyVolume(next.volume));
            effects.push(PlayerEffect::ApplyMuted(next.is_muted));
            effects.push(PlayerEffect::ApplyPlaybackRate(next.playback_rate));
            effects.push(PlayerEffect::RestoreProgress { path });
        }

        PlayerMessage::ResumeAt(position) => {
            if !position.is_finite() || position < MIN_RESUME_SECONDS {
                return Transition::unchanged(state);
            }
            match state.phase {
                Phase::Idle => return Transition::unchanged(state),
                Phase::Loading => next.pending_resume = Some(position),
                _ => start_seek(&mut next, &mut effects, position),
            }
        }

        PlayerMessage::Close => {
            if !state.is_loaded() {
                return Transition::unchanged(state);
            }
            next = state.reset_for(None);
            effects.push(PlayerEffect::Unload);
        }

        PlayerMessage::RequestPlay => request_play(&mut next, &mut effects),
        PlayerMessage::RequestPause => request_pause(&mut next, &mut effects),
        PlayerMessage::TogglePlayPause => {
            if state.is_playing || state.play_requested {
                request_pause(&mut next, &mut effects);
            } else {
                request_play(&mut next, &mut effects);
            }
        }

        PlayerMessage::RequestSeek(position) => match state.phase {
            Phase::Idle => return Transition::unchanged(state),
            Phase::Loading => next.pending_resume = Some(position.max(0.0)),
            _ => start_seek(&mut next, &mut effects, position),
        },
        PlayerMessage::SeekRelative(delta) => {
            if !state.phase.has_metadata() {
                return Transition::unchanged(state);
            }
            start_seek(&mut next, &mut effects, state.displayed_time() + delta);
        }

        PlayerMessage::SetVolume(volume) => {
            set_volume(&mut next, &mut effects, volume);
        }
        PlayerMessage::AdjustVolume(delta) => {
            set_volume(&mut next, &mut effects, state.volume + delta);
        }
        PlayerMessage::SetMuted(muted) => {
            set_muted(&mut next, &mut effects, muted);
        }
        PlayerMessage::ToggleMute => {
            set_muted(&mut next, &mut effects, !state.is_muted);
        }
        PlayerMessage::SetPlaybackRate(rate) => {
            let rate = clamp_playback_rate(rate);
            if state.is_loaded() {
                effects.push(PlayerEffect::ApplyPlaybackRate(rate));
            } else {
                next.playback_rate = rate;
            }
        }
        PlayerMessage::SetFullscreen(fullscreen) => {
            if state.is_loaded() && fullscreen != state.is_fullscreen {
                effects.push(PlayerEffect::ApplyFullscreen(fullscreen));
            }
        }
        PlayerMessage::ToggleFullscreen => {
            if state.is_loaded() {
                effects.push(PlayerEffect::ApplyFullscreen(!state.is_fullscreen));
            }
        }

        PlayerMessage::Element(event) => {
            if !state.is_loaded() {
                trace!("[Player] Ignoring {:?} with no source loaded", event);
                return Transition::unchanged(state);
            }
            on_element_event(state, &mut next, &mut effects, event);
        }
    }

    Transition {
        state: next,
        effects,
    }
}

fn on_element_event(
    state: &PlaybackState,
    next: &mut PlaybackState,
    effects: &mut Vec<PlayerEffect>,
    event: ElementEvent,
) {
    match event {
        ElementEvent::MetadataLoaded { duration } => {
            if state.phase != Phase::Loading {
                debug!("[Player] Metadata outside of loading, ignored");
                return;
            }
            next.duration = if duration.is_finite() {
                duration.max(0.0)
            } else {
                0.0
            };
            next.is_initialized = true;
            next.phase = Phase::MetadataReady;
            next.current_time = next.clamp_time(next.current_time);

            if let Some(position) = next.pending_resume.take()
                && position < next.duration
            {
                debug!("[Player] Resuming at {:.1}s", position);
                start_seek(next, effects, position);
            }
        }

        ElementEvent::CanPlayThrough => {
            if state.phase != Phase::MetadataReady {
                return;
            }
            next.phase = Phase::Ready;
            if next.autoplay {
                next.autoplay = false;
                request_play(next, effects);
            }
        }

        ElementEvent::Playing => {
            next.is_playing = true;
            next.play_requested = false;
            next.autoplay = false;
            next.phase = Phase::Playing;
            next.error = None;
        }

        ElementEvent::Paused => {
            next.is_playing = false;
            next.play_requested = false;
            if matches!(
                state.phase,
                Phase::Playing | Phase::Ready | Phase::MetadataReady
            ) {
                next.phase = Phase::Paused;
            }
        }

        ElementEvent::PlayRejected(reason) => {
            warn!("[Player] Play request rejected: {}", reason);
            next.play_requested = false;
            next.autoplay = false;
        }

        ElementEvent::TimeUpdate(position) => {
            if !state.is_initialized || state.phase == Phase::Ended {
                return;
            }
            if state.is_seeking {
                trace!("[Player] Progress sample during seek suppressed");
                return;
            }
            next.current_time = next.clamp_time(position);
            save_progress(next, effects);
        }

        ElementEvent::Seeked(position) => {
            next.is_seeking = false;
            next.seek_target = None;
            next.current_time = next.clamp_time(position);
            if next.is_initialized {
                save_progress(next, effects);
            }
        }

        ElementEvent::VolumeChanged { volume, muted } => {
            next.volume = clamp_volume(volume);
            next.is_muted = muted;
        }

        ElementEvent::RateChanged(rate) => {
            next.playback_rate = clamp_playback_rate(rate);
        }

        ElementEvent::FullscreenChanged(fullscreen) => {
            next.is_fullscreen = fullscreen;
        }

        ElementEvent::Ended => {
            next.phase = Phase::Ended;
            next.is_playing = false;
            next.play_requested = false;
            next.is_seeking = false;
            next.seek_target = None;
            next.current_time = next.duration;

            if let Some(path) = state.current_path() {
                effects.push(PlayerEffect::ClearProgress {
                    path: path.to_string(),
                });
                effects.push(PlayerEffect::ItemEnded {
                    path: path.to_string(),
                });
            }
        }

        ElementEvent::Error(message) => {
            warn!("[Player] Playback error: {}", message);
            if state.is_initialized {
                next.phase = Phase::Paused;
                next.is_playing = false;
                next.play_requested = false;
                next.autoplay = false;
                next.is_seeking = false;
                next.seek_target = None;
                next.pending_resume = None;
            } else {
                *next = state.reset_for(None);
                effects.push(PlayerEffect::Unload);
            }
            next.error = Some(message.clone());
            effects.push(PlayerEffect::ReportError(message));
        }
    }
}

fn request_play(next: &mut PlaybackState, effects: &mut Vec<PlayerEffect>) {
    if next.is_playing || next.play_requested {
        return;
    }
    match next.phase {
        Phase::Idle => {
            trace!("[Player] Play requested with nothing loaded");
        }
        Phase::Loading => next.autoplay = true,
        _ => {
            next.play_requested = true;
            effects.push(PlayerEffect::Play);
        }
    }
}

fn request_pause(next: &mut PlaybackState, effects: &mut Vec<PlayerEffect>) {
    next.autoplay = false;
    if next.is_playing || next.play_requested {
        next.play_requested = false;
        effects.push(PlayerEffect::Pause);
    }
}

fn start_seek(
    next: &mut PlaybackState,
    effects: &mut Vec<PlayerEffect>,
    position: f64,
) {
    let target = next.clamp_time(position);
    next.is_seeking = true;
    next.seek_target = Some(target);
    if next.phase == Phase::Ended {
        next.phase = Phase::Paused;
    }
    effects.push(PlayerEffect::Seek(target));
}

fn set_volume(
    next: &mut PlaybackState,
    effects: &mut Vec<PlayerEffect>,
    volume: f64,
) {
    let volume = clamp_volume(volume);
    if next.is_loaded() {
        effects.push(PlayerEffect::ApplyVolume(volume));
    } else {
        next.volume = volume;
    }
}

fn set_muted(
    next: &mut PlaybackState,
    effects: &mut Vec<PlayerEffect>,
    muted: bool,
) {
    if next.is_loaded() {
        effects.push(PlayerEffect::ApplyMuted(muted));
    } else {
        next.is_muted = muted;
    }
}

fn save_progress(next: &PlaybackState, effects: &mut Vec<PlayerEffect>) {
    if let Some(path) = next.current_path() {
        effects.push(PlayerEffect::SaveProgress {
            path: path.to_string(),
            position: next.current_time,
        });
    }
}

#[cfg(test)]
mod tests {
    use url::Url;

    use super::*;
    use crate::domains::player::state::MediaSource;

    fn source(path: &str) -> MediaSource {
        let url = Url::parse("http://localhost:3000/api/v1/media/")
            .unwrap()
            .join(path)
            .unwrap();
        MediaSource::new(path, url)
    }

    fn step(state: &PlaybackState, message: PlayerMessage) -> Transition {
        reduce(state, message)
    }

    fn ready(path: &str, duration: f64) -> PlaybackState {
        let state = PlaybackState::default();
        let state = step(
            &state,
            PlayerMessage::Load {
                source: source(path),
                autoplay: false,
            },
        )
        .state;
        let state = step(
            &state,
            PlayerMessage::Element(ElementEvent::MetadataLoaded { duration }),
        )
        .state;
        step(&state, PlayerMessage::Element(ElementEvent::CanPlayThrough)).state
    }

    #[test]
    fn load_assigns_source_then_restores() {
        let t = step(
            &PlaybackState::default(),
            PlayerMessage::Load {
                source: source("clip.mp4"),
                autoplay: false,
            },
        );
        assert_eq!(t.state.phase, Phase::Loading);
        assert_eq!(t.effects.first(), Some(&PlayerEffect::AssignSource(source("clip.mp4"))));
        assert_eq!(
            t.effects.last(),
            Some(&PlayerEffect::RestoreProgress {
                path: "clip.mp4".into()
            })
        );
    }

    #[test]
    fn duration_is_trusted_only_from_metadata() {
        let state = ready("clip.mp4", 120.0);
        assert_eq!(state.phase, Phase::Ready);
        assert!(state.is_initialized);
        assert_eq!(state.duration, 120.0);
    }

    #[test]
    fn play_is_a_request_until_confirmed() {
        let state = ready("clip.mp4", 120.0);
        let t = step(&state, PlayerMessage::RequestPlay);
        assert_eq!(t.effects, vec![PlayerEffect::Play]);
        assert!(!t.state.is_playing);
        assert!(t.state.play_requested);

        let confirmed =
            step(&t.state, PlayerMessage::Element(ElementEvent::Playing));
        assert!(confirmed.state.is_playing);
        assert_eq!(confirmed.state.phase, Phase::Playing);
        assert!(!confirmed.state.play_requested);
    }

    #[test]
    fn rejected_play_leaves_controls_paused() {
        let state = ready("clip.mp4", 120.0);
        let requested = step(&state, PlayerMessage::RequestPlay).state;
        let rejected = step(
            &requested,
            PlayerMessage::Element(ElementEvent::PlayRejected(
                "autoplay blocked".into(),
            )),
        )
        .state;
        assert!(!rejected.is_playing);
        assert!(!rejected.play_requested);
        assert_eq!(rejected.phase, Phase::Ready);
    }

    #[test]
    fn duplicate_play_requests_issue_one_command() {
        let state = ready("clip.mp4", 120.0);
        let first = step(&state, PlayerMessage::RequestPlay);
        let second = step(&first.state, PlayerMessage::RequestPlay);
        assert!(second.effects.is_empty());
    }

    #[test]
    fn autoplay_waits_for_can_play_through() {
        let state = step(
            &PlaybackState::default(),
            PlayerMessage::Load {
                source: source("clip.mp4"),
                autoplay: true,
            },
        )
        .state;
        let meta = step(
            &state,
            PlayerMessage::Element(ElementEvent::MetadataLoaded { duration: 10.0 }),
        );
        assert!(!meta.effects.contains(&PlayerEffect::Play));

        let ready =
            step(&meta.state, PlayerMessage::Element(ElementEvent::CanPlayThrough));
        assert_eq!(ready.effects, vec![PlayerEffect::Play]);
    }

    #[test]
    fn progress_during_seek_is_suppressed() {
        let state = ready("clip.mp4", 120.0);
        let seeking = step(&state, PlayerMessage::RequestSeek(60.0));
        assert!(seeking.state.is_seeking);
        assert_eq!(seeking.effects, vec![PlayerEffect::Seek(60.0)]);

        let sample = step(
            &seeking.state,
            PlayerMessage::Element(ElementEvent::TimeUpdate(31.0)),
        );
        assert!(sample.effects.is_empty());
        assert_eq!(sample.state.current_time, 0.0);
        assert_eq!(sample.state.seek_target, Some(60.0));

        let settled =
            step(&sample.state, PlayerMessage::Element(ElementEvent::Seeked(60.0)));
        assert!(!settled.state.is_seeking);
        assert_eq!(settled.state.seek_target, None);
        assert_eq!(settled.state.current_time, 60.0);
        assert_eq!(
            settled.effects,
            vec![PlayerEffect::SaveProgress {
                path: "clip.mp4".into(),
                position: 60.0
            }]
        );
    }

    #[test]
    fn position_is_confirmed_only_by_the_element() {
        let mut state = ready("clip.mp4", 120.0);
        state.current_time = 10.0;

        let seeking = step(&state, PlayerMessage::RequestSeek(200.0)).state;
        assert_eq!(seeking.current_time, 10.0);
        assert_eq!(seeking.seek_target, Some(120.0));
        assert_eq!(seeking.displayed_time(), 120.0);

        // Relative steps stack on the target while the first seek is out.
        let back = step(&seeking, PlayerMessage::SeekRelative(-30.0));
        assert_eq!(back.effects, vec![PlayerEffect::Seek(90.0)]);
        assert_eq!(back.state.current_time, 10.0);

        // The element may land somewhere else than asked.
        let landed =
            step(&back.state, PlayerMessage::Element(ElementEvent::Seeked(88.5)));
        assert_eq!(landed.state.current_time, 88.5);
        assert_eq!(landed.state.displayed_time(), 88.5);
    }

    #[test]
    fn error_drops_the_outstanding_seek() {
        let state = ready("clip.mp4", 120.0);
        let seeking = step(&state, PlayerMessage::RequestSeek(60.0)).state;
        let failed = step(
            &seeking,
            PlayerMessage::Element(ElementEvent::Error("decode".into())),
        );
        assert!(!failed.state.is_seeking);
        assert_eq!(failed.state.seek_target, None);
        assert_eq!(failed.state.current_time, 0.0);
    }

    #[test]
    fn settled_progress_is_saved_and_clamped() {
        let state = ready("clip.mp4", 100.0);
        let t = step(&state, PlayerMessage::Element(ElementEvent::TimeUpdate(140.0)));
        assert_eq!(t.state.current_time, 100.0);
        assert_eq!(
            t.effects,
            vec![PlayerEffect::SaveProgress {
                path: "clip.mp4".into(),
                position: 100.0
            }]
        );
    }

    #[test]
    fn relative_seek_clamps_to_bounds() {
        let mut state = ready("clip.mp4", 100.0);
        state.current_time = 95.0;
        let forward = step(&state, PlayerMessage::SeekRelative(30.0));
        assert_eq!(forward.effects, vec![PlayerEffect::Seek(100.0)]);

        state.current_time = 5.0;
        let back = step(&state, PlayerMessage::SeekRelative(-30.0));
        assert_eq!(back.effects, vec![PlayerEffect::Seek(0.0)]);
    }

    #[test]
    fn resume_is_deferred_until_metadata() {
        let loading = step(
            &PlaybackState::default(),
            PlayerMessage::Load {
                source: source("clip.mp4"),
                autoplay: false,
            },
        )
        .state;
        let pending = step(&loading, PlayerMessage::ResumeAt(42.0)).state;
        assert_eq!(pending.pending_resume, Some(42.0));

        let meta = step(
            &pending,
            PlayerMessage::Element(ElementEvent::MetadataLoaded { duration: 90.0 }),
        );
        assert_eq!(meta.effects, vec![PlayerEffect::Seek(42.0)]);
        assert!(meta.state.is_seeking);
    }

    #[test]
    fn resume_past_the_end_is_dropped() {
        let loading = step(
            &PlaybackState::default(),
            PlayerMessage::Load {
                source: source("clip.mp4"),
                autoplay: false,
            },
        )
        .state;
        let pending = step(&loading, PlayerMessage::ResumeAt(300.0)).state;
        let meta = step(
            &pending,
            PlayerMessage::Element(ElementEvent::MetadataLoaded { duration: 90.0 }),
        );
        assert!(meta.effects.is_empty());
        assert!(!meta.state.is_seeking);
    }

    #[test]
    fn volume_changes_wait_for_the_element() {
        let state = ready("clip.mp4", 10.0);
        let t = step(&state, PlayerMessage::SetVolume(0.3));
        assert_eq!(t.effects, vec![PlayerEffect::ApplyVolume(0.3)]);
        assert_eq!(t.state.volume, state.volume);

        let confirmed = step(
            &t.state,
            PlayerMessage::Element(ElementEvent::VolumeChanged {
                volume: 0.3,
                muted: false,
            }),
        );
        assert_eq!(confirmed.state.volume, 0.3);
    }

    #[test]
    fn relative_volume_and_rate_clamp() {
        let state = ready("clip.mp4", 10.0);
        let up = step(&state, PlayerMessage::AdjustVolume(0.5));
        assert_eq!(up.effects, vec![PlayerEffect::ApplyVolume(1.0)]);

        let fast = step(&state, PlayerMessage::SetPlaybackRate(8.0));
        assert_eq!(fast.effects, vec![PlayerEffect::ApplyPlaybackRate(3.0)]);
    }

    #[test]
    fn idle_audio_preferences_apply_directly() {
        let t = step(&PlaybackState::default(), PlayerMessage::SetVolume(0.2));
        assert!(t.effects.is_empty());
        assert_eq!(t.state.volume, 0.2);

        let muted = step(&t.state, PlayerMessage::ToggleMute);
        assert!(muted.state.is_muted);
    }

    #[test]
    fn ended_clears_progress_and_consults_playlist() {
        let state = ready("clip.mp4", 10.0);
        let playing = step(&state, PlayerMessage::Element(ElementEvent::Playing)).state;
        let ended = step(&playing, PlayerMessage::Element(ElementEvent::Ended));
        assert_eq!(ended.state.phase, Phase::Ended);
        assert!(!ended.state.is_playing);
        assert_eq!(
            ended.effects,
            vec![
                PlayerEffect::ClearProgress {
                    path: "clip.mp4".into()
                },
                PlayerEffect::ItemEnded {
                    path: "clip.mp4".into()
                },
            ]
        );

        let late_sample =
            step(&ended.state, PlayerMessage::Element(ElementEvent::TimeUpdate(10.0)));
        assert!(late_sample.effects.is_empty());
    }

    #[test]
    fn error_after_metadata_collapses_to_paused() {
        let state = ready("clip.mp4", 10.0);
        let playing = step(&state, PlayerMessage::Element(ElementEvent::Playing)).state;
        let failed = step(
            &playing,
            PlayerMessage::Element(ElementEvent::Error("decode".into())),
        );
        assert_eq!(failed.state.phase, Phase::Paused);
        assert!(!failed.state.is_playing);
        assert_eq!(failed.state.error.as_deref(), Some("decode"));
        assert_eq!(
            failed.effects,
            vec![PlayerEffect::ReportError("decode".into())]
        );
    }

    #[test]
    fn error_while_loading_collapses_to_idle() {
        let loading = step(
            &PlaybackState::default(),
            PlayerMessage::Load {
                source: source("broken.mp4"),
                autoplay: true,
            },
        )
        .state;
        let failed = step(
            &loading,
            PlayerMessage::Element(ElementEvent::Error("network".into())),
        );
        assert_eq!(failed.state.phase, Phase::Idle);
        assert!(failed.state.source.is_none());
        assert!(failed.effects.contains(&PlayerEffect::Unload));
    }

    #[test]
    fn events_without_a_source_are_ignored() {
        let state = PlaybackState::default();
        let t = step(&state, PlayerMessage::Element(ElementEvent::Playing));
        assert_eq!(t.state, state);
        assert!(t.effects.is_empty());
    }

    #[test]
    fn fullscreen_is_requested_then_confirmed() {
        let state = ready("clip.mp4", 10.0);
        let t = step(&state, PlayerMessage::ToggleFullscreen);
        assert_eq!(t.effects, vec![PlayerEffect::ApplyFullscreen(true)]);
        assert!(!t.state.is_fullscreen);

        let confirmed = step(
            &t.state,
            PlayerMessage::Element(ElementEvent::FullscreenChanged(true)),
        );
        assert!(confirmed.state.is_fullscreen);
    }
}
