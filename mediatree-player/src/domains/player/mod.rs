//! Player domain
//!
//! The playback state machine: a pure reducer over [`state::PlaybackState`],
//! the element abstraction it drives, and the controller that ties both to
//! resume positions and playlist sequencing.

pub mod controller;
pub mod controls;
pub mod element;
pub mod messages;
pub mod state;
pub mod update;

pub use controller::{ControlsSubscriber, PlaybackController};
pub use controls::ControlsView;
pub use element::PlaybackElement;
pub use messages::{ElementEvent, PlayerEffect, PlayerMessage};
pub use state::{MediaSource, Phase, PlaybackState};
