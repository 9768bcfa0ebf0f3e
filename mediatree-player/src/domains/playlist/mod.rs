//! Playlist sequencing: what plays next when the current item ends.

use log::debug;
use mediatree_model::{Entry, Playlist};

/// The ordered videos and cursor driving automatic "play next".
///
/// Exists only while a playlist is actively driving playback.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistContext {
    items: Vec<Entry>,
    current_index: usize,
}

impl PlaylistContext {
    /// Starts at the first item, whichever one the user clicked. An empty
    /// sequence has nothing to drive and yields `None`.
    pub fn start(items: Vec<Entry>) -> Option<Self> {
        if items.is_empty() {
            return None;
        }
        Some(Self {
            items,
            current_index: 0,
        })
    }

    pub fn from_playlist(playlist: &Playlist) -> Option<Self> {
        Self::start(playlist.videos.clone())
    }

    pub fn current(&self) -> &Entry {
        &self.items[self.current_index]
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn items(&self) -> &[Entry] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Advances past the item that just ended. `None` means the sequence
    /// is exhausted; there is no looping.
    pub fn on_item_ended(&mut self) -> Option<&Entry> {
        if self.current_index + 1 < self.items.len() {
            self.current_index += 1;
            debug!(
                "[Playlist] Advancing to {}/{}",
                self.current_index + 1,
                self.items.len()
            );
            Some(&self.items[self.current_index])
        } else {
            debug!("[Playlist] Reached the end");
            None
        }
    }
}

/// Holds the active context and discards it on exhaustion or when playback
/// is taken over by a manual load.
#[derive(Debug, Default)]
pub struct PlaylistSequencer {
    active: Option<PlaylistContext>,
}

impl PlaylistSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activates `items`, returning the first one to load.
    pub fn start(&mut self, items: Vec<Entry>) -> Option<Entry> {
        self.active = PlaylistContext::start(items);
        self.active.as_ref().map(|context| context.current().clone())
    }

    pub fn active(&self) -> Option<&PlaylistContext> {
        self.active.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn clear(&mut self) {
        if self.active.take().is_some() {
            debug!("[Playlist] Context cleared");
        }
    }

    /// Next item to play, clearing the context once it runs out.
    pub fn on_item_ended(&mut self) -> Option<Entry> {
        let next = self
            .active
            .as_mut()
            .and_then(|context| context.on_item_ended().cloned());
        if next.is_none() {
            self.clear();
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn video(name: &str) -> Entry {
        Entry {
            name: name.to_string(),
            path: format!("movies/{name}"),
            is_directory: false,
            is_video: true,
            size: 1,
            modified_at: Utc::now(),
            extension: "mp4".to_string(),
        }
    }

    #[test]
    fn two_item_playlist_runs_out() {
        let mut sequencer = PlaylistSequencer::new();
        let first = sequencer.start(vec![video("a.mp4"), video("b.mp4")]);
        assert_eq!(first.map(|e| e.name), Some("a.mp4".to_string()));

        let next = sequencer.on_item_ended();
        assert_eq!(next.map(|e| e.name), Some("b.mp4".to_string()));
        assert!(sequencer.is_active());

        assert!(sequencer.on_item_ended().is_none());
        assert!(!sequencer.is_active());
    }

    #[test]
    fn always_starts_at_the_first_item() {
        let mut sequencer = PlaylistSequencer::new();
        sequencer.start(vec![video("a.mp4"), video("b.mp4"), video("c.mp4")]);
        assert_eq!(sequencer.active().unwrap().current_index(), 0);
    }

    #[test]
    fn empty_playlist_never_activates() {
        let mut sequencer = PlaylistSequencer::new();
        assert!(sequencer.start(Vec::new()).is_none());
        assert!(!sequencer.is_active());
        assert!(sequencer.on_item_ended().is_none());
    }

    #[test]
    fn ended_without_context_is_none() {
        let mut sequencer = PlaylistSequencer::new();
        assert!(sequencer.on_item_ended().is_none());
    }
}
