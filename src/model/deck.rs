//! Coordinator state machine: registry, promoted track, playback mirror, visibility

use serde::Serialize;

use super::playback::{PlaybackState, PromotedTrack};
use super::registry::{SlotRegistry, SurfaceStatus};
use super::types::{TrackMetadata, Visibility};

/// Result of promoting a surface after its first play event
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Promotion {
    /// True when the promoted url changed (playback state was reset)
    pub switched: bool,
    /// Sibling surfaces to tear down once the eviction delay has passed
    pub evict: Vec<String>,
}

/// Everything the page-wide presentation needs in one copy
#[derive(Clone, Debug, Default, Serialize)]
pub struct DeckSnapshot {
    pub promoted: Option<PromotedTrack>,
    pub playback: PlaybackState,
    pub visibility: Visibility,
    pub surfaces: Vec<SurfaceStatus>,
}

#[derive(Debug, Default)]
pub struct DeckModel {
    registry: SlotRegistry,
    promoted: Option<PromotedTrack>,
    playback: PlaybackState,
    visibility: Visibility,
}

impl DeckModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(&self) -> &SlotRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut SlotRegistry {
        &mut self.registry
    }

    pub fn playback(&self) -> &PlaybackState {
        &self.playback
    }

    pub fn playback_mut(&mut self) -> &mut PlaybackState {
        &mut self.playback
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn promoted(&self) -> Option<&PromotedTrack> {
        self.promoted.as_ref()
    }

    pub fn promoted_url(&self) -> Option<&str> {
        self.promoted.as_ref().map(|t| t.url.as_str())
    }

    pub fn is_promoted(&self, url: &str) -> bool {
        self.promoted_url() == Some(url)
    }

    /// Mark `url` as played and make it the promoted track.
    ///
    /// Returns `None` when the surface no longer exists. A repeated play on the
    /// already promoted url keeps the playback state as is.
    pub fn promote(&mut self, url: &str, metadata: TrackMetadata) -> Option<Promotion> {
        if !self.registry.mark_played(url) {
            return None;
        }

        let switched = !self.is_promoted(url);
        if switched {
            self.playback.reset_for_new_track();
            self.promoted = Some(PromotedTrack {
                url: url.to_string(),
                metadata,
            });
        }
        self.visibility.mini_player_visible = true;

        Some(Promotion {
            switched,
            evict: self.registry.urls_except(url),
        })
    }

    /// Back to "nothing playing"
    pub fn clear_promotion(&mut self) -> Option<PromotedTrack> {
        self.playback.is_playing = false;
        self.visibility.mini_player_visible = false;
        self.promoted.take()
    }

    pub fn set_local_modal_open(&mut self, open: bool) {
        self.visibility.local_modal_open = open;
    }

    /// Open the global modal; returns true when a local modal had to be closed
    pub fn show_modal(&mut self) -> bool {
        let closed_local = self.visibility.local_modal_open;
        self.visibility.local_modal_open = false;
        self.visibility.modal_visible = true;
        closed_local
    }

    pub fn hide_modal(&mut self) {
        self.visibility.modal_visible = false;
    }

    pub fn snapshot(&self) -> DeckSnapshot {
        DeckSnapshot {
            promoted: self.promoted.clone(),
            playback: self.playback,
            visibility: self.visibility,
            surfaces: self.registry.status(),
        }
    }
}
