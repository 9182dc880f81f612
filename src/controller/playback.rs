//! Commands on the promoted track from the mini-player and the global modal

use crate::model::{secs_to_ms, DeckNotice};
use super::DeckController;

impl DeckController {
    pub async fn toggle_play(&self) {
        let state = self.state.lock().await;
        let Some(url) = state.model.promoted_url() else {
            return;
        };
        let Some(widget) = state.model.registry().widget(url) else {
            tracing::debug!(url, "No control handle yet, toggle ignored");
            return;
        };

        let is_playing = state.model.playback().is_playing;
        tracing::debug!(url, is_playing, "Toggling promoted playback");
        let result = if is_playing { widget.pause() } else { widget.play() };
        if let Err(e) = result {
            tracing::warn!(url, error = %e, "Toggle playback failed");
        }
        // is_playing follows the widget's own play/pause events
    }

    /// Local-only like flag on the promoted track
    pub async fn toggle_like(&self) {
        let mut state = self.state.lock().await;
        if state.model.promoted_url().is_none() {
            return;
        }
        let playback = state.model.playback_mut();
        playback.is_liked = !playback.is_liked;
        tracing::debug!(is_liked = playback.is_liked, "Like toggled");
    }

    /// Seek the promoted track; progress events are ignored for a short window afterwards
    pub async fn seek_to(&self, time_secs: f64) {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        let Some(url) = state.model.promoted_url().map(str::to_string) else {
            return;
        };

        let Some(widget) = state.model.registry().widget(&url) else {
            tracing::debug!(url = %url, "No control handle yet, seek ignored");
            return;
        };

        let target = state.model.playback().clamp_time(time_secs);
        state.model.playback_mut().current_time_secs = target;
        if let Err(e) = widget.seek_to(secs_to_ms(target)) {
            tracing::warn!(url = %url, error = %e, "Seek failed");
        }

        state.seek_window.open(self.timings.global_seek_suppression());
        tracing::debug!(url = %url, target, "Seeked promoted track");
    }

    /// Open the global modal, closing any card modal first
    pub async fn show_modal(&self) {
        let closed_local = self.state.lock().await.model.show_modal();
        if closed_local {
            self.notify(DeckNotice::CloseLocalModal);
        }
    }

    pub async fn hide_modal(&self) {
        self.state.lock().await.model.hide_modal();
    }

    pub async fn set_local_modal_open(&self, open: bool) {
        self.state.lock().await.model.set_local_modal_open(open);
    }

    /// Pause the promoted widget and clear the promotion; the surface stays registered
    pub async fn hide_mini_player(&self) {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        if let Some(url) = state.model.promoted_url() {
            if let Some(widget) = state.model.registry().widget(url) {
                if let Err(e) = widget.pause() {
                    tracing::warn!(url, error = %e, "Pause on dismiss failed");
                }
            }
        }

        self.detach_mirror(state);
        state.seek_window.close();
        if let Some(track) = state.model.clear_promotion() {
            tracing::info!(url = %track.url, "Mini-player dismissed");
        }
    }
}
