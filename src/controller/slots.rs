//! Slot registry operations exposed to presentation adapters

use std::sync::Arc;

use crate::model::{Acquisition, DeckNotice, DeckSnapshot, PlaybackState, SurfaceStatus};
use crate::widget::WidgetControl;
use super::{DeckController, DeckState};

impl DeckController {
    /// Return the surface for `url`, creating it when fewer than two exist.
    ///
    /// `surface == None` tells the caller not to open a player for `url`.
    pub async fn acquire(&self, url: &str) -> Acquisition {
        let mut state = self.state.lock().await;

        // Reopened during the grace delay: keep the surface
        if let Some(mut pending) = state.releases.remove(url) {
            pending.cancel();
            tracing::debug!(url, "Pending release cancelled by reacquire");
        }

        let factory = self.factory.clone();
        match state.model.registry_mut().acquire_with(url, |u| factory.create(u)) {
            Ok(acquisition) => {
                if acquisition.is_new {
                    tracing::info!(url, surfaces = state.model.registry().len(), "Playback surface created");
                }
                acquisition
            }
            Err(e) => {
                tracing::warn!(url, error = %e, "Could not create playback surface");
                Acquisition {
                    surface: None,
                    is_new: false,
                }
            }
        }
    }

    /// Attach the control handle once the embed is ready. No-op for a surface already gone.
    pub async fn bind_control_handle(&self, url: &str, widget: Arc<dyn WidgetControl>) {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        if !state.model.registry_mut().bind_widget(url, widget.clone()) {
            tracing::debug!(url, "Control handle for a released surface ignored");
            return;
        }
        tracing::debug!(url, "Control handle bound");

        // Promoted before its handle arrived: start mirroring now
        if state.model.is_promoted(url) && state.mirror_url() != Some(url) {
            self.attach_mirror(state, url, widget);
        }
    }

    /// Release the surface for `url` after the grace delay unless it has played by then
    pub async fn release_if_unplayed(&self, url: &str) {
        let mut state = self.state.lock().await;

        if state.model.registry().has_played(url) != Some(false) {
            return;
        }

        let controller = self.clone();
        let target = url.to_string();
        let grace = self.timings.release_grace();
        state
            .releases
            .entry(url.to_string())
            .or_default()
            .schedule(grace, async move {
                controller.finish_release(&target).await;
            });
        tracing::debug!(url, grace_ms = grace.as_millis() as u64, "Unplayed surface release scheduled");
    }

    async fn finish_release(&self, url: &str) {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        if let Some(mut own) = state.releases.remove(url) {
            own.detach();
        }

        if state.model.registry().has_played(url) == Some(false) {
            self.teardown(state, url);
        }
    }

    /// Remove a surface entirely: unbind, detach the embed, unregister, notify
    pub(crate) fn teardown(&self, state: &mut DeckState, url: &str) -> bool {
        let Some(surface) = state.model.registry_mut().remove(url) else {
            return false;
        };

        if let Some(mut pending) = state.releases.remove(url) {
            pending.cancel();
        }
        if state.mirror_url() == Some(url) {
            self.detach_mirror(state);
        }

        if let Some(widget) = &surface.widget {
            widget.unbind_all();
        }
        self.factory.destroy(&surface.embed);

        tracing::info!(url, surfaces = state.model.registry().len(), "Playback surface destroyed");
        self.notify(DeckNotice::SurfaceDestroyed {
            url: url.to_string(),
        });
        true
    }

    pub async fn status(&self) -> Vec<SurfaceStatus> {
        self.state.lock().await.model.registry().status()
    }

    pub async fn snapshot(&self) -> DeckSnapshot {
        self.state.lock().await.model.snapshot()
    }

    pub async fn promoted_url(&self) -> Option<String> {
        self.state.lock().await.model.promoted_url().map(str::to_string)
    }

    pub async fn is_promoted(&self, url: &str) -> bool {
        self.state.lock().await.model.is_promoted(url)
    }

    /// Promoted url and the global playback state, read together
    pub async fn promoted_playback(&self) -> (Option<String>, PlaybackState) {
        let state = self.state.lock().await;
        (
            state.model.promoted_url().map(str::to_string),
            *state.model.playback(),
        )
    }
}
