//! Promotion of a played surface and delayed eviction of its sibling

use crate::model::{DeckNotice, TrackMetadata};
use super::DeckController;

impl DeckController {
    /// Record the first real play on `url` and make it the promoted track.
    ///
    /// Any other live surface is torn down after the eviction delay.
    pub async fn mark_played(&self, url: &str, metadata: TrackMetadata) {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        let Some(promotion) = state.model.promote(url, metadata) else {
            tracing::debug!(url, "Play reported for a surface that is gone");
            return;
        };

        if promotion.switched {
            tracing::info!(url, "Track promoted");
            match state.model.registry().widget(url) {
                Some(widget) => self.attach_mirror(state, url, widget),
                // Bound later by bind_control_handle
                None => self.detach_mirror(state),
            }
            self.notify(DeckNotice::Promoted { url: url.to_string() });
        }

        if promotion.evict.is_empty() {
            state.eviction.cancel();
            return;
        }

        let controller = self.clone();
        let delay = self.timings.eviction_delay();
        tracing::debug!(
            url,
            siblings = ?promotion.evict,
            delay_ms = delay.as_millis() as u64,
            "Sibling eviction scheduled"
        );
        state.eviction.schedule(delay, async move {
            controller.evict(promotion.evict).await;
        });
    }

    async fn evict(&self, urls: Vec<String>) {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        state.eviction.detach();

        for url in urls {
            if state.model.is_promoted(&url) {
                tracing::debug!(url = %url, "Skipping eviction of the promoted surface");
                continue;
            }
            if self.teardown(state, &url) {
                tracing::info!(url = %url, "Sibling surface evicted");
            }
        }
    }
}
