//! Mirror of the promoted widget's events into the global playback state

use std::sync::Arc;

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::AbortHandle;

use crate::model::ms_to_secs;
use crate::widget::{WidgetControl, WidgetEvent};
use super::{DeckController, DeckState};

/// Listener task forwarding one widget's events into the deck state
#[derive(Debug)]
pub(crate) struct Mirror {
    url: String,
    task: AbortHandle,
}

impl DeckState {
    pub(crate) fn mirror_url(&self) -> Option<&str> {
        self.mirror.as_ref().map(|m| m.url.as_str())
    }
}

impl DeckController {
    /// Start mirroring `widget` for the promoted `url`, replacing any previous mirror
    pub(crate) fn attach_mirror(&self, state: &mut DeckState, url: &str, widget: Arc<dyn WidgetControl>) {
        self.detach_mirror(state);

        // Subscribe before spawning so nothing emitted in between is lost
        let events = match widget.subscribe() {
            Ok(events) => events,
            Err(e) => {
                tracing::warn!(url, error = %e, "Could not subscribe to promoted widget");
                return;
            }
        };

        let controller = self.clone();
        let target = url.to_string();
        let task = tokio::spawn(async move {
            controller.run_mirror(target, widget, events).await;
        });

        tracing::debug!(url, "Mirroring promoted widget");
        state.mirror = Some(Mirror {
            url: url.to_string(),
            task: task.abort_handle(),
        });
    }

    pub(crate) fn detach_mirror(&self, state: &mut DeckState) {
        if let Some(mirror) = state.mirror.take() {
            mirror.task.abort();
            tracing::debug!(url = %mirror.url, "Stopped mirroring widget");
        }
    }

    async fn run_mirror(
        &self,
        url: String,
        widget: Arc<dyn WidgetControl>,
        mut events: broadcast::Receiver<WidgetEvent>,
    ) {
        self.sync_from_widget(&url, widget.as_ref()).await;

        loop {
            match events.recv().await {
                Ok(event) => self.apply_widget_event(&url, widget.as_ref(), event).await,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(url = %url, skipped, "Mirror lagged behind widget events");
                }
                Err(RecvError::Closed) => {
                    tracing::debug!(url = %url, "Widget event stream closed");
                    break;
                }
            }
        }
    }

    /// Pull duration and play state once, when the mirror starts
    async fn sync_from_widget(&self, url: &str, widget: &dyn WidgetControl) {
        let duration = widget.duration_ms().await;
        let paused = widget.is_paused().await;

        let mut state = self.state.lock().await;
        if !state.model.is_promoted(url) {
            return;
        }
        let playback = state.model.playback_mut();
        match duration {
            Ok(ms) => playback.set_duration(ms_to_secs(ms)),
            Err(e) => tracing::debug!(url, error = %e, "Duration not available yet"),
        }
        if let Ok(paused) = paused {
            playback.is_playing = !paused;
        }
    }

    async fn apply_widget_event(&self, url: &str, widget: &dyn WidgetControl, event: WidgetEvent) {
        match event {
            WidgetEvent::Ready => {
                tracing::debug!(url, "Promoted widget ready");
                self.sync_from_widget(url, widget).await;
            }
            WidgetEvent::Play => {
                tracing::trace!(url, "WidgetEvent::Play");
                self.with_promoted(url, |state| state.model.playback_mut().is_playing = true)
                    .await;
            }
            WidgetEvent::Pause => {
                tracing::trace!(url, "WidgetEvent::Pause");
                self.with_promoted(url, |state| state.model.playback_mut().is_playing = false)
                    .await;
            }
            WidgetEvent::Progress { position_ms } => {
                self.with_promoted(url, |state| {
                    // A seek just committed from the global controls wins
                    if !state.seek_window.is_active() {
                        state.model.playback_mut().set_current_time(ms_to_secs(position_ms));
                    }
                })
                .await;
            }
            WidgetEvent::Finish => {
                tracing::debug!(url, "Promoted track finished");
                self.with_promoted(url, |state| {
                    let playback = state.model.playback_mut();
                    playback.is_playing = false;
                    playback.current_time_secs = 0.0;
                })
                .await;
            }
        }
    }

    /// Apply `update` only while `url` is still the promoted track
    async fn with_promoted<F>(&self, url: &str, update: F)
    where
        F: FnOnce(&mut DeckState),
    {
        let mut state = self.state.lock().await;
        if state.model.is_promoted(url) {
            update(&mut *state);
        }
    }
}
