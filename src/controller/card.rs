//! Per-card presentation adapter.
//!
//! A card keeps local shadow state for its own surface and defers to the
//! coordinator's global state once its track is the promoted one. Lock order is
//! card then deck; the deck never locks a card.

use std::sync::Arc;

use tokio::sync::{broadcast, broadcast::error::RecvError, Mutex};
use tokio::task::AbortHandle;

use crate::model::{
    clamp_time, ms_to_secs, secs_to_ms, CardDisplay, DeckNotice, DisplaySource, LocalShadow, Track,
    TrackMetadata,
};
use crate::widget::{WidgetControl, WidgetEvent};
use super::deferred::SuppressionWindow;
use super::DeckController;

#[derive(Default)]
struct CardState {
    modal_open: bool,
    /// Set on play, cleared when the surface is destroyed
    active: bool,
    shadow: LocalShadow,
    drag_preview: Option<f64>,
    widget: Option<Arc<dyn WidgetControl>>,
    listener: Option<AbortHandle>,
    poller: Option<AbortHandle>,
    notices: Option<AbortHandle>,
    seek_window: SuppressionWindow,
}

impl CardState {
    fn stop_tasks(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.abort();
        }
        if let Some(poller) = self.poller.take() {
            poller.abort();
        }
    }
}

/// What the view needs to draw one card
#[derive(Clone, Debug)]
pub struct CardView {
    pub url: String,
    pub metadata: TrackMetadata,
    pub display: CardDisplay,
    pub modal_open: bool,
    pub active: bool,
}

#[derive(Clone)]
pub struct CardController {
    track: Arc<Track>,
    deck: DeckController,
    state: Arc<Mutex<CardState>>,
}

impl CardController {
    /// Create the adapter and start listening for coordinator notices
    pub fn spawn(track: Track, deck: DeckController) -> Self {
        let notices = deck.subscribe();
        let card = Self {
            track: Arc::new(track),
            deck,
            state: Arc::new(Mutex::new(CardState::default())),
        };

        let listener = card.clone();
        let task = tokio::spawn(async move { listener.run_notice_listener(notices).await });
        // Not contended yet: nothing else holds the fresh state
        if let Ok(mut state) = card.state.try_lock() {
            state.notices = Some(task.abort_handle());
        }
        card
    }

    pub fn url(&self) -> &str {
        &self.track.url
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub async fn is_modal_open(&self) -> bool {
        self.state.lock().await.modal_open
    }

    /// Open the card's player. Returns false when no surface could be acquired.
    pub async fn open_modal(&self) -> bool {
        let url = self.url();

        let acquisition = self.deck.acquire(url).await;
        let Some(surface) = acquisition.surface else {
            tracing::info!(url, "No free playback surface, player not opened");
            return false;
        };

        // Card and global modals never show together
        self.deck.hide_modal().await;
        self.deck.set_local_modal_open(true).await;

        let widget = match surface.widget.clone() {
            Some(widget) => Some(widget),
            None => match self.deck.factory().widget(&surface.embed) {
                Ok(widget) => Some(widget),
                Err(e) => {
                    tracing::warn!(url, error = %e, "Could not bind widget to embed");
                    None
                }
            },
        };

        let mut state = self.state.lock().await;
        state.modal_open = true;
        let Some(widget) = widget else {
            return true;
        };

        if state.listener.is_none() {
            match widget.subscribe() {
                Ok(events) => {
                    let card = self.clone();
                    let handle = widget.clone();
                    let task = tokio::spawn(async move { card.run_widget_listener(handle, events).await });
                    state.listener = Some(task.abort_handle());
                    state.widget = Some(widget.clone());
                }
                Err(e) => tracing::warn!(url, error = %e, "Could not subscribe to widget"),
            }
        }
        drop(state);

        // An existing bound surface already fired its ready event
        if !acquisition.is_new && surface.widget.is_some() {
            self.sync_shadow(widget.as_ref(), true).await;
        }

        tracing::debug!(url, is_new = acquisition.is_new, "Card player opened");
        true
    }

    pub async fn close_modal(&self) {
        {
            let mut state = self.state.lock().await;
            if !state.modal_open {
                return;
            }
            state.modal_open = false;
            state.drag_preview = None;
        }
        self.deck.set_local_modal_open(false).await;
        self.deck.release_if_unplayed(self.url()).await;
        tracing::debug!(url = self.url(), "Card player closed");
    }

    pub async fn toggle_play(&self) {
        if self.deck.is_promoted(self.url()).await {
            self.deck.toggle_play().await;
            return;
        }

        let state = self.state.lock().await;
        let Some(widget) = state.widget.clone().filter(|_| state.shadow.is_ready) else {
            return;
        };
        let result = if state.shadow.is_playing { widget.pause() } else { widget.play() };
        if let Err(e) = result {
            tracing::warn!(url = self.url(), error = %e, "Card toggle failed");
        }
    }

    pub async fn toggle_like(&self) {
        if self.deck.is_promoted(self.url()).await {
            self.deck.toggle_like().await;
            return;
        }
        let mut state = self.state.lock().await;
        state.shadow.is_liked = !state.shadow.is_liked;
    }

    pub async fn display(&self) -> CardDisplay {
        let (promoted_url, global) = self.deck.promoted_playback().await;
        let state = self.state.lock().await;
        let source = DisplaySource::resolve(self.url(), promoted_url.as_deref(), state.shadow, global);
        CardDisplay::new(source, state.shadow.is_ready, state.drag_preview)
    }

    pub async fn view(&self) -> CardView {
        let display = self.display().await;
        let state = self.state.lock().await;
        CardView {
            url: self.track.url.clone(),
            metadata: self.track.metadata.clone(),
            display,
            modal_open: state.modal_open,
            active: state.active,
        }
    }

    /// Enter dragging mode with a preview at `fraction` of the track
    pub async fn begin_drag(&self, fraction: f64) {
        self.drag_to(fraction).await;
    }

    /// Move the preview without seeking
    pub async fn drag_to(&self, fraction: f64) {
        let display = self.display().await;
        if !display.can_seek() {
            return;
        }
        let preview = clamp_time(fraction * display.duration_secs, display.duration_secs);
        self.state.lock().await.drag_preview = Some(preview);
    }

    /// Commit the previewed position
    pub async fn end_drag(&self) {
        let preview = self.state.lock().await.drag_preview.take();
        if let Some(target) = preview {
            self.commit_seek(target).await;
        }
    }

    pub async fn seek_relative(&self, delta_secs: f64) {
        let display = self.display().await;
        if !display.can_seek() {
            return;
        }
        self.commit_seek(display.current_time_secs + delta_secs).await;
    }

    async fn commit_seek(&self, time_secs: f64) {
        if self.deck.is_promoted(self.url()).await {
            self.deck.seek_to(time_secs).await;
            return;
        }

        let mut state = self.state.lock().await;
        let target = clamp_time(time_secs, state.shadow.duration_secs);
        state.shadow.current_time_secs = target;
        if let Some(widget) = &state.widget {
            if let Err(e) = widget.seek_to(secs_to_ms(target)) {
                tracing::warn!(url = self.url(), error = %e, "Card seek failed");
            }
        }
        state.seek_window.open(self.deck.timings().local_seek_suppression());
        tracing::debug!(url = self.url(), target, "Card seek committed");
        drop(state);

        self.ensure_polling().await;
    }

    /// Stop background tasks; used on shutdown
    pub async fn shutdown(&self) {
        let mut state = self.state.lock().await;
        state.stop_tasks();
        if let Some(notices) = state.notices.take() {
            notices.abort();
        }
    }

    async fn sync_shadow(&self, widget: &dyn WidgetControl, ready: bool) {
        let duration = widget.duration_ms().await.ok();
        let paused = widget.is_paused().await.ok();
        let position = widget.position_ms().await.ok();

        let mut state = self.state.lock().await;
        state.shadow.is_ready = state.shadow.is_ready || ready;
        if let Some(ms) = duration {
            state.shadow.duration_secs = ms_to_secs(ms);
        }
        if let Some(paused) = paused {
            state.shadow.is_playing = !paused;
        }
        if let Some(ms) = position {
            state.shadow.current_time_secs = clamp_time(ms_to_secs(ms), state.shadow.duration_secs);
        }
    }

    async fn run_widget_listener(
        &self,
        widget: Arc<dyn WidgetControl>,
        mut events: broadcast::Receiver<WidgetEvent>,
    ) {
        loop {
            match events.recv().await {
                Ok(event) => self.on_widget_event(&widget, event).await,
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
    }

    async fn on_widget_event(&self, widget: &Arc<dyn WidgetControl>, event: WidgetEvent) {
        let url = self.url();
        match event {
            WidgetEvent::Ready => {
                tracing::debug!(url, "Card widget ready");
                self.deck.bind_control_handle(url, widget.clone()).await;
                self.sync_shadow(widget.as_ref(), true).await;
            }
            WidgetEvent::Play => {
                {
                    let mut state = self.state.lock().await;
                    state.shadow.is_playing = true;
                    state.active = true;
                }
                self.deck.mark_played(url, self.track.metadata.clone()).await;
                self.ensure_polling().await;
            }
            WidgetEvent::Pause => {
                self.state.lock().await.shadow.is_playing = false;
            }
            WidgetEvent::Progress { position_ms } => {
                if self.deck.is_promoted(url).await {
                    return;
                }
                let mut state = self.state.lock().await;
                if state.drag_preview.is_none() && !state.seek_window.is_active() {
                    state.shadow.current_time_secs = clamp_time(ms_to_secs(position_ms), state.shadow.duration_secs);
                }
            }
            WidgetEvent::Finish => {
                let mut state = self.state.lock().await;
                state.shadow.is_playing = false;
                state.shadow.current_time_secs = 0.0;
            }
        }
    }

    /// Poll the widget position while playing, not promoted and not dragging
    async fn ensure_polling(&self) {
        if self.deck.is_promoted(self.url()).await {
            return;
        }
        let mut state = self.state.lock().await;
        if state.poller.as_ref().is_some_and(|p| !p.is_finished()) {
            return;
        }
        if !state.shadow.is_playing || state.drag_preview.is_some() {
            return;
        }
        let Some(widget) = state.widget.clone() else {
            return;
        };

        let card = self.clone();
        let task = tokio::spawn(async move { card.run_poller(widget).await });
        state.poller = Some(task.abort_handle());
    }

    async fn run_poller(&self, widget: Arc<dyn WidgetControl>) {
        let mut interval = tokio::time::interval(self.deck.timings().position_poll());
        interval.tick().await;

        loop {
            interval.tick().await;

            let promoted = self.deck.is_promoted(self.url()).await;
            {
                let mut state = self.state.lock().await;
                if promoted || !state.shadow.is_playing || state.drag_preview.is_some() {
                    state.poller = None;
                    return;
                }
            }

            let Ok(position) = widget.position_ms().await else {
                continue;
            };
            let mut state = self.state.lock().await;
            if state.drag_preview.is_none() && !state.seek_window.is_active() {
                state.shadow.current_time_secs = clamp_time(ms_to_secs(position), state.shadow.duration_secs);
            }
        }
    }

    async fn run_notice_listener(&self, mut notices: broadcast::Receiver<DeckNotice>) {
        loop {
            match notices.recv().await {
                Ok(DeckNotice::SurfaceDestroyed { url }) if url == self.track.url => {
                    self.on_surface_destroyed().await;
                }
                Ok(DeckNotice::CloseLocalModal) => self.close_modal().await,
                // Still playing after losing the promotion: track the position locally again
                Ok(DeckNotice::Promoted { url }) if url != self.track.url => self.ensure_polling().await,
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(url = self.url(), skipped, "Card missed coordinator notices");
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    /// The surface is gone: back to a closed, not-ready card
    async fn on_surface_destroyed(&self) {
        let was_open = {
            let mut state = self.state.lock().await;
            state.stop_tasks();
            state.widget = None;
            state.active = false;
            state.drag_preview = None;
            state.seek_window.close();
            state.shadow = LocalShadow {
                is_liked: state.shadow.is_liked,
                ..LocalShadow::default()
            };
            std::mem::replace(&mut state.modal_open, false)
        };

        if was_open {
            self.deck.set_local_modal_open(false).await;
        }
        tracing::debug!(url = self.url(), "Card reset after surface teardown");
    }
}
