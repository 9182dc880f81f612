//! In-process widget used by the terminal demo and the tests.
//!
//! Each embed gets a `SimulatedWidget` that signals `Ready` after a load delay
//! and, when a tick interval is configured, advances its position while playing
//! and pushes `Progress`/`Finish` events like the hosted player does.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::error::{Result, WidgetError};
use super::embed::EmbedOptions;
use super::traits::{EmbedFactory, EmbedHandle, WidgetControl, WidgetEvent};

const EVENT_CAPACITY: usize = 64;
const DEFAULT_DURATION_MS: u64 = 180_000;

/// Commands received by a simulated widget, recorded for inspection
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WidgetCommand {
    Play,
    Pause,
    SeekTo(u64),
}

#[derive(Clone, Debug)]
pub struct SimulatedOptions {
    /// Delay between mounting the embed and the `Ready` event
    pub load_delay: Duration,
    /// Progress tick; `None` leaves the position still until events are injected
    pub tick: Option<Duration>,
    pub embed: EmbedOptions,
}

impl Default for SimulatedOptions {
    fn default() -> Self {
        Self {
            load_delay: Duration::from_millis(300),
            tick: Some(Duration::from_millis(250)),
            embed: EmbedOptions::default(),
        }
    }
}

#[derive(Debug)]
struct SimState {
    position_ms: u64,
    playing: bool,
    ready: bool,
    commands: Vec<WidgetCommand>,
}

#[derive(Debug)]
pub struct SimulatedWidget {
    url: String,
    duration_ms: u64,
    state: Mutex<SimState>,
    events: Mutex<Option<broadcast::Sender<WidgetEvent>>>,
}

impl SimulatedWidget {
    fn new(url: &str, duration_ms: u64) -> Self {
        let (tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            url: url.to_string(),
            duration_ms,
            state: Mutex::new(SimState {
                position_ms: 0,
                playing: false,
                ready: false,
                commands: Vec::new(),
            }),
            events: Mutex::new(Some(tx)),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Push an event to every current listener, as the hosted widget would
    pub fn emit(&self, event: WidgetEvent) {
        {
            let mut state = self.lock_state();
            match event {
                WidgetEvent::Ready => state.ready = true,
                WidgetEvent::Play => state.playing = true,
                WidgetEvent::Pause => state.playing = false,
                WidgetEvent::Progress { position_ms } => state.position_ms = position_ms,
                WidgetEvent::Finish => {
                    state.playing = false;
                    state.position_ms = self.duration_ms;
                }
            }
        }

        let events = self.events.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(tx) = events.as_ref() {
            // No receivers is fine: nobody is listening yet
            let _ = tx.send(event);
        }
    }

    pub fn commands(&self) -> Vec<WidgetCommand> {
        self.lock_state().commands.clone()
    }

    pub fn is_bound(&self) -> bool {
        self.events.lock().unwrap_or_else(|p| p.into_inner()).is_some()
    }

    pub fn listener_count(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .as_ref()
            .map(|tx| tx.receiver_count())
            .unwrap_or(0)
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn ensure_ready(&self) -> Result<()> {
        if !self.is_bound() {
            return Err(WidgetError::Unbound(self.url.clone()));
        }
        if !self.lock_state().ready {
            return Err(WidgetError::NotReady(self.url.clone()));
        }
        Ok(())
    }

    /// Advance the playhead by `elapsed` and report it
    fn advance(&self, elapsed: Duration) {
        let (position_ms, finished) = {
            let state = self.lock_state();
            if !state.playing {
                return;
            }
            let next = state.position_ms.saturating_add(elapsed.as_millis() as u64);
            (next.min(self.duration_ms), next >= self.duration_ms)
        };

        if finished {
            self.emit(WidgetEvent::Finish);
        } else {
            self.emit(WidgetEvent::Progress { position_ms });
        }
    }
}

#[async_trait]
impl WidgetControl for SimulatedWidget {
    fn play(&self) -> Result<()> {
        self.ensure_ready()?;
        let restart = {
            let mut state = self.lock_state();
            state.commands.push(WidgetCommand::Play);
            state.position_ms >= self.duration_ms
        };
        if restart {
            self.lock_state().position_ms = 0;
        }
        self.emit(WidgetEvent::Play);
        Ok(())
    }

    fn pause(&self) -> Result<()> {
        self.ensure_ready()?;
        self.lock_state().commands.push(WidgetCommand::Pause);
        self.emit(WidgetEvent::Pause);
        Ok(())
    }

    fn seek_to(&self, position_ms: u64) -> Result<()> {
        self.ensure_ready()?;
        let mut state = self.lock_state();
        state.commands.push(WidgetCommand::SeekTo(position_ms));
        state.position_ms = position_ms.min(self.duration_ms);
        Ok(())
    }

    async fn duration_ms(&self) -> Result<u64> {
        self.ensure_ready()?;
        Ok(self.duration_ms)
    }

    async fn position_ms(&self) -> Result<u64> {
        self.ensure_ready()?;
        Ok(self.lock_state().position_ms)
    }

    async fn is_paused(&self) -> Result<bool> {
        self.ensure_ready()?;
        Ok(!self.lock_state().playing)
    }

    fn subscribe(&self) -> Result<broadcast::Receiver<WidgetEvent>> {
        self.events
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .as_ref()
            .map(|tx| tx.subscribe())
            .ok_or_else(|| WidgetError::Unbound(self.url.clone()))
    }

    fn unbind_all(&self) {
        let mut events = self.events.lock().unwrap_or_else(|p| p.into_inner());
        if events.take().is_some() {
            tracing::trace!(url = %self.url, "Widget bindings dropped");
        }
        self.lock_state().playing = false;
    }
}

struct Mounted {
    url: String,
    widget: Arc<SimulatedWidget>,
}

/// Embed factory backed by `SimulatedWidget`s
pub struct SimulatedEmbedFactory {
    options: SimulatedOptions,
    durations: HashMap<String, u64>,
    next_id: AtomicU64,
    mounted: Mutex<HashMap<u64, Mounted>>,
}

impl SimulatedEmbedFactory {
    pub fn new(options: SimulatedOptions) -> Self {
        Self {
            options,
            durations: HashMap::new(),
            next_id: AtomicU64::new(1),
            mounted: Mutex::new(HashMap::new()),
        }
    }

    /// Use a known track length instead of the default for `url`
    pub fn with_duration(mut self, url: &str, duration: Duration) -> Self {
        self.durations.insert(url.to_string(), duration.as_millis() as u64);
        self
    }

    /// Widget currently mounted for `url`, if any
    pub fn simulated(&self, url: &str) -> Option<Arc<SimulatedWidget>> {
        self.lock_mounted()
            .values()
            .find(|m| m.url == url)
            .map(|m| m.widget.clone())
    }

    pub fn mounted_urls(&self) -> Vec<String> {
        let mut urls: Vec<String> = self.lock_mounted().values().map(|m| m.url.clone()).collect();
        urls.sort();
        urls
    }

    fn lock_mounted(&self) -> std::sync::MutexGuard<'_, HashMap<u64, Mounted>> {
        self.mounted.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn spawn_lifecycle(&self, widget: Arc<SimulatedWidget>) {
        let load_delay = self.options.load_delay;
        let tick = self.options.tick;

        tokio::spawn(async move {
            tokio::time::sleep(load_delay).await;
            if !widget.is_bound() {
                return;
            }
            widget.emit(WidgetEvent::Ready);

            let Some(tick) = tick else { return };
            let mut interval = tokio::time::interval(tick);
            interval.tick().await;
            loop {
                interval.tick().await;
                if !widget.is_bound() {
                    break;
                }
                widget.advance(tick);
            }
        });
    }
}

impl EmbedFactory for SimulatedEmbedFactory {
    fn create(&self, url: &str) -> Result<EmbedHandle> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let duration_ms = self.durations.get(url).copied().unwrap_or(DEFAULT_DURATION_MS);
        let widget = Arc::new(SimulatedWidget::new(url, duration_ms));

        self.lock_mounted().insert(
            id,
            Mounted {
                url: url.to_string(),
                widget: widget.clone(),
            },
        );
        self.spawn_lifecycle(widget);

        tracing::debug!(url, id, "Simulated embed mounted");
        Ok(EmbedHandle {
            id,
            src: self.options.embed.embed_src(url),
        })
    }

    fn widget(&self, embed: &EmbedHandle) -> Result<Arc<dyn WidgetControl>> {
        self.lock_mounted()
            .get(&embed.id)
            .map(|m| m.widget.clone() as Arc<dyn WidgetControl>)
            .ok_or(WidgetError::UnknownEmbed(embed.id))
    }

    fn destroy(&self, embed: &EmbedHandle) {
        if let Some(mounted) = self.lock_mounted().remove(&embed.id) {
            mounted.widget.unbind_all();
            tracing::debug!(url = %mounted.url, id = embed.id, "Simulated embed removed");
        }
    }
}
