//! Controller module - Coordinator logic and presentation adapters
//!
//! `DeckController` is the single writer of the slot registry and of the global
//! playback state. It is organized into submodules by responsibility:
//!
//! - `slots`: acquire / bind / release / status on the slot registry
//! - `promotion`: promotion of a played surface and delayed eviction of its sibling
//! - `playback`: commands on the promoted track (play, like, seek, modal, mini-player)
//! - `widget_events`: mirror of the promoted widget's events into the global state
//! - `deferred`: one-shot delayed tasks and seek suppression windows
//! - `card`: per-card adapter with local shadow state
//! - `app` / `input`: terminal application controller and key/mouse handling

mod slots;
mod promotion;
mod playback;
mod widget_events;
pub mod deferred;
mod card;
mod app;
mod input;

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};

use crate::config::Timings;
use crate::model::{DeckModel, DeckNotice};
use crate::widget::EmbedFactory;
use deferred::{Deferred, SuppressionWindow};
use widget_events::Mirror;

pub use app::{AppController, AppSnapshot};
pub use card::{CardController, CardView};

const NOTICE_CAPACITY: usize = 32;

/// State owned by the coordinator: the model plus its pending timers
#[derive(Default)]
pub(crate) struct DeckState {
    pub(crate) model: DeckModel,
    eviction: Deferred,
    releases: HashMap<String, Deferred>,
    seek_window: SuppressionWindow,
    mirror: Option<Mirror>,
}

/// Dual-slot playback coordinator
#[derive(Clone)]
pub struct DeckController {
    pub(crate) state: Arc<Mutex<DeckState>>,
    factory: Arc<dyn EmbedFactory>,
    notices: broadcast::Sender<DeckNotice>,
    timings: Arc<Timings>,
}

impl DeckController {
    pub fn new(factory: Arc<dyn EmbedFactory>, timings: Timings) -> Self {
        let (notices, _) = broadcast::channel(NOTICE_CAPACITY);
        Self {
            state: Arc::new(Mutex::new(DeckState::default())),
            factory,
            notices,
            timings: Arc::new(timings),
        }
    }

    pub fn factory(&self) -> Arc<dyn EmbedFactory> {
        self.factory.clone()
    }

    pub fn timings(&self) -> &Timings {
        &self.timings
    }

    /// Listen for "surface destroyed" and "close local modal" notices
    pub fn subscribe(&self) -> broadcast::Receiver<DeckNotice> {
        self.notices.subscribe()
    }

    pub(crate) fn notify(&self, notice: DeckNotice) {
        // Nobody listening is not an error
        let _ = self.notices.send(notice);
    }
}
