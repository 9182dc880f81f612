//! Terminal application controller: owns the cards and the UI state

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;

use crate::model::{DeckSnapshot, Track, UiState};
use super::{CardController, CardView, DeckController};

/// Everything one frame renders, read in a single pass
#[derive(Clone, Debug)]
pub struct AppSnapshot {
    pub title: String,
    pub cards: Vec<CardView>,
    pub deck: DeckSnapshot,
    pub ui: UiState,
}

impl AppSnapshot {
    /// Index of the card whose local modal is open
    pub fn open_card(&self) -> Option<usize> {
        self.cards.iter().position(|c| c.modal_open)
    }

    /// Card whose own mini-player shows: it has played but is not the promoted track
    pub fn local_mini_player(&self) -> Option<usize> {
        self.cards
            .iter()
            .position(|c| c.active && !c.display.is_promoted)
    }

    pub fn is_live(&self, url: &str) -> bool {
        self.deck.surfaces.iter().any(|s| s.url == url)
    }
}

#[derive(Serialize)]
struct StatusReport<'a> {
    profile: &'a str,
    tracks: Vec<&'a Track>,
    deck: DeckSnapshot,
}

#[derive(Clone)]
pub struct AppController {
    deck: DeckController,
    cards: Arc<Vec<CardController>>,
    ui: Arc<Mutex<UiState>>,
    title: Arc<String>,
}

impl AppController {
    pub fn new(deck: DeckController, tracks: Vec<Track>, title: &str) -> Self {
        let cards = tracks
            .into_iter()
            .map(|track| CardController::spawn(track, deck.clone()))
            .collect();

        Self {
            deck,
            cards: Arc::new(cards),
            ui: Arc::new(Mutex::new(UiState::default())),
            title: Arc::new(title.to_string()),
        }
    }

    pub fn deck(&self) -> &DeckController {
        &self.deck
    }

    pub fn cards(&self) -> &[CardController] {
        &self.cards
    }

    pub fn card(&self, index: usize) -> Option<&CardController> {
        self.cards.get(index)
    }

    pub(crate) async fn ui(&self) -> tokio::sync::MutexGuard<'_, UiState> {
        self.ui.lock().await
    }

    pub async fn should_quit(&self) -> bool {
        self.ui.lock().await.should_quit
    }

    /// The card with an open local modal, if any
    pub async fn open_card(&self) -> Option<&CardController> {
        for card in self.cards.iter() {
            if card.is_modal_open().await {
                return Some(card);
            }
        }
        None
    }

    /// Open the highlighted card's player, closing any other card first
    pub async fn open_selected(&self) {
        let selected = self.ui.lock().await.selected;
        let Some(card) = self.card(selected) else {
            return;
        };

        if let Some(open) = self.open_card().await {
            if open.url() == card.url() {
                return;
            }
            open.close_modal().await;
        }
        card.open_modal().await;
    }

    pub async fn snapshot(&self) -> AppSnapshot {
        let mut cards = Vec::with_capacity(self.cards.len());
        for card in self.cards.iter() {
            cards.push(card.view().await);
        }

        AppSnapshot {
            title: self.title.to_string(),
            cards,
            deck: self.deck.snapshot().await,
            ui: self.ui.lock().await.clone(),
        }
    }

    /// Profile summary and coordinator state as pretty JSON
    pub async fn status_json(&self) -> serde_json::Result<String> {
        let report = StatusReport {
            profile: &self.title,
            tracks: self.cards.iter().map(|c| c.track()).collect(),
            deck: self.deck.snapshot().await,
        };
        serde_json::to_string_pretty(&report)
    }

    pub async fn shutdown(&self) {
        for card in self.cards.iter() {
            card.shutdown().await;
        }
        tracing::debug!("Card listeners stopped");
    }
}
