//! View module - UI rendering
//!
//! This module handles all UI rendering for the application using ratatui.
//! It is organized into submodules by component type:
//!
//! - `utils`: Shared utility functions (formatting, popup geometry, scrollable lists)
//! - `layout`: Header and card list
//! - `progress`: Mini-player bars (global and per card)
//! - `overlays`: Player modals (card and global) and the status panel

mod utils;
mod layout;
mod progress;
mod overlays;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    widgets::{Block, Borders},
    Frame,
};

use crate::controller::AppSnapshot;
use crate::model::{CardDisplay, DisplaySource};

pub use utils::format_time;

const MODAL_WIDTH: u16 = 70;
const MODAL_HEIGHT: u16 = 16;

/// Regions of a player modal, shared by rendering and mouse hit-testing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModalLayout {
    pub outer: Rect,
    pub info: Rect,
    pub gauge: Rect,
    pub hints: Rect,
}

pub fn modal_layout(area: Rect) -> ModalLayout {
    let outer = utils::centered_rect(area, MODAL_WIDTH, MODAL_HEIGHT);
    let inner = Block::default().borders(Borders::ALL).inner(outer);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Track details
            Constraint::Length(1), // Progress gauge
            Constraint::Length(1), // Key hints
        ])
        .split(inner);

    ModalLayout {
        outer,
        info: chunks[0],
        gauge: chunks[1],
        hints: chunks[2],
    }
}

/// Horizontal position of `column` on the gauge as a fraction in `[0, 1]`
pub fn gauge_fraction(gauge: Rect, column: u16) -> f64 {
    if gauge.width <= 1 {
        return 0.0;
    }
    let offset = column.saturating_sub(gauge.x).min(gauge.width - 1);
    offset as f64 / (gauge.width - 1) as f64
}

pub fn gauge_contains(gauge: Rect, column: u16, row: u16) -> bool {
    row == gauge.y && column >= gauge.x && column < gauge.x + gauge.width
}

pub struct AppView;

impl AppView {
    pub fn render(frame: &mut Frame, snapshot: &AppSnapshot) {
        let deck = &snapshot.deck;
        let mini_player = deck.visibility.mini_player_visible && deck.promoted.is_some();
        let local_player = snapshot.local_mini_player();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),                                       // Profile header
                Constraint::Min(0),                                          // Cards (+ status panel)
                Constraint::Length(if local_player.is_some() { 3 } else { 0 }), // Card mini-player
                Constraint::Length(if mini_player { 3 } else { 0 }),         // Mini-player
            ])
            .split(frame.area());

        layout::render_header(frame, chunks[0], snapshot);

        if snapshot.ui.show_status_panel {
            let main_chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
                .split(chunks[1]);
            layout::render_card_list(frame, main_chunks[0], snapshot);
            overlays::render_status_panel(frame, main_chunks[1], deck);
        } else {
            layout::render_card_list(frame, chunks[1], snapshot);
        }

        if let Some(index) = local_player {
            progress::render_card_mini_player(frame, chunks[2], &snapshot.cards[index]);
        }
        if mini_player {
            progress::render_mini_player(frame, chunks[3], deck);
        }

        let modal = modal_layout(frame.area());
        if let Some(index) = snapshot.open_card() {
            let card = &snapshot.cards[index];
            overlays::render_player_modal(frame, &modal, &card.metadata, &card.display, false);
        } else if deck.visibility.modal_visible {
            if let Some(track) = &deck.promoted {
                let is_ready = deck
                    .surfaces
                    .iter()
                    .any(|s| s.url == track.url && s.has_control_handle);
                let display = CardDisplay::new(
                    DisplaySource::Promoted(deck.playback),
                    is_ready,
                    snapshot.ui.modal_drag,
                );
                overlays::render_player_modal(frame, &modal, &track.metadata, &display, true);
            }
        }
    }
}
