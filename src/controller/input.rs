//! Key and mouse event handling

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::model::clamp_time;
use crate::view::{gauge_contains, gauge_fraction, modal_layout};
use super::AppController;

/// Seconds moved by ←/→
const SEEK_STEP_SECS: f64 = 10.0;

impl AppController {
    pub async fn handle_key_event(&self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        let quit = matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL));
        if quit {
            self.ui().await.should_quit = true;
            return Ok(());
        }
        if matches!(key.code, KeyCode::Char('s') | KeyCode::Char('S')) {
            let mut ui = self.ui().await;
            ui.show_status_panel = !ui.show_status_panel;
            return Ok(());
        }

        let deck = self.deck();

        // Global modal on top
        let snapshot = deck.snapshot().await;
        if snapshot.visibility.modal_visible && snapshot.promoted.is_some() {
            match key.code {
                KeyCode::Esc | KeyCode::Char('m') | KeyCode::Char('M') => {
                    self.ui().await.modal_drag = None;
                    deck.hide_modal().await;
                }
                KeyCode::Char(' ') => deck.toggle_play().await,
                KeyCode::Char('l') | KeyCode::Char('L') => deck.toggle_like().await,
                KeyCode::Left => deck.seek_to(snapshot.playback.current_time_secs - SEEK_STEP_SECS).await,
                KeyCode::Right => deck.seek_to(snapshot.playback.current_time_secs + SEEK_STEP_SECS).await,
                KeyCode::Char('x') | KeyCode::Char('X') => {
                    deck.hide_modal().await;
                    deck.hide_mini_player().await;
                }
                _ => {}
            }
            return Ok(());
        }

        // Then an open card player
        if let Some(card) = self.open_card().await {
            match key.code {
                KeyCode::Esc => card.close_modal().await,
                KeyCode::Char(' ') => card.toggle_play().await,
                KeyCode::Char('l') | KeyCode::Char('L') => card.toggle_like().await,
                KeyCode::Left => card.seek_relative(-SEEK_STEP_SECS).await,
                KeyCode::Right => card.seek_relative(SEEK_STEP_SECS).await,
                KeyCode::Char('m') | KeyCode::Char('M') => {
                    if snapshot.promoted.is_some() {
                        // Closes this card through the CloseLocalModal notice
                        deck.show_modal().await;
                    }
                }
                _ => {}
            }
            return Ok(());
        }

        // Card list
        match key.code {
            KeyCode::Up => self.ui().await.move_up(),
            KeyCode::Down => {
                let count = self.cards().len();
                self.ui().await.move_down(count);
            }
            KeyCode::Enter => self.open_selected().await,
            KeyCode::Char(' ') => deck.toggle_play().await,
            KeyCode::Char('l') | KeyCode::Char('L') => deck.toggle_like().await,
            KeyCode::Char('m') | KeyCode::Char('M') => {
                if snapshot.promoted.is_some() {
                    deck.show_modal().await;
                }
            }
            KeyCode::Char('x') | KeyCode::Char('X') => deck.hide_mini_player().await,
            _ => {}
        }
        Ok(())
    }

    /// Press, drag and release on a modal's progress gauge. `area` is the terminal size.
    pub async fn handle_mouse_event(&self, mouse: MouseEvent, area: Rect) -> Result<()> {
        let gauge = modal_layout(area).gauge;
        let fraction = gauge_fraction(gauge, mouse.column);
        let on_gauge = gauge_contains(gauge, mouse.column, mouse.row);

        let deck = self.deck();
        let snapshot = deck.snapshot().await;

        if snapshot.visibility.modal_visible && snapshot.promoted.is_some() {
            let duration = snapshot.playback.duration_secs;
            let can_seek = duration > 0.0
                && snapshot
                    .surfaces
                    .iter()
                    .any(|s| Some(&s.url) == snapshot.promoted.as_ref().map(|t| &t.url) && s.has_control_handle);

            match mouse.kind {
                MouseEventKind::Down(MouseButton::Left) if on_gauge && can_seek => {
                    self.ui().await.modal_drag = Some(clamp_time(fraction * duration, duration));
                }
                MouseEventKind::Drag(MouseButton::Left) => {
                    let mut ui = self.ui().await;
                    if ui.modal_drag.is_some() {
                        ui.modal_drag = Some(clamp_time(fraction * duration, duration));
                    }
                }
                MouseEventKind::Up(MouseButton::Left) => {
                    let preview = self.ui().await.modal_drag.take();
                    if preview.is_some() {
                        deck.seek_to(clamp_time(fraction * duration, duration)).await;
                    }
                }
                _ => {}
            }
            return Ok(());
        }

        if let Some(card) = self.open_card().await {
            match mouse.kind {
                MouseEventKind::Down(MouseButton::Left) if on_gauge => card.begin_drag(fraction).await,
                MouseEventKind::Drag(MouseButton::Left) => {
                    if card.display().await.is_dragging {
                        card.drag_to(fraction).await;
                    }
                }
                MouseEventKind::Up(MouseButton::Left) => {
                    if card.display().await.is_dragging {
                        card.drag_to(fraction).await;
                        card.end_drag().await;
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }
}
