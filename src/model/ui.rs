//! Terminal UI state

/// UI state for the application
#[derive(Clone, Debug, Default)]
pub struct UiState {
    /// Index of the highlighted card
    pub selected: usize,
    pub show_status_panel: bool,
    pub should_quit: bool,
    /// Scrubber preview on the global modal while the mouse drags it
    pub modal_drag: Option<f64>,
}

impl UiState {
    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self, card_count: usize) {
        if self.selected + 1 < card_count {
            self.selected += 1;
        }
    }
}
