//! Mini-player bars: the global one for the promoted track and a card's own

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Gauge},
    Frame,
};

use crate::controller::CardView;
use crate::model::{CardDisplay, DeckSnapshot, DisplaySource};
use crate::widget::embed::display_name;
use super::utils::format_time;

pub fn render_mini_player(frame: &mut Frame, area: Rect, deck: &DeckSnapshot) {
    let Some(track) = &deck.promoted else {
        return;
    };
    let display = CardDisplay::new(DisplaySource::Promoted(deck.playback), true, None);
    let name = display_name(&track.metadata.author_name, &track.metadata.title);

    render_bar(
        frame,
        area,
        &name,
        "Space play/pause | m expand | x dismiss",
        &display,
        Color::Green,
    );
}

/// Bar for a card that played but no longer owns the global mini-player
pub fn render_card_mini_player(frame: &mut Frame, area: Rect, card: &CardView) {
    let name = display_name(&card.metadata.author_name, &card.metadata.title);
    render_bar(frame, area, &name, "Enter open card", &card.display, Color::Cyan);
}

fn render_bar(
    frame: &mut Frame,
    area: Rect,
    name: &str,
    hints: &str,
    display: &CardDisplay,
    color: Color,
) {
    let status_text = if display.is_playing {
        format!(" ▶ {}", name)
    } else {
        format!(" ⏸  {}", name)
    };
    let like_text = if display.is_liked { "♥ Liked" } else { "♡" };
    let controls_info = format!(" {} | {} ", like_text, hints);

    let time_str = format!(
        "{} / {}",
        format_time(display.current_time_secs),
        format_time(display.duration_secs)
    );

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("{} ", status_text))
                .title_bottom(Line::from(controls_info).right_aligned()),
        )
        .gauge_style(Style::default().fg(color))
        .ratio(display.progress_ratio())
        .label(time_str);

    frame.render_widget(gauge, area);
}
