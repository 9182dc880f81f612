//! Layout rendering (profile header, card list)

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, ListItem, Padding, Paragraph},
    Frame,
};

use crate::controller::AppSnapshot;
use crate::model::MAX_SURFACES;
use crate::widget::embed::display_name;
use super::utils::{format_time, render_scrollable_list, truncate_string};

pub fn render_header(frame: &mut Frame, area: Rect, snapshot: &AppSnapshot) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),     // Profile name
            Constraint::Length(20), // Live surfaces
        ])
        .split(area);

    let title = Paragraph::new(snapshot.title.as_str())
        .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Profile ")
                .padding(Padding::horizontal(1)),
        );
    frame.render_widget(title, chunks[0]);

    let live = snapshot.deck.surfaces.len();
    let players = Paragraph::new(format!("{} / {} live", live, MAX_SURFACES))
        .style(Style::default().fg(if live < MAX_SURFACES { Color::Cyan } else { Color::Yellow }))
        .block(Block::default().borders(Borders::ALL).title(" Players "));
    frame.render_widget(players, chunks[1]);
}

pub fn render_card_list(frame: &mut Frame, area: Rect, snapshot: &AppSnapshot) {
    let promoted_url = snapshot.deck.promoted.as_ref().map(|t| t.url.as_str());
    let name_width = (area.width as usize).saturating_sub(24);

    let items: Vec<ListItem> = snapshot
        .cards
        .iter()
        .enumerate()
        .map(|(i, card)| {
            let is_selected = i == snapshot.ui.selected;
            let is_promoted = promoted_url == Some(card.url.as_str());

            let marker = if is_promoted {
                if card.display.is_playing { "▶" } else { "⏸" }
            } else if snapshot.is_live(&card.url) {
                "●"
            } else {
                " "
            };
            let liked = if card.display.is_liked { "♥" } else { " " };
            let name = display_name(&card.metadata.author_name, &card.metadata.title);
            let length = if card.display.duration_secs > 0.0 {
                format_time(card.display.duration_secs)
            } else {
                String::new()
            };

            let text = format!(
                " {} {} {:<width$} {:>6}",
                marker,
                liked,
                truncate_string(&name, name_width),
                length,
                width = name_width
            );

            let style = if is_selected {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Green)
                    .add_modifier(Modifier::BOLD)
            } else if is_promoted {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::White)
            };

            ListItem::new(text).style(style)
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Tracks (↑↓ Enter) ")
        .title_style(Style::default().add_modifier(Modifier::BOLD));

    render_scrollable_list(frame, area, items, snapshot.ui.selected, block);
}
