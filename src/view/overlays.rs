//! Overlay rendering (player modals, status panel)

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::model::{CardDisplay, DeckSnapshot, TrackMetadata};
use super::utils::{format_time, truncate_string};
use super::ModalLayout;

/// Card modal or, with `global`, the page-wide modal of the promoted track
pub fn render_player_modal(
    frame: &mut Frame,
    layout: &ModalLayout,
    metadata: &TrackMetadata,
    display: &CardDisplay,
    global: bool,
) {
    let accent = if global { Color::Magenta } else { Color::Cyan };
    let title = if global { " Now Playing (Esc to close) " } else { " Player (Esc to close) " };

    frame.render_widget(Clear, layout.outer);
    frame.render_widget(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(accent))
            .title(title)
            .title_style(Style::default().fg(accent).add_modifier(Modifier::BOLD))
            .style(Style::default().bg(Color::Black)),
        layout.outer,
    );

    let width = layout.info.width as usize;
    let label = Style::default().fg(Color::DarkGray);

    let mut lines = vec![
        Line::from(Span::styled(
            truncate_string(&metadata.title, width),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            truncate_string(&metadata.author_name, width),
            Style::default().fg(accent),
        )),
        Line::from(vec![
            Span::styled("Link: ", label),
            Span::raw(truncate_string(&metadata.external_url, width.saturating_sub(6))),
        ]),
    ];
    if !metadata.artwork_url.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("Artwork: ", label),
            Span::raw(truncate_string(&metadata.artwork_url, width.saturating_sub(9))),
        ]));
    }
    if let Some(shop) = &metadata.shop_link {
        lines.push(Line::from(vec![
            Span::styled("Shop: ", label),
            Span::raw(truncate_string(shop, width.saturating_sub(6))),
        ]));
    }

    let state = match (display.is_ready, display.is_playing) {
        (false, _) => Span::styled("Loading player...", Style::default().fg(Color::Yellow)),
        (true, true) => Span::styled("▶ Playing", Style::default().fg(Color::Green)),
        (true, false) => Span::styled("⏸ Paused", Style::default().fg(Color::White)),
    };
    let like = if display.is_liked {
        Span::styled("  ♥ Liked", Style::default().fg(Color::Red))
    } else {
        Span::styled("  ♡", label)
    };
    lines.push(Line::from(vec![state, like]));

    if let Some(bio) = &metadata.bio {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(bio.as_str(), label)));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), layout.info);

    let time_str = format!(
        "{} / {}",
        format_time(display.current_time_secs),
        format_time(display.duration_secs)
    );
    let gauge_color = if display.is_dragging { Color::Yellow } else { Color::Green };
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(gauge_color).bg(Color::DarkGray))
        .ratio(display.progress_ratio())
        .label(time_str);
    frame.render_widget(gauge, layout.gauge);

    let hints = if display.can_seek() {
        " Space play/pause · l like · ←/→ seek · drag bar to scrub "
    } else {
        " Space play/pause · l like "
    };
    frame.render_widget(
        Paragraph::new(hints).style(Style::default().fg(Color::DarkGray)),
        layout.hints,
    );
}

/// Registry, promoted track, visibility and playback numbers
pub fn render_status_panel(frame: &mut Frame, area: Rect, deck: &DeckSnapshot) {
    let label = Style::default().fg(Color::DarkGray);
    let width = area.width.saturating_sub(4) as usize;

    let mut lines = vec![Line::from(Span::styled(
        format!("Surfaces ({})", deck.surfaces.len()),
        Style::default().add_modifier(Modifier::BOLD),
    ))];

    for surface in &deck.surfaces {
        let flags = format!(
            "{}{}",
            if surface.has_played { "played " } else { "" },
            if surface.has_control_handle { "bound" } else { "loading" }
        );
        lines.push(Line::from(truncate_string(&surface.url, width)));
        lines.push(Line::from(vec![
            Span::styled("  ", label),
            Span::styled(flags, Style::default().fg(Color::Cyan)),
            Span::styled(format!("  since {}", surface.created_at.format("%H:%M:%S")), label),
        ]));
    }

    lines.push(Line::from(""));
    let promoted = deck
        .promoted
        .as_ref()
        .map(|t| t.url.as_str())
        .unwrap_or("none");
    lines.push(Line::from(vec![
        Span::styled("Promoted: ", label),
        Span::raw(truncate_string(promoted, width.saturating_sub(10))),
    ]));

    let playback = &deck.playback;
    lines.push(Line::from(vec![
        Span::styled("Playback: ", label),
        Span::raw(format!(
            "{} {} / {}{}",
            if playback.is_playing { "playing" } else { "stopped" },
            format_time(playback.current_time_secs),
            format_time(playback.duration_secs),
            if playback.is_liked { " liked" } else { "" }
        )),
    ]));

    let visibility = deck.visibility;
    lines.push(Line::from(vec![
        Span::styled("Visible: ", label),
        Span::raw(format!(
            "mini={} modal={} local={}",
            visibility.mini_player_visible, visibility.modal_visible, visibility.local_modal_open
        )),
    ]));

    let panel = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Status (s to hide) ")
            .border_style(Style::default().fg(Color::Yellow)),
    );
    frame.render_widget(panel, area);
}
