mod common;

use common::*;
use linkdeck::config::Timings;
use linkdeck::controller::{CardController, DeckController};
use linkdeck::model::Track;
use linkdeck::widget::{WidgetCommand, WidgetControl, WidgetEvent};

fn card(url: &str, deck: &DeckController) -> CardController {
    let track = Track {
        url: url.to_string(),
        metadata: meta(url.rsplit('/').next().unwrap_or(url)),
        duration_secs: None,
    };
    CardController::spawn(track, deck.clone())
}

async fn open_ready(card: &CardController) {
    assert!(card.open_modal().await);
    settle(LOAD_DELAY.as_millis() as u64 + 10).await;
}

/// Slow eviction and fast polling, so a demoted card keeps playing for a while
fn polling_deck() -> (std::sync::Arc<linkdeck::widget::SimulatedEmbedFactory>, DeckController) {
    let factory = manual_factory();
    let timings = Timings {
        eviction_delay_ms: 10_000,
        position_poll_ms: 100,
        ..Timings::default()
    };
    (factory.clone(), DeckController::new(factory, timings))
}

/// A plays and is promoted, then B takes over while A keeps playing
async fn demote_playing(a: &CardController, b: &CardController) {
    open_ready(a).await;
    open_ready(b).await;
    a.toggle_play().await;
    settle(10).await;
    b.toggle_play().await;
    settle(10).await;
}

#[tokio::test(start_paused = true)]
async fn test_open_modal_shows_local_state_once_ready() {
    let factory = manual_factory();
    let deck = deck_with(factory.clone());
    let a = card(A, &deck);

    assert!(a.open_modal().await);
    assert!(a.is_modal_open().await);
    assert!(!a.display().await.is_ready);
    assert!(deck.snapshot().await.visibility.local_modal_open);

    settle(LOAD_DELAY.as_millis() as u64 + 10).await;
    let display = a.display().await;
    assert!(display.is_ready);
    assert!(!display.is_promoted);
    assert_eq!(display.duration_secs, 200.0);
    assert!(display.can_seek());

    let status = deck.status().await;
    assert_eq!(urls(&status), vec![A]);
    assert!(status[0].has_control_handle);
}

#[tokio::test(start_paused = true)]
async fn test_third_card_cannot_open() {
    let deck = deck_with(manual_factory());
    let (a, b, c) = (card(A, &deck), card(B, &deck), card(C, &deck));

    assert!(a.open_modal().await);
    assert!(b.open_modal().await);
    assert!(!c.open_modal().await);
    assert!(!c.is_modal_open().await);
}

#[tokio::test(start_paused = true)]
async fn test_close_without_play_releases_surface() {
    let factory = manual_factory();
    let deck = deck_with(factory.clone());
    let a = card(A, &deck);

    open_ready(&a).await;
    a.close_modal().await;
    settle(150).await;

    assert!(deck.status().await.is_empty());
    assert!(factory.mounted_urls().is_empty());
    assert!(!a.display().await.is_ready);
    assert!(!deck.snapshot().await.visibility.local_modal_open);
}

#[tokio::test(start_paused = true)]
async fn test_play_promotes_and_evicts_sibling_card() {
    let factory = manual_factory();
    let deck = deck_with(factory.clone());
    let (a, b) = (card(A, &deck), card(B, &deck));

    open_ready(&a).await;
    open_ready(&b).await;

    b.toggle_play().await;
    settle(10).await;

    let display = b.display().await;
    assert!(display.is_promoted);
    assert!(display.is_playing);
    assert_eq!(display.duration_secs, 300.0);
    assert_eq!(deck.promoted_url().await.as_deref(), Some(B));
    assert!(b.view().await.active);

    settle(600).await;
    assert_eq!(urls(&deck.status().await), vec![B]);

    // The evicted card is back to a closed, not-ready card
    assert!(!a.is_modal_open().await);
    let display = a.display().await;
    assert!(!display.is_ready);
    assert!(!display.is_promoted);
    assert!(!a.view().await.active);
}

#[tokio::test(start_paused = true)]
async fn test_promoted_card_reads_global_state() {
    let factory = manual_factory();
    let deck = deck_with(factory.clone());
    let a = card(A, &deck);

    open_ready(&a).await;
    a.toggle_play().await;
    settle(10).await;

    a.toggle_like().await;
    assert!(deck.promoted_playback().await.1.is_liked);
    assert!(a.display().await.is_liked);

    a.seek_relative(30.0).await;
    assert_eq!(deck.promoted_playback().await.1.current_time_secs, 30.0);
    assert_eq!(a.display().await.current_time_secs, 30.0);

    a.toggle_play().await;
    settle(10).await;
    assert!(!a.display().await.is_playing);

    let sim = factory.simulated(A).unwrap();
    assert_eq!(
        sim.commands(),
        vec![WidgetCommand::Play, WidgetCommand::SeekTo(30_000), WidgetCommand::Pause]
    );
}

#[tokio::test(start_paused = true)]
async fn test_local_seek_suppresses_progress() {
    let factory = manual_factory();
    let deck = deck_with(factory.clone());
    let a = card(A, &deck);
    open_ready(&a).await;

    a.seek_relative(30.0).await;
    assert_eq!(a.display().await.current_time_secs, 30.0);

    let sim = factory.simulated(A).unwrap();
    sim.emit(WidgetEvent::Progress { position_ms: 1_000 });
    settle(10).await;
    assert_eq!(a.display().await.current_time_secs, 30.0);

    settle(900).await;
    sim.emit(WidgetEvent::Progress { position_ms: 31_000 });
    settle(10).await;
    assert_eq!(a.display().await.current_time_secs, 31.0);
    assert_eq!(sim.commands(), vec![WidgetCommand::SeekTo(30_000)]);
}

#[tokio::test(start_paused = true)]
async fn test_drag_previews_then_commits() {
    let factory = manual_factory();
    let deck = deck_with(factory.clone());
    let a = card(A, &deck);
    open_ready(&a).await;

    a.begin_drag(0.25).await;
    a.drag_to(0.5).await;
    let display = a.display().await;
    assert!(display.is_dragging);
    assert_eq!(display.current_time_secs, 100.0);

    // No seek until the drag ends
    let sim = factory.simulated(A).unwrap();
    assert!(sim.commands().is_empty());

    a.end_drag().await;
    let display = a.display().await;
    assert!(!display.is_dragging);
    assert_eq!(display.current_time_secs, 100.0);
    assert_eq!(sim.commands(), vec![WidgetCommand::SeekTo(100_000)]);
}

#[tokio::test(start_paused = true)]
async fn test_drag_ignored_before_ready() {
    let deck = deck_with(manual_factory());
    let a = card(A, &deck);
    assert!(a.open_modal().await);

    a.begin_drag(0.5).await;
    assert!(!a.display().await.is_dragging);
}

#[tokio::test(start_paused = true)]
async fn test_global_modal_closes_card_modal() {
    let factory = manual_factory();
    let deck = deck_with(factory.clone());
    let (a, b) = (card(A, &deck), card(B, &deck));

    open_ready(&a).await;
    a.toggle_play().await;
    settle(10).await;
    a.close_modal().await;

    open_ready(&b).await;
    deck.show_modal().await;
    settle(150).await;

    assert!(!b.is_modal_open().await);
    let visibility = deck.snapshot().await.visibility;
    assert!(visibility.modal_visible);
    assert!(!visibility.local_modal_open);
    // B never played, so closing it released its surface
    assert_eq!(urls(&deck.status().await), vec![A]);
}

#[tokio::test(start_paused = true)]
async fn test_reopen_promoted_card_reuses_surface() {
    let factory = manual_factory();
    let deck = deck_with(factory.clone());
    let a = card(A, &deck);

    open_ready(&a).await;
    a.toggle_play().await;
    settle(10).await;
    a.close_modal().await;
    settle(150).await;

    assert!(a.open_modal().await);
    let status = deck.status().await;
    assert_eq!(urls(&status), vec![A]);
    assert!(status[0].has_played);
    assert!(a.display().await.is_playing);
}

#[tokio::test(start_paused = true)]
async fn test_demoted_playing_card_polls_position() {
    let (factory, deck) = polling_deck();
    let (a, b) = (card(A, &deck), card(B, &deck));
    demote_playing(&a, &b).await;

    let display = a.display().await;
    assert!(!display.is_promoted);
    assert!(display.is_playing);
    assert_eq!(display.current_time_secs, 0.0);

    // Moves the playhead without emitting progress events
    let sim = factory.simulated(A).unwrap();
    sim.seek_to(12_000).unwrap();
    settle(150).await;
    assert_eq!(a.display().await.current_time_secs, 12.0);

    sim.pause().unwrap();
    settle(10).await;
    sim.seek_to(40_000).unwrap();
    settle(300).await;
    let display = a.display().await;
    assert!(!display.is_playing);
    assert_eq!(display.current_time_secs, 12.0);
}

#[tokio::test(start_paused = true)]
async fn test_polling_respects_local_seek_window() {
    let (factory, deck) = polling_deck();
    let (a, b) = (card(A, &deck), card(B, &deck));
    demote_playing(&a, &b).await;

    a.seek_relative(20.0).await;
    let sim = factory.simulated(A).unwrap();
    sim.seek_to(50_000).unwrap();

    settle(300).await;
    assert_eq!(a.display().await.current_time_secs, 20.0);

    settle(650).await;
    assert_eq!(a.display().await.current_time_secs, 50.0);
}

#[tokio::test(start_paused = true)]
async fn test_drag_holds_polling_until_commit() {
    let (factory, deck) = polling_deck();
    let (a, b) = (card(A, &deck), card(B, &deck));
    demote_playing(&a, &b).await;

    a.begin_drag(0.1).await;
    let sim = factory.simulated(A).unwrap();
    sim.seek_to(90_000).unwrap();
    settle(300).await;
    let display = a.display().await;
    assert!(display.is_dragging);
    assert_eq!(display.current_time_secs, 20.0);

    a.end_drag().await;
    assert_eq!(a.display().await.current_time_secs, 20.0);

    // Polling resumes after the commit's suppression window
    sim.seek_to(25_000).unwrap();
    settle(950).await;
    assert_eq!(a.display().await.current_time_secs, 25.0);
}

#[tokio::test(start_paused = true)]
async fn test_promoted_card_does_not_poll() {
    let factory = manual_factory();
    let deck = deck_with(factory.clone());
    let a = card(A, &deck);
    open_ready(&a).await;
    a.toggle_play().await;
    settle(10).await;

    let sim = factory.simulated(A).unwrap();
    sim.seek_to(60_000).unwrap();
    settle(1_200).await;

    // The promoted card reads the mirrored state, which only moves on widget events
    let display = a.display().await;
    assert!(display.is_promoted);
    assert_eq!(display.current_time_secs, 0.0);
    assert_eq!(deck.promoted_playback().await.1.current_time_secs, 0.0);

    // Back on local state, the shadow position was never polled
    deck.hide_mini_player().await;
    settle(10).await;
    let display = a.display().await;
    assert!(!display.is_promoted);
    assert_eq!(display.current_time_secs, 0.0);
}
