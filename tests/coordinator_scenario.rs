mod common;

use common::*;
use linkdeck::model::{DeckNotice, MAX_SURFACES};
use linkdeck::widget::{EmbedFactory, WidgetCommand, WidgetControl, WidgetEvent};

/// Bind the widget for `url` once its embed is ready, as a card would
async fn bind_ready(
    deck: &linkdeck::controller::DeckController,
    factory: &linkdeck::widget::SimulatedEmbedFactory,
    url: &str,
) {
    let surface = deck.acquire(url).await.surface.expect("surface");
    let widget = factory.widget(&surface.embed).unwrap();
    settle(LOAD_DELAY.as_millis() as u64 + 5).await;
    deck.bind_control_handle(url, widget).await;
}

#[tokio::test(start_paused = true)]
async fn test_end_to_end_two_slot_scenario() {
    let factory = manual_factory();
    let deck = deck_with(factory.clone());

    let a = deck.acquire(A).await;
    assert!(a.is_new);
    assert_eq!(a.surface.as_ref().map(|s| s.url.as_str()), Some(A));

    let b = deck.acquire(B).await;
    assert!(b.is_new);
    assert!(b.surface.is_some());

    let c = deck.acquire(C).await;
    assert!(c.surface.is_none());
    assert!(!c.is_new);
    assert_eq!(deck.status().await.len(), MAX_SURFACES);

    deck.mark_played(A, meta("a")).await;
    let snapshot = deck.snapshot().await;
    assert_eq!(snapshot.promoted.as_ref().map(|t| t.url.as_str()), Some(A));
    assert!(snapshot.visibility.mini_player_visible);

    deck.toggle_like().await;
    deck.mark_played(B, meta("b")).await;

    // Eviction waits for the delay
    settle(100).await;
    assert_eq!(urls(&deck.status().await), vec![A, B]);

    settle(500).await;
    let snapshot = deck.snapshot().await;
    assert_eq!(urls(&snapshot.surfaces), vec![B]);
    assert_eq!(snapshot.promoted.as_ref().map(|t| t.url.as_str()), Some(B));
    assert_eq!(snapshot.promoted.as_ref().map(|t| t.metadata.title.as_str()), Some("b"));
    assert!(!snapshot.playback.is_liked);
    assert_eq!(snapshot.playback.current_time_secs, 0.0);
    assert_eq!(factory.mounted_urls(), vec![B.to_string()]);

    let c = deck.acquire(C).await;
    assert!(c.is_new);
    assert!(c.surface.is_some());
}

#[tokio::test(start_paused = true)]
async fn test_acquire_same_url_returns_existing_surface() {
    let deck = deck_with(manual_factory());

    let first = deck.acquire(A).await.surface.unwrap();
    let again = deck.acquire(A).await;

    assert!(!again.is_new);
    assert_eq!(again.surface.unwrap().embed, first.embed);
    assert_eq!(deck.status().await.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_repromotion_keeps_position() {
    let factory = manual_factory();
    let deck = deck_with(factory.clone());
    bind_ready(&deck, &factory, A).await;

    deck.mark_played(A, meta("a")).await;
    settle(5).await;
    deck.seek_to(42.0).await;
    deck.mark_played(A, meta("a")).await;

    assert_eq!(deck.promoted_playback().await.1.current_time_secs, 42.0);
}

#[tokio::test(start_paused = true)]
async fn test_seek_is_clamped_to_duration() {
    let factory = manual_factory();
    let deck = deck_with(factory.clone());
    bind_ready(&deck, &factory, A).await;
    deck.mark_played(A, meta("a")).await;
    settle(5).await;

    let (_, playback) = deck.promoted_playback().await;
    assert_eq!(playback.duration_secs, 200.0);

    deck.seek_to(-5.0).await;
    assert_eq!(deck.promoted_playback().await.1.current_time_secs, 0.0);

    deck.seek_to(300.0).await;
    assert_eq!(deck.promoted_playback().await.1.current_time_secs, 200.0);

    let sim = factory.simulated(A).unwrap();
    assert_eq!(
        sim.commands(),
        vec![WidgetCommand::SeekTo(0), WidgetCommand::SeekTo(200_000)]
    );
}

#[tokio::test(start_paused = true)]
async fn test_progress_suppressed_after_seek() {
    let factory = manual_factory();
    let deck = deck_with(factory.clone());
    bind_ready(&deck, &factory, A).await;
    deck.mark_played(A, meta("a")).await;
    settle(5).await;

    let sim = factory.simulated(A).unwrap();
    deck.seek_to(100.0).await;

    // Stale report from before the seek landed
    sim.emit(WidgetEvent::Progress { position_ms: 5_000 });
    settle(10).await;
    assert_eq!(deck.promoted_playback().await.1.current_time_secs, 100.0);

    settle(700).await;
    sim.emit(WidgetEvent::Progress { position_ms: 101_500 });
    settle(10).await;
    assert_eq!(deck.promoted_playback().await.1.current_time_secs, 101.5);
}

#[tokio::test(start_paused = true)]
async fn test_mirror_follows_promoted_widget_events() {
    let factory = manual_factory();
    let deck = deck_with(factory.clone());
    bind_ready(&deck, &factory, A).await;
    deck.mark_played(A, meta("a")).await;
    settle(5).await;

    deck.toggle_play().await;
    settle(5).await;
    assert!(deck.promoted_playback().await.1.is_playing);

    let sim = factory.simulated(A).unwrap();
    sim.emit(WidgetEvent::Progress { position_ms: 30_000 });
    settle(5).await;
    assert_eq!(deck.promoted_playback().await.1.current_time_secs, 30.0);

    sim.emit(WidgetEvent::Finish);
    settle(5).await;
    let (_, playback) = deck.promoted_playback().await;
    assert!(!playback.is_playing);
    assert_eq!(playback.current_time_secs, 0.0);
    assert_eq!(sim.commands(), vec![WidgetCommand::Play]);
}

#[tokio::test(start_paused = true)]
async fn test_handle_bound_after_promotion_starts_mirror() {
    let factory = manual_factory();
    let deck = deck_with(factory.clone());

    let surface = deck.acquire(A).await.surface.unwrap();
    deck.mark_played(A, meta("a")).await;
    settle(LOAD_DELAY.as_millis() as u64 + 5).await;

    let widget = factory.widget(&surface.embed).unwrap();
    deck.bind_control_handle(A, widget.clone()).await;
    settle(5).await;
    assert_eq!(deck.promoted_playback().await.1.duration_secs, 200.0);

    widget.play().unwrap();
    settle(5).await;
    assert!(deck.promoted_playback().await.1.is_playing);
}

#[tokio::test(start_paused = true)]
async fn test_unplayed_surface_released_after_grace() {
    let factory = manual_factory();
    let deck = deck_with(factory.clone());
    let mut notices = deck.subscribe();

    deck.acquire(A).await;
    deck.release_if_unplayed(A).await;

    settle(50).await;
    assert_eq!(deck.status().await.len(), 1);

    settle(100).await;
    assert!(deck.status().await.is_empty());
    assert!(factory.mounted_urls().is_empty());
    assert_eq!(
        notices.recv().await.unwrap(),
        DeckNotice::SurfaceDestroyed { url: A.to_string() }
    );
}

#[tokio::test(start_paused = true)]
async fn test_reacquire_during_grace_keeps_surface() {
    let deck = deck_with(manual_factory());

    deck.acquire(A).await;
    deck.release_if_unplayed(A).await;
    settle(50).await;
    let again = deck.acquire(A).await;

    settle(200).await;
    assert!(!again.is_new);
    assert_eq!(urls(&deck.status().await), vec![A]);
}

#[tokio::test(start_paused = true)]
async fn test_played_surface_is_not_released() {
    let deck = deck_with(manual_factory());

    deck.acquire(A).await;
    deck.mark_played(A, meta("a")).await;
    deck.release_if_unplayed(A).await;

    settle(200).await;
    let status = deck.status().await;
    assert_eq!(urls(&status), vec![A]);
    assert!(status[0].has_played);
}

#[tokio::test(start_paused = true)]
async fn test_stale_operations_are_noops() {
    let deck = deck_with(manual_factory());
    let factory = manual_factory();
    let embed = factory.create(C).unwrap();

    deck.bind_control_handle(A, factory.widget(&embed).unwrap()).await;
    deck.mark_played(A, meta("a")).await;
    deck.release_if_unplayed(A).await;
    deck.toggle_play().await;
    deck.seek_to(10.0).await;
    deck.toggle_like().await;

    let snapshot = deck.snapshot().await;
    assert!(snapshot.surfaces.is_empty());
    assert!(snapshot.promoted.is_none());
    assert!(!snapshot.playback.is_liked);
    assert_eq!(snapshot.playback.current_time_secs, 0.0);
}

#[tokio::test(start_paused = true)]
async fn test_seek_without_control_handle_is_ignored() {
    let factory = manual_factory();
    let deck = deck_with(factory.clone());

    let surface = deck.acquire(A).await.surface.unwrap();
    deck.mark_played(A, meta("a")).await;
    deck.seek_to(42.0).await;
    assert_eq!(deck.promoted_playback().await.1.current_time_secs, 0.0);

    // No suppression window was opened, so the first report after binding lands
    settle(LOAD_DELAY.as_millis() as u64 + 5).await;
    let widget = factory.widget(&surface.embed).unwrap();
    deck.bind_control_handle(A, widget).await;
    settle(5).await;

    let sim = factory.simulated(A).unwrap();
    sim.emit(WidgetEvent::Progress { position_ms: 3_000 });
    settle(5).await;
    assert_eq!(deck.promoted_playback().await.1.current_time_secs, 3.0);
    assert!(sim.commands().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_quick_second_promotion_evicts_first_only() {
    let factory = manual_factory();
    let deck = deck_with(factory.clone());
    let mut notices = deck.subscribe();

    deck.acquire(A).await;
    deck.acquire(B).await;
    deck.mark_played(A, meta("a")).await;
    settle(200).await;
    deck.mark_played(B, meta("b")).await;

    settle(600).await;
    assert_eq!(urls(&deck.status().await), vec![B]);
    assert_eq!(
        notices.recv().await.unwrap(),
        DeckNotice::Promoted { url: A.to_string() }
    );
    assert_eq!(
        notices.recv().await.unwrap(),
        DeckNotice::Promoted { url: B.to_string() }
    );
    assert_eq!(
        notices.recv().await.unwrap(),
        DeckNotice::SurfaceDestroyed { url: A.to_string() }
    );
    assert!(notices.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_evicted_widget_is_unbound() {
    let factory = manual_factory();
    let deck = deck_with(factory.clone());
    bind_ready(&deck, &factory, A).await;
    bind_ready(&deck, &factory, B).await;
    let sim_a = factory.simulated(A).unwrap();

    deck.mark_played(B, meta("b")).await;
    settle(600).await;

    assert!(!sim_a.is_bound());
    assert_eq!(sim_a.listener_count(), 0);
    assert!(factory.simulated(A).is_none());
}

#[tokio::test(start_paused = true)]
async fn test_show_modal_closes_local_modal() {
    let deck = deck_with(manual_factory());
    let mut notices = deck.subscribe();

    deck.set_local_modal_open(true).await;
    deck.show_modal().await;

    let visibility = deck.snapshot().await.visibility;
    assert!(visibility.modal_visible);
    assert!(!visibility.local_modal_open);
    assert_eq!(notices.recv().await.unwrap(), DeckNotice::CloseLocalModal);

    // Nothing to close the second time
    deck.show_modal().await;
    assert!(notices.try_recv().is_err());

    deck.hide_modal().await;
    assert!(!deck.snapshot().await.visibility.modal_visible);
}

#[tokio::test(start_paused = true)]
async fn test_hide_mini_player_pauses_and_clears() {
    let factory = manual_factory();
    let deck = deck_with(factory.clone());
    bind_ready(&deck, &factory, A).await;
    deck.mark_played(A, meta("a")).await;
    deck.toggle_play().await;
    settle(5).await;

    deck.hide_mini_player().await;
    settle(5).await;

    let snapshot = deck.snapshot().await;
    assert!(snapshot.promoted.is_none());
    assert!(!snapshot.visibility.mini_player_visible);
    assert!(!snapshot.playback.is_playing);
    assert_eq!(urls(&snapshot.surfaces), vec![A]);

    let sim = factory.simulated(A).unwrap();
    assert_eq!(sim.commands(), vec![WidgetCommand::Play, WidgetCommand::Pause]);
    assert!(sim.is_paused().await.unwrap());
}
