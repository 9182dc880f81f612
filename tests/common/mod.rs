#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use linkdeck::config::Timings;
use linkdeck::controller::DeckController;
use linkdeck::model::TrackMetadata;
use linkdeck::widget::{EmbedOptions, SimulatedEmbedFactory, SimulatedOptions};

pub const A: &str = "https://soundcloud.com/artist/track-a";
pub const B: &str = "https://soundcloud.com/artist/track-b";
pub const C: &str = "https://soundcloud.com/artist/track-c";

pub const LOAD_DELAY: Duration = Duration::from_millis(20);

/// Factory whose widgets become ready after `LOAD_DELAY` and only move when told to
pub fn manual_factory() -> Arc<SimulatedEmbedFactory> {
    Arc::new(
        SimulatedEmbedFactory::new(SimulatedOptions {
            load_delay: LOAD_DELAY,
            tick: None,
            embed: EmbedOptions::default(),
        })
        .with_duration(A, Duration::from_secs(200))
        .with_duration(B, Duration::from_secs(300)),
    )
}

pub fn deck_with(factory: Arc<SimulatedEmbedFactory>) -> DeckController {
    DeckController::new(factory, Timings::default())
}

pub fn meta(title: &str) -> TrackMetadata {
    TrackMetadata {
        title: title.to_string(),
        author_name: "artist".to_string(),
        ..Default::default()
    }
}

/// Let spawned tasks and timers run for `ms` of virtual time
pub async fn settle(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

pub fn urls(deck_status: &[linkdeck::model::SurfaceStatus]) -> Vec<&str> {
    deck_status.iter().map(|s| s.url.as_str()).collect()
}
