//! Global playback state mirrored from the promoted widget

use serde::Serialize;

use super::types::TrackMetadata;

/// The track mirrored into the page-wide mini-player and modal
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PromotedTrack {
    pub url: String,
    pub metadata: TrackMetadata,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct PlaybackState {
    pub is_playing: bool,
    pub is_liked: bool,
    pub duration_secs: f64,
    pub current_time_secs: f64,
}

impl PlaybackState {
    /// Clamp to `[0, duration]`; only the lower bound applies while the duration is unknown
    pub fn clamp_time(&self, time_secs: f64) -> f64 {
        clamp_time(time_secs, self.duration_secs)
    }

    pub fn set_current_time(&mut self, time_secs: f64) {
        self.current_time_secs = self.clamp_time(time_secs);
    }

    pub fn set_duration(&mut self, duration_secs: f64) {
        self.duration_secs = duration_secs.max(0.0);
        self.current_time_secs = self.clamp_time(self.current_time_secs);
    }

    /// State reset applied when a different track gets promoted
    pub fn reset_for_new_track(&mut self) {
        self.is_liked = false;
        self.current_time_secs = 0.0;
    }

    pub fn progress_ratio(&self) -> f64 {
        progress_ratio(self.current_time_secs, self.duration_secs)
    }
}

pub fn clamp_time(time_secs: f64, duration_secs: f64) -> f64 {
    let lower = if time_secs.is_finite() { time_secs.max(0.0) } else { 0.0 };
    if duration_secs > 0.0 {
        lower.min(duration_secs)
    } else {
        lower
    }
}

pub fn progress_ratio(current_secs: f64, duration_secs: f64) -> f64 {
    if duration_secs > 0.0 {
        (current_secs / duration_secs).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

pub fn ms_to_secs(ms: u64) -> f64 {
    ms as f64 / 1000.0
}

pub fn secs_to_ms(secs: f64) -> u64 {
    (secs.max(0.0) * 1000.0).round() as u64
}
