//! Model module - Coordinator state and data types
//!
//! - `types`: track metadata, visibility flags, coordinator notices
//! - `registry`: slot registry holding at most two playback surfaces
//! - `playback`: global playback state and the promoted track
//! - `deck`: the coordinator state machine tying the above together
//! - `display`: per-card choice between local shadow state and the global mirror
//! - `profile`: profile file with the listed tracks
//! - `ui`: terminal UI state

mod types;
mod registry;
mod playback;
mod deck;
mod display;
mod profile;
mod ui;

pub use types::{DeckNotice, TrackMetadata, Visibility};

pub use registry::{Acquisition, PlaybackSurface, SlotRegistry, SurfaceStatus, MAX_SURFACES};

pub use playback::{clamp_time, ms_to_secs, progress_ratio, secs_to_ms, PlaybackState, PromotedTrack};

pub use deck::{DeckModel, DeckSnapshot, Promotion};

pub use display::{CardDisplay, DisplaySource, LocalShadow};

pub use profile::{Profile, Track, TrackEntry};

pub use ui::UiState;
