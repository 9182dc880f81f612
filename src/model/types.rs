//! Core type definitions shared by the coordinator and the presentation layer

use serde::{Deserialize, Serialize};

/// Metadata shown for a track, supplied by the profile
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackMetadata {
    pub title: String,
    pub author_name: String,
    pub artwork_url: String,
    pub external_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shop_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
}

/// Page-wide visibility flags.
///
/// The global modal and a card's local modal never show together.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Visibility {
    pub mini_player_visible: bool,
    pub modal_visible: bool,
    pub local_modal_open: bool,
}

/// Notifications broadcast by the coordinator to presentation adapters
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeckNotice {
    /// The surface for `url` was torn down; adapters still showing it must reset
    SurfaceDestroyed { url: String },
    /// `url` became the promoted track; other cards fall back to their own state
    Promoted { url: String },
    /// The global modal is opening; any open card modal must close
    CloseLocalModal,
}
