//! Profile page data: who the page belongs to and which tracks it lists

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::widget::embed::{basic_info_from_url, is_valid_track_url, normalize_track_url};
use super::types::TrackMetadata;

/// Track entry as written in the profile file
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TrackEntry {
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub artwork_url: Option<String>,
    #[serde(default)]
    pub shop_link: Option<String>,
    /// Known length, used by the simulated widget
    #[serde(default)]
    pub duration_secs: Option<f64>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Profile {
    pub username: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub profile_image_url: Option<String>,
    #[serde(default)]
    pub tracks: Vec<TrackEntry>,
}

/// A playable track with resolved metadata
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Track {
    pub url: String,
    pub metadata: TrackMetadata,
    pub duration_secs: Option<f64>,
}

impl Profile {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn title(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.username)
    }

    /// Valid tracks with normalized urls; duplicates and invalid urls are skipped
    pub fn tracks(&self) -> Vec<Track> {
        let mut tracks: Vec<Track> = Vec::new();

        for entry in &self.tracks {
            if !is_valid_track_url(&entry.url) {
                tracing::warn!(url = %entry.url, "Skipping track with invalid url");
                continue;
            }

            let url = normalize_track_url(&entry.url);
            if tracks.iter().any(|t| t.url == url) {
                tracing::debug!(url = %url, "Skipping duplicate track");
                continue;
            }

            let fallback = basic_info_from_url(&url);
            let metadata = TrackMetadata {
                title: non_empty(&entry.title).unwrap_or(fallback.title),
                author_name: non_empty(&entry.author_name).unwrap_or(fallback.author),
                artwork_url: entry.artwork_url.clone().unwrap_or_default(),
                external_url: url.clone(),
                shop_link: entry.shop_link.clone(),
                bio: self.bio.clone(),
                profile_image_url: self.profile_image_url.clone(),
            };

            tracks.push(Track {
                url,
                metadata,
                duration_secs: entry.duration_secs,
            });
        }

        tracks
    }

    /// Playable tracks, or an error when there are none
    pub fn playable_tracks(&self) -> Result<Vec<Track>, ConfigError> {
        let tracks = self.tracks();
        if tracks.is_empty() {
            return Err(ConfigError::EmptyProfile(self.username.clone()));
        }
        Ok(tracks)
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|s| !s.trim().is_empty()).cloned()
}
