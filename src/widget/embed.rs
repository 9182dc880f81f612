//! Embed source construction and track url helpers

use serde::{Deserialize, Serialize};
use url::Url;

pub const DEFAULT_PLAYER_ENDPOINT: &str = "https://w.soundcloud.com/player/";

const TRACK_HOSTS: [&str; 4] = ["soundcloud.com", "www.soundcloud.com", "snd.sc", "www.snd.sc"];

/// How embeds are configured when mounted
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedOptions {
    pub endpoint: String,
    pub auto_play: bool,
    pub show_artwork: bool,
    pub visual: bool,
    pub show_comments: bool,
    pub show_user: bool,
    pub show_reposts: bool,
}

impl Default for EmbedOptions {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_PLAYER_ENDPOINT.to_string(),
            auto_play: false,
            show_artwork: false,
            visual: false,
            show_comments: false,
            show_user: false,
            show_reposts: false,
        }
    }
}

impl EmbedOptions {
    /// Build the embed source for a track url.
    ///
    /// Falls back to the default endpoint when the configured one does not parse.
    pub fn embed_src(&self, track_url: &str) -> String {
        let flag = |b: bool| if b { "true" } else { "false" };
        let params = [
            ("url", track_url),
            ("auto_play", flag(self.auto_play)),
            ("show_artwork", flag(self.show_artwork)),
            ("visual", flag(self.visual)),
            ("show_comments", flag(self.show_comments)),
            ("show_user", flag(self.show_user)),
            ("show_reposts", flag(self.show_reposts)),
        ];

        let endpoint = Url::parse(&self.endpoint).or_else(|e| {
            tracing::warn!(endpoint = %self.endpoint, error = %e, "Invalid player endpoint, using default");
            Url::parse(DEFAULT_PLAYER_ENDPOINT)
        });

        match endpoint {
            Ok(mut src) => {
                src.query_pairs_mut().clear().extend_pairs(params);
                src.to_string()
            }
            Err(_) => track_url.to_string(),
        }
    }
}

pub fn is_valid_track_url(candidate: &str) -> bool {
    match Url::parse(candidate) {
        Ok(url) => {
            url.scheme() == "https"
                && url.host_str().is_some_and(|h| TRACK_HOSTS.contains(&h))
                && !url.path().trim_matches('/').is_empty()
        }
        Err(_) => false,
    }
}

/// Keep scheme, host (with any explicit port) and path; unparsable input comes back unchanged
pub fn normalize_track_url(candidate: &str) -> String {
    match Url::parse(candidate) {
        Ok(url) => match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{}://{}:{}{}", url.scheme(), host, port, url.path()),
            (Some(host), None) => format!("{}://{}{}", url.scheme(), host, url.path()),
            (None, _) => candidate.to_string(),
        },
        Err(_) => candidate.to_string(),
    }
}

pub fn is_same_track(a: &str, b: &str) -> bool {
    normalize_track_url(a) == normalize_track_url(b)
}

/// Title and author guessed from the url slugs
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BasicTrackInfo {
    pub title: String,
    pub author: String,
}

pub fn basic_info_from_url(candidate: &str) -> BasicTrackInfo {
    let normalized = normalize_track_url(candidate);
    let parts: Vec<&str> = normalized.split('/').collect();

    let slug = |idx: Option<usize>, fallback: &str| {
        idx.and_then(|i| parts.get(i))
            .filter(|s| !s.is_empty())
            .copied()
            .unwrap_or(fallback)
            .replace('-', " ")
    };

    let n = parts.len();
    BasicTrackInfo {
        title: slug(n.checked_sub(1), "unknown-track"),
        author: slug(n.checked_sub(2), "unknown-artist"),
    }
}

/// "Author - Title", the title alone, or a placeholder
pub fn display_name(author: &str, title: &str) -> String {
    match (author.is_empty(), title.is_empty()) {
        (false, false) => format!("{} - {}", author, title),
        (_, false) => title.to_string(),
        _ => "Unknown Track".to_string(),
    }
}
