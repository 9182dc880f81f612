//! Per-card display resolution: local shadow state or the promoted mirror

use super::playback::{progress_ratio, PlaybackState};

/// Card-owned state used while its track is not the promoted one
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LocalShadow {
    pub is_ready: bool,
    pub is_playing: bool,
    pub is_liked: bool,
    pub duration_secs: f64,
    pub current_time_secs: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DisplaySource {
    Local(LocalShadow),
    Promoted(PlaybackState),
}

impl DisplaySource {
    /// Pick the source once per render by comparing the card url with the promoted one
    pub fn resolve(
        card_url: &str,
        promoted_url: Option<&str>,
        local: LocalShadow,
        global: PlaybackState,
    ) -> Self {
        if promoted_url == Some(card_url) {
            DisplaySource::Promoted(global)
        } else {
            DisplaySource::Local(local)
        }
    }

    pub fn is_promoted(&self) -> bool {
        matches!(self, DisplaySource::Promoted(_))
    }
}

/// Values a card renders
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardDisplay {
    pub is_ready: bool,
    pub is_promoted: bool,
    pub is_playing: bool,
    pub is_liked: bool,
    pub duration_secs: f64,
    pub current_time_secs: f64,
    pub is_dragging: bool,
}

impl CardDisplay {
    /// `drag_preview` wins over both sources while a drag is in progress
    pub fn new(source: DisplaySource, is_ready: bool, drag_preview: Option<f64>) -> Self {
        let (is_playing, is_liked, duration_secs, current_time_secs) = match source {
            DisplaySource::Local(l) => (l.is_playing, l.is_liked, l.duration_secs, l.current_time_secs),
            DisplaySource::Promoted(g) => (g.is_playing, g.is_liked, g.duration_secs, g.current_time_secs),
        };

        Self {
            is_ready,
            is_promoted: source.is_promoted(),
            is_playing,
            is_liked,
            duration_secs,
            current_time_secs: drag_preview.unwrap_or(current_time_secs),
            is_dragging: drag_preview.is_some(),
        }
    }

    pub fn progress_ratio(&self) -> f64 {
        progress_ratio(self.current_time_secs, self.duration_secs)
    }

    /// Seek controls stay disabled until the widget is ready and the length is known
    pub fn can_seek(&self) -> bool {
        self.is_ready && self.duration_secs > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local() -> LocalShadow {
        LocalShadow {
            is_ready: true,
            is_playing: false,
            is_liked: true,
            duration_secs: 90.0,
            current_time_secs: 12.0,
        }
    }

    fn global() -> PlaybackState {
        PlaybackState {
            is_playing: true,
            is_liked: false,
            duration_secs: 200.0,
            current_time_secs: 80.0,
        }
    }

    #[test]
    fn test_promoted_card_reads_global_state() {
        let source = DisplaySource::resolve("A", Some("A"), local(), global());
        let display = CardDisplay::new(source, true, None);

        assert!(display.is_promoted);
        assert!(display.is_playing);
        assert!(!display.is_liked);
        assert_eq!(display.current_time_secs, 80.0);
    }

    #[test]
    fn test_other_card_reads_local_state() {
        for promoted in [None, Some("B")] {
            let display = CardDisplay::new(DisplaySource::resolve("A", promoted, local(), global()), true, None);
            assert!(!display.is_promoted);
            assert!(display.is_liked);
            assert_eq!(display.duration_secs, 90.0);
            assert_eq!(display.current_time_secs, 12.0);
        }
    }

    #[test]
    fn test_drag_preview_overrides_time() {
        let source = DisplaySource::resolve("A", Some("A"), local(), global());
        let display = CardDisplay::new(source, true, Some(150.0));

        assert!(display.is_dragging);
        assert_eq!(display.current_time_secs, 150.0);
        assert_eq!(display.progress_ratio(), 0.75);
    }

    #[test]
    fn test_seek_disabled_until_ready() {
        let source = DisplaySource::Local(LocalShadow::default());
        assert!(!CardDisplay::new(source, false, None).can_seek());
        assert!(!CardDisplay::new(source, true, None).can_seek());
        assert!(CardDisplay::new(DisplaySource::Local(local()), true, None).can_seek());
    }
}
