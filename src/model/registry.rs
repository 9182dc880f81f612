//! Slot registry: at most two live playback surfaces keyed by track url

use std::sync::Arc;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::error::Result;
use crate::widget::{EmbedHandle, WidgetControl};

/// Hard cap on simultaneously live surfaces
pub const MAX_SURFACES: usize = 2;

/// One embedded external player instance
#[derive(Clone, Debug)]
pub struct PlaybackSurface {
    pub url: String,
    pub embed: EmbedHandle,
    /// Bound once the embed signals readiness
    pub widget: Option<Arc<dyn WidgetControl>>,
    pub has_played: bool,
    pub created_at: DateTime<Local>,
}

/// Outcome of `SlotRegistry::acquire_with`.
///
/// `surface == None` means the registry is full and `url` is not in it.
#[derive(Clone, Debug)]
pub struct Acquisition {
    pub surface: Option<PlaybackSurface>,
    pub is_new: bool,
}

impl Acquisition {
    fn rejected() -> Self {
        Self {
            surface: None,
            is_new: false,
        }
    }
}

/// Read-only view of one registry entry
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SurfaceStatus {
    pub url: String,
    pub has_played: bool,
    pub has_control_handle: bool,
    pub embed_src: String,
    pub created_at: DateTime<Local>,
}

#[derive(Debug, Default)]
pub struct SlotRegistry {
    surfaces: Vec<PlaybackSurface>,
}

impl SlotRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the surface for `url`, creating it through `create` when there is room.
    ///
    /// A full registry never evicts here; eviction only follows a promotion.
    pub fn acquire_with<F>(&mut self, url: &str, create: F) -> Result<Acquisition>
    where
        F: FnOnce(&str) -> Result<EmbedHandle>,
    {
        if let Some(existing) = self.get(url) {
            return Ok(Acquisition {
                surface: Some(existing.clone()),
                is_new: false,
            });
        }

        if self.is_full() {
            tracing::warn!(url, capacity = MAX_SURFACES, "Maximum playback surfaces reached");
            return Ok(Acquisition::rejected());
        }

        let surface = PlaybackSurface {
            url: url.to_string(),
            embed: create(url)?,
            widget: None,
            has_played: false,
            created_at: Local::now(),
        };
        self.surfaces.push(surface.clone());

        Ok(Acquisition {
            surface: Some(surface),
            is_new: true,
        })
    }

    pub fn get(&self, url: &str) -> Option<&PlaybackSurface> {
        self.surfaces.iter().find(|s| s.url == url)
    }

    fn get_mut(&mut self, url: &str) -> Option<&mut PlaybackSurface> {
        self.surfaces.iter_mut().find(|s| s.url == url)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.get(url).is_some()
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.surfaces.len() >= MAX_SURFACES
    }

    /// Attach the control handle; false when the surface is already gone
    pub fn bind_widget(&mut self, url: &str, widget: Arc<dyn WidgetControl>) -> bool {
        match self.get_mut(url) {
            Some(surface) => {
                surface.widget = Some(widget);
                true
            }
            None => false,
        }
    }

    pub fn widget(&self, url: &str) -> Option<Arc<dyn WidgetControl>> {
        self.get(url).and_then(|s| s.widget.clone())
    }

    /// Flag the surface as played; false when the surface is already gone
    pub fn mark_played(&mut self, url: &str) -> bool {
        match self.get_mut(url) {
            Some(surface) => {
                surface.has_played = true;
                true
            }
            None => false,
        }
    }

    pub fn has_played(&self, url: &str) -> Option<bool> {
        self.get(url).map(|s| s.has_played)
    }

    pub fn remove(&mut self, url: &str) -> Option<PlaybackSurface> {
        let idx = self.surfaces.iter().position(|s| s.url == url)?;
        Some(self.surfaces.remove(idx))
    }

    /// Urls of every surface other than `keep`
    pub fn urls_except(&self, keep: &str) -> Vec<String> {
        self.surfaces
            .iter()
            .filter(|s| s.url != keep)
            .map(|s| s.url.clone())
            .collect()
    }

    pub fn status(&self) -> Vec<SurfaceStatus> {
        self.surfaces
            .iter()
            .map(|s| SurfaceStatus {
                url: s.url.clone(),
                has_played: s.has_played,
                has_control_handle: s.widget.is_some(),
                embed_src: s.embed.src.clone(),
                created_at: s.created_at,
            })
            .collect()
    }
}
