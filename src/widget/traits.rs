//! Capabilities the coordinator consumes from the embed layer

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::error::Result;

/// Events pushed by an embedded widget.
///
/// Within one widget `Ready` precedes everything else and `Finish` is terminal
/// until the next `Play`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WidgetEvent {
    Ready,
    Play,
    Pause,
    Progress { position_ms: u64 },
    Finish,
}

/// Opaque handle to a mounted embed (the off-screen player surface)
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EmbedHandle {
    pub id: u64,
    pub src: String,
}

/// Control API bound to a ready embed
#[async_trait]
pub trait WidgetControl: Send + Sync + fmt::Debug {
    fn play(&self) -> Result<()>;
    fn pause(&self) -> Result<()>;
    fn seek_to(&self, position_ms: u64) -> Result<()>;

    async fn duration_ms(&self) -> Result<u64>;
    async fn position_ms(&self) -> Result<u64>;
    async fn is_paused(&self) -> Result<bool>;

    /// Register a new listener on the widget's event stream
    fn subscribe(&self) -> Result<broadcast::Receiver<WidgetEvent>>;

    /// Drop every event binding. Calling this on an already unbound widget is a no-op.
    fn unbind_all(&self);
}

/// Creates and tears down embeds for track urls
pub trait EmbedFactory: Send + Sync {
    /// Mount a no-autoplay, minimal-chrome embed for `url`
    fn create(&self, url: &str) -> Result<EmbedHandle>;

    /// Bind the control API to a mounted embed
    fn widget(&self, embed: &EmbedHandle) -> Result<Arc<dyn WidgetControl>>;

    /// Detach the embed from the document. Destroying twice is a no-op.
    fn destroy(&self, embed: &EmbedHandle);
}
