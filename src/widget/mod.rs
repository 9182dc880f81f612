//! Widget module - the embed layer the coordinator talks to
//!
//! - `traits`: capabilities consumed by the coordinator (`EmbedFactory`, `WidgetControl`)
//! - `embed`: embed source construction and track url helpers
//! - `simulated`: in-process widget backing the terminal demo and tests

mod traits;
pub mod embed;
pub mod simulated;

pub use traits::{EmbedFactory, EmbedHandle, WidgetControl, WidgetEvent};

pub use embed::EmbedOptions;

pub use simulated::{SimulatedEmbedFactory, SimulatedOptions, SimulatedWidget, WidgetCommand};
