//! linkdeck: dual-slot playback coordinator for embedded track players, with a
//! terminal front end.
//!
//! At most two embedded players are alive at once. The first one the user
//! actually plays is promoted into the page-wide mini-player and modal, and the
//! other one is torn down shortly after.

pub mod config;
pub mod controller;
pub mod error;
pub mod logging;
pub mod model;
pub mod view;
pub mod widget;

pub use config::{DeckConfig, Timings};
pub use controller::{AppController, CardController, DeckController};
pub use error::{ConfigError, WidgetError};
