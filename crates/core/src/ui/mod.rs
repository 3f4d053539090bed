//! User interface components for crime-watch.
//!
//! This module provides the interactive map explorer: a tile map the user
//! clicks or draws on, backed by the crime API query pipeline.
//!
//! # Architecture
//!
//! The UI is split into focused submodules:
//! - [`state`]: interaction-state and event type definitions
//! - [`drawing`]: the point/area draw-mode state machine
//! - [`viewport`]: zoom / heatmap reconciliation
//! - [`results`]: result set store and category palette
//! - [`settings`]: user preferences and persistence
//! - [`rendering`]: map layer plugins (markers, polygon, heat surface)
//! - [`map_app`]: the main application composing all of the above
//!
//! # Usage
//!
//! ```ignore
//! use crime_watch_core::{ui, Config};
//!
//! let config = Config::load()?;
//! ui::run_map_ui(config)?;
//! ```

mod drawing;
mod map_app;
mod rendering;
mod results;
mod settings;
mod state;
mod viewport;

// Public API exports
pub use drawing::{ClickAction, DrawingBoard, MIN_POLYGON_VERTICES};
pub use map_app::MapExplorer;
pub use results::{category_color, ResultStore};
pub use settings::Settings;
pub use state::{DrawState, MapEvent, SearchMode};
pub use viewport::{RenderMode, Viewport, DETAIL_ZOOM, HEAT_MAX_ZOOM, HEAT_ZOOM_STEP};

use crate::config::Config;
use crate::error::Result;

/// Launches the interactive map explorer.
///
/// Opens a window with the tile map, the search controls and the record
/// drawer, and blocks until the user closes it.
///
/// # Errors
///
/// Returns an error if the window or event loop cannot be created.
pub fn run_map_ui(config: Config) -> Result<()> {
    map_app::run(config)
}
