//! Crime Watch Core Library
//!
//! This library provides the core functionality for the crime-watch map
//! explorer: querying the UK police street-crime API for a point or a
//! user-drawn area, and the interaction-state machinery behind the map UI.
//!
//! # Overview
//!
//! Crime Watch lets users click a point or draw a polygon on a map, fetches
//! the street-level crimes reported there in a given month, and renders
//! them as colored markers, a heat surface, or a tabular list. The library
//! handles:
//!
//! - **API Access**: point and polygon queries via the [`client`] module
//! - **Interaction State**: draw-mode state machine, viewport policy and
//!   result store via the [`ui`] module
//! - **Configuration**: environment-driven settings via [`config`]
//!
//! # Quick Start
//!
//! The simplest way to use the library is through the [`CrimeWatch`] facade:
//!
//! ```ignore
//! use crime_watch_core::{CrimeWatch, LatLng};
//!
//! // Initialize with environment configuration
//! let app = CrimeWatch::new()?;
//!
//! // One-shot query around a coordinate
//! let records = app.fetch_by_point(LatLng::new(52.63, -1.13), None).await?;
//!
//! // Or launch the interactive map
//! app.run_interactive()?;
//! ```
//!
//! # Module Structure
//!
//! - [`client`]: crime API client (point and polygon queries)
//! - [`config`]: configuration loading and management
//! - [`error`]: error types and result aliases
//! - [`model`]: wire data model of the crime API
//! - [`ui`]: the interactive map explorer

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod ui;

// Re-export primary types for convenience
pub use client::{Geometry, PoliceClient};
pub use config::Config;
pub use error::{AppError, Result};
pub use model::{CrimeRecord, LatLng};

/// Main entry point for the crime-watch application.
///
/// This struct provides a facade over the configuration and the API client,
/// handling initialization and orchestration. It's the recommended way to
/// use the library for most use cases.
pub struct CrimeWatch {
    config: Config,
    client: PoliceClient,
}

impl CrimeWatch {
    /// Creates a new instance with environment-based configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is malformed (invalid month or
    /// API URL).
    pub fn new() -> Result<Self> {
        let config = Config::load()?;
        Self::with_config(config)
    }

    /// Creates an instance with custom configuration.
    ///
    /// Use this when you need to override environment-based configuration,
    /// such as pointing at a different API endpoint.
    pub fn with_config(config: Config) -> Result<Self> {
        let client = PoliceClient::new(&config)?;
        Ok(Self { config, client })
    }

    /// Fetches crimes around a point for a month (defaults to the
    /// configured month).
    pub async fn fetch_by_point(
        &self,
        point: LatLng,
        month: Option<&str>,
    ) -> Result<Vec<CrimeRecord>> {
        let month = month.unwrap_or(&self.config.default_month);
        self.client.fetch_by_point(point, month).await
    }

    /// Fetches crimes inside a polygon for a month (defaults to the
    /// configured month).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidGeometry`] for polygons with fewer than 3
    /// vertices.
    pub async fn fetch_by_area(
        &self,
        vertices: &[LatLng],
        month: Option<&str>,
    ) -> Result<Vec<CrimeRecord>> {
        let month = month.unwrap_or(&self.config.default_month);
        self.client.fetch_by_area(vertices, month).await
    }

    /// Launches the interactive map explorer.
    ///
    /// This is the main entry point for the visual workflow: the user
    /// clicks or draws on the map, queries run in the background, and the
    /// results render as markers, a heat surface, or a table.
    pub fn run_interactive(self) -> Result<()> {
        ui::run_map_ui(self.config)
    }

    /// Returns a reference to the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }
}

/// Initializes the library by loading environment variables.
///
/// Call this once at application startup before using any other functions.
/// This loads `.env` files if present and sets up the environment.
pub fn init() {
    let _ = dotenvy::dotenv();
}
