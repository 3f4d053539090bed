//! Error types for the crime-watch-core library.
//!
//! This module provides granular error variants for different failure modes,
//! enabling precise error handling and user-friendly error messages.

use thiserror::Error;

/// Errors that can occur within the crime-watch-core library.
///
/// Each variant represents a specific failure mode with contextual information
/// to help diagnose and handle errors appropriately.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors (malformed URLs, invalid values).
    #[error("Configuration error: {0}")]
    Config(String),

    /// The remote API capped the query: the area/month combination matches
    /// more than 10,000 crimes. Surfaced to the user as a warning.
    #[error("The selected area contains too many crimes (>10,000), try a smaller area")]
    TooManyResults,

    /// An area search was attempted with a degenerate polygon.
    #[error("Area search requires at least 3 vertices, got {0}")]
    InvalidGeometry(usize),

    /// The crime API returned a non-success status other than the
    /// too-many-results cap.
    #[error("Crime API returned HTTP status {0}")]
    Status(u16),

    /// Network or protocol failure while talking to the crime API.
    #[error("Crime API request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// UI-related errors (window creation, event loop).
    #[error("UI error: {0}")]
    Ui(String),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a UI error with the given message.
    pub fn ui(msg: impl Into<String>) -> Self {
        Self::Ui(msg.into())
    }
}

/// A convenient alias for Result with [`AppError`].
pub type Result<T> = std::result::Result<T, AppError>;
