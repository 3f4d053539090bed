use std::env;
use crate::error::{AppError, Result};
use crate::model::is_valid_month;
use dotenvy::dotenv;

/// Street-level crime endpoint of the UK police open data API.
pub const DEFAULT_API_URL: &str = "https://data.police.uk/api/crimes-street/all-crime";

/// Month queried when the user has not picked one.
pub const DEFAULT_MONTH: &str = "2024-01";

#[derive(Clone, Debug)]
pub struct Config {
    pub api_url: String,
    pub default_month: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load .env file if it exists, ignore if it doesn't
        let _ = dotenv();

        let api_url = env::var("POLICE_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let default_month = env::var("CRIME_WATCH_MONTH")
            .unwrap_or_else(|_| DEFAULT_MONTH.to_string());

        if !is_valid_month(&default_month) {
            return Err(AppError::Config(format!(
                "CRIME_WATCH_MONTH must be formatted as YYYY-MM, got {default_month}"
            )));
        }

        Ok(Self {
            api_url,
            default_month,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            default_month: DEFAULT_MONTH.to_string(),
        }
    }
}
