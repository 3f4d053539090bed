use anyhow::{bail, Context, Result};
use arboard::Clipboard;
use clap::Parser;
use crime_watch_core::{
    config::Config,
    init,
    model::{is_valid_month, unique_location_count, CrimeRecord, LatLng},
    ui, AppError, PoliceClient,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Month to query, YYYY-MM (defaults to CRIME_WATCH_MONTH or 2024-01)
    #[arg(short, long)]
    month: Option<String>,

    /// Latitude for a one-shot headless point query
    #[arg(long, requires = "lng")]
    lat: Option<f64>,

    /// Longitude for a one-shot headless point query
    #[arg(long, requires = "lat")]
    lng: Option<f64>,

    /// Copy the printed record table to clipboard automatically
    #[arg(short, long, default_value_t = false)]
    copy: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup
    let _ = dotenvy::dotenv();
    init();
    env_logger::init();
    let args = Args::parse();

    // Load config and override month if specified via CLI
    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(month) = args.month {
        if !is_valid_month(&month) {
            bail!("--month must be formatted as YYYY-MM, got \"{month}\"");
        }
        config.default_month = month;
    }

    match (args.lat, args.lng) {
        (Some(lat), Some(lng)) => query_once(&config, LatLng::new(lat, lng), args.copy).await,
        _ => {
            ui::run_map_ui(config).context("Failed to run the map UI")?;
            Ok(())
        }
    }
}

/// Runs a single point query and prints the record table.
async fn query_once(config: &Config, point: LatLng, copy: bool) -> Result<()> {
    let client = PoliceClient::new(config).context("Failed to create API client")?;

    match client.fetch_by_point(point, &config.default_month).await {
        Ok(records) => {
            let table = format_table(&records);
            println!("{table}");

            // Copy to clipboard if requested
            if copy {
                match Clipboard::new() {
                    Ok(mut clipboard) => {
                        if let Err(e) = clipboard.set_text(table) {
                            eprintln!("Warning: Failed to copy to clipboard: {}", e);
                        } else {
                            println!("(Copied to clipboard)");
                        }
                    }
                    Err(e) => eprintln!("Warning: Could not access clipboard: {}", e),
                }
            }
            Ok(())
        }
        Err(err @ AppError::TooManyResults) => {
            eprintln!("{err}");
            Ok(())
        }
        Err(err) => Err(err).context("Crime query failed"),
    }
}

/// Formats records as a fixed-width table with a summary footer.
fn format_table(records: &[CrimeRecord]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<26} {:<38} {:<8} {}\n",
        "CATEGORY", "STREET", "MONTH", "OUTCOME"
    ));

    for record in records {
        let outcome = record
            .outcome_status
            .as_ref()
            .map(|o| o.category.as_str())
            .unwrap_or("Pending investigation");
        out.push_str(&format!(
            "{:<26} {:<38} {:<8} {}\n",
            record.category_label(),
            record.location.street.name,
            record.month,
            outcome
        ));
    }

    out.push_str(&format!(
        "\n{} crimes, {} unique locations\n",
        records.len(),
        unique_location_count(records)
    ));
    out
}
