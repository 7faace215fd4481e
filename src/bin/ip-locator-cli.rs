use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ip_locator::config::Config;
use ip_locator::iputil::ordinal_to_ip;
use ip_locator::service::LocationService;
use ip_locator::storage::RangeTable;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ip-locator-cli")]
#[command(about = "Offline IP location lookups against a range dataset", long_about = None)]
struct Cli {
    /// Dataset CSV (defaults to CSV_FILE_PATH)
    #[arg(long, global = true)]
    csv: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve one or more IPv4 addresses
    Lookup {
        /// Dotted-quad addresses
        #[arg(required = true)]
        addresses: Vec<String>,
    },
    /// Summarize the loaded dataset
    Stats,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let csv_path = match cli.csv {
        Some(path) => path,
        None => Config::from_env()?.dataset.csv_path,
    };

    let table = RangeTable::load(&csv_path)
        .with_context(|| format!("failed to load dataset {}", csv_path))?;

    match cli.command {
        Commands::Lookup { addresses } => {
            let service = LocationService::new(Arc::new(table));
            for address in addresses {
                match service.locate(&address) {
                    Ok(range) => println!(
                        "{:<18} {:<4} {:<24} {:<24} {}",
                        address.trim(),
                        range.country_code,
                        range.country,
                        range.region,
                        range.city
                    ),
                    Err(e) => println!("{:<18} ✗ {}", address.trim(), e),
                }
            }
        }
        Commands::Stats => {
            println!("Dataset:         {}", csv_path);
            println!("Ranges:          {}", table.len());
            println!("Skipped rows:    {}", table.skipped_rows());
            println!("Covered IPs:     {}", table.covered_addresses());
            match (table.ranges().first(), table.ranges().last()) {
                (Some(first), Some(last)) => {
                    println!("Lowest address:  {}", ordinal_to_ip(first.lower));
                    println!("Highest address: {}", ordinal_to_ip(last.upper));
                }
                _ => println!("No usable ranges."),
            }
        }
    }

    Ok(())
}
