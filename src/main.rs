//! wFirma demo
//!
//! Loads client configuration, fetches the 20 most recent invoices and
//! prints the decoded response as JSON.

use anyhow::{Context, Result};
use tracing::{error, info};
use wfirma_sdk::core::logging::init_logging;
use wfirma_sdk::{Config, FindParameters, Order, WFirmaClient};

#[tokio::main]
async fn main() {
    // Check for --help flag
    if std::env::args().any(|arg| arg == "--help") {
        print_help();
        return;
    }

    dotenv::dotenv().ok();

    let config = match Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration Error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.log_level);

    if let Err(e) = run(config).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> Result<()> {
    info!(
        "Using {} (company: {})",
        config.base_url,
        config.company_id.as_deref().unwrap_or("default")
    );

    let client = WFirmaClient::new(config).context("Failed to create wFirma client")?;

    let params = FindParameters::new()
        .page(1)
        .limit(20)
        .order(Order::Desc("date".to_string()));
    let response = client
        .invoices()
        .find(&params)
        .await
        .context("Invoice lookup failed")?;

    let json = serde_json::to_string_pretty(&response).context("Failed to render response")?;
    println!("{}", json);
    Ok(())
}

/// Print help message
fn print_help() {
    println!("wFirma demo");
    println!();
    println!("Usage: wfirma-demo [OPTIONS]");
    println!();
    println!("Lists the 20 most recent invoices as JSON.");
    println!();
    println!("Options:");
    println!("  --help    Display this help message");
    println!();
    println!("Configuration (environment or .env file):");
    println!("  WFIRMA_CONFIG - Path to a TOML configuration file (overrides the variables below)");
    println!("  WFIRMA_API_BASE - API base URL (default: https://api2.wfirma.pl)");
    println!("  WFIRMA_COMPANY_ID - Company id for multi-company accounts");
    println!("  WFIRMA_OAUTH_TOKEN - OAuth2 bearer token");
    println!("  WFIRMA_ACCESS_KEY / WFIRMA_SECRET_KEY / WFIRMA_APP_KEY - API key credentials");
    println!("  WFIRMA_TIMEOUT - Request timeout in seconds (default: 30)");
    println!("  LOG_LEVEL - Logging level (default: info)");
}
