//! orbis HTTP server
//!
//! Run with: `cargo run -p orbis-server -- --help`

use clap::Parser;
use orbis_server::{OrbisServer, ServerConfig, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    telemetry::init_logging(&config.log_level);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        database = %config.database_url,
        countries_api = %config.countries_api_url,
        rates_api = %config.exchange_rate_api_url,
        "starting orbis server"
    );

    let server = OrbisServer::from_config(&config).await?;
    server.run().await?;
    Ok(())
}
