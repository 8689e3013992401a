use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use salesdash::web::{create_router, AppState};
use salesdash_core::load_sales_data;

#[derive(Parser)]
#[command(name = "salesdash")]
#[command(version)]
#[command(about = "Sales dashboard query API")]
#[command(long_about = None)]
struct Cli {
    /// Listening IP address
    #[arg(short = 'H', long, default_value = "0.0.0.0", value_name = "IP")]
    host: String,

    /// Listening port
    #[arg(short, long, default_value_t = 3001, value_name = "PORT")]
    port: u16,

    /// Path to the sales CSV file
    #[arg(short, long, default_value = "data/sales.csv", value_name = "FILE")]
    data: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // An ingestion failure surfaces as an empty dataset; the API still serves.
    let records = match load_sales_data(&cli.data) {
        Ok(records) => records,
        Err(err) => {
            error!(%err, "failed to load sales data");
            Vec::new()
        }
    };

    let state = AppState::new(records);
    let app = create_router(state);

    let addr = format!("{}:{}", cli.host, cli.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "sales query API listening");
    axum::serve(listener, app).await?;

    Ok(())
}
