use clap::Parser;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod checks;

#[derive(Debug, Parser)]
#[command(name = "fortune_smoke")]
struct Args {
    /// Base URL of a running fortune API.
    #[arg(long, default_value = "http://localhost:5001")]
    base_url: String,

    /// How many fortunes to request from the batch endpoint.
    #[arg(long, default_value_t = 3)]
    batch_count: u32,

    /// Pause between endpoint checks, in milliseconds.
    #[arg(long, default_value_t = 1000)]
    delay_ms: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let client = checks::SmokeClient::new(&args.base_url)?;

    client.run_all(args.batch_count, Duration::from_millis(args.delay_ms)).await?;

    tracing::info!("all checks completed; the spirits are pleased");
    Ok(())
}
