use clap::Parser;
use ecoroute::{AppState, config::AppConfig, models::VehicleClass};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Compare driving routes between two addresses by estimated CO₂"
)]
struct Args {
    /// Start address (e.g. "Alexanderplatz, Berlin")
    #[arg(long)]
    from: String,

    /// Destination address
    #[arg(long)]
    to: String,

    /// gasoline, diesel, suv, hybrid or electric
    #[arg(long, default_value = "gasoline")]
    vehicle: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let vehicle = VehicleClass::parse_lossy(&args.vehicle);

    let config = AppConfig::from_env()?;
    let state = AppState::from_config(&config)?;

    let start = state.geocoder.resolve(&args.from).await?;
    let end = state.geocoder.resolve(&args.to).await?;
    tracing::info!("comparing {:?} -> {:?} for {}", start, end, vehicle.as_str());

    let routes = state.search.search_or_fallback(start, end, vehicle).await;
    println!("{}", serde_json::to_string_pretty(&routes)?);

    Ok(())
}
