use std::net::SocketAddr;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trip_backend::{AppState, config::PlannerConfig, create_router};

/// Serves the trip segment planner over HTTP.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Address to listen on (overrides TRIP_BIND_ADDR)
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// Default sampling interval in minutes (overrides TRIP_DEFAULT_INTERVAL_MIN)
    #[arg(long)]
    interval: Option<f64>,

    /// Default average speed in km/h (overrides TRIP_DEFAULT_SPEED_KMH)
    #[arg(long)]
    speed: Option<f64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trip_backend=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let mut config = PlannerConfig::from_env()?;
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(interval) = args.interval.filter(|v| v.is_finite() && *v > 0.0) {
        config.default_interval_minutes = interval;
    }
    if let Some(speed) = args.speed.filter(|v| v.is_finite() && *v > 0.0) {
        config.default_speed_kmh = speed;
    }

    let addr = config.bind_addr;
    tracing::info!(
        "defaults: every {} min at {} km/h (driving {}, cycling {}, walking {})",
        config.default_interval_minutes,
        config.default_speed_kmh,
        config.speeds.driving_kmh,
        config.speeds.cycling_kmh,
        config.speeds.walking_kmh
    );

    let app = create_router(AppState::new(config));

    tracing::info!("starting trip planner on http://{addr}");
    tracing::info!("  POST /api/segments - Sample a route by travel time");
    tracing::info!("  GET /api/health");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
