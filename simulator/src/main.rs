mod sensor;

use axum::{extract::State, routing::get, Json, Router};
use clap::Parser;
use sensor::{generate_payload, SensorPayload, Thresholds};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Serves synthetic soil sensor readings at `GET /data`
#[derive(Debug, Parser)]
#[command(name = "simulator")]
struct Args {
    /// Listen address
    #[arg(long, env = "SIM_ADDR", default_value = "0.0.0.0:8081")]
    addr: String,

    /// Probability that a single sensor reports "--"
    #[arg(long, env = "SIM_FAULT_RATE", default_value_t = 0.05)]
    fault_rate: f64,

    /// Soil moisture (%) below which status is DANGER
    #[arg(long, env = "SIM_DRY_THRESHOLD", default_value_t = 30.0)]
    dry_threshold: f64,

    /// Temperature (°C) above which status is DANGER
    #[arg(long, env = "SIM_HEAT_THRESHOLD", default_value_t = 32.0)]
    heat_threshold: f64,
}

struct SimState {
    fault_rate: f64,
    thresholds: Thresholds,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt::init();

    info!("Starting sensor simulator");
    info!(
        "Fault rate: {}, dry threshold: {}%, heat threshold: {}°C",
        args.fault_rate, args.dry_threshold, args.heat_threshold
    );

    let state = Arc::new(SimState {
        fault_rate: args.fault_rate.clamp(0.0, 1.0),
        thresholds: Thresholds {
            dry: args.dry_threshold,
            heat: args.heat_threshold,
        },
    });

    let app = Router::new().route("/data", get(data_handler)).with_state(state);

    let listener = match tokio::net::TcpListener::bind(&args.addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", args.addr, e);
            std::process::exit(1);
        }
    };

    info!("Simulator listening on {}", args.addr);

    if let Err(e) = axum::serve(listener, app).await {
        error!("Simulator server error: {}", e);
    }
}

async fn data_handler(State(state): State<Arc<SimState>>) -> Json<SensorPayload> {
    let payload = generate_payload(&mut rand::thread_rng(), state.fault_rate, state.thresholds);
    debug!("Serving {:?}", payload);
    Json(payload)
}
