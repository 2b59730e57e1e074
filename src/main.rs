//! Tuition ledger HTTP server.

use std::env;

use tracing::info;
use tracing_subscriber::EnvFilter;

use tuition_ledger::api::{AppState, create_router};
use tuition_ledger::config::ConfigLoader;

const DEFAULT_CONFIG_DIR: &str = "./config/school";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// JSON logs, filtered by `RUST_LOG` (default `info`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_target(false)
        .try_init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config_dir = env::var("TUITION_CONFIG_DIR").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    let config = ConfigLoader::load(&config_dir)?;
    info!(
        config_dir = %config_dir,
        school = %config.school().name,
        tariffs = config.tariffs().len(),
        "Configuration loaded"
    );

    let app = create_router(AppState::new(config));

    let addr = env::var("TUITION_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "Listening");
    axum::serve(listener, app).await?;

    Ok(())
}
