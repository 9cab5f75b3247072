use std::sync::Arc;

use thumbra_core::Config;
use thumbra_server::{routes, server, state, telemetry};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    telemetry::init_telemetry();

    let gateway = thumbra_storage::create_storage(&config).await?;
    let state = Arc::new(state::AppState::new(&config, gateway));
    let router = routes::build_router(state);

    // Start the server
    server::start_server(&config, router).await?;

    Ok(())
}
