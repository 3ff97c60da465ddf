use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use eta_fleet::{api::HttpTransport, config::Config, fleet::FleetService, logging, web};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    logging::initialize_console_logging();

    let config = Config::load();
    if let Err(e) = config.eta.credentials() {
        // Not fatal: every dashboard falls back to placeholder data.
        warn!("{}", e);
    }

    let transport = HttpTransport::new()?;
    let fleet = Arc::new(FleetService::new(config.eta.clone(), Arc::new(transport)));
    let app = web::build_router(fleet);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .wrap_err_with(|| format!("Failed to bind to {}", config.server.bind_addr))?;

    info!("ETA endpoint: {}", config.eta.base_url());
    info!("Dashboards available at http://{}", config.server.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
