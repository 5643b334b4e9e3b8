//! # BBS API Server
//!
//! Serves the post log behind the origin gate. Only requests forwarded by
//! the front door (carrying its `referer` secret) reach the handlers.

use actix_web::{App, HttpServer, http::header, middleware::DefaultHeaders, web};
use tracing_actix_web::TracingLogger;

#[cfg(feature = "scheduler")]
mod background;
mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;

#[cfg(test)]
mod tests;

use config::AppConfig;
use middleware::origin_gate::OriginGateMiddleware;
use observability::RequestIdMiddleware;
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!("Invalid configuration: {}", e);
        std::io::Error::other(e)
    })?;

    tracing::info!(
        dev_mode = config.gate.is_dev_mode(),
        "Starting BBS API Server on {}:{}",
        config.host,
        config.port
    );
    if config.gate.is_dev_mode() {
        tracing::warn!("Development mode - origin gate disabled");
    }

    let state = AppState::new(&config.store).await;

    #[cfg(feature = "scheduler")]
    let mut sweeper = match &state.memory_store {
        Some(store) => background::ExpirySweeper::start(
            &background::SweeperConfig::from_env(),
            store.clone(),
            state.clock.clone(),
        )
        .await
        .map_err(|e| {
            tracing::error!("Failed to start expiry sweeper: {}", e);
            std::io::Error::other(e)
        })?,
        None => None,
    };

    let gate = config.gate.clone();
    let result = HttpServer::new(move || {
        App::new()
            .wrap(OriginGateMiddleware::new(gate.clone()))
            .wrap(DefaultHeaders::new().add((header::CACHE_CONTROL, "no-store")))
            .wrap(RequestIdMiddleware)
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await;

    #[cfg(feature = "scheduler")]
    {
        if let Some(sweeper) = sweeper.as_mut() {
            if let Err(e) = sweeper.shutdown().await {
                tracing::warn!("Scheduler shutdown failed: {}", e);
            }
        }
    }

    result
}
