/*
 * Net Volume Oracle demo service
 * Main entry point for the application
 */

use anyhow::Context;
use nvo_demo::{api, clock, config::Config, service::DemoService};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()
        .map_err(|e| {
            eprintln!("Failed to load configuration: {e}");
            e
        })?;

    init_tracing(&config.server.log_level);

    info!("Starting Net Volume Oracle demo service");
    info!("Configuration loaded: {:?}", config.deployment);

    let service = DemoService::new(&config)
        .await
        .map_err(|e| {
            error!("Failed to initialize service: {}", e);
            e
        })
        .context("service initialization")?;

    let (clock, _clock_task) = clock::spawn_clock(clock::TICK);

    let api_state = api::ApiState {
        service: Arc::new(service),
        clock,
    };

    info!("Starting API server on {}:{}", config.server.host, config.server.port);

    let figment = rocket::Config::figment()
        .merge(("address", config.server.host.clone()))
        .merge(("port", config.server.port));

    api::create_rocket(api_state)
        .configure(figment)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("API server failed: {e}"))?;

    Ok(())
}

fn init_tracing(log_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("nvo_demo={log_level}").into());

    let json = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
