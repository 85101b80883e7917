// SPDX-License-Identifier: MIT
// Copyright 2026 PT Mate contributors

//! PT Mate API Server
//!
//! Practice management for personal trainers: clients, session packages,
//! measurements, assessments and progress photos.

use ptmate_api::{config::Config, db::Db, services::ObjectStore, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging()?;

    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        environment = ?config.environment,
        "Starting PT Mate API"
    );

    let db = Db::connect(&config).await?;
    tracing::info!(backend = ?config.database_backend, "Database ready");

    let storage = ObjectStore::from_config(config.r2.as_ref());

    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        storage,
    });

    let app = ptmate_api::routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            EnvFilter::from_default_env()
                .add_directive("ptmate_api=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
