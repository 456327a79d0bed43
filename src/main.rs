/*
 * Copyright (C) 2025 Jakub Žitník
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 */

mod config;
mod error;
mod gateway;
mod handlers;
mod state;

use axum::{
    Router,
    routing::{get, post},
};
use reqwest::Client;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::gateway::Timeouts;
use crate::state::AppState;

const APP_NAME: &str = "storyforge";

fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index_handler))
        .route("/api/ping", get(handlers::ping_handler))
        .route("/api/metrics", get(handlers::metrics_handler))
        .route("/api/tts", post(handlers::tts_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Arc::new(Config::from_env());

    let client = Client::builder()
        .build()
        .expect("Failed to build reqwest client");

    let state = AppState::new(client, config.clone(), Timeouts::default());

    let addr_str = format!("0.0.0.0:{}", config.port);
    let addr: SocketAddr = addr_str
        .parse()
        .expect("Invalid address/port configuration");

    tracing::info!("{} v{} listening on http://{}", APP_NAME, env!("CARGO_PKG_VERSION"), addr);
    tracing::info!("Gateway: {}", config.gateway_base);
    if config.gateway_token.is_none() {
        tracing::warn!("GATEWAY_TOKEN is not set, gateway calls are unauthenticated");
    }

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Server stopped");
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
