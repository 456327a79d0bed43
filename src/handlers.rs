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

use crate::{error::GatewayError, gateway::TtsRelay, state::AppState};
use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde_json::{Map, Value};

const INDEX_HTML: &str = include_str!("../static/index.html");

/// Serves the test page.
pub async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Relays the gateway's `/ping`.
///
/// Any upstream failure, including a non-2xx status, becomes a 500.
pub async fn ping_handler(State(state): State<AppState>) -> Result<Json<Value>, GatewayError> {
    tracing::info!("Forwarding ping -> {}/ping", state.config.gateway_base);

    // Upstream calls run detached so a client hangup does not abort them.
    let gateway = state.gateway.clone();
    let body = tokio::spawn(async move { gateway.ping().await }).await??;
    Ok(Json(body))
}

/// Relays the gateway's `/v1/metrics`, same failure rules as ping.
pub async fn metrics_handler(State(state): State<AppState>) -> Result<Json<Value>, GatewayError> {
    tracing::info!("Forwarding metrics -> {}/v1/metrics", state.config.gateway_base);

    let gateway = state.gateway.clone();
    let body = tokio::spawn(async move { gateway.metrics().await }).await??;
    Ok(Json(body))
}

/// Forwards the payload to `/v1/tts` and wraps whatever comes back.
///
/// Always 200 unless the gateway is unreachable; the upstream status is
/// reported inside the body. The body must be a JSON object but no
/// `Content-Type` is required.
pub async fn tts_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, GatewayError> {
    let payload: Map<String, Value> = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!("Rejected tts payload: {}", e);
            let message = format!("Expected a JSON object: {}", e);
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, message).into_response());
        }
    };

    tracing::info!("Forwarding tts -> {}/v1/tts", state.config.gateway_base);

    let gateway = state.gateway.clone();
    let relay = tokio::spawn(async move { gateway.tts(&payload).await }).await??;

    if relay.status >= 400 {
        tracing::warn!("Gateway tts answered {}", relay.status);
    }
    Ok(Json::<TtsRelay>(relay).into_response())
}
