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

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::Config;
use crate::error::GatewayError;

const PING_PATH: &str = "/ping";
const METRICS_PATH: &str = "/v1/metrics";
const TTS_PATH: &str = "/v1/tts";

const PING_TIMEOUT: Duration = Duration::from_secs(4);
const METRICS_TIMEOUT: Duration = Duration::from_secs(8);
// Synthesis is slow.
const TTS_TIMEOUT: Duration = Duration::from_secs(120);

/// Per-call upstream timeouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub ping: Duration,
    pub metrics: Duration,
    pub tts: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            ping: PING_TIMEOUT,
            metrics: METRICS_TIMEOUT,
            tts: TTS_TIMEOUT,
        }
    }
}

/// What `/v1/tts` answered, whatever the status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TtsRelay {
    pub status: u16,
    /// Parsed JSON, or the raw text when the body is not JSON.
    pub body: Value,
}

/// Client for the upstream gateway.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct GatewayClient {
    client: Client,
    base: Arc<str>,
    token: Option<Arc<str>>,
    timeouts: Timeouts,
}

impl GatewayClient {
    pub fn new(client: Client, config: &Config, timeouts: Timeouts) -> Self {
        Self {
            client,
            base: Arc::from(config.gateway_base.as_str()),
            token: config.gateway_token.as_deref().map(Arc::from),
            timeouts,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Attaches `Authorization: Bearer <token>` when a token is configured.
    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// `GET /ping`, never authenticated.
    pub async fn ping(&self) -> Result<Value, GatewayError> {
        let request = self
            .client
            .get(self.url(PING_PATH))
            .timeout(self.timeouts.ping);
        fetch_json(request, PING_PATH).await
    }

    /// `GET /v1/metrics`.
    pub async fn metrics(&self) -> Result<Value, GatewayError> {
        let request = self
            .authorized(self.client.get(self.url(METRICS_PATH)))
            .timeout(self.timeouts.metrics);
        fetch_json(request, METRICS_PATH).await
    }

    /// `POST /v1/tts` with the payload as-is.
    ///
    /// Upstream error statuses are returned as data, only transport
    /// failures are errors.
    pub async fn tts(&self, payload: &Map<String, Value>) -> Result<TtsRelay, GatewayError> {
        let response = self
            .authorized(self.client.post(self.url(TTS_PATH)))
            .json(payload)
            .timeout(self.timeouts.tts)
            .send()
            .await
            .map_err(|source| GatewayError::Transport {
                path: TTS_PATH,
                source,
            })?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|source| GatewayError::Transport {
                path: TTS_PATH,
                source,
            })?;

        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));

        Ok(TtsRelay { status, body })
    }
}

/// Sends the request and decodes a JSON body, failing on any non-2xx status.
async fn fetch_json(request: RequestBuilder, path: &'static str) -> Result<Value, GatewayError> {
    let response = request
        .send()
        .await
        .map_err(|source| GatewayError::Transport { path, source })?;

    let status = response.status();
    if !status.is_success() {
        return Err(GatewayError::Status { path, status });
    }

    response.json::<Value>().await.map_err(|source| {
        if source.is_decode() {
            GatewayError::Decode { path, source }
        } else {
            GatewayError::Transport { path, source }
        }
    })
}
