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

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Failures while talking to the upstream gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Timeout, DNS failure, refused connection or a broken body stream.
    #[error("gateway request to {path} failed: {source}")]
    Transport {
        path: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The gateway answered with a non-success status.
    #[error("gateway returned {status} for {path}")]
    Status {
        path: &'static str,
        status: StatusCode,
    },

    /// The gateway answered 2xx but the body was not JSON.
    #[error("gateway returned invalid JSON for {path}: {source}")]
    Decode {
        path: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The spawned forwarding task panicked or was cancelled.
    #[error("forwarding task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        tracing::error!("{}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_status_becomes_bare_server_error() {
        let err = GatewayError::Status {
            path: "/v1/metrics",
            status: StatusCode::SERVICE_UNAVAILABLE,
        };
        assert_eq!(
            err.to_string(),
            "gateway returned 503 Service Unavailable for /v1/metrics"
        );

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
