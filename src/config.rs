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

use std::env;

pub const DEFAULT_GATEWAY_BASE: &str = "http://10.108.0.3:8791";
pub const DEFAULT_PORT: u16 = 3000;

/// Configuration for the StoryForge service.
#[derive(Debug, Clone)]
pub struct Config {
    /// The port to listen on.
    pub port: u16,
    /// Base URL of the upstream gateway, without a trailing slash.
    pub gateway_base: String,
    /// Bearer token for the gateway.
    /// If `None`, no `Authorization` header is sent.
    pub gateway_token: Option<String>,
}

impl Config {
    /// # Environment Variables
    /// * `PORT` - Port to listen on (default: 3000).
    /// * `GATEWAY_BASE` - Upstream gateway URL (default: `http://10.108.0.3:8791`).
    /// * `GATEWAY_TOKEN` - Bearer token, empty means no auth header.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = lookup("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let gateway_base = lookup("GATEWAY_BASE")
            .unwrap_or_else(|| DEFAULT_GATEWAY_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        let gateway_token = lookup("GATEWAY_TOKEN").filter(|t| !t.is_empty());

        Self {
            port,
            gateway_base,
            gateway_token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config_from(&[]);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.gateway_base, DEFAULT_GATEWAY_BASE);
        assert!(config.gateway_token.is_none());
    }

    #[test]
    fn strips_trailing_slashes_from_gateway_base() {
        let config = config_from(&[("GATEWAY_BASE", "http://mock:1234//")]);
        assert_eq!(config.gateway_base, "http://mock:1234");
    }

    #[test]
    fn empty_token_means_no_auth() {
        let config = config_from(&[("GATEWAY_TOKEN", "")]);
        assert!(config.gateway_token.is_none());

        let config = config_from(&[("GATEWAY_TOKEN", "s3cret")]);
        assert_eq!(config.gateway_token.as_deref(), Some("s3cret"));
    }

    #[test]
    fn bad_port_falls_back_to_default() {
        assert_eq!(config_from(&[("PORT", "nope")]).port, DEFAULT_PORT);
        assert_eq!(config_from(&[("PORT", "8080")]).port, 8080);
    }
}
