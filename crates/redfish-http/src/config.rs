// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Configuration for the HTTP transport.

use std::env;
use std::time::Duration;

use crate::error::{Result, TransportError};

/// How requests authenticate against the service.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// HTTP basic authentication on every request.
    Basic { username: String, password: String },
    /// A session token sent as `X-Auth-Token`.
    SessionToken(String),
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Credentials::SessionToken(_) => f.write_str("SessionToken(<redacted>)"),
        }
    }
}

/// Configuration for [`crate::ReqwestTransport`].
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Base endpoint, e.g. `https://10.0.0.5`. Relative URIs are joined to it.
    pub endpoint: String,
    /// Optional credentials.
    pub credentials: Option<Credentials>,
    /// Skip TLS certificate verification (BMCs commonly ship self-signed certs).
    pub skip_cert_verification: bool,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Request timeout.
    pub request_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://127.0.0.1".to_string(),
            credentials: None,
            skip_cert_verification: false,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    /// Create a configuration for the given endpoint with default values.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// Create a configuration from environment variables.
    ///
    /// Environment variables:
    /// - `REDFISH_ENDPOINT`: Base endpoint (required)
    /// - `REDFISH_USERNAME` / `REDFISH_PASSWORD`: Basic auth credentials
    /// - `REDFISH_AUTH_TOKEN`: Session token (takes precedence over basic auth)
    /// - `REDFISH_INSECURE`: Skip TLS verification (default: "false")
    /// - `REDFISH_CONNECT_TIMEOUT_MS`: Connection timeout in milliseconds (default: 10000)
    /// - `REDFISH_REQUEST_TIMEOUT_MS`: Request timeout in milliseconds (default: 30000)
    pub fn from_env() -> Result<Self> {
        let endpoint = env::var("REDFISH_ENDPOINT")
            .map_err(|_| TransportError::Config("REDFISH_ENDPOINT is required".to_string()))?;

        let credentials = match env::var("REDFISH_AUTH_TOKEN") {
            Ok(token) if !token.is_empty() => Some(Credentials::SessionToken(token)),
            _ => match (env::var("REDFISH_USERNAME"), env::var("REDFISH_PASSWORD")) {
                (Ok(username), Ok(password)) => Some(Credentials::Basic { username, password }),
                (Ok(_), Err(_)) => {
                    return Err(TransportError::Config(
                        "REDFISH_PASSWORD is required when REDFISH_USERNAME is set".to_string(),
                    ));
                }
                _ => None,
            },
        };

        let skip_cert_verification = env::var("REDFISH_INSECURE")
            .map(|v| v.to_lowercase() == "true" || v == "1")
            .unwrap_or(false);

        let connect_timeout_ms: u64 = env::var("REDFISH_CONNECT_TIMEOUT_MS")
            .unwrap_or_else(|_| "10000".to_string())
            .parse()
            .map_err(|e| {
                TransportError::Config(format!("invalid REDFISH_CONNECT_TIMEOUT_MS: {}", e))
            })?;

        let request_timeout_ms: u64 = env::var("REDFISH_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".to_string())
            .parse()
            .map_err(|e| {
                TransportError::Config(format!("invalid REDFISH_REQUEST_TIMEOUT_MS: {}", e))
            })?;

        Ok(Self {
            endpoint,
            credentials,
            skip_cert_verification,
            connect_timeout: Duration::from_millis(connect_timeout_ms),
            request_timeout: Duration::from_millis(request_timeout_ms),
        })
    }

    /// Authenticate with HTTP basic auth.
    pub fn with_basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::Basic {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    /// Authenticate with an existing session token.
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::SessionToken(token.into()));
        self
    }

    /// Enable or disable certificate verification skipping.
    pub fn with_skip_cert_verification(mut self, skip: bool) -> Self {
        self.skip_cert_verification = skip;
        self
    }

    /// Set the connection timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TransportConfig::default();
        assert_eq!(config.endpoint, "https://127.0.0.1");
        assert!(config.credentials.is_none());
        assert!(!config.skip_cert_verification);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_builder_methods() {
        let config = TransportConfig::new("https://bmc.local")
            .with_basic_auth("root", "calvin")
            .with_skip_cert_verification(true)
            .with_connect_timeout(Duration::from_secs(5))
            .with_request_timeout(Duration::from_secs(60));

        assert_eq!(config.endpoint, "https://bmc.local");
        assert_eq!(
            config.credentials,
            Some(Credentials::Basic {
                username: "root".to_string(),
                password: "calvin".to_string()
            })
        );
        assert!(config.skip_cert_verification);
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
        assert_eq!(config.request_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_session_token_replaces_basic_auth() {
        let config = TransportConfig::new("https://bmc.local")
            .with_basic_auth("root", "calvin")
            .with_session_token("tok");
        assert_eq!(
            config.credentials,
            Some(Credentials::SessionToken("tok".to_string()))
        );
    }

    #[test]
    fn test_credentials_debug_is_redacted() {
        let creds = Credentials::Basic {
            username: "root".to_string(),
            password: "calvin".to_string(),
        };
        let debug = format!("{:?}", creds);
        assert!(debug.contains("root"));
        assert!(!debug.contains("calvin"));

        let token = format!("{:?}", Credentials::SessionToken("secret".to_string()));
        assert!(!token.contains("secret"));
    }
}
