//! Client configuration resolved from flags, environment and defaults.

use std::time::Duration;

use anyhow::{Context, Result};

use crate::client::{
    DEFAULT_PROBE_TIMEOUT, DEFAULT_REQUEST_TIMEOUT, HttpBackendBuilder, LaunchCommand,
    Launcher, ProcessSupervisor, RetryPolicy, ServiceConnection,
};

/// Address the query service binds when none is given.
pub const DEFAULT_BIND: &str = "127.0.0.1:5000";

/// Endpoint the client talks to when none is given.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000";

/// Environment variable overriding the client endpoint.
pub const ENDPOINT_ENV: &str = "RAG_SEARCH_URL";

/// Everything the client needs to reach, and if necessary start, the service.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub endpoint: String,
    pub probe_timeout: Duration,
    pub request_timeout: Duration,
    pub retry: RetryPolicy,
    /// Command used to start the service; `None` disables launching.
    pub launch: Option<LaunchCommand>,
}

impl ClientConfig {
    /// Resolves the endpoint from `endpoint`, then `RAG_SEARCH_URL`, then the
    /// default. Launching is left disabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the resolved endpoint is not an `http(s)` URL with
    /// a host.
    pub fn resolve(endpoint: Option<String>) -> Result<Self> {
        let endpoint = endpoint
            .or_else(|| std::env::var(ENDPOINT_ENV).ok())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let endpoint = endpoint.trim_end_matches('/').to_string();
        bind_address(&endpoint)?;

        Ok(Self {
            endpoint,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            retry: RetryPolicy::default(),
            launch: None,
        })
    }

    /// Sets the launch command.
    pub fn with_launch(mut self, command: LaunchCommand) -> Self {
        self.launch = Some(command);
        self
    }

    /// Builds a `ServiceConnection` from this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn connect(&self) -> Result<ServiceConnection> {
        let backend = HttpBackendBuilder::new(&self.endpoint)
            .probe_timeout(self.probe_timeout)
            .request_timeout(self.request_timeout)
            .build()
            .context("failed to create query service client")?;

        let launcher = self
            .launch
            .clone()
            .map(|command| Box::new(ProcessSupervisor::new(command)) as Box<dyn Launcher>);

        Ok(ServiceConnection::new(
            Box::new(backend),
            launcher,
            self.retry,
        ))
    }
}

/// Derives the `host:port` a launched service should bind from `endpoint`.
///
/// # Errors
///
/// Returns an error if `endpoint` is not an `http(s)` URL with a host.
pub fn bind_address(endpoint: &str) -> Result<String> {
    let url = reqwest::Url::parse(endpoint)
        .with_context(|| format!("invalid query service endpoint: {endpoint}"))?;

    if !matches!(url.scheme(), "http" | "https") {
        anyhow::bail!("query service endpoint must be http or https: {endpoint}");
    }

    let host = url
        .host_str()
        .with_context(|| format!("query service endpoint has no host: {endpoint}"))?;
    let port = url
        .port_or_known_default()
        .with_context(|| format!("query service endpoint has no port: {endpoint}"))?;

    Ok(format!("{host}:{port}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn resolve_prefers_explicit_endpoint() {
        unsafe {
            std::env::set_var(ENDPOINT_ENV, "http://env-host:6000");
        }

        let config = ClientConfig::resolve(Some("http://flag-host:7000/".to_string())).unwrap();
        assert_eq!(config.endpoint, "http://flag-host:7000");

        unsafe {
            std::env::remove_var(ENDPOINT_ENV);
        }
    }

    #[test]
    #[serial]
    fn resolve_reads_env_then_default() {
        unsafe {
            std::env::set_var(ENDPOINT_ENV, "http://env-host:6000");
        }
        let config = ClientConfig::resolve(None).unwrap();
        assert_eq!(config.endpoint, "http://env-host:6000");

        unsafe {
            std::env::remove_var(ENDPOINT_ENV);
        }
        let config = ClientConfig::resolve(None).unwrap();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.probe_timeout, Duration::from_secs(2));
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert_eq!(config.retry, RetryPolicy::default());
        assert!(config.launch.is_none());
    }

    #[test]
    #[serial]
    fn resolve_rejects_non_http_endpoint() {
        unsafe {
            std::env::remove_var(ENDPOINT_ENV);
        }
        assert!(ClientConfig::resolve(Some("ftp://localhost:5000".to_string())).is_err());
        assert!(ClientConfig::resolve(Some("not a url".to_string())).is_err());
    }

    #[test]
    fn bind_address_uses_endpoint_host_and_port() {
        assert_eq!(
            bind_address("http://localhost:5000").unwrap(),
            "localhost:5000"
        );
        assert_eq!(bind_address("http://127.0.0.1").unwrap(), "127.0.0.1:80");
    }
}
