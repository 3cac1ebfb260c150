//! Liveness tracking and self-healing access to the query service.

use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::answerer::Answer;

use super::backend::BackendApi;
use super::error::ClientError;
use super::supervisor::Launcher;

/// How often, and how many times, to poll liveness after a launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 5,
            interval: Duration::from_secs(1),
        }
    }
}

/// Last known availability of the query service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    /// Not probed yet
    Unknown,
    /// A probe is in flight
    Checking,
    /// The last probe succeeded
    Available,
    /// The last probe failed and no launch has been attempted
    Unavailable,
    /// A launch was requested and liveness is being polled
    Launching,
    /// Launch failed or the service never became ready
    Failed,
}

/// A query service endpoint plus the means to start it.
///
/// `Failed` is terminal until the next call to `ensure_available`, which
/// starts over from a fresh probe.
pub struct ServiceConnection {
    backend: Box<dyn BackendApi>,
    launcher: Option<Box<dyn Launcher>>,
    retry: RetryPolicy,
    liveness: Liveness,
}

impl ServiceConnection {
    pub fn new(
        backend: Box<dyn BackendApi>,
        launcher: Option<Box<dyn Launcher>>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            backend,
            launcher,
            retry,
            liveness: Liveness::Unknown,
        }
    }

    pub fn liveness(&self) -> Liveness {
        self.liveness
    }

    pub fn endpoint(&self) -> &str {
        self.backend.endpoint()
    }

    /// Returns `true` if a launcher is configured.
    pub fn can_launch(&self) -> bool {
        self.launcher.is_some()
    }

    /// Probes the service once and records the result.
    pub fn probe(&mut self) -> bool {
        self.liveness = Liveness::Checking;
        let up = self.backend.health();
        self.liveness = if up {
            Liveness::Available
        } else {
            Liveness::Unavailable
        };
        debug!(liveness = ?self.liveness, "probed query service");
        up
    }

    /// Makes sure the service is reachable, launching it if needed.
    ///
    /// # Errors
    ///
    /// - `ClientError::Launch` if the launcher fails to start the service or
    ///   the started service exits before passing a probe
    /// - `ClientError::Unavailable` if no launcher is configured or the
    ///   service does not pass a probe within the retry policy
    pub fn ensure_available(&mut self) -> Result<(), ClientError> {
        if self.probe() {
            return Ok(());
        }

        let endpoint = self.backend.endpoint().to_string();
        let Some(launcher) = self.launcher.as_mut() else {
            warn!("query service unavailable at {} and launching is disabled", endpoint);
            self.liveness = Liveness::Failed;
            return Err(ClientError::Unavailable { endpoint });
        };

        self.liveness = Liveness::Launching;
        if let Err(e) = launcher.launch() {
            self.liveness = Liveness::Failed;
            return Err(e);
        }

        for attempt in 1..=self.retry.attempts {
            thread::sleep(self.retry.interval);
            if self.backend.health() {
                info!(attempt, "query service became available");
                self.liveness = Liveness::Available;
                return Ok(());
            }
            if let Err(e) = launcher.check_alive() {
                warn!("query service stopped before becoming available: {}", e);
                self.liveness = Liveness::Failed;
                return Err(e);
            }
            debug!(attempt, "query service not ready yet");
        }

        warn!(
            attempts = self.retry.attempts,
            "query service did not become available at {}", endpoint
        );
        self.liveness = Liveness::Failed;
        Err(ClientError::Unavailable { endpoint })
    }

    /// Ensures availability, then sends `query`.
    ///
    /// # Errors
    ///
    /// Returns any error from `ensure_available` or from the search call.
    pub fn ask(&mut self, query: &str) -> Result<Answer, ClientError> {
        self.ensure_available()?;
        self.backend.search(query)
    }

    /// Stops a service this connection launched, if any.
    pub fn shutdown(&mut self) {
        if let Some(launcher) = self.launcher.as_mut() {
            launcher.shutdown();
        }
    }
}
