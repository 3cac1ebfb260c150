//! Scripted test doubles for the client seams.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::answerer::Answer;

use super::{BackendApi, ClientError, Launcher, RetryPolicy};

/// Backend whose health answers follow a script; the last entry repeats.
pub(crate) struct ScriptedBackend {
    health: Mutex<Vec<bool>>,
    pub(crate) probes: Arc<AtomicUsize>,
    pub(crate) searches: Arc<AtomicUsize>,
    pub(crate) answer: Result<Answer, u16>,
}

impl ScriptedBackend {
    pub(crate) fn new(health: &[bool]) -> Self {
        Self {
            health: Mutex::new(health.iter().rev().copied().collect()),
            probes: Arc::new(AtomicUsize::new(0)),
            searches: Arc::new(AtomicUsize::new(0)),
            answer: Ok(Answer::new(
                "Paris".to_string(),
                vec!["https://a.example".to_string()],
            )),
        }
    }

    pub(crate) fn failing_with(mut self, status: u16) -> Self {
        self.answer = Err(status);
        self
    }
}

impl BackendApi for ScriptedBackend {
    fn health(&self) -> bool {
        self.probes.fetch_add(1, Ordering::SeqCst);
        let mut script = self.health.lock().unwrap();
        if script.len() > 1 {
            script.pop().unwrap()
        } else {
            script.last().copied().unwrap_or(false)
        }
    }

    fn search(&self, _query: &str) -> Result<Answer, ClientError> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        match &self.answer {
            Ok(answer) => Ok(answer.clone()),
            Err(status) => Err(ClientError::Status {
                status: *status,
                body: r#"{"error":"Internal Server Error"}"#.to_string(),
            }),
        }
    }

    fn endpoint(&self) -> &str {
        "http://localhost:5000"
    }
}

pub(crate) struct CountingLauncher {
    pub(crate) launches: Arc<AtomicUsize>,
    fail: bool,
    exits: bool,
}

impl CountingLauncher {
    pub(crate) fn new() -> Self {
        Self {
            launches: Arc::new(AtomicUsize::new(0)),
            fail: false,
            exits: false,
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    /// Launches fine, but the launched instance exits right away.
    pub(crate) fn exiting() -> Self {
        Self {
            exits: true,
            ..Self::new()
        }
    }
}

impl Launcher for CountingLauncher {
    fn launch(&mut self) -> Result<(), ClientError> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ClientError::Launch {
                reason: "spawn refused".to_string(),
            });
        }
        Ok(())
    }

    fn check_alive(&mut self) -> Result<(), ClientError> {
        if self.exits {
            return Err(ClientError::Launch {
                reason: "query service exited with exit status: 1".to_string(),
            });
        }
        Ok(())
    }

    fn shutdown(&mut self) {}
}

pub(crate) fn no_wait() -> RetryPolicy {
    RetryPolicy {
        attempts: 5,
        interval: Duration::ZERO,
    }
}
