//! Client side of the query service: HTTP access, backend supervision and
//! liveness tracking.
//!
//! Everything here is blocking. It runs on the terminal UI thread or in the
//! `ask` command, never inside a tokio runtime.

mod backend;
mod connection;
mod error;
mod supervisor;
#[cfg(test)]
pub(crate) mod testing;

pub use backend::{
    BackendApi, DEFAULT_PROBE_TIMEOUT, DEFAULT_REQUEST_TIMEOUT, HttpBackend, HttpBackendBuilder,
};
pub use connection::{Liveness, RetryPolicy, ServiceConnection};
pub use error::ClientError;
pub use supervisor::{LaunchCommand, Launcher, ProcessSupervisor};
