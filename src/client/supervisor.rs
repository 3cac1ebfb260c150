//! Launching the query service as a supervised child process.

use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use tracing::{debug, info, warn};

use super::error::ClientError;

/// Starts the query service on demand.
pub trait Launcher: Send {
    /// Starts the service unless an instance owned by this launcher is
    /// already running.
    fn launch(&mut self) -> Result<(), ClientError>;

    /// Reports an instance started by `launch` that has already exited.
    ///
    /// Called while waiting for the service to become ready.
    fn check_alive(&mut self) -> Result<(), ClientError> {
        Ok(())
    }

    /// Stops any instance this launcher started.
    fn shutdown(&mut self);
}

/// A program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    program: PathBuf,
    args: Vec<String>,
}

impl LaunchCommand {
    /// Creates a command running `program` with `args`.
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// The running executable with `serve --bind <bind> [--log-file <path>]`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Launch` if the current executable cannot be located.
    pub fn current_exe_serve(bind: &str, log_file: Option<&Path>) -> Result<Self, ClientError> {
        let program = std::env::current_exe().map_err(|e| ClientError::Launch {
            reason: format!("cannot locate the rag-search executable: {e}"),
        })?;

        let mut args = vec!["serve".to_string(), "--bind".to_string(), bind.to_string()];
        if let Some(path) = log_file {
            args.push("--log-file".to_string());
            args.push(path.display().to_string());
        }

        Ok(Self::new(program, args))
    }

    /// Parses a whitespace-separated command line such as `rag-search serve`.
    ///
    /// Returns `None` for a blank line.
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace().map(String::from);
        let program = parts.next()?;
        Some(Self::new(program, parts.collect()))
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

/// Owns the query service child process.
///
/// The child is spawned at most once while it is alive and is killed when the
/// supervisor is shut down or dropped.
#[derive(Debug)]
pub struct ProcessSupervisor {
    command: LaunchCommand,
    child: Option<Child>,
}

impl ProcessSupervisor {
    pub fn new(command: LaunchCommand) -> Self {
        Self {
            command,
            child: None,
        }
    }

    /// Process id of the live child, if any.
    pub fn child_id(&self) -> Option<u32> {
        self.child.as_ref().map(Child::id)
    }

    /// Returns `true` if a previously spawned child is still running.
    ///
    /// Reaps the child if it has exited.
    fn child_is_running(&mut self) -> Result<bool, ClientError> {
        let Some(child) = self.child.as_mut() else {
            return Ok(false);
        };

        match child.try_wait() {
            Ok(None) => Ok(true),
            Ok(Some(status)) => {
                warn!("query service exited with {}", status);
                self.child = None;
                Ok(false)
            }
            Err(e) => Err(ClientError::Launch {
                reason: format!("cannot query child process state: {e}"),
            }),
        }
    }
}

impl Launcher for ProcessSupervisor {
    fn launch(&mut self) -> Result<(), ClientError> {
        if self.child_is_running()? {
            debug!("query service child already running, not respawning");
            return Ok(());
        }

        let child = Command::new(&self.command.program)
            .args(&self.command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| ClientError::Launch {
                reason: format!("{}: {e}", self.command.program.display()),
            })?;

        info!(
            pid = child.id(),
            program = %self.command.program.display(),
            "launched query service"
        );
        self.child = Some(child);
        Ok(())
    }

    fn check_alive(&mut self) -> Result<(), ClientError> {
        let Some(child) = self.child.as_mut() else {
            return Ok(());
        };

        match child.try_wait() {
            Ok(None) => Ok(()),
            Ok(Some(status)) => {
                self.child = None;
                Err(ClientError::Launch {
                    reason: format!("query service exited with {status}"),
                })
            }
            Err(e) => Err(ClientError::Launch {
                reason: format!("cannot query child process state: {e}"),
            }),
        }
    }

    fn shutdown(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.kill() {
                debug!("failed to kill query service: {}", e);
            }
            let _ = child.wait();
            info!("query service stopped");
        }
    }
}

impl Drop for ProcessSupervisor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_exe_serve_passes_bind_and_log_file() {
        let command =
            LaunchCommand::current_exe_serve("localhost:5000", Some(Path::new("/tmp/server.log")))
                .expect("current_exe should resolve");

        assert_eq!(
            command.args(),
            ["serve", "--bind", "localhost:5000", "--log-file", "/tmp/server.log"]
        );
    }

    #[test]
    fn parse_splits_program_and_args() {
        let command = LaunchCommand::parse("rag-search serve --bind 127.0.0.1:5000").unwrap();
        assert_eq!(command.program(), Path::new("rag-search"));
        assert_eq!(command.args(), ["serve", "--bind", "127.0.0.1:5000"]);

        assert!(LaunchCommand::parse("   ").is_none());
    }

    #[test]
    fn launch_of_missing_program_is_launch_error() {
        let mut supervisor = ProcessSupervisor::new(LaunchCommand::new(
            "/nonexistent/rag-search-binary",
            vec![],
        ));

        let error = supervisor.launch().unwrap_err();
        assert!(matches!(error, ClientError::Launch { .. }));
        assert!(
            error
                .to_string()
                .starts_with("Failed to start the query service:")
        );
        assert_eq!(supervisor.child_id(), None);
    }

    #[cfg(unix)]
    #[test]
    fn running_child_is_not_respawned() {
        let mut supervisor =
            ProcessSupervisor::new(LaunchCommand::new("sleep", vec!["30".to_string()]));

        supervisor.launch().expect("first launch should spawn");
        let first = supervisor.child_id().expect("child should be tracked");

        supervisor.launch().expect("second launch should be a no-op");
        assert_eq!(supervisor.child_id(), Some(first));

        supervisor.shutdown();
        assert_eq!(supervisor.child_id(), None);
    }

    #[cfg(unix)]
    #[test]
    fn exited_child_is_respawned() {
        let mut supervisor = ProcessSupervisor::new(LaunchCommand::new("true", vec![]));

        supervisor.launch().expect("first launch should spawn");
        let first = supervisor.child_id().expect("child should be tracked");
        if let Some(child) = supervisor.child.as_mut() {
            child.wait().expect("child should exit");
        }

        supervisor.launch().expect("relaunch should spawn");
        let second = supervisor.child_id().expect("child should be tracked");
        assert_ne!(first, second);
    }

    #[cfg(unix)]
    #[test]
    fn exited_child_is_reported_by_check_alive() {
        let mut supervisor = ProcessSupervisor::new(LaunchCommand::new("false", vec![]));

        supervisor.launch().expect("launch should spawn");
        if let Some(child) = supervisor.child.as_mut() {
            child.wait().expect("child should exit");
        }

        let error = supervisor.check_alive().unwrap_err();
        assert!(
            error
                .to_string()
                .starts_with("Failed to start the query service: query service exited with"),
            "{error}"
        );
        assert_eq!(supervisor.child_id(), None);
    }

    #[cfg(unix)]
    #[test]
    fn running_child_passes_check_alive() {
        let mut supervisor =
            ProcessSupervisor::new(LaunchCommand::new("sleep", vec!["30".to_string()]));

        assert!(supervisor.check_alive().is_ok());
        supervisor.launch().expect("launch should spawn");
        assert!(supervisor.check_alive().is_ok());

        supervisor.shutdown();
    }
}
