use std::{
    path::PathBuf,
    process::{Command, Stdio},
    thread,
    time::{Duration, Instant},
};

use crate::error::InvokeError;

/// One blocking invocation of the privileged firmware utility.
///
/// This is the seam between the boot manager and the outside world; tests
/// substitute a recording implementation. Every call is independent and
/// stateless.
pub trait Invoker {
    /// Runs the utility with the given arguments and returns its stdout.
    ///
    /// A non-zero exit status is an error carrying the captured stderr, never
    /// a partial result.
    fn invoke(&self, args: &[&str]) -> Result<String, InvokeError>;
}

/// Invokes `efibootmgr` through an elevation command, `pkexec` by default.
///
/// The call blocks for the duration of the invocation, which may include an
/// interactive privilege prompt; by default there is no timeout so the prompt
/// can wait on the user. [`Efibootmgr::with_timeout`] opts into a
/// kill-on-deadline bound.
pub struct Efibootmgr {
    utility: PathBuf,
    elevate: Option<PathBuf>,
    timeout: Option<Duration>,
}

impl Efibootmgr {
    pub fn new() -> Self {
        Efibootmgr {
            utility: "/usr/sbin/efibootmgr".into(),
            elevate: Some("pkexec".into()),
            timeout: None,
        }
    }

    pub fn with_utility(mut self, utility: impl Into<PathBuf>) -> Self {
        self.utility = utility.into();
        self
    }

    /// Sets the elevation command, or disables elevation with `None` (for
    /// callers that already run as root).
    pub fn with_elevation(mut self, elevate: Option<PathBuf>) -> Self {
        self.elevate = elevate;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn spawn_error(&self, source: std::io::Error) -> InvokeError {
        InvokeError::Spawn {
            utility: self.utility.clone(),
            source,
        }
    }
}

impl Default for Efibootmgr {
    fn default() -> Self {
        Efibootmgr::new()
    }
}

impl Invoker for Efibootmgr {
    fn invoke(&self, args: &[&str]) -> Result<String, InvokeError> {
        let mut cmd = match &self.elevate {
            Some(elevate) => {
                let mut cmd = Command::new(elevate);
                cmd.arg(&self.utility);
                cmd
            }
            None => Command::new(&self.utility),
        };
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        log::debug!("Running {} {}", self.utility.display(), args.join(" "));
        let mut child = cmd.spawn().map_err(|e| self.spawn_error(e))?;

        if let Some(timeout) = self.timeout {
            // The utility's output is far smaller than the pipe buffer, so
            // polling without draining the pipes cannot deadlock it.
            let deadline = Instant::now() + timeout;
            loop {
                match child.try_wait().map_err(|e| self.spawn_error(e))? {
                    Some(_) => break,
                    None if Instant::now() >= deadline => {
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(InvokeError::Timeout {
                            utility: self.utility.clone(),
                            timeout,
                        });
                    }
                    None => thread::sleep(Duration::from_millis(20)),
                }
            }
        }

        let output = child.wait_with_output().map_err(|e| self.spawn_error(e))?;
        if !output.status.success() {
            return Err(InvokeError::Failed {
                utility: self.utility.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Exercised against plain system binaries; elevation is disabled so the
    // tests do not depend on pkexec or efibootmgr being installed.

    #[test]
    fn captures_stdout_on_success() {
        let invoker = Efibootmgr::new()
            .with_utility("/bin/echo")
            .with_elevation(None);
        let out = invoker.invoke(&["BootCurrent: 0000"]).unwrap();
        assert_eq!(out, "BootCurrent: 0000\n");
    }

    #[test]
    fn nonzero_exit_carries_stderr() {
        let invoker = Efibootmgr::new()
            .with_utility("/bin/sh")
            .with_elevation(None);
        let err = invoker
            .invoke(&["-c", "echo denied >&2; exit 3"])
            .unwrap_err();
        match err {
            InvokeError::Failed { status, stderr, .. } => {
                assert_eq!(status.code(), Some(3));
                assert_eq!(stderr, "denied");
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn missing_binary_is_a_spawn_error() {
        let invoker = Efibootmgr::new()
            .with_utility("/nonexistent/efibootmgr")
            .with_elevation(None);
        assert!(matches!(
            invoker.invoke(&[]),
            Err(InvokeError::Spawn { .. })
        ));
    }

    #[test]
    fn timeout_kills_the_child() {
        let invoker = Efibootmgr::new()
            .with_utility("/bin/sleep")
            .with_elevation(None)
            .with_timeout(Duration::from_millis(100));
        let start = Instant::now();
        let err = invoker.invoke(&["10"]).unwrap_err();
        assert!(matches!(err, InvokeError::Timeout { .. }));
        assert!(start.elapsed() < Duration::from_secs(5));
    }
}
