//! Shell command execution for the platform backends

use std::{
    ffi::OsStr,
    process::{Command, ExitStatus, Output},
};
use thiserror::Error;

/// Builds and executes a `ShellCommand`, returning stdout on success
///
/// ```ignore
/// cmd!("ip", "address", "add", "192.168.0.2/24", "dev", "eth0")?;
/// ```
#[macro_export]
macro_rules! cmd {
    ($cmd:expr) => {
        $crate::cmd::ShellCommand::new($cmd).execute()
    };

    ($cmd:expr, $($arg:expr),+) => {{
        let mut cmd = $crate::cmd::ShellCommand::new($cmd);
        $(cmd.arg($arg);)+
        cmd.execute()
    }};
}

/// Repersents an Error that can occur when running a shell command
#[derive(Debug, Error)]
pub enum ShellCommandError {
    /// Input/Output error when launching the shell command
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Exited with a non-zero status
    #[error("command failed with error code {0}; stdout: {1}; stderr: {2}")]
    Failed(ExitStatus, String, String),
}

/// A simple wrapper around a command that makes it easier to interact with and launch commands
/// quickly while still capturing the output
pub struct ShellCommand {
    cmd: Command,
}

impl ShellCommand {
    /// Returns a new shell command that will execute `cmd`
    ///
    /// # Arguments
    /// * `cmd` - Command to execute
    pub fn new<S: AsRef<OsStr>>(cmd: S) -> Self {
        ShellCommand {
            cmd: Command::new(cmd),
        }
    }

    /// Adds an argument to this shell command
    ///
    /// # Arguments
    /// * `arg` - Argument to add to the shell command
    pub fn arg<S: AsRef<OsStr>>(&mut self, arg: S) {
        self.cmd.arg(arg);
    }

    /// Logs captured stdout/stderr and converts them into owned strings
    fn collect(output: &Output) -> (String, String) {
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !stdout.is_empty() {
            tracing::debug!("command stdout:\n{}", stdout);
        }

        if !stderr.is_empty() {
            tracing::debug!("command stderr:\n{}", stderr);
        }

        (stdout, stderr)
    }

    /// Helper function to parse the output from a shell command
    ///
    /// # Arguments
    /// * `output` - the captured output from stdout/stderr
    ///
    /// # Errors
    /// * `ShellCommandError::Failed` - If the return code is non-zero
    fn parse_output(output: Output) -> Result<String, ShellCommandError> {
        let (stdout, stderr) = Self::collect(&output);

        match output.status.success() {
            true => Ok(stdout),
            false => Err(ShellCommandError::Failed(output.status, stdout, stderr)),
        }
    }

    /// Executes the command, capturing the output (stdin/stderr) for logging
    ///
    /// # Errors
    /// * `ShellCommandError::Io` - If launching/forking the command fails
    /// * `ShellCommandError::Failed` - If the return code is non-zero
    pub fn execute(mut self) -> Result<String, ShellCommandError> {
        tracing::debug!("command: {:?}", self.cmd);
        let output = self.cmd.output()?;
        Self::parse_output(output)
    }

    /// Executes the command and returns everything it printed, whatever its exit status
    ///
    /// Used for commands whose output is meant for a human (e.g. `ping`), where a non-zero exit
    /// code is part of the result rather than a failure to run.
    ///
    /// # Errors
    /// * `ShellCommandError::Io` - If launching/forking the command fails
    pub fn capture(mut self) -> Result<String, ShellCommandError> {
        tracing::debug!("command: {:?}", self.cmd);
        let output = self.cmd.output()?;
        let (mut stdout, stderr) = Self::collect(&output);
        tracing::debug!(status = ?output.status, "command finished");

        stdout.push_str(&stderr);
        Ok(stdout)
    }
}
