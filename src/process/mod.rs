//! External process execution
//!
//! The build never spawns processes directly. Steps describe what they need as
//! a [`ToolCommand`] and hand it to a [`CommandRunner`]:
//!
//! - [`SystemRunner`] runs the command with `tokio::process`, capturing output
//! - the recording runner in `test_utils` scripts responses for tests
//!
//! Commands run one at a time and are awaited to completion. There are no
//! retries and no timeouts; the lifecycle that invokes the buildpack owns
//! both.
//!
//! # Process contract
//!
//! [`CommandRunner::run`] only fails when the process could not be started.
//! A non-zero exit is a normal [`CommandOutput`]; callers that do not care
//! about the failure text use [`CommandRunner::run_checked`], which turns it
//! into [`GofnError::CommandFailed`](crate::core::GofnError::CommandFailed).

pub mod command_builder;

pub use command_builder::{Attribution, ToolCommand};

use anyhow::{Context, Result};
use std::process::Stdio;
use tokio::process::Command;

use crate::core::GofnError;
use crate::utils::platform::find_executable;

/// Captured result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
    /// Exit code, `None` when terminated by a signal
    pub exit_code: Option<i32>,
}

impl CommandOutput {
    /// A successful outcome with the given stdout.
    pub fn success_with(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            exit_code: Some(0),
        }
    }

    /// A failed outcome (exit code 1) with the given stderr.
    pub fn failure_with(stderr: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: stderr.into(),
            exit_code: Some(1),
        }
    }

    /// Whether the command exited with status 0.
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Standard output with surrounding whitespace removed.
    #[must_use]
    pub fn stdout_trimmed(&self) -> &str {
        self.stdout.trim()
    }
}

/// Capability to run external commands.
///
/// Implementations must run the command to completion before returning.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Runs the command and returns its outcome, successful or not.
    ///
    /// # Errors
    ///
    /// Only when the process could not be started (e.g. the program is not
    /// installed).
    async fn run(&self, command: &ToolCommand) -> Result<CommandOutput>;

    /// Runs the command and fails with [`GofnError::CommandFailed`] on a
    /// non-zero exit.
    async fn run_checked(&self, command: &ToolCommand) -> Result<CommandOutput> {
        let output = self.run(command).await?;
        if output.success() {
            Ok(output)
        } else {
            Err(command.failure(&output).into())
        }
    }
}

/// Runner adding a fixed base environment to every command.
///
/// Variables set on the command itself take precedence.
#[derive(Debug)]
pub struct EnvRunner<'a, R> {
    inner: &'a R,
    env: Vec<(String, String)>,
}

impl<'a, R: CommandRunner> EnvRunner<'a, R> {
    /// Wraps `inner` with the given base environment.
    pub fn new<I, K, V>(inner: &'a R, env: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            inner,
            env: env.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl<R: CommandRunner> CommandRunner for EnvRunner<'_, R> {
    async fn run(&self, command: &ToolCommand) -> Result<CommandOutput> {
        let command = command.clone().with_base_env(self.env.iter().cloned());
        self.inner.run(&command).await
    }
}

/// Runs commands on the host with `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    /// Creates a new runner.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemRunner {
    async fn run(&self, command: &ToolCommand) -> Result<CommandOutput> {
        let start = std::time::Instant::now();
        let executable = find_executable(command.program()).ok_or_else(|| {
            GofnError::ToolNotFound {
                program: command.program().to_string(),
            }
        })?;

        let mut cmd = Command::new(&executable);
        cmd.args(command.command_args());
        if let Some(dir) = command.working_dir() {
            cmd.current_dir(dir);
        }
        for (key, value) in command.env_vars() {
            tracing::trace!(target: "process", "Setting env var: {}={}", key, value);
            cmd.env(key, value);
        }
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        match command.context() {
            Some(ctx) => tracing::debug!(
                target: "process",
                attribution = %command.attribution_marker(),
                "({}) Executing command: {}", ctx, command
            ),
            None => tracing::debug!(
                target: "process",
                attribution = %command.attribution_marker(),
                "Executing command: {}", command
            ),
        }

        let output = cmd.output().await.with_context(|| format!("Failed to execute {command}"))?;

        let result = CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code(),
        };

        if result.success() {
            if !result.stdout.trim().is_empty() {
                tracing::debug!(target: "process", "{}", result.stdout.trim());
            }
        } else {
            tracing::debug!(
                target: "process",
                "Command failed with exit code: {:?}",
                result.exit_code
            );
            if !result.stderr.trim().is_empty() {
                tracing::debug!(target: "process", "Error: {}", result.stderr.trim());
            }
        }

        let elapsed = start.elapsed();
        if elapsed.as_secs() > 1 {
            tracing::info!(
                target: "process::perf",
                attribution = %command.attribution_marker(),
                "{} {} took {:.2}s",
                command.program(),
                command.operation(),
                elapsed.as_secs_f64()
            );
        } else if elapsed.as_millis() > 100 {
            tracing::debug!(
                target: "process::perf",
                attribution = %command.attribution_marker(),
                "{} {} took {}ms",
                command.program(),
                command.operation(),
                elapsed.as_millis()
            );
        }

        Ok(result)
    }
}
