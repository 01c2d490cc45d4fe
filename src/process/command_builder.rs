//! Type-safe command builder for the external tools the build drives
//!
//! Every `go` and `git` invocation is described by a [`ToolCommand`] before it
//! is handed to a [`CommandRunner`](super::CommandRunner). Building the value
//! separately from running it lets tests record and script invocations, and
//! keeps argument formatting (`module@version`, `-replace old=new`) in one
//! place.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::constants::LOCAL_MODULE_VERSION;
use crate::core::GofnError;

/// Opaque tag telling the orchestrator whom a command's time belongs to.
///
/// The build never interprets these; they are attached to the command,
/// emitted with its tracing events and passed through unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Attribution {
    /// Framework overhead (default).
    #[default]
    Framework,
    /// Failures and time are caused by the user's code or dependencies.
    User,
    /// Only the elapsed time is attributed to the user.
    UserTiming,
}

impl fmt::Display for Attribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = match self {
            Self::Framework => "framework",
            Self::User => "user",
            Self::UserTiming => "user-timing",
        };
        f.write_str(marker)
    }
}

/// Builder describing one external command.
///
/// # Examples
///
/// ```rust
/// use gofn::process::{Attribution, ToolCommand};
///
/// let cmd = ToolCommand::go_get("example.com/lib@v1.2.3")
///     .current_dir("/workspace")
///     .env("GOCACHE", "/tmp/cache")
///     .attribution(Attribution::User);
///
/// assert_eq!(cmd.program(), "go");
/// assert_eq!(cmd.command_args(), ["get", "example.com/lib@v1.2.3"]);
/// assert_eq!(cmd.env_value("GOCACHE"), Some("/tmp/cache"));
/// ```
///
/// # Default Configuration
///
/// - **Working directory**: the process directory
/// - **Environment**: inherited, plus variables added with [`env`](Self::env);
///   a later value for the same key wins
/// - **Attribution**: [`Attribution::Framework`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    /// Program name, resolved on PATH when run
    program: String,

    /// Arguments, in order
    args: Vec<String>,

    /// Working directory for command execution
    current_dir: Option<PathBuf>,

    /// Environment variables added to the inherited environment
    env_vars: Vec<(String, String)>,

    /// Time attribution marker
    attribution: Attribution,

    /// Optional context string for log messages
    context: Option<String>,
}

impl ToolCommand {
    /// Creates a builder for `program` with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            env_vars: Vec::new(),
            attribution: Attribution::default(),
            context: None,
        }
    }

    /// Sets the working directory.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Adds a single argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Adds multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Adds an environment variable for this command only.
    ///
    /// Variables are applied in insertion order, so setting a key twice
    /// overrides the earlier value. The pipeline relies on this to replace the
    /// build-wide `GOPATH` for GOPATH-mode fetches.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.push((key.into(), value.into()));
        self
    }

    /// Adds environment variables that the command's own values override.
    ///
    /// Used to give every command of a build the same base environment.
    pub fn with_base_env<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut env_vars: Vec<(String, String)> =
            vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        env_vars.append(&mut self.env_vars);
        self.env_vars = env_vars;
        self
    }

    /// Sets the attribution marker.
    pub const fn attribution(mut self, attribution: Attribution) -> Self {
        self.attribution = attribution;
        self
    }

    /// Set a context for logging (e.g. which build step issued the command).
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Program to execute.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments, excluding the program.
    #[must_use]
    pub fn command_args(&self) -> &[String] {
        &self.args
    }

    /// Working directory, if one was set.
    #[must_use]
    pub fn working_dir(&self) -> Option<&Path> {
        self.current_dir.as_deref()
    }

    /// Environment additions in insertion order.
    #[must_use]
    pub fn env_vars(&self) -> &[(String, String)] {
        &self.env_vars
    }

    /// Effective value of an added environment variable (last one wins).
    #[must_use]
    pub fn env_value(&self, key: &str) -> Option<&str> {
        self.env_vars.iter().rev().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    /// Attribution marker.
    #[must_use]
    pub const fn attribution_marker(&self) -> Attribution {
        self.attribution
    }

    /// Logging context, if any.
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Short operation name for messages: the first argument, or `mod edit`
    /// style pairs for two-level subcommands.
    #[must_use]
    pub fn operation(&self) -> String {
        match self.args.as_slice() {
            [first, second, ..] if first == "mod" => format!("{first} {second}"),
            [first, ..] => first.clone(),
            [] => "unknown".to_string(),
        }
    }

    /// Whether the arguments start with `prefix`.
    #[must_use]
    pub fn args_start_with(&self, prefix: &[&str]) -> bool {
        self.args.len() >= prefix.len()
            && self.args.iter().zip(prefix).all(|(arg, expected)| arg.as_str() == *expected)
    }

    /// Builds the typed failure for a non-zero outcome of this command.
    #[must_use]
    pub fn failure(&self, output: &super::CommandOutput) -> GofnError {
        let stderr = if output.stderr.trim().is_empty() {
            output.stdout.trim()
        } else {
            output.stderr.trim()
        };
        GofnError::CommandFailed {
            program: self.program.clone(),
            operation: self.operation(),
            exit_code: output.exit_code,
            stderr: stderr.to_string(),
        }
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

// Convenience builders for the commands the build issues

impl ToolCommand {
    /// `go <args>`
    pub fn go<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new("go").args(args)
    }

    /// `go version`
    pub fn go_version() -> Self {
        Self::go(["version"])
    }

    /// `go list -m`: module path of the current module
    pub fn go_list_module() -> Self {
        Self::go(["list", "-m"])
    }

    /// `go list -m -f {{.Version}} <module>`: version of a required module
    pub fn go_list_module_version(module: &str) -> Self {
        Self::go(["list", "-m", "-f", "{{.Version}}", module])
    }

    /// `go mod init <module>`
    pub fn go_mod_init(module: &str) -> Self {
        Self::go(["mod", "init", module])
    }

    /// `go mod edit -require <module>@<placeholder>`
    pub fn go_mod_require_local(module: &str) -> Self {
        Self::go(["mod", "edit", "-require"]).arg(format!("{module}@{LOCAL_MODULE_VERSION}"))
    }

    /// `go mod edit -replace <module>@<placeholder>=<path>`
    pub fn go_mod_replace_local(module: &str, path: &Path) -> Self {
        Self::go(["mod", "edit", "-replace"])
            .arg(format!("{module}@{LOCAL_MODULE_VERSION}={}", path.display()))
    }

    /// `go get <target>`
    pub fn go_get(target: &str) -> Self {
        Self::go(["get", target])
    }

    /// `go run <package> <args>`
    pub fn go_run<I, S>(package: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::go(["run", package]).args(args)
    }

    /// `git checkout <reference>`
    pub fn git_checkout(reference: &str) -> Self {
        Self::new("git").args(["checkout", reference])
    }
}
