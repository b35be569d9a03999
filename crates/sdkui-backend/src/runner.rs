use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::Command;

use crate::error::BackendError;
use crate::parse::strip_ansi;

/// Runs one shell function (such as `sdk` or `nvm`) inside `bash -c`.
///
/// The preamble sources the tool's init script. Arguments are handed to the
/// function as positional parameters and never spliced into the script text.
#[derive(Debug, Clone)]
pub struct ScriptRunner {
    shell: PathBuf,
    preamble: String,
    function: &'static str,
    envs: Vec<(&'static str, OsString)>,
}

impl ScriptRunner {
    pub fn new(preamble: impl Into<String>, function: &'static str) -> Self {
        let shell = which::which("bash").unwrap_or_else(|_| PathBuf::from("bash"));
        Self {
            shell,
            preamble: preamble.into(),
            function,
            envs: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_shell(mut self, shell: impl Into<PathBuf>) -> Self {
        self.shell = shell.into();
        self
    }

    #[must_use]
    pub fn with_env(mut self, key: &'static str, value: impl Into<OsString>) -> Self {
        self.envs.push((key, value.into()));
        self
    }

    #[must_use]
    pub fn function(&self) -> &'static str {
        self.function
    }

    fn script(&self) -> String {
        format!("{}\n{} \"$@\"", self.preamble, self.function)
    }

    #[must_use]
    pub fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(&self.shell);
        cmd.arg("-c").arg(self.script()).arg("bash");
        cmd.args(args);
        for (key, value) in &self.envs {
            cmd.env(key, value);
        }
        cmd.env("TERM", "dumb");
        cmd.env("NO_COLOR", "1");
        cmd.stdin(Stdio::null());
        cmd.kill_on_drop(true);
        cmd
    }

    /// Run the function with `args` and return its colour-stripped stdout.
    ///
    /// # Errors
    /// Returns [`BackendError::CommandFailed`] on a non-zero exit and
    /// [`BackendError::IoError`] if bash cannot be spawned.
    pub async fn run(&self, args: &[&str]) -> Result<String, BackendError> {
        log::debug!("Running {} {}", self.function, args.join(" "));
        let output = self.command(args).output().await?;

        if output.status.success() {
            let stdout = String::from_utf8_lossy(&output.stdout);
            Ok(strip_ansi(&stdout))
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = strip_ansi(stderr.trim());
            log::debug!(
                "{} {} exited with {}: {stderr}",
                self.function,
                args.join(" "),
                output.status
            );
            Err(BackendError::CommandFailed { stderr })
        }
    }
}
