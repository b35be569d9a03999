use log::debug;
use std::path::{Path, PathBuf};

use sdkui_backend::{BackendError, ScriptRunner, VersionRecord};

use crate::version::{mark_default, parse_node_installed, parse_node_remote};

// Sourced without `--no-use` so the default alias is activated, which is
// what `nvm ls` marks as current.
const NVM_PREAMBLE: &str = r#"[ -s "$NVM_DIR/nvm.sh" ] || { echo "nvm.sh not found in $NVM_DIR" >&2; exit 127; }
\. "$NVM_DIR/nvm.sh""#;

#[derive(Debug, Clone)]
pub struct NvmClient {
    nvm_dir: PathBuf,
    runner: ScriptRunner,
}

impl NvmClient {
    #[must_use]
    pub fn new(nvm_dir: PathBuf) -> Self {
        let runner = ScriptRunner::new(NVM_PREAMBLE, "nvm").with_env("NVM_DIR", nvm_dir.as_os_str());
        Self { nvm_dir, runner }
    }

    #[must_use]
    pub fn nvm_dir(&self) -> &Path {
        &self.nvm_dir
    }

    #[must_use]
    pub fn nvm_script(&self) -> PathBuf {
        self.nvm_dir.join("nvm.sh")
    }

    /// List installed Node.js versions; the default one is active.
    ///
    /// The `->` marker of `nvm ls` follows the shell's current node, so the
    /// default alias is resolved as well and wins when it names an installed
    /// version.
    ///
    /// # Errors
    /// Returns an error if invoking `nvm ls` fails.
    pub async fn list_installed(&self) -> Result<Vec<VersionRecord>, BackendError> {
        let output = self.runner.run(&["ls", "--no-colors", "--no-alias"]).await?;
        let records = parse_node_installed(&output);
        match self.runner.run(&["version", "default"]).await {
            Ok(default) => Ok(mark_default(records, &default)),
            Err(e) => {
                debug!("nvm default alias unresolved: {e}");
                Ok(records)
            }
        }
    }

    /// List remote Node.js versions available for installation.
    ///
    /// # Errors
    /// Returns an error if invoking `nvm ls-remote` fails.
    pub async fn list_remote(&self) -> Result<Vec<String>, BackendError> {
        let output = self.runner.run(&["ls-remote", "--no-colors"]).await?;
        Ok(parse_node_remote(&output))
    }

    /// Install a Node.js version and make it the default alias.
    ///
    /// # Errors
    /// Returns an error if either `nvm install` or `nvm alias default` fails.
    pub async fn install(&self, version: &str) -> Result<(), BackendError> {
        self.runner.run(&["install", version]).await?;
        self.set_default(version).await
    }

    /// # Errors
    /// Returns an error if `nvm alias default` fails.
    pub async fn set_default(&self, version: &str) -> Result<(), BackendError> {
        self.runner.run(&["alias", "default", version]).await?;
        Ok(())
    }

    /// # Errors
    /// Returns an error if the uninstall command fails.
    pub async fn uninstall(&self, version: &str) -> Result<(), BackendError> {
        self.runner.run(&["uninstall", version]).await?;
        Ok(())
    }

    /// Install directory of `version`: the `nvm which` path without `/bin/node`.
    ///
    /// # Errors
    /// Returns an error if `nvm which` fails or prints no path.
    pub async fn home(&self, version: &str) -> Result<PathBuf, BackendError> {
        let output = self.runner.run(&["which", version]).await?;
        let node = output
            .lines()
            .map(str::trim)
            .rfind(|line| !line.is_empty())
            .ok_or_else(|| BackendError::unexpected_output("nvm which", "no path printed"))?;
        Ok(PathBuf::from(node.strip_suffix("/bin/node").unwrap_or(node)))
    }

    /// Return the installed `nvm` tool version string.
    ///
    /// # Errors
    /// Returns an error if querying `nvm --version` fails.
    pub async fn version(&self) -> Result<String, BackendError> {
        let output = self.runner.run(&["--version"]).await?;
        Ok(output.trim().to_string())
    }
}
