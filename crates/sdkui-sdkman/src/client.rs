use std::path::{Path, PathBuf};

use sdkui_backend::{BackendError, ScriptRunner};

use crate::version::{SdkmanListing, parse_candidates, parse_listing, parse_tool_version};

// Settings from etc/config are loaded by the init script, so overrides go after it.
const SDKMAN_PREAMBLE: &str = r#"[ -s "$SDKMAN_DIR/bin/sdkman-init.sh" ] || { echo "sdkman-init.sh not found in $SDKMAN_DIR" >&2; exit 127; }
source "$SDKMAN_DIR/bin/sdkman-init.sh"
sdkman_auto_answer=true
sdkman_colour_enable=false
sdkman_selfupdate_feature=false"#;

#[derive(Debug, Clone)]
pub struct SdkmanClient {
    sdkman_dir: PathBuf,
    runner: ScriptRunner,
}

impl SdkmanClient {
    #[must_use]
    pub fn new(sdkman_dir: PathBuf) -> Self {
        let runner = ScriptRunner::new(SDKMAN_PREAMBLE, "sdk")
            .with_env("SDKMAN_DIR", sdkman_dir.as_os_str())
            .with_env("PAGER", "cat");
        Self { sdkman_dir, runner }
    }

    #[must_use]
    pub fn with_runner(sdkman_dir: PathBuf, runner: ScriptRunner) -> Self {
        Self { sdkman_dir, runner }
    }

    #[must_use]
    pub fn sdkman_dir(&self) -> &Path {
        &self.sdkman_dir
    }

    #[must_use]
    pub fn init_script(&self) -> PathBuf {
        self.sdkman_dir.join("bin").join("sdkman-init.sh")
    }

    /// Every candidate SDKMAN can install, in `sdk list` order.
    ///
    /// # Errors
    /// Returns an error if `sdk list` fails.
    pub async fn list_candidates(&self) -> Result<Vec<String>, BackendError> {
        let output = self.runner.run(&["list"]).await?;
        Ok(parse_candidates(&output))
    }

    /// # Errors
    /// Returns an error if `sdk list <candidate>` fails.
    pub async fn list(&self, candidate: &str) -> Result<SdkmanListing, BackendError> {
        let output = self.runner.run(&["list", candidate]).await?;
        Ok(parse_listing(&output))
    }

    /// Install `version` and make it the default for `candidate`.
    ///
    /// # Errors
    /// Returns an error if either `sdk install` or `sdk default` fails.
    pub async fn install(&self, candidate: &str, version: &str) -> Result<(), BackendError> {
        self.runner.run(&["install", candidate, version]).await?;
        self.set_default(candidate, version).await
    }

    /// # Errors
    /// Returns an error if `sdk default` fails.
    pub async fn set_default(&self, candidate: &str, version: &str) -> Result<(), BackendError> {
        self.runner.run(&["default", candidate, version]).await?;
        Ok(())
    }

    /// # Errors
    /// Returns an error if `sdk uninstall` fails.
    pub async fn uninstall(&self, candidate: &str, version: &str) -> Result<(), BackendError> {
        self.runner.run(&["uninstall", candidate, version]).await?;
        Ok(())
    }

    /// # Errors
    /// Returns an error if `sdk home` fails or prints no path.
    pub async fn home(&self, candidate: &str, version: &str) -> Result<PathBuf, BackendError> {
        let output = self.runner.run(&["home", candidate, version]).await?;
        output
            .lines()
            .map(str::trim)
            .rfind(|line| !line.is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| BackendError::unexpected_output("sdk home", "no path printed"))
    }

    /// # Errors
    /// Returns an error if `sdk version` fails or prints nothing.
    pub async fn version(&self) -> Result<String, BackendError> {
        let output = self.runner.run(&["version"]).await?;
        parse_tool_version(&output)
            .ok_or_else(|| BackendError::unexpected_output("sdk version", "empty output"))
    }

    /// Refresh SDKMAN's candidate cache.
    ///
    /// # Errors
    /// Returns an error if `sdk update` fails.
    pub async fn update(&self) -> Result<String, BackendError> {
        let output = self.runner.run(&["update"]).await?;
        Ok(output.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_sdkman(dir: &Path, body: &str) {
        let bin = dir.join("bin");
        std::fs::create_dir_all(&bin).expect("create bin dir");
        std::fs::write(bin.join("sdkman-init.sh"), body).expect("write init script");
    }

    #[tokio::test]
    async fn lists_candidates_through_init_script() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        fake_sdkman(
            dir.path(),
            "sdk() { printf '   $ sdk install gradle\\n   $ sdk install maven\\n'; }\n",
        );

        let client = SdkmanClient::new(dir.path().to_path_buf());
        let candidates = client.list_candidates().await.expect("list succeeds");

        assert_eq!(candidates, vec!["gradle", "maven"]);
    }

    #[tokio::test]
    async fn install_runs_install_then_default() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let log = dir.path().join("calls.log");
        fake_sdkman(
            dir.path(),
            &format!("sdk() {{ echo \"$*\" >> '{}'; }}\n", log.display()),
        );

        let client = SdkmanClient::new(dir.path().to_path_buf());
        client
            .install("maven", "3.9.6")
            .await
            .expect("install succeeds");

        let calls = std::fs::read_to_string(&log).expect("read call log");
        assert_eq!(calls, "install maven 3.9.6\ndefault maven 3.9.6\n");
    }

    #[tokio::test]
    async fn home_returns_last_printed_line() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        fake_sdkman(
            dir.path(),
            "sdk() { printf '\\n%s/candidates/%s/%s\\n' \"$SDKMAN_DIR\" \"$2\" \"$3\"; }\n",
        );

        let client = SdkmanClient::new(dir.path().to_path_buf());
        let home = client.home("java", "17.0.9-tem").await.expect("home succeeds");

        assert_eq!(home, dir.path().join("candidates/java/17.0.9-tem"));
    }

    #[tokio::test]
    async fn missing_init_script_fails() {
        let dir = tempfile::tempdir().expect("temp dir should be created");

        let client = SdkmanClient::new(dir.path().to_path_buf());
        let result = client.list("maven").await;

        assert!(
            matches!(result, Err(BackendError::CommandFailed { ref stderr }) if stderr.contains("sdkman-init.sh not found")),
            "expected command failure, got {result:?}"
        );
    }

    #[tokio::test]
    async fn version_reads_script_line() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        fake_sdkman(
            dir.path(),
            "sdk() { printf '\\nSDKMAN!\\nscript: 5.18.2\\nnative: 0.4.6\\n'; }\n",
        );

        let client = SdkmanClient::new(dir.path().to_path_buf());

        assert_eq!(client.version().await.as_deref(), Ok("5.18.2"));
    }
}
