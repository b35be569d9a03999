use std::ffi::OsStr;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

const INSTALL_SCRIPT_TIMEOUT: Duration = Duration::from_secs(30);
const INSTALL_SCRIPT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const INSTALL_SCRIPT_RETRY_DELAYS_SECS: [u64; 3] = [0, 2, 5];

#[derive(Debug, thiserror::Error)]
pub enum InstallScriptError {
    #[error("failed to build installer download client: {0}")]
    ClientBuild(reqwest::Error),
    #[error("failed to download installer script from {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("installer script download failed with HTTP {status} for {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("{url} did not return a shell script")]
    NotAScript { url: String },
    #[error("failed to write installer script to {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to start installer script: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("installer script exited with {status}: {stderr}")]
    Run { status: String, stderr: String },
}

/// Download an installer script with timeout/retry policy.
///
/// # Errors
/// Returns an error if the HTTP request fails, the server responds with a
/// non-success status or a body that is not a shell script, or writing the
/// script to disk fails.
pub async fn download_install_script(url: &str, path: &Path) -> Result<(), InstallScriptError> {
    let client = reqwest::Client::builder()
        .timeout(INSTALL_SCRIPT_TIMEOUT)
        .connect_timeout(INSTALL_SCRIPT_CONNECT_TIMEOUT)
        .user_agent(format!(
            "sdkui/{}/installer-script",
            env!("CARGO_PKG_VERSION")
        ))
        .build()
        .map_err(InstallScriptError::ClientBuild)?;

    let script = download_with_retries(&client, url).await?;
    check_is_script(&script, url)?;

    tokio::fs::write(path, &script)
        .await
        .map_err(|source| InstallScriptError::Write {
            path: path.display().to_string(),
            source,
        })?;

    Ok(())
}

/// Run a downloaded installer with bash, non-interactively.
///
/// # Errors
/// Returns an error if bash cannot be started or the script exits non-zero.
pub async fn run_install_script(
    path: &Path,
    envs: &[(&str, &OsStr)],
) -> Result<String, InstallScriptError> {
    let mut cmd = tokio::process::Command::new("bash");
    cmd.arg(path);
    for (key, value) in envs {
        cmd.env(key, value);
    }
    cmd.env("TERM", "dumb");
    cmd.stdin(Stdio::null());

    let output = cmd.output().await.map_err(InstallScriptError::Spawn)?;
    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    } else {
        Err(InstallScriptError::Run {
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

async fn download_with_retries(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<u8>, InstallScriptError> {
    let mut last_error = None;

    for delay_secs in INSTALL_SCRIPT_RETRY_DELAYS_SECS {
        if delay_secs > 0 {
            tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        }

        match download_once(client, url).await {
            Ok(bytes) => return Ok(bytes),
            Err(error) => {
                log::debug!("Installer download attempt failed: {error}");
                last_error = Some(error);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| InstallScriptError::Status {
        url: url.to_string(),
        status: reqwest::StatusCode::REQUEST_TIMEOUT,
    }))
}

async fn download_once(client: &reqwest::Client, url: &str) -> Result<Vec<u8>, InstallScriptError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| InstallScriptError::Request {
            url: url.to_string(),
            source,
        })?;

    if !response.status().is_success() {
        return Err(InstallScriptError::Status {
            url: url.to_string(),
            status: response.status(),
        });
    }

    response
        .bytes()
        .await
        .map(|bytes| bytes.to_vec())
        .map_err(|source| InstallScriptError::Request {
            url: url.to_string(),
            source,
        })
}

// Both installers start with a shebang; anything else is an error page.
fn check_is_script(script: &[u8], url: &str) -> Result<(), InstallScriptError> {
    if script.starts_with(b"#!") {
        return Ok(());
    }

    Err(InstallScriptError::NotAScript {
        url: url.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_is_script_accepts_shebang() {
        assert!(check_is_script(b"#!/bin/bash\necho hi\n", "https://get.sdkman.io").is_ok());
    }

    #[test]
    fn check_is_script_rejects_html() {
        let result = check_is_script(b"<!DOCTYPE html><html></html>", "https://get.sdkman.io");
        assert!(matches!(result, Err(InstallScriptError::NotAScript { .. })));
    }

    #[tokio::test]
    async fn run_install_script_passes_environment() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let script = dir.path().join("install.sh");
        std::fs::write(&script, "#!/bin/bash\nprintf '%s' \"$TOOL_DIR\"\n")
            .expect("script should be written");

        let output = run_install_script(&script, &[("TOOL_DIR", OsStr::new("/opt/tool"))])
            .await
            .expect("script should run");

        assert_eq!(output, "/opt/tool");
    }

    #[tokio::test]
    async fn run_install_script_reports_failure() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let script = dir.path().join("install.sh");
        std::fs::write(&script, "#!/bin/bash\necho 'curl missing' >&2\nexit 4\n")
            .expect("script should be written");

        let result = run_install_script(&script, &[]).await;

        assert!(
            matches!(result, Err(InstallScriptError::Run { ref stderr, .. }) if stderr == "curl missing"),
            "expected run failure, got {result:?}"
        );
    }
}
