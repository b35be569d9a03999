use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use sdkui_backend::BackendError;
use sdkui_core::{download_install_script, run_install_script};

const SDKMAN_INSTALL_URL: &str = "https://get.sdkman.io";

#[derive(Debug, Clone)]
pub struct SdkmanDetection {
    pub found: bool,
    pub sdkman_dir: PathBuf,
    pub version: Option<String>,
}

pub(crate) async fn detect_sdkman(configured_dir: Option<&Path>) -> SdkmanDetection {
    let sdkman_dir = configured_dir.map_or_else(detect_sdkman_dir, Path::to_path_buf);
    let found = sdkman_dir.join("bin").join("sdkman-init.sh").is_file();
    let version = if found {
        read_installed_version(&sdkman_dir).await
    } else {
        None
    };

    log::debug!(
        "SDKMAN detection: dir={}, found={found}, version={version:?}",
        sdkman_dir.display()
    );

    SdkmanDetection {
        found,
        sdkman_dir,
        version,
    }
}

/// `$SDKMAN_DIR` when set, otherwise `~/.sdkman`.
#[must_use]
pub fn detect_sdkman_dir() -> PathBuf {
    select_sdkman_dir(
        std::env::var_os("SDKMAN_DIR").map(PathBuf::from),
        dirs::home_dir(),
    )
}

fn select_sdkman_dir(env_dir: Option<PathBuf>, home: Option<PathBuf>) -> PathBuf {
    env_dir
        .filter(|dir| !dir.as_os_str().is_empty())
        .or_else(|| home.map(|home| home.join(".sdkman")))
        .unwrap_or_else(|| PathBuf::from(".sdkman"))
}

// Written by the installer and by `sdk selfupdate`.
async fn read_installed_version(sdkman_dir: &Path) -> Option<String> {
    let content = tokio::fs::read_to_string(sdkman_dir.join("var").join("version"))
        .await
        .ok()?;
    let version = content.trim();
    (!version.is_empty()).then(|| version.to_string())
}

pub(crate) async fn install_sdkman(sdkman_dir: &Path) -> Result<(), BackendError> {
    let script_path = temp_script_path("sdkman-install", "sh");
    let result = async {
        download_install_script(SDKMAN_INSTALL_URL, &script_path)
            .await
            .map_err(|e| BackendError::install_failed("download", e.to_string()))?;
        run_install_script(&script_path, &[("SDKMAN_DIR", sdkman_dir.as_os_str())])
            .await
            .map_err(|e| BackendError::install_failed("install", e.to_string()))
    }
    .await;
    let _ = tokio::fs::remove_file(&script_path).await;

    let output = result?;
    log::debug!("SDKMAN installer output: {output}");
    Ok(())
}

fn temp_script_path(prefix: &str, ext: &str) -> PathBuf {
    let nonce = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_nanos());
    std::env::temp_dir().join(format!("{prefix}-{}-{nonce}.{ext}", std::process::id()))
}
