use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use sdkui_backend::BackendError;
use sdkui_core::{download_install_script, run_install_script};

const NVM_INSTALL_URL: &str = "https://raw.githubusercontent.com/nvm-sh/nvm/v0.39.7/install.sh";

#[derive(Debug, Clone)]
pub struct NvmDetection {
    pub found: bool,
    pub nvm_dir: PathBuf,
    pub version: Option<String>,
}

pub(crate) async fn detect_nvm(configured_dir: Option<&Path>) -> NvmDetection {
    let nvm_dir = configured_dir.map_or_else(detect_nvm_dir, Path::to_path_buf);
    let found = nvm_dir.join("nvm.sh").is_file();
    let version = if found {
        read_package_version(&nvm_dir).await
    } else {
        None
    };

    log::debug!(
        "nvm detection: dir={}, found={found}, version={version:?}",
        nvm_dir.display()
    );

    NvmDetection {
        found,
        nvm_dir,
        version,
    }
}

/// `$NVM_DIR` when set, otherwise `~/.nvm`.
#[must_use]
pub fn detect_nvm_dir() -> PathBuf {
    select_nvm_dir(
        std::env::var_os("NVM_DIR").map(PathBuf::from),
        dirs::home_dir(),
    )
}

fn select_nvm_dir(env_dir: Option<PathBuf>, home: Option<PathBuf>) -> PathBuf {
    env_dir
        .filter(|dir| !dir.as_os_str().is_empty())
        .or_else(|| home.map(|home| home.join(".nvm")))
        .unwrap_or_else(|| PathBuf::from(".nvm"))
}

// nvm is a git checkout; package.json carries its release version.
async fn read_package_version(nvm_dir: &Path) -> Option<String> {
    let content = tokio::fs::read_to_string(nvm_dir.join("package.json"))
        .await
        .ok()?;
    parse_package_version(&content)
}

fn parse_package_version(content: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let value = line.trim().strip_prefix("\"version\"")?;
        let value = value.trim_start().strip_prefix(':')?;
        let version = value.trim().trim_end_matches(',').trim_matches('"');
        (!version.is_empty()).then(|| version.to_string())
    })
}

pub(crate) async fn install_nvm(nvm_dir: &Path) -> Result<(), BackendError> {
    let script_path = temp_script_path("nvm-install", "sh");
    let result = async {
        download_install_script(NVM_INSTALL_URL, &script_path)
            .await
            .map_err(|e| BackendError::install_failed("download", e.to_string()))?;
        tokio::fs::create_dir_all(nvm_dir).await?;
        run_install_script(&script_path, &[("NVM_DIR", nvm_dir.as_os_str())])
            .await
            .map_err(|e| BackendError::install_failed("install", e.to_string()))
    }
    .await;
    let _ = tokio::fs::remove_file(&script_path).await;

    let output = result?;
    log::debug!("nvm installer output: {output}");
    Ok(())
}

fn temp_script_path(prefix: &str, ext: &str) -> PathBuf {
    let nonce = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_nanos());
    std::env::temp_dir().join(format!("{prefix}-{}-{nonce}.{ext}", std::process::id()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_dir_wins_over_home() {
        let selected = select_nvm_dir(
            Some(PathBuf::from("/opt/nvm")),
            Some(PathBuf::from("/home/dev")),
        );
        assert_eq!(selected, PathBuf::from("/opt/nvm"));
    }

    #[test]
    fn home_default_is_dot_nvm() {
        assert_eq!(
            select_nvm_dir(None, Some(PathBuf::from("/home/dev"))),
            PathBuf::from("/home/dev/.nvm")
        );
    }

    #[test]
    fn package_version_is_read() {
        let content = "{\n  \"name\": \"nvm\",\n  \"version\": \"0.39.7\",\n  \"license\": \"MIT\"\n}\n";
        assert_eq!(parse_package_version(content).as_deref(), Some("0.39.7"));
        assert_eq!(parse_package_version("{}"), None);
    }

    #[tokio::test]
    async fn detects_checkout_with_package_json() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        std::fs::write(dir.path().join("nvm.sh"), "").expect("write nvm.sh");
        std::fs::write(dir.path().join("package.json"), "{\n  \"version\": \"0.40.1\"\n}\n")
            .expect("write package.json");

        let detection = detect_nvm(Some(dir.path())).await;

        assert!(detection.found);
        assert_eq!(detection.version.as_deref(), Some("0.40.1"));
    }

    #[tokio::test]
    async fn missing_script_is_not_found() {
        let dir = tempfile::tempdir().expect("temp dir should be created");

        let detection = detect_nvm(Some(dir.path())).await;

        assert!(!detection.found);
        assert_eq!(detection.nvm_dir, dir.path());
    }
}
