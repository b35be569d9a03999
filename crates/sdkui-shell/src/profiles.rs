use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::{ConfigError, ShellConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileFile {
    Bashrc,
    Zshrc,
    Profile,
}

impl ProfileFile {
    pub const ALL: [ProfileFile; 3] = [Self::Bashrc, Self::Zshrc, Self::Profile];

    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Bashrc => ".bashrc",
            Self::Zshrc => ".zshrc",
            Self::Profile => ".profile",
        }
    }

    #[must_use]
    pub fn path_in(self, home: &Path) -> PathBuf {
        home.join(self.file_name())
    }
}

impl fmt::Display for ProfileFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileStatus {
    Added,
    AlreadyConfigured,
    Missing,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileOutcome {
    pub file: ProfileFile,
    pub status: ProfileStatus,
}

/// Append `snippet` to every existing profile in `home` that lacks `marker`.
pub fn ensure_profile_snippets(
    home: &Path,
    snippet: &str,
    marker: &str,
    label: &str,
) -> Vec<ProfileOutcome> {
    ProfileFile::ALL
        .into_iter()
        .map(|file| ProfileOutcome {
            file,
            status: ensure_one(file, home, snippet, marker, label),
        })
        .collect()
}

fn ensure_one(
    file: ProfileFile,
    home: &Path,
    snippet: &str,
    marker: &str,
    label: &str,
) -> ProfileStatus {
    let mut config = match ShellConfig::load(file, file.path_in(home)) {
        Ok(config) => config,
        Err(ConfigError::FileNotFound(_)) => return ProfileStatus::Missing,
        Err(e) => {
            log::warn!("Could not read {file}: {e}");
            return ProfileStatus::Failed(e.to_string());
        }
    };

    let edit = config.ensure_init(marker, snippet, label);
    if !edit.has_changes() {
        return ProfileStatus::AlreadyConfigured;
    }

    match config.apply_edit(&edit) {
        Ok(()) => {
            log::info!("Added {label} initialization to {file}");
            ProfileStatus::Added
        }
        Err(e) => {
            log::warn!("Could not update {file}: {e}");
            ProfileStatus::Failed(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names() {
        let home = Path::new("/home/dev");
        assert_eq!(ProfileFile::Bashrc.path_in(home), home.join(".bashrc"));
        assert_eq!(ProfileFile::Zshrc.to_string(), ".zshrc");
        assert_eq!(ProfileFile::Profile.file_name(), ".profile");
    }

    #[test]
    fn missing_home_reports_every_file_missing() {
        let outcomes =
            ensure_profile_snippets(Path::new("/nonexistent/home"), "x", "marker", "label");
        assert_eq!(outcomes.len(), 3);
        assert!(
            outcomes
                .iter()
                .all(|outcome| outcome.status == ProfileStatus::Missing)
        );
    }
}
