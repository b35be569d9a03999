use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

use crate::profiles::ProfileFile;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub struct ShellConfig {
    pub profile: ProfileFile,
    pub config_path: PathBuf,
    pub content: String,
}

impl ShellConfig {
    /// Load an existing profile file. Profiles are never created.
    pub fn load(profile: ProfileFile, config_path: PathBuf) -> Result<Self, ConfigError> {
        if !config_path.is_file() {
            return Err(ConfigError::FileNotFound(config_path));
        }
        let content = fs::read_to_string(&config_path)?;

        Ok(Self {
            profile,
            config_path,
            content,
        })
    }

    #[must_use]
    pub fn has_init(&self, marker: &str) -> bool {
        self.content.contains(marker)
    }

    #[must_use]
    pub fn add_init(&self, init_snippet: &str, label: &str) -> ShellConfigEdit {
        let separator = if self.content.is_empty() || self.content.ends_with('\n') {
            ""
        } else {
            "\n"
        };
        let modified = format!("{}{separator}\n# {label}\n{init_snippet}\n", self.content);

        ShellConfigEdit {
            original: self.content.clone(),
            modified,
            changes: vec![format!("Add {label} initialization")],
        }
    }

    /// Append `init_snippet` unless `marker` is already present.
    #[must_use]
    pub fn ensure_init(&self, marker: &str, init_snippet: &str, label: &str) -> ShellConfigEdit {
        if self.has_init(marker) {
            return ShellConfigEdit::unchanged(&self.content);
        }
        self.add_init(init_snippet, label)
    }

    pub fn apply_edit(&mut self, edit: &ShellConfigEdit) -> Result<(), ConfigError> {
        if !edit.has_changes() {
            return Ok(());
        }

        fs::write(&self.config_path, &edit.modified)?;
        self.content.clone_from(&edit.modified);

        Ok(())
    }
}

pub struct ShellConfigEdit {
    pub original: String,
    pub modified: String,
    pub changes: Vec<String>,
}

impl ShellConfigEdit {
    fn unchanged(content: &str) -> Self {
        Self {
            original: content.to_string(),
            modified: content.to_string(),
            changes: Vec::new(),
        }
    }

    #[must_use]
    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    #[must_use]
    pub fn diff_preview(&self) -> String {
        if !self.has_changes() {
            return "No changes needed.".to_string();
        }

        let mut preview = String::new();

        for change in &self.changes {
            let _ = writeln!(preview, "+ {change}");
        }

        preview
    }
}
