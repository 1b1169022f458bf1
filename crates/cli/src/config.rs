use anyhow::{anyhow, bail, Context as AnyhowContext, Result};
use quest_records::{DocumentKind, DocumentPaths};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when `--config` is absent
pub const CONFIG_FILE_NAME: &str = "quest-editor.toml";

/// Where the three quest documents live.
///
/// Relative paths are resolved against the `--dir` directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    pub questinfo: PathBuf,
    pub check: PathBuf,
    pub act: PathBuf,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            questinfo: DocumentKind::Definition.default_file_name().into(),
            check: DocumentKind::Requirements.default_file_name().into(),
            act: DocumentKind::Rewards.default_file_name().into(),
        }
    }
}

/// Per-document path flags from the command line
#[derive(Debug, Clone, Default)]
pub struct PathOverrides {
    pub questinfo: Option<PathBuf>,
    pub check: Option<PathBuf>,
    pub act: Option<PathBuf>,
}

impl EditorConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|err| anyhow!("Invalid editor config: {err}"))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("In {}", path.display()))
    }

    /// Explicit file first, then `quest-editor.toml` in `dir`, then defaults.
    pub fn resolve(dir: &Path, explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            log::debug!("Using config {}", candidate.display());
            return Self::from_file(&candidate);
        }
        Ok(Self::default())
    }

    pub fn with_overrides(mut self, overrides: PathOverrides) -> Self {
        if let Some(path) = overrides.questinfo {
            self.questinfo = path;
        }
        if let Some(path) = overrides.check {
            self.check = path;
        }
        if let Some(path) = overrides.act {
            self.act = path;
        }
        self
    }

    /// Reject empty paths and two documents sharing one file.
    pub fn validate(&self) -> Result<()> {
        let named = [
            ("questinfo", &self.questinfo),
            ("check", &self.check),
            ("act", &self.act),
        ];
        for (key, path) in named {
            if path.as_os_str().is_empty() {
                bail!("Config key `{key}` must not be empty");
            }
        }
        for (idx, (key, path)) in named.iter().enumerate() {
            if let Some((other, _)) = named[idx + 1..].iter().find(|(_, p)| p == path) {
                bail!(
                    "Config keys `{key}` and `{other}` point to the same file: {}",
                    path.display()
                );
            }
        }
        Ok(())
    }

    pub fn document_paths(&self, dir: &Path) -> DocumentPaths {
        DocumentPaths {
            definition: dir.join(&self.questinfo),
            requirements: dir.join(&self.check),
            rewards: dir.join(&self.act),
        }
    }
}
