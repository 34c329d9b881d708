//! Config store for locating and loading mcprov.toml.

use std::path::{Path, PathBuf};

use super::{ProvisionConfig, parser};

pub const CONFIG_TOML: &str = "mcprov.toml";
pub const CONFIG_JSON: &str = "mcprov.json";

#[derive(Debug, Clone)]
pub struct ConfigStore {
    config_path: PathBuf,
}

impl ConfigStore {
    pub fn from_path(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    /// Locate the config: `./mcprov.toml`, `./mcprov.json`, then the user
    /// config directory.
    pub fn discover() -> anyhow::Result<Self> {
        let cwd = std::env::current_dir()?;
        let global_dir = dirs::config_dir().map(|p| p.join("mcprov"));
        Self::discover_in(&cwd, global_dir.as_deref())
    }

    pub fn discover_in(project_root: &Path, global_dir: Option<&Path>) -> anyhow::Result<Self> {
        let mut candidates = vec![project_root.join(CONFIG_TOML), project_root.join(CONFIG_JSON)];
        if let Some(dir) = global_dir {
            candidates.push(dir.join(CONFIG_TOML));
        }

        candidates
            .iter()
            .find(|p| p.is_file())
            .cloned()
            .map(Self::from_path)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "No configuration found; looked for {}",
                    candidates
                        .iter()
                        .map(|p| p.display().to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            })
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Parse, validate and resolve relative paths against the config's directory.
    pub fn load(&self) -> anyhow::Result<ProvisionConfig> {
        let mut config = parser::parse_config_file(&self.config_path)?;
        if let Some(base) = self.config_path.parent() {
            config.resolve_relative_to(base);
        }
        Ok(config)
    }
}
