//! Configuration schema for mcprov.toml / mcprov.json

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::http::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use crate::types::{ServerSpec, Versioning};

pub const DEFAULT_BUILD_INDEX_URL: &str = "https://api.papermc.io/v2";
pub const DEFAULT_MARKETPLACE_URL: &str = "https://api.spiget.org/v2";
pub const DEFAULT_PLUGIN_INDEX_URL: &str = "https://hangar.papermc.io/api/v1";
pub const DEFAULT_FEED_FILE_NAME: &str = "feed-plugin.jar";

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisionConfig {
    /// Directory holding named templates
    #[serde(default = "default_template_dir")]
    pub template_dir: PathBuf,

    /// Base URLs of the distribution APIs
    #[serde(default)]
    pub endpoints: Endpoints,

    /// Metadata feed used by servers that opt into it
    #[serde(default)]
    pub metadata_feed: Option<FeedConfig>,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpSettings,

    /// Servers to provision, in order
    #[serde(default)]
    pub servers: Vec<ServerSpec>,
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            template_dir: default_template_dir(),
            endpoints: Endpoints::default(),
            metadata_feed: None,
            http: HttpSettings::default(),
            servers: Vec::new(),
        }
    }
}

fn default_template_dir() -> PathBuf {
    PathBuf::from("templates")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    #[serde(default = "default_build_index")]
    pub build_index: String,
    #[serde(default = "default_marketplace")]
    pub marketplace: String,
    #[serde(default = "default_plugin_index")]
    pub plugin_index: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            build_index: default_build_index(),
            marketplace: default_marketplace(),
            plugin_index: default_plugin_index(),
        }
    }
}

fn default_build_index() -> String {
    DEFAULT_BUILD_INDEX_URL.to_string()
}

fn default_marketplace() -> String {
    DEFAULT_MARKETPLACE_URL.to_string()
}

fn default_plugin_index() -> String {
    DEFAULT_PLUGIN_INDEX_URL.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedConfig {
    pub url: String,
    #[serde(default = "default_feed_file_name")]
    pub file_name: String,
}

fn default_feed_file_name() -> String {
    DEFAULT_FEED_FILE_NAME.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpSettings {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

impl ProvisionConfig {
    /// Check cross-field constraints serde cannot express.
    pub fn validate(&self) -> anyhow::Result<()> {
        let mut seen = HashSet::new();
        for server in &self.servers {
            let label = server.label();
            if server.server_dir.as_os_str().is_empty() {
                anyhow::bail!("Server '{}' has an empty server_dir", label);
            }
            if !seen.insert(server.server_dir.clone()) {
                anyhow::bail!(
                    "Duplicate server_dir '{}' in configuration",
                    server.server_dir.display()
                );
            }
            if server.engine.versioning() == Versioning::Pinned
                && server.mc_version.as_deref().is_none_or(str::is_empty)
            {
                anyhow::bail!(
                    "Server '{}' uses engine '{}' which requires mc_version",
                    label,
                    server.engine
                );
            }
            if server.plugins.metadata_feed && self.metadata_feed.is_none() {
                anyhow::bail!(
                    "Server '{}' enables metadata_feed but no [metadata_feed] section is configured",
                    label
                );
            }
        }
        if self.http.timeout_secs == 0 {
            anyhow::bail!("http.timeout_secs must be greater than zero");
        }
        Ok(())
    }

    /// Resolve relative paths against the directory holding the config file.
    pub fn resolve_relative_to(&mut self, base: &Path) {
        if self.template_dir.is_relative() {
            self.template_dir = base.join(&self.template_dir);
        }
        for server in &mut self.servers {
            if server.server_dir.is_relative() {
                server.server_dir = base.join(&server.server_dir);
            }
        }
    }

    /// Keep only servers whose label matches one of `names`.
    pub fn retain_servers(&mut self, names: &[String]) {
        if names.is_empty() {
            return;
        }
        self.servers.retain(|s| names.iter().any(|n| *n == s.label()));
    }
}
