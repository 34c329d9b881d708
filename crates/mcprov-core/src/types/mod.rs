//! Shared core types used across configuration and provisioning.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Server software flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineType {
    /// Game server; builds are published per game version.
    Paper,
    /// Proxy; carries its own version line independent of the game.
    Velocity,
}

/// How an engine's concrete version is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Versioning {
    /// The server spec names the game version (`mc_version`).
    Pinned,
    /// The latest version listed by the build index is used.
    SelfVersioned,
}

impl EngineType {
    /// Project identifier on the build index.
    pub fn project(self) -> &'static str {
        match self {
            Self::Paper => "paper",
            Self::Velocity => "velocity",
        }
    }

    pub fn versioning(self) -> Versioning {
        match self {
            Self::Paper => Versioning::Pinned,
            Self::Velocity => Versioning::SelfVersioned,
        }
    }

    /// Whether a game server EULA has to be accepted.
    pub fn requires_eula(self) -> bool {
        match self {
            Self::Paper => true,
            Self::Velocity => false,
        }
    }

    /// Platform label used by the metadata feed.
    pub fn feed_platform(self) -> &'static str {
        match self {
            Self::Paper => "bukkit",
            Self::Velocity => "velocity",
        }
    }

    /// Platform label used by the plugin index download endpoint.
    pub fn index_platform(self) -> &'static str {
        match self {
            Self::Paper => "PAPER",
            Self::Velocity => "VELOCITY",
        }
    }

    /// File name of the engine artifact inside the server directory.
    pub fn jar_name(self) -> String {
        format!("{}.jar", self.project())
    }
}

impl fmt::Display for EngineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.project())
    }
}

/// Declarative description of one server to provision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSpec {
    /// Optional label used in reports and `--only` filters
    #[serde(default)]
    pub name: Option<String>,

    /// Target filesystem root
    pub server_dir: PathBuf,

    /// Server software
    pub engine: EngineType,

    /// Game version; required for pinned engines
    #[serde(default)]
    pub mc_version: Option<String>,

    /// Template directory names, copied in order
    #[serde(default)]
    pub templates: Vec<String>,

    /// Plugin sources
    #[serde(default)]
    pub plugins: PluginSources,
}

impl ServerSpec {
    pub fn new(server_dir: impl Into<PathBuf>, engine: EngineType) -> Self {
        Self {
            name: None,
            server_dir: server_dir.into(),
            engine,
            mc_version: None,
            templates: Vec::new(),
            plugins: PluginSources::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_mc_version(mut self, version: impl Into<String>) -> Self {
        self.mc_version = Some(version.into());
        self
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.templates.push(template.into());
        self
    }

    pub fn with_plugins(mut self, plugins: PluginSources) -> Self {
        self.plugins = plugins;
        self
    }

    /// Name if set, otherwise the server directory.
    pub fn label(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| self.server_dir.display().to_string())
    }

    pub fn plugins_dir(&self) -> PathBuf {
        self.server_dir.join(crate::fs::PLUGINS_DIR)
    }
}

/// All plugin sources configured for one server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginSources {
    /// Marketplace resource ids
    #[serde(default)]
    pub marketplace: Vec<u64>,

    /// Plugin index projects
    #[serde(default)]
    pub projects: Vec<ProjectPlugin>,

    /// Direct download URLs
    #[serde(default)]
    pub urls: Vec<UrlPlugin>,

    /// Opt into the metadata feed plugin
    #[serde(default)]
    pub metadata_feed: bool,
}

impl PluginSources {
    /// Flatten into individual items in processing order.
    pub fn items(&self) -> Vec<PluginSource> {
        let mut items: Vec<PluginSource> = self
            .marketplace
            .iter()
            .map(|id| PluginSource::Marketplace { resource_id: *id })
            .collect();
        items.extend(self.projects.iter().cloned().map(PluginSource::Project));
        items.extend(self.urls.iter().cloned().map(PluginSource::Url));
        if self.metadata_feed {
            items.push(PluginSource::MetadataFeed);
        }
        items
    }

    pub fn is_empty(&self) -> bool {
        self.marketplace.is_empty()
            && self.projects.is_empty()
            && self.urls.is_empty()
            && !self.metadata_feed
    }
}

/// A single plugin to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluginSource {
    Marketplace { resource_id: u64 },
    Project(ProjectPlugin),
    Url(UrlPlugin),
    MetadataFeed,
}

impl PluginSource {
    pub fn label(&self) -> String {
        match self {
            Self::Marketplace { resource_id } => format!("marketplace:{resource_id}"),
            Self::Project(p) => format!("project:{}/{}", p.author, p.slug),
            Self::Url(u) => format!("url:{}", u.url()),
            Self::MetadataFeed => "metadata-feed".to_string(),
        }
    }
}

/// Plugin published on the plugin index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectPlugin {
    pub author: String,
    pub slug: String,
    #[serde(default = "default_channel")]
    pub channel: String,
}

fn default_channel() -> String {
    "Release".to_string()
}

/// Direct download, optionally renamed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UrlPlugin {
    Bare(String),
    Named { url: String, file_name: String },
}

impl UrlPlugin {
    pub fn url(&self) -> &str {
        match self {
            Self::Bare(url) => url,
            Self::Named { url, .. } => url,
        }
    }

    pub fn file_name(&self) -> Option<&str> {
        match self {
            Self::Bare(_) => None,
            Self::Named { file_name, .. } => Some(file_name),
        }
    }
}
