//! mcprov Core Library
//!
//! Provisions game-server installations from a declarative configuration:
//! resolves engine and plugin artifacts from several distribution APIs,
//! downloads them only when the local copy is stale, and lays out each
//! server directory from templates.

pub mod config;
pub mod error;
pub mod fs;
pub mod http;
pub mod provision;
pub mod sources;
pub mod types;

pub use error::{ProvisionError, Result};

/// Re-exports of commonly used types
pub mod prelude {
    // Configuration
    pub use crate::config::{ConfigStore, Endpoints, FeedConfig, HttpSettings, ProvisionConfig};

    // Errors
    pub use crate::error::{ProvisionError, Result};

    // HTTP
    pub use crate::http::{HttpClient, ReqwestClient};

    // Provisioning
    pub use crate::provision::{
        EngineAction, EngineOutcome, PluginReport, ProvisionSettings, ProvisionStage,
        Provisioner, RunReport, ServerReport,
    };

    // Types
    pub use crate::types::{
        EngineType, PluginSource, PluginSources, ProjectPlugin, ServerSpec, UrlPlugin,
    };
}
