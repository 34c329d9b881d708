//! Read-only clients for the artifact distribution APIs.

pub mod build_index;
pub mod generic_url;
pub mod marketplace;
pub mod metadata_feed;
pub mod plugin_index;

pub use build_index::{BuildIndexClient, BuildInfo, ResolvedBuild};
pub use generic_url::{GenericUrlClient, file_name_from_url};
pub use marketplace::MarketplaceClient;
pub use metadata_feed::MetadataFeedClient;
pub use plugin_index::PluginIndexClient;

/// Where to download an artifact from and what to call it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactDescriptor {
    pub url: String,
    pub file_name: String,
    /// Lower-case hex SHA-256, when the source reports one.
    pub sha256: Option<String>,
}

pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}
