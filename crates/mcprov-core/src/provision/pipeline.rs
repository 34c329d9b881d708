//! Provisioning orchestrator.
//!
//! Drives each [`ServerSpec`] through
//! `Init → SkeletonReady → EngineResolved → TemplatesApplied → PluginsResolved → Done`.
//! Failures before the plugin step end that server in `Failed`; plugin
//! failures are recorded per item and never stop the server.

use std::path::{Component, Path, PathBuf};

use tracing::Instrument;

use crate::config::{Endpoints, FeedConfig, ProvisionConfig};
use crate::error::{ProvisionError, Result};
use crate::fs::digest::sha256_bytes;
use crate::fs::{
    LocalArtifactState, copy_template_tree, ensure_server_skeleton, write_artifact,
    write_eula_acceptance,
};
use crate::http::HttpClient;
use crate::sources::{
    BuildIndexClient, GenericUrlClient, MarketplaceClient, MetadataFeedClient, PluginIndexClient,
};
use crate::types::{PluginSource, ServerSpec, Versioning};

use super::{
    EngineAction, EngineOutcome, PluginReport, ProvisionStage, RunReport, ServerReport,
};

/// Everything the pipeline needs besides the server specs themselves.
#[derive(Debug, Clone)]
pub struct ProvisionSettings {
    pub template_dir: PathBuf,
    pub endpoints: Endpoints,
    pub metadata_feed: Option<FeedConfig>,
}

impl ProvisionSettings {
    pub fn new(template_dir: impl Into<PathBuf>) -> Self {
        Self {
            template_dir: template_dir.into(),
            endpoints: Endpoints::default(),
            metadata_feed: None,
        }
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_metadata_feed(mut self, feed: FeedConfig) -> Self {
        self.metadata_feed = Some(feed);
        self
    }
}

impl From<&ProvisionConfig> for ProvisionSettings {
    fn from(config: &ProvisionConfig) -> Self {
        Self {
            template_dir: config.template_dir.clone(),
            endpoints: config.endpoints.clone(),
            metadata_feed: config.metadata_feed.clone(),
        }
    }
}

#[derive(Debug)]
pub struct Provisioner<H> {
    http: H,
    settings: ProvisionSettings,
}

impl<H: HttpClient> Provisioner<H> {
    pub fn new(http: H, settings: ProvisionSettings) -> Self {
        Self { http, settings }
    }

    pub fn http(&self) -> &H {
        &self.http
    }

    /// Provision every server in order. A failing server never stops the
    /// ones after it.
    pub async fn provision_all(&self, servers: &[ServerSpec]) -> RunReport {
        let mut run = RunReport::default();
        for spec in servers {
            let span = tracing::info_span!("server", server = %spec.label());
            let report = self.provision_server(spec).instrument(span).await;
            run.servers.push(report);
        }
        run
    }

    pub async fn provision_server(&self, spec: &ServerSpec) -> ServerReport {
        let mut report = ServerReport::new(spec.label());
        tracing::info!(dir = %spec.server_dir.display(), engine = %spec.engine, "Provisioning server");

        match self.run_pipeline(spec, &mut report).await {
            Ok(()) => {
                report.advance(ProvisionStage::Done);
                tracing::info!("Server provisioned");
            }
            Err(err) => {
                tracing::warn!(stage = %report.reached, error = %err, "Server provisioning failed");
                report.fail(err);
            }
        }
        report
    }

    async fn run_pipeline(&self, spec: &ServerSpec, report: &mut ServerReport) -> Result<()> {
        ensure_server_skeleton(&spec.server_dir)?;
        report.advance(ProvisionStage::SkeletonReady);

        report.engine = Some(self.resolve_engine(spec).await?);
        report.advance(ProvisionStage::EngineResolved);

        report.templates_copied = self.apply_templates(spec)?;
        report.advance(ProvisionStage::TemplatesApplied);

        report.plugins = self.fetch_plugins(spec).await;
        report.advance(ProvisionStage::PluginsResolved);
        Ok(())
    }

    async fn resolve_engine(&self, spec: &ServerSpec) -> Result<EngineOutcome> {
        let engine = spec.engine;
        let pinned = match engine.versioning() {
            Versioning::Pinned => Some(
                spec.mc_version
                    .as_deref()
                    .filter(|v| !v.is_empty())
                    .ok_or_else(|| {
                        ProvisionError::Configuration(format!(
                            "Engine '{engine}' requires mc_version"
                        ))
                    })?,
            ),
            Versioning::SelfVersioned => None,
        };

        if engine.requires_eula() {
            write_eula_acceptance(&spec.server_dir)?;
        }

        let index = BuildIndexClient::new(&self.http, &self.settings.endpoints.build_index);
        let resolved = index.resolve_latest(engine.project(), pinned).await?;
        let dest = spec.server_dir.join(engine.jar_name());
        let local = LocalArtifactState::inspect(&dest)?;

        let outcome = |action| EngineOutcome {
            project: resolved.project.clone(),
            version: resolved.version.clone(),
            build: resolved.build,
            file: dest.clone(),
            action,
        };

        if let Some(expected) = resolved.artifact.sha256.as_deref() {
            if local.matches(expected) {
                tracing::info!(
                    version = %resolved.version,
                    build = resolved.build,
                    "Engine artifact up to date"
                );
                return Ok(outcome(EngineAction::UpToDate));
            }
        }

        tracing::info!(
            version = %resolved.version,
            build = resolved.build,
            url = %resolved.artifact.url,
            "Downloading engine artifact"
        );
        let bytes = index
            .download_build(
                &resolved.project,
                &resolved.version,
                resolved.build,
                &resolved.artifact.file_name,
            )
            .await?;

        if let Some(expected) = resolved.artifact.sha256.as_deref() {
            let actual = sha256_bytes(&bytes);
            if !actual.eq_ignore_ascii_case(expected) {
                return Err(ProvisionError::IntegrityMismatch {
                    path: dest.clone(),
                    expected: expected.to_string(),
                    actual,
                });
            }
        }

        write_artifact(&dest, &bytes)?;
        Ok(outcome(EngineAction::Downloaded))
    }

    fn apply_templates(&self, spec: &ServerSpec) -> Result<usize> {
        let mut copied = 0;
        for name in &spec.templates {
            ensure_plain_relative(name, "template")?;
            let root = self.settings.template_dir.join(name);
            let count = copy_template_tree(&root, &spec.server_dir)?;
            tracing::debug!(template = %name, files = count, "Applied template");
            copied += count;
        }
        Ok(copied)
    }

    async fn fetch_plugins(&self, spec: &ServerSpec) -> Vec<PluginReport> {
        let mut reports = Vec::new();
        if spec.plugins.is_empty() {
            tracing::debug!("No plugin sources configured");
            return reports;
        }
        for source in spec.plugins.items() {
            let label = source.label();
            let result = self.fetch_plugin(spec, &source).await;
            match &result {
                Ok(path) => tracing::info!(source = %label, file = %path.display(), "Plugin written"),
                Err(err) => tracing::warn!(
                    source = %label,
                    error = %err,
                    remote = err.is_remote_side(),
                    "Plugin skipped"
                ),
            }
            reports.push(PluginReport {
                source: label,
                result,
            });
        }
        reports
    }

    async fn fetch_plugin(&self, spec: &ServerSpec, source: &PluginSource) -> Result<PathBuf> {
        let endpoints = &self.settings.endpoints;
        let (file_name, bytes) = match source {
            PluginSource::Marketplace { resource_id } => {
                let client = MarketplaceClient::new(&self.http, &endpoints.marketplace);
                let artifact = client.describe(*resource_id);
                (artifact.file_name, client.download_resource(*resource_id).await?)
            }
            PluginSource::Project(project) => {
                let client = PluginIndexClient::new(&self.http, &endpoints.plugin_index);
                let version = client.latest_version(project).await?;
                let artifact = client.describe(project, &version, spec.engine.index_platform())?;
                let bytes = client.download(&artifact).await?;
                (artifact.file_name, bytes)
            }
            PluginSource::Url(entry) => {
                let client = GenericUrlClient::new(&self.http);
                let artifact = client.describe(entry.url(), entry.file_name())?;
                let bytes = client.download_url(&artifact.url).await?;
                (artifact.file_name, bytes)
            }
            PluginSource::MetadataFeed => {
                let feed = self.settings.metadata_feed.as_ref().ok_or_else(|| {
                    ProvisionError::Configuration(
                        "metadata_feed enabled but no feed is configured".to_string(),
                    )
                })?;
                let url = MetadataFeedClient::new(&self.http, &feed.url)
                    .latest_for_platform(spec.engine.feed_platform())
                    .await?;
                let bytes = GenericUrlClient::new(&self.http).download_url(&url).await?;
                (feed.file_name.clone(), bytes)
            }
        };

        ensure_plain_relative(&file_name, "plugin file name")?;
        let dest = spec.plugins_dir().join(&file_name);
        write_artifact(&dest, &bytes)?;
        Ok(dest)
    }
}

/// Reject absolute paths and `..` so names cannot escape their directory.
fn ensure_plain_relative(name: &str, what: &str) -> Result<()> {
    let path = Path::new(name);
    if name.is_empty() {
        return Err(ProvisionError::Configuration(format!("Empty {what}")));
    }
    for component in path.components() {
        match component {
            Component::Normal(_) => {}
            Component::CurDir => {}
            _ => {
                return Err(ProvisionError::Configuration(format!(
                    "Invalid {what} '{name}': must be a relative path without '..'"
                )));
            }
        }
    }
    Ok(())
}
