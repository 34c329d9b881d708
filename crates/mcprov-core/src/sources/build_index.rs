//! Build index client
//!
//! Walks the project → version → build → artifact catalog. "Latest" is
//! always the last element of the list the index returns; the index
//! documents ascending-by-time ordering and nothing here re-sorts it.

use serde::Deserialize;

use crate::error::{ProvisionError, Result};
use crate::http::{HttpClient, get_json};

use super::{ArtifactDescriptor, endpoint};

#[derive(Debug, Deserialize)]
struct ProjectResponse {
    versions: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct VersionResponse {
    builds: Vec<u64>,
}

#[derive(Debug, Deserialize)]
struct BuildResponse {
    downloads: BuildDownloads,
}

#[derive(Debug, Deserialize)]
struct BuildDownloads {
    application: BuildInfo,
}

/// Primary artifact of a build.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BuildInfo {
    /// Artifact file name
    pub name: String,
    /// Hex SHA-256 of the artifact
    pub sha256: String,
}

/// Outcome of resolving the newest build for a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBuild {
    pub project: String,
    pub version: String,
    pub build: u64,
    pub artifact: ArtifactDescriptor,
}

pub struct BuildIndexClient<'a, H> {
    http: &'a H,
    base_url: &'a str,
}

impl<'a, H: HttpClient> BuildIndexClient<'a, H> {
    pub fn new(http: &'a H, base_url: &'a str) -> Self {
        Self { http, base_url }
    }

    /// Versions of `project`, in index order.
    pub async fn list_versions(&self, project: &str) -> Result<Vec<String>> {
        let url = endpoint(self.base_url, &format!("projects/{project}"));
        let body: ProjectResponse = get_json(self.http, &url).await?;
        Ok(body.versions)
    }

    /// Build ids of `project` at `version`, in index order.
    pub async fn list_builds(&self, project: &str, version: &str) -> Result<Vec<u64>> {
        let url = endpoint(
            self.base_url,
            &format!("projects/{project}/versions/{version}"),
        );
        let body: VersionResponse = get_json(self.http, &url).await?;
        Ok(body.builds)
    }

    pub async fn build_info(&self, project: &str, version: &str, build: u64) -> Result<BuildInfo> {
        let url = endpoint(
            self.base_url,
            &format!("projects/{project}/versions/{version}/builds/{build}"),
        );
        let body: BuildResponse = get_json(self.http, &url).await?;
        Ok(body.downloads.application)
    }

    pub fn download_url(&self, project: &str, version: &str, build: u64, file: &str) -> String {
        endpoint(
            self.base_url,
            &format!("projects/{project}/versions/{version}/builds/{build}/downloads/{file}"),
        )
    }

    pub async fn download_build(
        &self,
        project: &str,
        version: &str,
        build: u64,
        file: &str,
    ) -> Result<Vec<u8>> {
        self.http
            .get(&self.download_url(project, version, build, file))
            .await
    }

    /// Last version listed for `project`.
    pub async fn latest_version(&self, project: &str) -> Result<String> {
        let versions = self.list_versions(project).await?;
        versions.last().cloned().ok_or_else(|| {
            ProvisionError::InvalidResponse {
                url: endpoint(self.base_url, &format!("projects/{project}")),
                message: format!("no versions listed for {project}"),
            }
        })
    }

    /// Last build listed for `project` at `version`.
    pub async fn latest_build(&self, project: &str, version: &str) -> Result<u64> {
        let builds = self.list_builds(project, version).await?;
        builds.last().copied().ok_or_else(|| ProvisionError::InvalidResponse {
            url: endpoint(
                self.base_url,
                &format!("projects/{project}/versions/{version}"),
            ),
            message: format!("no builds listed for {project} {version}"),
        })
    }

    /// Resolve the newest build of `project`.
    ///
    /// With `version = None` the newest version is looked up first.
    pub async fn resolve_latest(
        &self,
        project: &str,
        version: Option<&str>,
    ) -> Result<ResolvedBuild> {
        let version = match version {
            Some(v) => v.to_string(),
            None => self.latest_version(project).await?,
        };
        let build = self.latest_build(project, &version).await?;
        let info = self.build_info(project, &version, build).await?;
        tracing::debug!(project, version = %version, build, file = %info.name, "Resolved latest build");

        Ok(ResolvedBuild {
            project: project.to_string(),
            artifact: ArtifactDescriptor {
                url: self.download_url(project, &version, build, &info.name),
                file_name: info.name,
                sha256: Some(info.sha256.to_ascii_lowercase()),
            },
            version,
            build,
        })
    }
}
