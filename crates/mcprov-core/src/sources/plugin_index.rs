//! Plugin index client
//!
//! Projects are addressed by author and slug. The newest version on a
//! release channel is returned as a bare text label, and each version
//! offers one download per platform.

use url::Url;

use crate::error::{ProvisionError, Result};
use crate::http::{HttpClient, get_text};
use crate::types::ProjectPlugin;

use super::ArtifactDescriptor;

pub struct PluginIndexClient<'a, H> {
    http: &'a H,
    base_url: &'a str,
}

impl<'a, H: HttpClient> PluginIndexClient<'a, H> {
    pub fn new(http: &'a H, base_url: &'a str) -> Self {
        Self { http, base_url }
    }

    /// Newest version label on the project's channel.
    pub async fn latest_version(&self, project: &ProjectPlugin) -> Result<String> {
        let mut url = self.project_url(project, &["latest"])?;
        url.query_pairs_mut().append_pair("channel", &project.channel);
        let url = String::from(url);

        let version = get_text(self.http, &url).await?;
        if version.is_empty() {
            return Err(ProvisionError::InvalidResponse {
                url,
                message: "empty version label".to_string(),
            });
        }
        Ok(version)
    }

    pub fn describe(
        &self,
        project: &ProjectPlugin,
        version: &str,
        platform: &str,
    ) -> Result<ArtifactDescriptor> {
        let url = self.project_url(project, &["versions", version, platform, "download"])?;
        Ok(ArtifactDescriptor {
            url: url.into(),
            file_name: format!("{}.jar", project.slug),
            sha256: None,
        })
    }

    pub async fn download(&self, artifact: &ArtifactDescriptor) -> Result<Vec<u8>> {
        self.http.get(&artifact.url).await
    }

    /// `{base}/projects/{author}/{slug}/{tail...}` with every segment
    /// percent-encoded.
    fn project_url(&self, project: &ProjectPlugin, tail: &[&str]) -> Result<Url> {
        let mut url = Url::parse(self.base_url).map_err(|e| {
            ProvisionError::Configuration(format!(
                "Invalid plugin index URL '{}': {e}",
                self.base_url
            ))
        })?;
        url.path_segments_mut()
            .map_err(|()| {
                ProvisionError::Configuration(format!(
                    "Plugin index URL cannot take a path: {}",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(["projects", project.author.as_str(), project.slug.as_str()])
            .extend(tail);
        Ok(url)
    }
}
