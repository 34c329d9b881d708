//! Direct downloads from arbitrary URLs.

use url::Url;

use crate::error::{ProvisionError, Result};
use crate::http::HttpClient;

use super::ArtifactDescriptor;

/// Last non-empty path segment of `raw`, e.g. `plugin-1.2.3.jar`.
pub fn file_name_from_url(raw: &str) -> Result<String> {
    let parsed = Url::parse(raw)
        .map_err(|e| ProvisionError::Configuration(format!("Invalid URL '{raw}': {e}")))?;
    parsed
        .path_segments()
        .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
        .map(str::to_string)
        .ok_or_else(|| {
            ProvisionError::Configuration(format!(
                "Cannot derive a file name from '{raw}'; set file_name explicitly"
            ))
        })
}

pub struct GenericUrlClient<'a, H> {
    http: &'a H,
}

impl<'a, H: HttpClient> GenericUrlClient<'a, H> {
    pub fn new(http: &'a H) -> Self {
        Self { http }
    }

    pub fn describe(&self, url: &str, file_name: Option<&str>) -> Result<ArtifactDescriptor> {
        let file_name = match file_name {
            Some(name) => name.to_string(),
            None => file_name_from_url(url)?,
        };
        Ok(ArtifactDescriptor {
            url: url.to_string(),
            file_name,
            sha256: None,
        })
    }

    pub async fn download_url(&self, url: &str) -> Result<Vec<u8>> {
        self.http.get(url).await
    }
}
