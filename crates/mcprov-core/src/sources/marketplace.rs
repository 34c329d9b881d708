//! Marketplace client
//!
//! Resources are addressed by numeric id and the marketplace always serves
//! the current release, so there is nothing to compare against: every run
//! downloads the file again.

use crate::error::Result;
use crate::http::HttpClient;

use super::{ArtifactDescriptor, endpoint};

pub struct MarketplaceClient<'a, H> {
    http: &'a H,
    base_url: &'a str,
}

impl<'a, H: HttpClient> MarketplaceClient<'a, H> {
    pub fn new(http: &'a H, base_url: &'a str) -> Self {
        Self { http, base_url }
    }

    pub fn describe(&self, resource_id: u64) -> ArtifactDescriptor {
        ArtifactDescriptor {
            url: endpoint(self.base_url, &format!("resources/{resource_id}/download")),
            file_name: format!("{resource_id}.jar"),
            sha256: None,
        }
    }

    pub async fn download_resource(&self, resource_id: u64) -> Result<Vec<u8>> {
        self.http.get(&self.describe(resource_id).url).await
    }
}
