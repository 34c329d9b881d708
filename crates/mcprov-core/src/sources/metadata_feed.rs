//! Metadata feed client
//!
//! The feed exposes exactly one "latest download per platform" mapping. It
//! carries no digests and no history, so the artifact is always re-fetched.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::{ProvisionError, Result};
use crate::http::{HttpClient, get_json};

#[derive(Debug, Deserialize)]
struct FeedResponse {
    downloads: HashMap<String, FeedEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FeedEntry {
    Url(String),
    Object { url: String },
}

impl FeedEntry {
    fn into_url(self) -> String {
        match self {
            Self::Url(url) | Self::Object { url } => url,
        }
    }
}

pub struct MetadataFeedClient<'a, H> {
    http: &'a H,
    feed_url: &'a str,
}

impl<'a, H: HttpClient> MetadataFeedClient<'a, H> {
    pub fn new(http: &'a H, feed_url: &'a str) -> Self {
        Self { http, feed_url }
    }

    /// Download URL published for `platform`.
    pub async fn latest_for_platform(&self, platform: &str) -> Result<String> {
        let feed: FeedResponse = get_json(self.http, self.feed_url).await?;
        let mut downloads = feed.downloads;
        downloads
            .remove(platform)
            .map(FeedEntry::into_url)
            .ok_or_else(|| {
                ProvisionError::Configuration(format!(
                    "Metadata feed {} has no download for platform '{platform}'",
                    self.feed_url
                ))
            })
    }
}
