//! Shared fixtures for provisioning integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use mcprov_core::config::Endpoints;
use mcprov_core::fs::digest::sha256_bytes;
use mcprov_core::http::HttpClient;
use mcprov_core::{ProvisionError, Result};

pub const INDEX: &str = "https://index.test/v2";
pub const MARKET: &str = "https://market.test/v2";
pub const PLUGINS: &str = "https://plugins.test/api/v1";
pub const FEED: &str = "https://feed.test/latest";

pub const PAPER_JAR: &[u8] = b"paper build 17";
pub const PAPER_DOWNLOAD: &str =
    "https://index.test/v2/projects/paper/versions/1.21.1/builds/17/downloads/paper-1.21.1-17.jar";

/// In-memory HTTP client recording every requested URL.
#[derive(Debug, Default)]
pub struct FakeHttp {
    routes: HashMap<String, std::result::Result<Vec<u8>, u16>>,
    calls: Mutex<Vec<String>>,
}

impl FakeHttp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.routes.insert(url.to_string(), Ok(body.into()));
        self
    }

    pub fn fail(mut self, url: &str, status: u16) -> Self {
        self.routes.insert(url.to_string(), Err(status));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, url: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == url).count()
    }

    /// Paper 1.21.1 with builds `[5, 12, 17]`; build 17 serves [`PAPER_JAR`].
    pub fn with_paper(self) -> Self {
        self.route(
            "https://index.test/v2/projects/paper/versions/1.21.1",
            r#"{"project_id": "paper", "version": "1.21.1", "builds": [5, 12, 17]}"#,
        )
        .route(
            "https://index.test/v2/projects/paper/versions/1.21.1/builds/17",
            build_info("paper-1.21.1-17.jar", &sha256_bytes(PAPER_JAR)),
        )
        .route(PAPER_DOWNLOAD, PAPER_JAR)
    }
}

impl HttpClient for FakeHttp {
    async fn get(&self, url: &str) -> Result<Vec<u8>> {
        self.calls.lock().unwrap().push(url.to_string());
        match self.routes.get(url) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(status)) => Err(ProvisionError::Remote {
                url: url.to_string(),
                status: *status,
                reason: "Canned".to_string(),
            }),
            None => Err(ProvisionError::Remote {
                url: url.to_string(),
                status: 404,
                reason: "Not Found".to_string(),
            }),
        }
    }
}

pub fn build_info(name: &str, sha256: &str) -> String {
    format!(
        r#"{{"build": 17, "downloads": {{"application": {{"name": "{name}", "sha256": "{sha256}"}}}}}}"#
    )
}

pub fn endpoints() -> Endpoints {
    Endpoints {
        build_index: INDEX.to_string(),
        marketplace: MARKET.to_string(),
        plugin_index: PLUGINS.to_string(),
    }
}

pub fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}
