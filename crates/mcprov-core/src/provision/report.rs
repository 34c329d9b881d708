//! Outcome reporting for provisioning runs.

use std::path::PathBuf;

use serde::Serialize;

use crate::error::ProvisionError;

use super::ProvisionStage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineAction {
    /// A new artifact was fetched and written.
    Downloaded,
    /// The local artifact already matched the remote digest.
    UpToDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineOutcome {
    pub project: String,
    pub version: String,
    pub build: u64,
    pub file: PathBuf,
    pub action: EngineAction,
}

#[derive(Debug)]
pub struct PluginReport {
    /// Human-readable source label, e.g. `marketplace:28140`
    pub source: String,
    pub result: Result<PathBuf, ProvisionError>,
}

impl PluginReport {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Debug)]
pub struct ServerReport {
    pub server: String,
    /// `Done` or `Failed` once the pipeline has finished.
    pub stage: ProvisionStage,
    /// Last stage completed successfully.
    pub reached: ProvisionStage,
    pub error: Option<ProvisionError>,
    pub engine: Option<EngineOutcome>,
    pub templates_copied: usize,
    pub plugins: Vec<PluginReport>,
}

impl ServerReport {
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            stage: ProvisionStage::Init,
            reached: ProvisionStage::Init,
            error: None,
            engine: None,
            templates_copied: 0,
            plugins: Vec::new(),
        }
    }

    pub(crate) fn advance(&mut self, to: ProvisionStage) {
        debug_assert!(!self.stage.is_terminal(), "advancing a finished report");
        debug_assert_eq!(self.reached.next(), Some(to));
        self.reached = to;
        self.stage = to;
    }

    pub(crate) fn fail(&mut self, error: ProvisionError) {
        debug_assert!(!self.stage.is_terminal(), "failing a finished report");
        self.stage = ProvisionStage::Failed;
        self.error = Some(error);
    }

    pub fn is_done(&self) -> bool {
        self.stage == ProvisionStage::Done
    }

    pub fn failed_plugins(&self) -> impl Iterator<Item = &PluginReport> {
        self.plugins.iter().filter(|p| !p.is_ok())
    }
}

#[derive(Debug, Default)]
pub struct RunReport {
    pub servers: Vec<ServerReport>,
}

impl RunReport {
    /// True when every server reached `Done`; plugin failures do not count.
    pub fn is_success(&self) -> bool {
        self.servers.iter().all(ServerReport::is_done)
    }

    pub fn failed_servers(&self) -> impl Iterator<Item = &ServerReport> {
        self.servers.iter().filter(|s| !s.is_done())
    }
}
