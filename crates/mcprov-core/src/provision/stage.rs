//! Pipeline stages for one server.

use std::fmt;

use serde::Serialize;

/// Stages in order; `Failed` is terminal and reachable from any step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProvisionStage {
    Init,
    SkeletonReady,
    EngineResolved,
    TemplatesApplied,
    PluginsResolved,
    Done,
    Failed,
}

impl ProvisionStage {
    /// The stage that follows a successful step, if any.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Init => Some(Self::SkeletonReady),
            Self::SkeletonReady => Some(Self::EngineResolved),
            Self::EngineResolved => Some(Self::TemplatesApplied),
            Self::TemplatesApplied => Some(Self::PluginsResolved),
            Self::PluginsResolved => Some(Self::Done),
            Self::Done | Self::Failed => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::SkeletonReady => "skeleton_ready",
            Self::EngineResolved => "engine_resolved",
            Self::TemplatesApplied => "templates_applied",
            Self::PluginsResolved => "plugins_resolved",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for ProvisionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
