//! Per-server provisioning pipeline.

pub mod pipeline;
pub mod report;
pub mod stage;

pub use pipeline::{ProvisionSettings, Provisioner};
pub use report::{EngineAction, EngineOutcome, PluginReport, RunReport, ServerReport};
pub use stage::ProvisionStage;
