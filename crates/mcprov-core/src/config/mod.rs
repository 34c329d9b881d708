//! Configuration loading for provisioning runs.

pub mod parser;
pub mod schema;
pub mod store;

pub use schema::{Endpoints, FeedConfig, HttpSettings, ProvisionConfig};
pub use store::ConfigStore;
