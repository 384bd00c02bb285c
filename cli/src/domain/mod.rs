//! Domain layer: pure provisioning rules, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::application`,
//! `tokio`, `std::fs`, `std::process`, or `std::net`.

pub mod access_key;
pub mod config;
pub mod error;
pub mod group;
pub mod install;
pub mod log;
pub mod service;

pub use access_key::AccessKey;
pub use config::{ProvisionConfig, ServiceManagerKind, Timeouts};
pub use error::{
    AccessKeyError, CommandError, ConfigError, GroupAssignError, InstallError, ProvisionError,
};
pub use group::GroupPath;
pub use install::InstallOutcome;
pub use log::Severity;
pub use service::{ServiceState, ServiceStatus};
