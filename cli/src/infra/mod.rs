//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution, service
//! manager calls, downloads, hashing, the run log, and config loading.
//!
//! Imports from `crate::domain`, `crate::application::ports`, and
//! `crate::output` are allowed. Imports from `crate::cli` are forbidden.

pub mod agent_cli;
pub mod command_runner;
pub mod config;
pub mod download;
pub mod fs;
pub mod installer;
pub mod log_file;
pub mod service_manager;
