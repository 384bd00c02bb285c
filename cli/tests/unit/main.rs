//! Unit tests for agent-provision
//!
//! These tests use fake collaborators and run fast without external I/O.

mod provision_service;
