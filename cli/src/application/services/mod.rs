//! Application services: use-case orchestration.
//!
//! Each service module composes domain logic with port trait calls. Services
//! import only from `crate::domain` and `crate::application::ports`, never
//! from `crate::infra`, `crate::cli`, or `crate::output`.

pub mod agent_state;
pub mod group_assign;
pub mod provision;
