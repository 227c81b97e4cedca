//! # API Shared
//!
//! Shared definitions for the DocVault API surfaces.
//!
//! Contains:
//! - Request/response bodies (`dto` module) with OpenAPI schemas
//! - Shared services like `HealthService`
//!
//! Used by `api-rest` and the `docvault` CLI.

pub mod dto;
pub mod health;

pub use dto::*;
pub use health::HealthService;
