//! srvwatch-core: Core types for srvwatch
//!
//! This crate provides the types shared by the discovery components:
//! - Endpoints, snapshots, and change records
//! - Configuration types
//! - Error handling

pub mod config;
pub mod error;
pub mod model;

pub use config::*;
pub use error::*;
pub use model::*;
