//! srvwatch-discovery: DNS SRV endpoint discovery
//!
//! This crate provides discovery for RPC client connection pools:
//! - Snapshot diffing into add/delete records
//! - A polling watcher over SRV and host lookups
//! - A resolver adapter mapping target names to watchers

pub mod diff;
pub mod dns;
pub mod resolver;
pub mod watcher;

pub use diff::diff;
pub use dns::{HickoryNameService, NameService};
pub use resolver::{Resolver, ResolverFn, SrvResolver};
pub use watcher::Watcher;
