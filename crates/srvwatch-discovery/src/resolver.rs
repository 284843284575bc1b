//! Name resolution adapter
//!
//! RPC clients ask a [`Resolver`] for a [`Watcher`] per target name.

use srvwatch_core::{DiscoveryResult, WatcherConfig};

use crate::watcher::Watcher;

/// Maps a target name to a watcher for that name
pub trait Resolver: Send + Sync {
    /// Start watching `target`
    fn resolve(&self, target: &str) -> DiscoveryResult<Watcher>;
}

/// Adapts a closure into a [`Resolver`]
pub struct ResolverFn<F>(pub F);

impl<F> Resolver for ResolverFn<F>
where
    F: Fn(&str) -> DiscoveryResult<Watcher> + Send + Sync,
{
    fn resolve(&self, target: &str) -> DiscoveryResult<Watcher> {
        (self.0)(target)
    }
}

/// Resolver creating SRV watchers backed by the system resolver
#[derive(Debug, Clone, Default)]
pub struct SrvResolver {
    config: WatcherConfig,
}

impl SrvResolver {
    /// Create a resolver whose watchers use `config`
    pub fn new(config: WatcherConfig) -> Self {
        Self { config }
    }
}

impl Resolver for SrvResolver {
    fn resolve(&self, target: &str) -> DiscoveryResult<Watcher> {
        Ok(Watcher::with_config(target, self.config.clone()))
    }
}
