//! Name service lookups
//!
//! The watcher talks to DNS through the [`NameService`] trait so the
//! refresh loop can be driven by a scripted implementation in tests.

use async_trait::async_trait;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::proto::op::ResponseCode;
use hickory_resolver::TokioAsyncResolver;
use srvwatch_core::{DiscoveryError, DiscoveryResult, SrvRecord};
use std::net::IpAddr;
use tracing::{debug, warn};

/// Name service used to resolve a target
#[async_trait]
pub trait NameService: Send + Sync {
    /// Look up the service records of `name`, in the order returned
    async fn lookup_srv(&self, name: &str) -> DiscoveryResult<Vec<SrvRecord>>;

    /// Look up the address literals of `name`, in the order returned
    async fn lookup_host(&self, name: &str) -> DiscoveryResult<Vec<IpAddr>>;
}

/// [`NameService`] backed by hickory's async resolver
pub struct HickoryNameService {
    resolver: TokioAsyncResolver,
}

impl HickoryNameService {
    /// Create a name service from the system resolver configuration.
    ///
    /// Falls back to the library defaults when the system configuration
    /// cannot be read.
    pub fn new() -> Self {
        let resolver = match TokioAsyncResolver::tokio_from_system_conf() {
            Ok(resolver) => resolver,
            Err(e) => {
                warn!(
                    error = %e,
                    "Failed to read system resolver configuration, using defaults"
                );
                TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default())
            }
        };
        Self { resolver }
    }

    /// Create a name service with an explicit resolver configuration
    pub fn with_config(config: ResolverConfig, opts: ResolverOpts) -> Self {
        Self {
            resolver: TokioAsyncResolver::tokio(config, opts),
        }
    }
}

impl Default for HickoryNameService {
    fn default() -> Self {
        Self::new()
    }
}

/// A NOERROR answer without records is a valid, empty membership.
/// NXDOMAIN and every other failure is not.
fn is_no_records(err: &ResolveError) -> bool {
    matches!(
        err.kind(),
        ResolveErrorKind::NoRecordsFound {
            response_code: ResponseCode::NoError,
            ..
        }
    )
}

/// Map a failed lookup of `name` to an empty answer or a resolution error
fn lookup_failure<T>(name: &str, err: ResolveError) -> DiscoveryResult<Vec<T>> {
    if is_no_records(&err) {
        debug!(query = name, "Lookup returned no records");
        Ok(Vec::new())
    } else {
        Err(DiscoveryError::resolution(name, err))
    }
}

#[async_trait]
impl NameService for HickoryNameService {
    async fn lookup_srv(&self, name: &str) -> DiscoveryResult<Vec<SrvRecord>> {
        match self.resolver.srv_lookup(name).await {
            Ok(lookup) => {
                let records: Vec<SrvRecord> = lookup
                    .iter()
                    .map(|srv| {
                        SrvRecord::new(
                            srv.target().to_utf8(),
                            srv.port(),
                            srv.priority(),
                            srv.weight(),
                        )
                    })
                    .collect();
                debug!(query = name, records = records.len(), "SRV lookup complete");
                Ok(records)
            }
            Err(e) => lookup_failure(name, e),
        }
    }

    async fn lookup_host(&self, name: &str) -> DiscoveryResult<Vec<IpAddr>> {
        match self.resolver.lookup_ip(name).await {
            Ok(lookup) => {
                let addrs: Vec<IpAddr> = lookup.iter().collect();
                debug!(query = name, addresses = addrs.len(), "Host lookup complete");
                Ok(addrs)
            }
            Err(e) => lookup_failure(name, e),
        }
    }
}
