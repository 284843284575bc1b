//! Endpoint, Snapshot, and ChangeRecord type definitions

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Resolved membership at one point in time, keyed by host
pub type Snapshot = HashMap<String, u16>;

/// Format a host and port as `host:port`.
///
/// No brackets are added for IPv6 literals.
pub fn format_address(host: &str, port: u16) -> String {
    format!("{}:{}", host, port)
}

/// A concrete network endpoint of a service
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    /// Host or address literal
    pub host: String,
    /// Port
    pub port: u16,
}

impl Endpoint {
    /// Create a new endpoint
    pub fn new(host: String, port: u16) -> Self {
        Self { host, port }
    }

    /// Get the `host:port` form of this endpoint
    pub fn address(&self) -> String {
        format_address(&self.host, self.port)
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.address())
    }
}

/// Kind of membership change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Endpoint joined the set
    Add,
    /// Endpoint left the set
    Delete,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Add => write!(f, "add"),
            Operation::Delete => write!(f, "delete"),
        }
    }
}

/// One membership delta between two snapshots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    /// Operation to apply
    pub op: Operation,
    /// Address in `host:port` form
    pub addr: String,
}

impl ChangeRecord {
    /// Record that `host:port` was added
    pub fn add(host: &str, port: u16) -> Self {
        Self {
            op: Operation::Add,
            addr: format_address(host, port),
        }
    }

    /// Record that `host:port` was removed
    pub fn delete(host: &str, port: u16) -> Self {
        Self {
            op: Operation::Delete,
            addr: format_address(host, port),
        }
    }
}

impl std::fmt::Display for ChangeRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = match self.op {
            Operation::Add => '+',
            Operation::Delete => '-',
        };
        write!(f, "{}{}", sign, self.addr)
    }
}

/// A single service record as returned by the name service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SrvRecord {
    /// Target host name of the record
    pub target: String,
    /// Port the service listens on
    pub port: u16,
    /// Record priority (lower is preferred)
    pub priority: u16,
    /// Relative weight among records of equal priority
    pub weight: u16,
}

impl SrvRecord {
    /// Create a new record
    pub fn new(target: String, port: u16, priority: u16, weight: u16) -> Self {
        Self {
            target,
            port,
            priority,
            weight,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_address() {
        assert_eq!(format_address("10.0.0.2", 1234), "10.0.0.2:1234");
    }

    #[test]
    fn test_format_address_ipv6_unbracketed() {
        assert_eq!(format_address("::1", 8080), "::1:8080");
    }

    #[test]
    fn test_endpoint_address() {
        let endpoint = Endpoint::new("10.0.0.1".to_string(), 1222);
        assert_eq!(endpoint.address(), "10.0.0.1:1222");
        assert_eq!(endpoint.to_string(), endpoint.address());
    }

    #[test]
    fn test_endpoint_display_matches_wire_format() {
        let endpoint = Endpoint::new("fe80::1".to_string(), 443);
        assert_eq!(endpoint.to_string(), format_address("fe80::1", 443));
        assert_eq!(
            endpoint.to_string(),
            ChangeRecord::add(&endpoint.host, endpoint.port).addr
        );
    }

    #[test]
    fn test_change_record_constructors() {
        let add = ChangeRecord::add("10.0.0.2", 2432);
        assert_eq!(add.op, Operation::Add);
        assert_eq!(add.addr, "10.0.0.2:2432");
        assert_eq!(add.to_string(), "+10.0.0.2:2432");

        let delete = ChangeRecord::delete("10.0.0.3", 2344);
        assert_eq!(delete.op, Operation::Delete);
        assert_eq!(delete.to_string(), "-10.0.0.3:2344");
    }

    #[test]
    fn test_operation_serialization() {
        let record = ChangeRecord::delete("10.0.0.3", 2344);
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"op":"delete","addr":"10.0.0.3:2344"}"#);
    }
}
