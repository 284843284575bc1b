//! Snapshot comparison
//!
//! Turns two successive snapshots into the add/delete records a connection
//! pool needs to apply. Identity is the host key alone: a host present in
//! both snapshots yields nothing, even when its port changed.

use srvwatch_core::{ChangeRecord, Snapshot};

/// Compute the changes that turn `previous` into `current`.
///
/// All deletes come before all adds. Order within each phase follows map
/// iteration and must not be relied upon.
pub fn diff(previous: &Snapshot, current: &Snapshot) -> Vec<ChangeRecord> {
    let deletes = previous
        .iter()
        .filter(|(host, _)| !current.contains_key(*host))
        .map(|(host, port)| ChangeRecord::delete(host, *port));

    let adds = current
        .iter()
        .filter(|(host, _)| !previous.contains_key(*host))
        .map(|(host, port)| ChangeRecord::add(host, *port));

    deletes.chain(adds).collect()
}
