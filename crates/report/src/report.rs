//! Report: the fragment one host produces per build.

use crate::topology::Topology;
use serde::{Deserialize, Serialize};

/// Connection graph of one host at two granularities.
///
/// `network` has one node per (scoped) IP address, `process` one node per
/// (scoped) IP address + port endpoint.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct Report {
    pub network: Topology,
    pub process: Topology,
}

impl Report {
    /// An empty report with both topologies present.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.network.is_empty() && self.process.is_empty()
    }
}
