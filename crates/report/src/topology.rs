//! Topology: one granularity of the connection graph.
//!
//! A topology records which nodes talk to which (adjacency), descriptive
//! attributes per node, and counters per directed edge. Adjacency is a set
//! union structure and can be unioned across fragments; the edge counters
//! only describe the snapshot they were built from.

use crate::id::{AdjacencyId, EdgeId, IdSet, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// Display name of the node (host name or process name).
pub const NAME: &str = "name";
/// Process id of the process owning an endpoint, as a decimal string.
pub const PID: &str = "pid";
/// Host id of the host owning an endpoint.
pub const DOMAIN: &str = "domain";

/// Adjacency lists keyed by reporting host + local node.
pub type Adjacency = BTreeMap<AdjacencyId, IdSet>;

/// Node metadata keyed by node id.
pub type NodeMetadatas = BTreeMap<NodeId, NodeMetadata>;

/// Edge counters keyed by directed edge.
pub type EdgeMetadatas = BTreeMap<EdgeId, EdgeMetadata>;

/// Free-form string attributes describing a node.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeMetadata(BTreeMap<String, String>);

impl NodeMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for NodeMetadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Per-edge counters for one snapshot.
///
/// `tcp_connection_count` counts connection instances seen in this fragment
/// only. It is not idempotent and must not be unioned across fragments.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct EdgeMetadata {
    pub has_tcp: bool,
    pub tcp_connection_count: u64,
}

/// One granularity (network or process) of a report.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct Topology {
    pub adjacency: Adjacency,
    pub node_metadatas: NodeMetadatas,
    pub edge_metadatas: EdgeMetadatas,
}

impl Topology {
    pub fn new() -> Self {
        Self::default()
    }

    /// Union `neighbour` into the adjacency list under `key`.
    pub fn add_adjacency(&mut self, key: AdjacencyId, neighbour: NodeId) {
        self.adjacency.entry(key).or_default().add(neighbour);
    }

    /// Insert metadata for `id` unless the node already has some.
    ///
    /// `make` only runs when the entry is absent. Returns `true` if this call
    /// created the entry.
    pub fn insert_node_metadata_with<F>(&mut self, id: NodeId, make: F) -> bool
    where
        F: FnOnce() -> NodeMetadata,
    {
        match self.node_metadatas.entry(id) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(make());
                true
            }
        }
    }

    /// Count one TCP connection instance on `edge`.
    pub fn count_tcp_connection(&mut self, edge: EdgeId) {
        let meta = self.edge_metadatas.entry(edge).or_default();
        meta.has_tcp = true;
        meta.tcp_connection_count += 1;
    }

    pub fn edge(&self, edge: &EdgeId) -> Option<&EdgeMetadata> {
        self.edge_metadatas.get(edge)
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty() && self.node_metadatas.is_empty() && self.edge_metadatas.is_empty()
    }
}
