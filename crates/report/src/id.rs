//! Identifiers used as keys in a report.
//!
//! Every identifier is a plain string so reports from different hosts can be
//! unioned key-by-key. Composite identifiers are joined with [`ID_DELIM`];
//! scopes, addresses and ports are joined with [`SCOPE_DELIM`].

use crate::error::{ReportError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Separates the parts of a composite id (host and node, source and destination).
pub const ID_DELIM: &str = "|";

/// Separates a scope from an address, and an address from a port.
pub const SCOPE_DELIM: &str = ";";

/// Identifier of a topology node, unique within a merged global graph.
///
/// Built by [`crate::scope::scoped_ip`] for network-level nodes and
/// [`crate::scope::scoped_ip_port`] for process-level endpoints.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Key of an adjacency entry: the reporting host plus the local node.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdjacencyId(String);

impl AdjacencyId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AdjacencyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Build the adjacency key for `local` as observed on `host_id`.
pub fn make_adjacency_id(host_id: &str, local: &NodeId) -> AdjacencyId {
    AdjacencyId(format!("{}{}{}", host_id, ID_DELIM, local))
}

/// Directed edge from the local endpoint to the remote endpoint.
///
/// Serialized as the single string `src|dst` so it can be used as a map key
/// in JSON documents.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct EdgeId {
    pub src: NodeId,
    pub dst: NodeId,
}

/// Build the edge key for a connection observed locally from `src` to `dst`.
pub fn make_edge_id(src: &NodeId, dst: &NodeId) -> EdgeId {
    EdgeId {
        src: src.clone(),
        dst: dst.clone(),
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.src, ID_DELIM, self.dst)
    }
}

impl FromStr for EdgeId {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split(ID_DELIM);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(src), Some(dst), None) => Ok(EdgeId {
                src: NodeId::new(src),
                dst: NodeId::new(dst),
            }),
            _ => Err(ReportError::InvalidEdgeId(s.to_string())),
        }
    }
}

impl Serialize for EdgeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EdgeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Set of node ids. Inserting an id that is already present is a no-op.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdSet(BTreeSet<NodeId>);

impl IdSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `id`, returning `true` if it was not already present.
    pub fn add(&mut self, id: NodeId) -> bool {
        self.0.insert(id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.0.contains(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NodeId> {
        self.0.iter()
    }
}

impl FromIterator<NodeId> for IdSet {
    fn from_iter<I: IntoIterator<Item = NodeId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjacency_id_prefixes_host() {
        let id = make_adjacency_id("host1", &NodeId::new(";10.0.0.1"));
        assert_eq!(id.as_str(), "host1|;10.0.0.1");
    }

    #[test]
    fn test_edge_id_display_and_parse() {
        let edge = make_edge_id(&NodeId::new(";10.0.0.1"), &NodeId::new("h;127.0.0.1"));
        assert_eq!(edge.to_string(), ";10.0.0.1|h;127.0.0.1");
        assert_eq!(edge.to_string().parse::<EdgeId>().unwrap(), edge);
    }

    #[test]
    fn test_edge_id_rejects_malformed() {
        assert_eq!(
            "no-delimiter".parse::<EdgeId>(),
            Err(ReportError::InvalidEdgeId("no-delimiter".into()))
        );
        assert!("a|b|c".parse::<EdgeId>().is_err());
    }

    #[test]
    fn test_id_set_add_is_idempotent() {
        let mut set = IdSet::new();
        assert!(set.add(NodeId::new(";10.0.0.2")));
        assert!(!set.add(NodeId::new(";10.0.0.2")));
        assert_eq!(set.len(), 1);
    }
}
