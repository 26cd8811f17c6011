//! Report data model for the topology probe.
//!
//! This crate provides the pieces a host needs to describe its connections
//! in a form that can be merged with other hosts' fragments:
//! - Node, adjacency and edge identifiers
//! - Address scoping (loopback disambiguation)
//! - Topologies and the two-granularity report

pub mod error;
pub mod id;
pub mod report;
pub mod scope;
pub mod topology;

pub use error::{ReportError, Result};
pub use id::{make_adjacency_id, make_edge_id, AdjacencyId, EdgeId, IdSet, NodeId, ID_DELIM, SCOPE_DELIM};
pub use report::Report;
pub use scope::{scoped_ip, scoped_ip_port, validate_host_id};
pub use topology::{EdgeMetadata, NodeMetadata, Topology};
