//! Report builder: folds the connections of one snapshot into a report.
//!
//! # Algorithm
//!
//! For every connection, at the network level:
//! 1. Scope the local and remote addresses
//! 2. Union the remote node into the adjacency list of `host|local`
//! 3. Give the local node `{name: host_name}` unless it already has metadata
//! 4. Count one TCP connection on the `local -> remote` edge
//!
//! When processes are included and the connection carries a pid, the same
//! steps run at the process level on address + port endpoints, and the local
//! endpoint's first metadata is `{pid, name, domain}` plus every mapper value.
//!
//! Metadata is first-writer-wins within one build: a node that already has
//! an entry is never touched again, and mappers only run on first creation.

use crate::connection::{Connection, Process};
use crate::mapper::ProcessMapper;
use report::topology::{DOMAIN, NAME, PID};
use report::{make_adjacency_id, make_edge_id, scoped_ip, scoped_ip_port, NodeId, NodeMetadata, Report, Topology};

/// Accumulates one report. Create one per build and call [`finish`](Self::finish).
pub struct ReportBuilder<'a> {
    host_id: &'a str,
    host_name: &'a str,
    include_processes: bool,
    mappers: &'a [Box<dyn ProcessMapper>],
    report: Report,
}

impl<'a> ReportBuilder<'a> {
    pub fn new(
        host_id: &'a str,
        host_name: &'a str,
        include_processes: bool,
        mappers: &'a [Box<dyn ProcessMapper>],
    ) -> Self {
        Self {
            host_id,
            host_name,
            include_processes,
            mappers,
            report: Report::new(),
        }
    }

    /// Fold one connection into the report.
    pub fn add_connection(&mut self, c: &Connection) {
        let local = scoped_ip(self.host_id, c.local_address);
        let remote = scoped_ip(self.host_id, c.remote_address);
        let host_name = self.host_name;
        add_edge(self.host_id, &mut self.report.network, local, remote, || {
            [(NAME, host_name)].into_iter().collect()
        });

        if !self.include_processes {
            return;
        }
        let Some(process) = c.attributed_process() else {
            return;
        };

        let local = scoped_ip_port(self.host_id, c.local_address, c.local_port);
        let remote = scoped_ip_port(self.host_id, c.remote_address, c.remote_port);
        let (host_id, mappers) = (self.host_id, self.mappers);
        add_edge(self.host_id, &mut self.report.process, local, remote, || {
            process_metadata(host_id, process, mappers)
        });
    }

    pub fn finish(self) -> Report {
        self.report
    }
}

impl<'a> Extend<&'a Connection> for ReportBuilder<'_> {
    fn extend<I: IntoIterator<Item = &'a Connection>>(&mut self, iter: I) {
        for c in iter {
            self.add_connection(c);
        }
    }
}

fn add_edge<F>(host_id: &str, topology: &mut Topology, local: NodeId, remote: NodeId, metadata: F)
where
    F: FnOnce() -> NodeMetadata,
{
    let edge = make_edge_id(&local, &remote);
    topology.add_adjacency(make_adjacency_id(host_id, &local), remote);
    topology.insert_node_metadata_with(local, metadata);
    topology.count_tcp_connection(edge);
}

/// First metadata of a process endpoint. Mapper values are applied in order
/// and may overwrite the fixed fields or each other.
fn process_metadata(host_id: &str, process: &Process, mappers: &[Box<dyn ProcessMapper>]) -> NodeMetadata {
    let mut md: NodeMetadata = [
        (PID, process.pid.to_string()),
        (NAME, process.name.clone()),
        (DOMAIN, host_id.to_string()),
    ]
    .into_iter()
    .collect();

    for mapper in mappers {
        match mapper.map(process.pid) {
            Ok(value) => md.insert(mapper.key(), value),
            Err(error) => {
                tracing::debug!(pid = process.pid, key = mapper.key(), %error, "process mapper failed");
            }
        }
    }
    md
}
