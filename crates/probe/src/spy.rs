//! The per-host build entry point.

use crate::builder::ReportBuilder;
use crate::mapper::ProcessMapper;
use crate::source::ConnectionSource;
use crate::timing::{Timer, TimingSink};
use report::{validate_host_id, Report};

/// Host configuration plus the ordered list of process mappers.
///
/// A spy holds no state between builds; every [`spy`](Self::spy) call owns
/// a fresh report from creation to return.
pub struct Spy {
    host_id: String,
    host_name: String,
    include_processes: bool,
    mappers: Vec<Box<dyn ProcessMapper>>,
}

impl Spy {
    /// Create a spy for `host_id`, labelled `host_name` in the network topology.
    ///
    /// Fails if `host_id` is empty or contains an id delimiter.
    pub fn new(host_id: impl Into<String>, host_name: impl Into<String>) -> report::Result<Self> {
        let host_id = host_id.into();
        validate_host_id(&host_id)?;
        Ok(Self {
            host_id,
            host_name: host_name.into(),
            include_processes: false,
            mappers: Vec::new(),
        })
    }

    /// Also build the process topology from process-attributed connections.
    pub fn with_processes(mut self, include_processes: bool) -> Self {
        self.include_processes = include_processes;
        self
    }

    /// Append a mapper. Mappers run in the order they were added.
    pub fn with_mapper(mut self, mapper: impl ProcessMapper + 'static) -> Self {
        self.mappers.push(Box::new(mapper));
        self
    }

    pub fn host_id(&self) -> &str {
        &self.host_id
    }

    pub fn includes_processes(&self) -> bool {
        self.include_processes
    }

    /// A builder for one report with this spy's configuration.
    pub fn builder(&self) -> ReportBuilder<'_> {
        ReportBuilder::new(&self.host_id, &self.host_name, self.include_processes, &self.mappers)
    }

    /// Query `source` once and fold every connection into a new report.
    ///
    /// Never fails: if the source cannot produce a snapshot the condition is
    /// logged and an empty report is returned. `timing` receives the duration
    /// of the call in either case.
    pub fn spy<S: ConnectionSource>(&self, source: &mut S, timing: &dyn TimingSink) -> Report {
        let _timer = Timer::start(timing);

        let conns = match source.connections(self.include_processes) {
            Ok(conns) => conns,
            Err(error) => {
                tracing::warn!(host_id = %self.host_id, %error, "spy connections");
                return Report::new();
            }
        };

        let mut builder = self.builder();
        let mut count = 0usize;
        for conn in conns {
            builder.add_connection(&conn);
            count += 1;
        }
        tracing::debug!(host_id = %self.host_id, connections = count, "spied connections");
        builder.finish()
    }
}

impl std::fmt::Debug for Spy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Spy")
            .field("host_id", &self.host_id)
            .field("host_name", &self.host_name)
            .field("include_processes", &self.include_processes)
            .field("mappers", &self.mappers.iter().map(|m| m.key()).collect::<Vec<_>>())
            .finish()
    }
}
