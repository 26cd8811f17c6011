//! Host-side connection spy.
//!
//! This crate turns a snapshot of the host's active connections into a
//! [`report::Report`]:
//! - How connections are obtained (`ConnectionSource`)
//! - How process nodes are enriched (`ProcessMapper`)
//! - Where build durations go (`TimingSink`)
//! - How connections are folded into topologies (`ReportBuilder`, `Spy`)

pub mod builder;
pub mod connection;
pub mod mapper;
pub mod source;
pub mod spy;
pub mod timing;

pub use builder::ReportBuilder;
pub use connection::{Connection, Process};
pub use mapper::{MapperError, ProcessMapper};
pub use source::{ConnectionSource, JsonFileSource, SourceError, StaticSource};
pub use spy::Spy;
pub use timing::{MetricsSink, NoopSink, TimingSink, SPY_DURATION_METRIC};
