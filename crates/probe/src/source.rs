//! Connection sources.
//!
//! A source is queried once per build and hands back the snapshot as an
//! iterator. Enumerating sockets is the job of the implementor; this module
//! only ships an in-memory source and a JSON replay source.

use crate::connection::Connection;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Reasons a source could not produce a snapshot.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("decoding connections from {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("connection source unavailable: {0}")]
    Unavailable(String),
}

/// Supplies the connections of the current snapshot.
///
/// Called once per build; the returned sequence has no ordering guarantee
/// and is consumed to completion before the report is returned.
pub trait ConnectionSource {
    type Connections: Iterator<Item = Connection>;

    /// Fetch the current snapshot. With `include_processes` unset the source
    /// may skip process attribution.
    fn connections(&mut self, include_processes: bool) -> Result<Self::Connections, SourceError>;
}

fn strip_processes(mut conns: Vec<Connection>, include_processes: bool) -> Vec<Connection> {
    if !include_processes {
        for c in &mut conns {
            c.process = None;
        }
    }
    conns
}

/// Source backed by a fixed list of connections, or a canned failure.
#[derive(Clone, Debug)]
pub struct StaticSource {
    snapshot: Result<Vec<Connection>, String>,
}

impl StaticSource {
    pub fn new(connections: Vec<Connection>) -> Self {
        Self {
            snapshot: Ok(connections),
        }
    }

    /// A source whose every fetch fails with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            snapshot: Err(reason.into()),
        }
    }
}

impl ConnectionSource for StaticSource {
    type Connections = std::vec::IntoIter<Connection>;

    fn connections(&mut self, include_processes: bool) -> Result<Self::Connections, SourceError> {
        match &self.snapshot {
            Ok(conns) => Ok(strip_processes(conns.clone(), include_processes).into_iter()),
            Err(reason) => Err(SourceError::Unavailable(reason.clone())),
        }
    }
}

/// Source that replays a JSON array of connections from a file.
///
/// The file is re-read on every fetch, so it can be rewritten between builds.
#[derive(Clone, Debug)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConnectionSource for JsonFileSource {
    type Connections = std::vec::IntoIter<Connection>;

    fn connections(&mut self, include_processes: bool) -> Result<Self::Connections, SourceError> {
        let txt = fs::read_to_string(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        let conns: Vec<Connection> = serde_json::from_str(&txt).map_err(|source| SourceError::Decode {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(path = %self.path.display(), connections = conns.len(), "replayed snapshot");
        Ok(strip_processes(conns, include_processes).into_iter())
    }
}
