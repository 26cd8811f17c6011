//! Process metadata mappers.
//!
//! A mapper attaches one attribute to process-attributed nodes. Mappers are
//! handed to the [`crate::Spy`] explicitly and applied in the order given.

use thiserror::Error;

/// Reasons a mapper could not produce a value for a process.
#[derive(Debug, Error)]
pub enum MapperError {
    #[error("no such process: {0}")]
    NoSuchProcess(u32),
    #[error("{0}")]
    Failed(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Maps a process id to one attribute value under the key it owns.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so a configured spy can be moved to
/// whichever thread runs the build.
pub trait ProcessMapper: Send + Sync {
    /// Attribute name this mapper writes.
    fn key(&self) -> &str;

    /// Value for `pid`. An error omits the attribute for this node only.
    fn map(&self, pid: u32) -> Result<String, MapperError>;
}

impl<M: ProcessMapper + ?Sized> ProcessMapper for Box<M> {
    fn key(&self) -> &str {
        (**self).key()
    }

    fn map(&self, pid: u32) -> Result<String, MapperError> {
        (**self).map(pid)
    }
}
