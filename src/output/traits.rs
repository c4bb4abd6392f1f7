//! Output sink trait and errors
//!
//! A sink receives the complete workbook layout each time the crawl
//! persists. Every write replaces what the previous one produced.

use crate::output::snapshot::Snapshot;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write workbook: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Destination for workbook snapshots
///
/// Implementations overwrite their previous snapshot in full. A failed write
/// must leave the sink usable for the next attempt.
pub trait SnapshotSink: Send {
    /// Writes `snapshot`, replacing any earlier one
    ///
    /// # Returns
    ///
    /// * `Ok(PathBuf)` - Where the snapshot now lives
    /// * `Err(OutputError)` - The snapshot could not be written
    fn write_snapshot(&mut self, snapshot: &Snapshot) -> OutputResult<PathBuf>;
}
