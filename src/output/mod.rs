//! Output module for collecting and exporting crawl results
//!
//! This module handles:
//! - The run-wide, append-only result set
//! - Laying results out as one workbook sheet per brand/category
//! - Writing workbook snapshots to disk
//! - Recording run statistics

mod results;
mod snapshot;
pub mod stats;
mod traits;
mod xlsx;

pub use results::{Group, ResultSet};
pub use snapshot::{sheet_name, Sheet, Snapshot, SnapshotRow, COLUMNS, MAX_SHEET_NAME_LEN};
pub use stats::{print_statistics, RunStatistics};
pub use traits::{OutputError, OutputResult, SnapshotSink};
pub use xlsx::{snapshot_file_name, XlsxSnapshotWriter};

use std::path::PathBuf;

/// Regroups every record collected so far and hands the full layout to `sink`
///
/// # Arguments
///
/// * `results` - Every record of the run so far
/// * `sink` - Where the snapshot is written
///
/// # Returns
///
/// * `Ok(PathBuf)` - Where the snapshot was written
/// * `Err(OutputError)` - The write failed; earlier snapshots may remain
pub fn persist<S: SnapshotSink + ?Sized>(
    results: &ResultSet,
    sink: &mut S,
) -> OutputResult<PathBuf> {
    let snapshot = Snapshot::from_results(results);
    sink.write_snapshot(&snapshot)
}
