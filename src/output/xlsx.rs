//! Workbook file sink
//!
//! Writes each snapshot to `<directory>/<prefix>_<YYYY-MM-DD>.xlsx`. The date
//! is fixed when the writer is created, so every snapshot of a run lands in
//! the same file even if the run crosses midnight.

use crate::config::OutputConfig;
use crate::output::snapshot::{Snapshot, COLUMNS};
use crate::output::traits::{OutputResult, SnapshotSink};
use chrono::NaiveDate;
use rust_xlsxwriter::{Format, Workbook};
use std::path::{Path, PathBuf};

/// Returns `<prefix>_<YYYY-MM-DD>.xlsx`
pub fn snapshot_file_name(prefix: &str, date: NaiveDate) -> String {
    format!("{}_{}.xlsx", prefix, date.format("%Y-%m-%d"))
}

/// Writes snapshots as `.xlsx` workbooks, overwriting the same file each time
#[derive(Debug, Clone)]
pub struct XlsxSnapshotWriter {
    path: PathBuf,
}

impl XlsxSnapshotWriter {
    pub fn new(directory: impl AsRef<Path>, prefix: &str, date: NaiveDate) -> Self {
        Self {
            path: directory.as_ref().join(snapshot_file_name(prefix, date)),
        }
    }

    pub fn from_config(config: &OutputConfig, date: NaiveDate) -> Self {
        Self::new(&config.directory, &config.file_prefix, date)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn build_workbook(snapshot: &Snapshot) -> OutputResult<Workbook> {
        let mut workbook = Workbook::new();
        let header = Format::new().set_bold();

        for sheet in &snapshot.sheets {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(&sheet.name)?;

            for (col, (title, width)) in COLUMNS.iter().enumerate() {
                let col = col as u16;
                worksheet.set_column_width(col, *width)?;
                worksheet.write_string_with_format(0, col, *title, &header)?;
            }

            for (index, row) in sheet.rows.iter().enumerate() {
                let row_num = index as u32 + 1;
                let cells = [&row.sku, &row.selling_price, &row.comment];
                for (col, value) in cells.into_iter().enumerate() {
                    if !value.is_empty() {
                        worksheet.write_string(row_num, col as u16, value.as_str())?;
                    }
                }
            }
        }

        Ok(workbook)
    }
}

impl SnapshotSink for XlsxSnapshotWriter {
    fn write_snapshot(&mut self, snapshot: &Snapshot) -> OutputResult<PathBuf> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut workbook = Self::build_workbook(snapshot)?;
        workbook.save(&self.path)?;

        tracing::debug!(
            "Wrote {} sheets ({} rows) to {}",
            snapshot.sheets.len(),
            snapshot.row_count(),
            self.path.display()
        );

        Ok(self.path.clone())
    }
}
