//! Workbook layout derived from a result set
//!
//! A snapshot is the full export: one sheet per brand/category group with the
//! columns `SKU`, `Selling Price`, `Comment`. Sheet names are limited to
//! [`MAX_SHEET_NAME_LEN`] characters, so two group keys sharing that prefix
//! collapse into one sheet; the group appended last supplies its rows.

use crate::output::results::{Group, ResultSet};

/// Longest sheet name the workbook format accepts
pub const MAX_SHEET_NAME_LEN: usize = 31;

/// Column headers and display widths, in output order
pub const COLUMNS: [(&str, f64); 3] = [("SKU", 20.0), ("Selling Price", 15.0), ("Comment", 50.0)];

/// Characters the workbook format rejects in sheet names
const FORBIDDEN_SHEET_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

/// One exported row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRow {
    pub sku: String,
    pub selling_price: String,
    pub comment: String,
}

/// One worksheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<SnapshotRow>,
}

/// The complete workbook content
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub sheets: Vec<Sheet>,
}

impl Snapshot {
    /// Lays out every group of the result set
    pub fn from_results(results: &ResultSet) -> Self {
        Self::from_groups(results.groups())
    }

    /// Lays out groups as sheets
    ///
    /// Sheet names are compared case-insensitively, as the workbook format
    /// does. When two groups map to the same name the sheet keeps the position
    /// of the first and the rows of the last.
    pub fn from_groups(groups: Vec<Group>) -> Self {
        let mut sheets: Vec<Sheet> = Vec::new();

        for group in groups {
            let name = sheet_name(&group.key);
            let rows = group.records.into_iter().map(|record| SnapshotRow {
                sku: record.sku,
                selling_price: record.price,
                comment: record.comment,
            });

            match sheets
                .iter_mut()
                .find(|sheet| sheet.name.to_lowercase() == name.to_lowercase())
            {
                Some(existing) => {
                    tracing::warn!(
                        "Group '{}' shares sheet name '{}' with an earlier group; keeping its rows",
                        group.key,
                        existing.name
                    );
                    existing.rows = rows.collect();
                }
                None => sheets.push(Sheet {
                    name,
                    rows: rows.collect(),
                }),
            }
        }

        Self { sheets }
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }

    /// Total data rows across all sheets
    pub fn row_count(&self) -> usize {
        self.sheets.iter().map(|sheet| sheet.rows.len()).sum()
    }
}

/// Derives a worksheet name from a group key
///
/// Characters the format forbids become `_`, the result is cut to
/// [`MAX_SHEET_NAME_LEN`] characters, and a leading or trailing apostrophe is
/// replaced since the format rejects those too.
pub fn sheet_name(key: &str) -> String {
    let mut chars: Vec<char> = key
        .chars()
        .map(|c| if FORBIDDEN_SHEET_CHARS.contains(&c) { '_' } else { c })
        .take(MAX_SHEET_NAME_LEN)
        .collect();

    if chars.first() == Some(&'\'') {
        chars[0] = '_';
    }
    if let Some(last) = chars.last_mut() {
        if *last == '\'' {
            *last = '_';
        }
    }

    if chars.is_empty() {
        return "Sheet".to_string();
    }

    chars.into_iter().collect()
}
