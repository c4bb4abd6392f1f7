//! The run-wide result set and its grouped view

use crate::catalog::ProductRecord;
use std::collections::HashMap;

/// All records of a brand/category pair, in append order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// `"<brand> - <category>"`
    pub key: String,
    pub records: Vec<ProductRecord>,
}

/// Ordered, append-only collection of every record the run produced
///
/// Nothing is ever removed or deduplicated here; several records for the same
/// brand/category, placeholders included, may coexist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    records: Vec<ProductRecord>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record without any validation
    pub fn append(&mut self, record: ProductRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[ProductRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Regroups every record by brand and category
    ///
    /// This is a full scan on each call. Groups are ordered by the first
    /// appearance of their key, so records of one key appended at different
    /// times still land in a single group.
    pub fn groups(&self) -> Vec<Group> {
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut groups: Vec<Group> = Vec::new();

        for record in &self.records {
            let key = record.group_key();
            match index.get(&key) {
                Some(&position) => groups[position].records.push(record.clone()),
                None => {
                    index.insert(key.clone(), groups.len());
                    groups.push(Group {
                        key,
                        records: vec![record.clone()],
                    });
                }
            }
        }

        groups
    }
}

impl FromIterator<ProductRecord> for ResultSet {
    fn from_iter<I: IntoIterator<Item = ProductRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}
