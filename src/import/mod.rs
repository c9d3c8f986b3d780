//! CSV templates consumed and produced by the returns backend
//!
//! - [`purchase`]: the purchase register template (import and export)
//! - [`b2b`]: the GSTR-1 B2B invoice upload (import)
//!
//! Imports are lenient: rows that cannot be used are skipped and reported in
//! [`ImportOutcome::skipped`] rather than failing the whole file.

pub mod b2b;
pub mod purchase;

pub use b2b::{b2b_template, parse_b2b_csv, B2B_TEMPLATE_HEADERS};
pub use purchase::{
    parse_purchase_csv, purchase_template, write_purchase_csv, PURCHASE_TEMPLATE_HEADERS,
};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A row left out of an import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedRow {
    /// 1-based line in the file
    pub line: u64,
    pub reason: String,
}

/// Records parsed from a file plus the rows that were skipped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportOutcome<T> {
    pub records: Vec<T>,
    pub skipped: Vec<SkippedRow>,
}

impl<T> Default for ImportOutcome<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

impl<T> ImportOutcome<T> {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Column positions looked up by header name
pub(crate) struct Columns {
    positions: HashMap<String, usize>,
    width: usize,
}

impl Columns {
    /// Index headers, normalising each name with `key`
    pub(crate) fn new(headers: &csv::StringRecord, key: fn(&str) -> String) -> Self {
        let positions = headers
            .iter()
            .enumerate()
            .map(|(index, name)| (key(name), index))
            .collect();
        Self {
            positions,
            width: headers.len(),
        }
    }

    pub(crate) fn has(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    pub(crate) fn width(&self) -> usize {
        self.width
    }

    /// Trimmed cell value with surrounding quotes removed, empty when the column is absent
    pub(crate) fn get<'r>(&self, record: &'r csv::StringRecord, name: &str) -> &'r str {
        self.positions
            .get(name)
            .and_then(|index| record.get(*index))
            .map(|value| value.trim().trim_matches('"').trim())
            .unwrap_or("")
    }
}

pub(crate) fn line_of(record: &csv::StringRecord, fallback: u64) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(fallback)
}
