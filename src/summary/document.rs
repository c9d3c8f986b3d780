//! Document-wise summary of sales (GSTR-1 table 13)

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::traits::TaxRecord;

pub const DEFAULT_DOCUMENT_TYPE: &str = "Regular";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentLine {
    pub document_type: String,
    pub count: usize,
    pub total_value: BigDecimal,
    pub taxable_value: BigDecimal,
    pub cgst: BigDecimal,
    pub sgst: BigDecimal,
    pub igst: BigDecimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentSummary {
    /// Sorted by document type
    pub lines: Vec<DocumentLine>,
}

impl DocumentSummary {
    pub fn aggregate<'a, R, I>(records: I) -> Self
    where
        R: TaxRecord + ?Sized + 'a,
        I: IntoIterator<Item = &'a R>,
    {
        let mut groups: BTreeMap<String, DocumentLine> = BTreeMap::new();

        for record in records {
            let document_type = record.invoice_type().unwrap_or(DEFAULT_DOCUMENT_TYPE);
            let line = groups
                .entry(document_type.to_string())
                .or_insert_with(|| DocumentLine {
                    document_type: document_type.to_string(),
                    ..Default::default()
                });

            line.count += 1;
            line.total_value += record.invoice_value();
            line.taxable_value += record.taxable_value();
            line.cgst += record.central_tax();
            line.sgst += record.state_tax();
            line.igst += record.integrated_tax();
        }

        Self {
            lines: groups.into_values().collect(),
        }
    }

    /// Number of documents whose type contains `needle`, e.g. `Credit Note`
    pub fn count_of(&self, needle: &str) -> usize {
        self.lines
            .iter()
            .filter(|line| line.document_type.contains(needle))
            .map(|line| line.count)
            .sum()
    }

    pub fn total_documents(&self) -> usize {
        self.lines.iter().map(|line| line.count).sum()
    }
}
