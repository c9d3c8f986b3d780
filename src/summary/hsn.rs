//! HSN-wise summary of supplies (GSTR-1 table 12)

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::traits::TaxRecord;

/// Group label for records without an HSN code
pub const HSN_NOT_SPECIFIED: &str = "Not Specified";
/// Unit quantity code used when a record carries none
pub const DEFAULT_UNIT: &str = "NOS";

/// Totals for one (HSN code, rate) group
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HsnLine {
    pub hsn_code: String,
    /// Normalised rate, e.g. `18` or `0.25`
    pub tax_rate: String,
    pub unit: String,
    pub quantity: BigDecimal,
    pub taxable_value: BigDecimal,
    pub cgst: BigDecimal,
    pub sgst: BigDecimal,
    pub igst: BigDecimal,
    pub cess: BigDecimal,
    pub total_value: BigDecimal,
}

/// Column totals across every HSN line
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HsnTotals {
    pub quantity: BigDecimal,
    pub taxable_value: BigDecimal,
    pub cgst: BigDecimal,
    pub sgst: BigDecimal,
    pub igst: BigDecimal,
    pub cess: BigDecimal,
    pub total_value: BigDecimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HsnSummary {
    /// Sorted by HSN code, then rate
    pub lines: Vec<HsnLine>,
}

fn rate_key<R: TaxRecord + ?Sized>(record: &R) -> String {
    let rate = record.tax_rate();
    rate.normalized().to_string()
}

impl HsnSummary {
    pub fn aggregate<'a, R, I>(records: I) -> Self
    where
        R: TaxRecord + ?Sized + 'a,
        I: IntoIterator<Item = &'a R>,
    {
        let mut groups: BTreeMap<(String, String), HsnLine> = BTreeMap::new();

        for record in records {
            let hsn_code = record.hsn_code().unwrap_or(HSN_NOT_SPECIFIED).to_string();
            let tax_rate = rate_key(record);
            let unit = record.unit().unwrap_or(DEFAULT_UNIT);

            let line = groups
                .entry((hsn_code.clone(), tax_rate.clone()))
                .or_insert_with(|| HsnLine {
                    hsn_code,
                    tax_rate,
                    unit: unit.to_string(),
                    ..Default::default()
                });

            // Smallest unit code wins so the label does not depend on input order
            if unit < line.unit.as_str() {
                line.unit = unit.to_string();
            }
            line.quantity += record.quantity();
            line.taxable_value += record.taxable_value();
            line.cgst += record.central_tax();
            line.sgst += record.state_tax();
            line.igst += record.integrated_tax();
            line.cess += record.cess();
            line.total_value += record.invoice_value();
        }

        Self {
            lines: groups.into_values().collect(),
        }
    }

    pub fn totals(&self) -> HsnTotals {
        let mut totals = HsnTotals::default();
        for line in &self.lines {
            totals.quantity += &line.quantity;
            totals.taxable_value += &line.taxable_value;
            totals.cgst += &line.cgst;
            totals.sgst += &line.sgst;
            totals.igst += &line.igst;
            totals.cess += &line.cess;
            totals.total_value += &line.total_value;
        }
        totals
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
