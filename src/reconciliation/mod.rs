//! Input Tax Credit reconciliation
//!
//! Sets the GST paid on eligible purchases, plus any credit the operator
//! carries forward ("old setoff"), against the GST collected on sales.
//! The resulting balance is reported as is: a negative component means tax
//! is payable under that head.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use bigdecimal::BigDecimal;

use crate::period::Month;
use crate::traits::TaxRecord;
use crate::types::{B2cSale, Purchase, Sale, TaxComponents};

/// ITC position of a client for one month
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItcState {
    /// Credit carried forward by the operator
    pub old_setoff: TaxComponents,
    /// Tax on ITC-eligible purchases
    pub input: TaxComponents,
    /// Old setoff plus input
    pub total: TaxComponents,
    /// Tax on B2B and B2C sales
    pub output: TaxComponents,
    /// Total minus output; never clamped at zero
    pub balance: TaxComponents,
}

impl ItcState {
    /// Net position across all three heads
    pub fn net_balance(&self) -> BigDecimal {
        self.balance.total()
    }
}

/// Reconcile input against output tax for one month.
///
/// Purchases count as input unless flagged `itc_eligible: false`; every sale
/// counts as output.
pub fn reconcile_itc(
    purchases: &[Purchase],
    sales: &[Sale],
    b2c_sales: &[B2cSale],
    old_setoff: &TaxComponents,
) -> ItcState {
    let mut input = TaxComponents::default();
    for purchase in purchases.iter().filter(|p| p.is_itc_eligible()) {
        input.accumulate(&purchase.taxes());
    }

    let mut output = TaxComponents::default();
    for sale in sales {
        output.accumulate(&sale.taxes());
    }
    for sale in b2c_sales {
        output.accumulate(&sale.taxes());
    }

    let total = old_setoff.plus(&input);
    let balance = total.minus(&output);

    ItcState {
        old_setoff: old_setoff.clone(),
        input,
        total,
        output,
        balance,
    }
}

/// Operator-entered old setoff amounts, kept per client and month.
///
/// Entries only ever add to what is already recorded. The register lives in
/// memory; it serializes so a caller can persist it between sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SetoffRegister {
    entries: BTreeMap<String, BTreeMap<Month, TaxComponents>>,
}

impl SetoffRegister {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry and return the accumulated setoff for the month
    pub fn add(&mut self, client_id: &str, month: Month, entry: &TaxComponents) -> TaxComponents {
        let recorded = self
            .entries
            .entry(client_id.to_string())
            .or_default()
            .entry(month)
            .or_default();
        recorded.accumulate(entry);
        recorded.clone()
    }

    /// Accumulated setoff, zero when nothing was entered
    pub fn get(&self, client_id: &str, month: &Month) -> TaxComponents {
        self.entries
            .get(client_id)
            .and_then(|months| months.get(month))
            .cloned()
            .unwrap_or_default()
    }

    pub fn clear(&mut self, client_id: &str, month: &Month) {
        if let Some(months) = self.entries.get_mut(client_id) {
            months.remove(month);
        }
    }

    /// Drop everything recorded for a client
    pub fn remove_client(&mut self, client_id: &str) {
        self.entries.remove(client_id);
    }
}

/// ITC available as shown on the monthly report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItcSummary {
    pub eligible_purchases: usize,
    pub cgst: BigDecimal,
    pub sgst: BigDecimal,
    pub igst: BigDecimal,
    pub cess: BigDecimal,
    /// CGST + SGST + IGST + cess
    pub total_itc: BigDecimal,
    pub utilized: BigDecimal,
    pub carry_forward: BigDecimal,
}

impl ItcSummary {
    pub fn from_purchases<'a, I>(purchases: I) -> Self
    where
        I: IntoIterator<Item = &'a Purchase>,
    {
        let mut summary = Self::default();
        for purchase in purchases.into_iter().filter(|p| p.is_itc_eligible()) {
            summary.eligible_purchases += 1;
            summary.cgst += &purchase.central_tax;
            summary.sgst += &purchase.state_tax;
            summary.igst += &purchase.integrated_tax;
            summary.cess += &purchase.cess;
        }

        summary.total_itc = &summary.cgst + &summary.sgst + &summary.igst + &summary.cess;
        summary.carry_forward = &summary.total_itc - &summary.utilized;
        summary
    }
}
