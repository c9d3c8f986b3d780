//! Purchase register totals and supplier-wise grouping

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::Purchase;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PurchaseTotals {
    pub count: usize,
    pub invoice_value: BigDecimal,
    pub taxable_value: BigDecimal,
    pub cgst: BigDecimal,
    pub sgst: BigDecimal,
    pub igst: BigDecimal,
    pub cess: BigDecimal,
}

impl PurchaseTotals {
    pub fn aggregate<'a, I>(purchases: I) -> Self
    where
        I: IntoIterator<Item = &'a Purchase>,
    {
        let mut totals = Self::default();
        for purchase in purchases {
            totals.add(purchase);
        }
        totals
    }

    fn add(&mut self, purchase: &Purchase) {
        self.count += 1;
        self.invoice_value += &purchase.invoice_value;
        self.taxable_value += &purchase.taxable_value;
        self.cgst += &purchase.central_tax;
        self.sgst += &purchase.state_tax;
        self.igst += &purchase.integrated_tax;
        self.cess += &purchase.cess;
    }

    /// CGST + SGST + IGST + cess
    pub fn total_tax(&self) -> BigDecimal {
        &self.cgst + &self.sgst + &self.igst + &self.cess
    }
}

/// Purchases from one supplier
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupplierGroup {
    pub supplier_gstin: String,
    pub supplier_name: String,
    /// Sorted invoice numbers
    pub invoice_numbers: Vec<String>,
    pub totals: PurchaseTotals,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupplierSummary {
    /// Sorted by GSTIN, then name
    pub suppliers: Vec<SupplierGroup>,
}

impl SupplierSummary {
    pub fn aggregate<'a, I>(purchases: I) -> Self
    where
        I: IntoIterator<Item = &'a Purchase>,
    {
        let mut groups: BTreeMap<(String, String), SupplierGroup> = BTreeMap::new();

        for purchase in purchases {
            let key = (purchase.supplier_gstin.clone(), purchase.supplier_name.clone());
            let group = groups.entry(key).or_insert_with(|| SupplierGroup {
                supplier_gstin: purchase.supplier_gstin.clone(),
                supplier_name: purchase.supplier_name.clone(),
                ..Default::default()
            });
            group.invoice_numbers.push(purchase.invoice_number.clone());
            group.totals.add(purchase);
        }

        let suppliers = groups
            .into_values()
            .map(|mut group| {
                group.invoice_numbers.sort();
                group
            })
            .collect();

        Self { suppliers }
    }

    pub fn find(&self, supplier_gstin: &str) -> Option<&SupplierGroup> {
        self.suppliers
            .iter()
            .find(|group| group.supplier_gstin == supplier_gstin)
    }
}
