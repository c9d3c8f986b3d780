//! GSTR-3B outward supply totals and tax liability

use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};

use crate::traits::TaxRecord;
use crate::types::TransactionType;

/// Outward supplies of a month, as reported in GSTR-3B table 3.1
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutwardSummary {
    pub total_invoices: usize,
    pub taxable_value: BigDecimal,
    pub cgst: BigDecimal,
    pub sgst: BigDecimal,
    pub igst: BigDecimal,
    pub cess: BigDecimal,
    pub invoice_value: BigDecimal,
    /// Taxable value of B2B sales
    pub b2b_sales: BigDecimal,
    /// Taxable value of B2C sales
    pub b2c_sales: BigDecimal,
    /// Taxable value supplied for export or to SEZ units
    pub export_sales: BigDecimal,
    /// Zero-rated records with no taxable value
    pub exempt_sales: BigDecimal,
    /// Zero-rated records with a positive taxable value
    pub nil_rated_sales: BigDecimal,
    pub non_gst_sales: BigDecimal,
}

/// Place of supply marks an export or SEZ supply
pub fn is_export_supply(place_of_supply: Option<&str>) -> bool {
    place_of_supply.is_some_and(|pos| pos.contains("Export") || pos.contains("SEZ"))
}

impl OutwardSummary {
    pub fn aggregate<'a, R, I>(records: I) -> Self
    where
        R: TaxRecord + ?Sized + 'a,
        I: IntoIterator<Item = &'a R>,
    {
        let mut summary = Self::default();
        for record in records {
            summary.add(record);
        }
        summary
    }

    /// Fold one more record into the totals
    pub fn add<R: TaxRecord + ?Sized>(&mut self, record: &R) {
        let taxable = record.taxable_value();

        self.total_invoices += 1;
        self.cgst += record.central_tax();
        self.sgst += record.state_tax();
        self.igst += record.integrated_tax();
        self.cess += record.cess();
        self.invoice_value += record.invoice_value();

        match record.transaction_type() {
            TransactionType::B2b => self.b2b_sales += &taxable,
            TransactionType::B2c => self.b2c_sales += &taxable,
        }

        if is_export_supply(record.place_of_supply()) {
            self.export_sales += &taxable;
        }

        if record.tax_rate().is_zero() {
            if taxable > BigDecimal::zero() {
                self.nil_rated_sales += &taxable;
            } else {
                self.exempt_sales += &taxable;
            }
        }

        self.taxable_value += taxable;
    }

    pub fn total_tax(&self) -> BigDecimal {
        &self.cgst + &self.sgst + &self.igst
    }
}

/// Tax payable on outward supplies
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaxLiabilitySummary {
    pub taxable_value: BigDecimal,
    pub cgst: BigDecimal,
    pub sgst: BigDecimal,
    pub igst: BigDecimal,
    pub cess: BigDecimal,
    /// CGST + SGST + IGST + cess
    pub total_liability: BigDecimal,
    /// Reported as fully paid
    pub tax_paid: BigDecimal,
}

impl TaxLiabilitySummary {
    pub fn aggregate<'a, R, I>(records: I) -> Self
    where
        R: TaxRecord + ?Sized + 'a,
        I: IntoIterator<Item = &'a R>,
    {
        let mut summary = Self::default();
        for record in records {
            summary.taxable_value += record.taxable_value();
            summary.cgst += record.central_tax();
            summary.sgst += record.state_tax();
            summary.igst += record.integrated_tax();
            summary.cess += record.cess();
        }

        summary.total_liability = &summary.cgst + &summary.sgst + &summary.igst + &summary.cess;
        summary.tax_paid = summary.total_liability.clone();
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::TaxRecord;
    use crate::types::{B2cSale, Sale};

    fn sale(taxable: i64, rate: &str, cgst: i64, place_of_supply: &str) -> Sale {
        Sale {
            taxable_value: BigDecimal::from(taxable),
            tax_rate: rate.to_string(),
            central_tax: BigDecimal::from(cgst),
            state_tax: BigDecimal::from(cgst),
            invoice_value: BigDecimal::from(taxable + 2 * cgst),
            place_of_supply: place_of_supply.to_string(),
            ..Default::default()
        }
    }

    fn b2c(taxable: i64, rate: &str, igst: i64) -> B2cSale {
        B2cSale {
            taxable_value: BigDecimal::from(taxable),
            gst_rate: rate.to_string(),
            integrated_tax: BigDecimal::from(igst),
            invoice_value: BigDecimal::from(taxable + igst),
            ..Default::default()
        }
    }

    #[test]
    fn test_outward_summary_buckets() {
        let sales = vec![
            sale(10000, "18", 900, "29-Karnataka"),
            sale(5000, "0", 0, "29-Karnataka"),
            sale(0, "0", 0, ""),
            sale(2000, "12", 0, "Export"),
        ];
        let b2c_sales = vec![b2c(3000, "5", 150)];

        let mut records: Vec<&dyn TaxRecord> = Vec::new();
        records.extend(sales.iter().map(|s| s as &dyn TaxRecord));
        records.extend(b2c_sales.iter().map(|s| s as &dyn TaxRecord));

        let summary = OutwardSummary::aggregate(records);

        assert_eq!(summary.total_invoices, 5);
        assert_eq!(summary.taxable_value, BigDecimal::from(20000));
        assert_eq!(summary.cgst, BigDecimal::from(900));
        assert_eq!(summary.igst, BigDecimal::from(150));
        assert_eq!(summary.b2b_sales, BigDecimal::from(17000));
        assert_eq!(summary.b2c_sales, BigDecimal::from(3000));
        assert_eq!(summary.nil_rated_sales, BigDecimal::from(5000));
        assert_eq!(summary.exempt_sales, BigDecimal::from(0));
        assert_eq!(summary.export_sales, BigDecimal::from(2000));
        assert_eq!(summary.total_tax(), BigDecimal::from(1950));
    }

    #[test]
    fn test_outward_summary_is_order_independent() {
        let sales = vec![
            sale(10000, "18", 900, ""),
            sale(5000, "0", 0, ""),
            sale(2000, "12", 120, "SEZ Unit"),
        ];
        let forward = OutwardSummary::aggregate(sales.iter());
        let backward = OutwardSummary::aggregate(sales.iter().rev());
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_tax_liability_includes_cess() {
        let mut with_cess = sale(1000, "28", 140, "");
        with_cess.cess = BigDecimal::from(120);
        let sales = vec![with_cess, sale(2000, "18", 180, "")];

        let liability = TaxLiabilitySummary::aggregate(sales.iter());
        assert_eq!(liability.taxable_value, BigDecimal::from(3000));
        assert_eq!(liability.total_liability, BigDecimal::from(760));
        assert_eq!(liability.tax_paid, liability.total_liability);
    }
}
