//! Monthly return report and the multi-client portfolio summary

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::period::Month;
use crate::reconciliation::{reconcile_itc, ItcState, ItcSummary};
use crate::summary::{
    is_export_supply, DocumentSummary, HsnSummary, OutwardSummary, PurchaseTotals,
    SupplierSummary, TaxLiabilitySummary,
};
use crate::tax::liability::{net_gst, NetGst};
use crate::traits::TaxRecord;
use crate::types::*;

/// Header block of the report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BasicDetails {
    pub gstin: String,
    pub legal_name: String,
    pub trade_name: String,
    /// e.g. `April 2024`
    pub period: String,
}

/// Counts shown in the document section (GSTR-1 table 13)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentCounts {
    /// B2B invoices plus B2C entries
    pub invoices_issued: usize,
    pub credit_notes_issued: usize,
    pub debit_notes_issued: usize,
    pub invoices_received: usize,
}

/// Everything needed to file a client's returns for one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyReport {
    pub basic: BasicDetails,
    pub month: Month,
    pub b2b_sales: Vec<Sale>,
    pub b2c_sales: Vec<B2cSale>,
    /// Sales whose place of supply is an export or SEZ
    pub export_sales: Vec<Sale>,
    pub purchases: Vec<Purchase>,
    /// GSTR-3B table 3.1
    pub outward: OutwardSummary,
    pub hsn_outward: HsnSummary,
    pub hsn_inward: HsnSummary,
    pub itc_summary: ItcSummary,
    pub tax_summary: TaxLiabilitySummary,
    pub documents: DocumentSummary,
    pub document_counts: DocumentCounts,
    pub suppliers: SupplierSummary,
    pub itc: ItcState,
}

/// Build the report from records already loaded for `month`.
///
/// `sales` holds invoices of both transaction types. Every one of them counts
/// towards outward supplies and ITC output; `b2b_sales` lists the B2B ones.
pub fn build_monthly_report(
    client: &Client,
    month: Month,
    sales: &[Sale],
    b2c_sales: &[B2cSale],
    purchases: &[Purchase],
    old_setoff: &TaxComponents,
) -> MonthlyReport {
    let b2b_sales: Vec<Sale> = sales
        .iter()
        .filter(|s| s.transaction_type == TransactionType::B2b)
        .cloned()
        .collect();
    let export_sales: Vec<Sale> = sales
        .iter()
        .filter(|s| is_export_supply(s.place_of_supply()))
        .cloned()
        .collect();

    let outward_records: Vec<&dyn TaxRecord> = sales
        .iter()
        .map(|s| s as &dyn TaxRecord)
        .chain(b2c_sales.iter().map(|s| s as &dyn TaxRecord))
        .collect();

    let outward = OutwardSummary::aggregate(outward_records.iter().copied());
    let tax_summary = TaxLiabilitySummary::aggregate(outward_records.iter().copied());
    let documents = DocumentSummary::aggregate(outward_records.iter().copied());
    let hsn_outward = HsnSummary::aggregate(outward_records.iter().copied());
    let hsn_inward = HsnSummary::aggregate(purchases.iter());

    let document_counts = DocumentCounts {
        invoices_issued: sales.len() + b2c_sales.len(),
        credit_notes_issued: documents.count_of("Credit Note"),
        debit_notes_issued: documents.count_of("Debit Note"),
        invoices_received: purchases.len(),
    };

    let itc = reconcile_itc(purchases, sales, b2c_sales, old_setoff);

    MonthlyReport {
        basic: BasicDetails {
            gstin: client.gst_no.clone(),
            legal_name: client.client_name.clone(),
            trade_name: client.trade_name().to_string(),
            period: month.display_name(),
        },
        month,
        itc_summary: ItcSummary::from_purchases(purchases),
        suppliers: SupplierSummary::aggregate(purchases),
        purchases: purchases.to_vec(),
        b2c_sales: b2c_sales.to_vec(),
        b2b_sales,
        export_sales,
        outward,
        hsn_outward,
        hsn_inward,
        tax_summary,
        documents,
        document_counts,
        itc,
    }
}

impl MonthlyReport {
    /// Net GST of the month: outward tax against tax paid on purchases
    pub fn net_gst(&self) -> NetGst {
        let purchase_gst = PurchaseTotals::aggregate(&self.purchases).total_tax();
        net_gst(&self.outward.total_tax(), &purchase_gst)
    }
}

pub const PORTFOLIO_CSV_HEADERS: [&str; 6] = [
    "Client Name",
    "Business Name",
    "GST Number",
    "GST Payable",
    "GST Credit",
    "Net GST",
];

/// One client's line in the portfolio summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioRow {
    pub client_id: String,
    pub client_name: String,
    pub business_name: String,
    pub gst_no: String,
    pub gst: NetGst,
}

impl PortfolioRow {
    pub fn from_report(client: &Client, report: &MonthlyReport) -> Self {
        Self {
            client_id: client.id.clone(),
            client_name: client.client_name.clone(),
            business_name: client.business_name.clone(),
            gst_no: client.gst_no.clone(),
            gst: report.net_gst(),
        }
    }
}

/// Net GST position of every client for a month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub month: Month,
    pub rows: Vec<PortfolioRow>,
    pub total_gst_payable: BigDecimal,
    pub total_gst_credit: BigDecimal,
    pub net_gst: BigDecimal,
}

impl PortfolioSummary {
    pub fn new(month: Month, rows: Vec<PortfolioRow>) -> Self {
        let total_gst_payable = rows.iter().map(|r| &r.gst.gst_payable).sum();
        let total_gst_credit = rows.iter().map(|r| &r.gst.gst_credit).sum();
        let net_gst = rows.iter().map(|r| &r.gst.net_gst).sum();
        Self {
            month,
            rows,
            total_gst_payable,
            total_gst_credit,
            net_gst,
        }
    }

    pub fn total_clients(&self) -> usize {
        self.rows.len()
    }

    /// Write one line per client under [`PORTFOLIO_CSV_HEADERS`]
    pub fn write_csv<W: Write>(&self, writer: W) -> GstResult<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(PORTFOLIO_CSV_HEADERS)?;
        for row in &self.rows {
            csv_writer.write_record([
                row.client_name.clone(),
                row.business_name.clone(),
                row.gst_no.clone(),
                row.gst.gst_payable.round(2).with_scale(2).to_string(),
                row.gst.gst_credit.round(2).with_scale(2).to_string(),
                row.gst.net_gst.round(2).with_scale(2).to_string(),
            ])?;
        }
        csv_writer.flush().map_err(csv::Error::from)?;
        Ok(())
    }
}
