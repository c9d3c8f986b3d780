//! GSTR-1 B2B invoice upload

use bigdecimal::BigDecimal;
use std::io::Read;
use tracing::{info, warn};

use super::{line_of, Columns, ImportOutcome, SkippedRow};
use crate::period::Month;
use crate::summary::document::DEFAULT_DOCUMENT_TYPE;
use crate::tax::gst::TaxBreakdown;
use crate::tax::gstin;
use crate::types::{amount, GstError, GstResult, Sale, TransactionType};

pub const B2B_TEMPLATE_HEADERS: [&str; 13] = [
    "GSTIN/UIN of Recipient",
    "Receiver Name",
    "Invoice Number",
    "Invoice date",
    "Invoice Value",
    "Place Of Supply",
    "Reverse Charge",
    "Applicable % of Tax Rate",
    "Invoice Type",
    "E-Commerce GSTIN",
    "Rate",
    "Taxable Value",
    "Cess Amount",
];

pub fn b2b_template() -> String {
    B2B_TEMPLATE_HEADERS.join(",")
}

/// Header names are matched on lowercase letters and digits only
fn header_key(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn or_default(value: &str, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

/// Parse a GSTR-1 B2B upload into sales for `month`.
///
/// Taxes are derived from the invoice value: total tax is invoice minus
/// taxable value minus cess, charged as IGST when the place of supply is
/// outside `home_state_code` and split into CGST and SGST otherwise.
/// Amounts are rounded to paise and the invoice value is rebuilt from the
/// rounded parts. A blank invoice type becomes `"Regular"`, the document type
/// the summaries group untyped invoices under, rather than the portal's
/// `"Regular B2B"` label. Rows with fewer cells than the header, or without a
/// receiver name or invoice number, are skipped.
pub fn parse_b2b_csv<R: Read>(
    reader: R,
    home_state_code: &str,
    month: &Month,
) -> GstResult<ImportOutcome<Sale>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let columns = Columns::new(csv_reader.headers()?, header_key);

    for required in ["receivername", "invoicenumber", "invoicevalue", "taxablevalue"] {
        if !columns.has(required) {
            return Err(GstError::Validation(format!(
                "CSV header is missing the '{}' column",
                required
            )));
        }
    }

    let mut outcome = ImportOutcome::default();

    for (index, result) in csv_reader.records().enumerate() {
        let record = result?;
        let line = line_of(&record, index as u64 + 2);

        if record.len() < columns.width() {
            let reason = format!(
                "expected {} columns, found {}",
                columns.width(),
                record.len()
            );
            warn!(line, "Skipping B2B row: {}", reason);
            outcome.skipped.push(SkippedRow { line, reason });
            continue;
        }

        let customer_name = columns.get(&record, "receivername");
        let invoice_number = columns.get(&record, "invoicenumber");
        if customer_name.is_empty() || invoice_number.is_empty() {
            let reason = "receiver name and invoice number are required".to_string();
            warn!(line, "Skipping B2B row: {}", reason);
            outcome.skipped.push(SkippedRow { line, reason });
            continue;
        }

        let invoice_value = amount::parse(columns.get(&record, "invoicevalue"));
        let taxable_value = amount::parse(columns.get(&record, "taxablevalue"));
        let cess = amount::parse(columns.get(&record, "cessamount"));
        let place_of_supply = columns.get(&record, "placeofsupply");
        let is_inter_state = gstin::is_inter_state(home_state_code, place_of_supply);

        let tax =
            TaxBreakdown::from_invoice_value(&invoice_value, &taxable_value, &cess, is_inter_state)
                .rounded();
        let ecommerce_gstin = columns.get(&record, "ecommercegstin");

        outcome.records.push(Sale {
            customer_gstin: columns.get(&record, "gstinuinofrecipient").to_string(),
            customer_name: customer_name.to_string(),
            invoice_number: invoice_number.to_string(),
            invoice_type: Some(or_default(columns.get(&record, "invoicetype"), DEFAULT_DOCUMENT_TYPE)),
            invoice_date: columns.get(&record, "invoicedate").to_string(),
            invoice_value: tax.invoice_value,
            place_of_supply: place_of_supply.to_string(),
            reverse_charge: or_default(columns.get(&record, "reversecharge"), "N"),
            taxable_value: tax.taxable_value,
            integrated_tax: tax.igst,
            central_tax: tax.cgst,
            state_tax: tax.sgst,
            cess: tax.cess,
            tax_rate: columns.get(&record, "rate").trim_end_matches('%').to_string(),
            month: month.to_string(),
            transaction_type: TransactionType::B2b,
            ecommerce_gstin: (!ecommerce_gstin.is_empty()).then(|| ecommerce_gstin.to_string()),
            status: Some("imported".to_string()),
            ..Default::default()
        });
    }

    if outcome.is_empty() {
        return Err(GstError::Validation(
            "No valid B2B rows found in the CSV file".to_string(),
        ));
    }

    let taxable: BigDecimal = outcome.records.iter().map(|s| &s.taxable_value).sum();
    info!(
        imported = outcome.records.len(),
        skipped = outcome.skipped.len(),
        taxable = %taxable,
        "Parsed GSTR-1 B2B CSV"
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SAMPLE: &str = "\
GSTIN/UIN of Recipient,Receiver Name,Invoice Number,Invoice date,Invoice Value,Place Of Supply,Reverse Charge,Applicable % of Tax Rate,Invoice Type,E-Commerce GSTIN,Rate,Taxable Value,Cess Amount
27AAPFU0939F1ZV,Acme Pune,INV-1,05-Apr-2024,11800,27-Maharashtra,N,,Regular B2B,,18,10000,0
29AAACB1234C1Z2,Local Buyer,INV-2,06-Apr-2024,10500,29-Karnataka,,,,,5,10000,0
29AAACB1234C1Z2,,INV-3,06-Apr-2024,100,29-Karnataka,N,,Regular,,0,100,0
29AAACB1234C1Z2,Short,INV-4
";

    #[test]
    fn test_parse_b2b_csv() {
        let april = Month::new(2024, 4).unwrap();
        let outcome = parse_b2b_csv(Cursor::new(SAMPLE), "29", &april).unwrap();

        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.skipped.len(), 2);

        let inter = &outcome.records[0];
        assert_eq!(inter.integrated_tax, BigDecimal::from(1800));
        assert_eq!(inter.central_tax, BigDecimal::from(0));
        assert_eq!(inter.invoice_type.as_deref(), Some("Regular B2B"));
        assert_eq!(inter.month, "2024-04");

        let intra = &outcome.records[1];
        assert_eq!(intra.central_tax, BigDecimal::from(250));
        assert_eq!(intra.state_tax, BigDecimal::from(250));
        assert_eq!(intra.integrated_tax, BigDecimal::from(0));
        assert_eq!(intra.invoice_type.as_deref(), Some("Regular"));
        assert_eq!(intra.reverse_charge, "N");
        assert_eq!(intra.ecommerce_gstin, None);
    }

    #[test]
    fn test_header_only_upload_is_rejected() {
        let april = Month::new(2024, 4).unwrap();
        let text = format!("{}\n", b2b_template());
        assert!(matches!(
            parse_b2b_csv(Cursor::new(text), "29", &april),
            Err(GstError::Validation(_))
        ));
    }
}
