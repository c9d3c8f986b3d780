//! Purchase register CSV template

use bigdecimal::BigDecimal;
use std::io::{Read, Write};
use tracing::{info, warn};

use super::{line_of, Columns, ImportOutcome, SkippedRow};
use crate::period::Month;
use crate::tax::gst::infer_tax_rate;
use crate::types::{amount, GstError, GstResult, Purchase};

pub const PURCHASE_TEMPLATE_HEADERS: [&str; 15] = [
    "Supplier GSTIN",
    "Supplier Name",
    "Invoice Number",
    "Invoice Type",
    "Invoice Date",
    "Invoice Value",
    "Place of Supply",
    "Reverse Charge",
    "Taxable Value",
    "Integrated Tax",
    "Central Tax",
    "State Tax",
    "Cess",
    "ITC Available",
    "Tax Rate",
];

/// Header line of the purchase template
pub fn purchase_template() -> String {
    PURCHASE_TEMPLATE_HEADERS.join(",")
}

fn header_key(name: &str) -> String {
    name.trim().trim_matches('"').trim().to_lowercase()
}

fn optional(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Parse a purchase register export.
///
/// Rows whose column count differs from the header, or that lack the supplier
/// GSTIN, supplier name or invoice number, are skipped. The return month comes
/// from the invoice date when it parses, otherwise `fallback_month`.
pub fn parse_purchase_csv<R: Read>(
    reader: R,
    fallback_month: &Month,
) -> GstResult<ImportOutcome<Purchase>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let columns = Columns::new(csv_reader.headers()?, header_key);

    for required in ["supplier gstin", "supplier name", "invoice number"] {
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

        if record.len() != columns.width() {
            let reason = format!(
                "expected {} columns, found {}",
                columns.width(),
                record.len()
            );
            warn!(line, "Skipping purchase row: {}", reason);
            outcome.skipped.push(SkippedRow { line, reason });
            continue;
        }

        let supplier_gstin = columns.get(&record, "supplier gstin");
        let supplier_name = columns.get(&record, "supplier name");
        let invoice_number = columns.get(&record, "invoice number");
        if supplier_gstin.is_empty() || supplier_name.is_empty() || invoice_number.is_empty() {
            let reason = "supplier GSTIN, supplier name and invoice number are required".to_string();
            warn!(line, "Skipping purchase row: {}", reason);
            outcome.skipped.push(SkippedRow { line, reason });
            continue;
        }

        let amount_of = |name: &str| amount::parse(columns.get(&record, name));
        let taxable_value = amount_of("taxable value");
        let integrated_tax = amount_of("integrated tax");
        let central_tax = amount_of("central tax");
        let state_tax = amount_of("state tax");
        let invoice_date = columns.get(&record, "invoice date").to_string();
        let month = Month::from_invoice_date(&invoice_date).unwrap_or(*fallback_month);

        outcome.records.push(Purchase {
            supplier_gstin: supplier_gstin.to_string(),
            supplier_name: supplier_name.to_string(),
            invoice_number: invoice_number.to_string(),
            invoice_type: optional(columns.get(&record, "invoice type")),
            invoice_value: amount_of("invoice value"),
            place_of_supply: columns.get(&record, "place of supply").to_string(),
            reverse_charge: columns.get(&record, "reverse charge").to_string(),
            cess: amount_of("cess"),
            itc_available: optional(columns.get(&record, "itc available")),
            tax_rate: columns
                .get(&record, "tax rate")
                .trim_end_matches('%')
                .trim()
                .to_string(),
            calculated_tax_rate: Some(infer_tax_rate(
                &taxable_value,
                &central_tax,
                &state_tax,
                &integrated_tax,
            )),
            month: month.to_string(),
            status: Some("imported".to_string()),
            invoice_date,
            taxable_value,
            integrated_tax,
            central_tax,
            state_tax,
            ..Default::default()
        });
    }

    if outcome.is_empty() {
        return Err(GstError::Validation(
            "No valid purchase rows found in the CSV file".to_string(),
        ));
    }

    info!(
        imported = outcome.records.len(),
        skipped = outcome.skipped.len(),
        "Parsed purchase CSV"
    );
    Ok(outcome)
}

fn format_amount(value: &BigDecimal) -> String {
    value.round(2).with_scale(2).to_string()
}

/// Write purchases in the template layout
pub fn write_purchase_csv<W: Write>(writer: W, purchases: &[Purchase]) -> GstResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(PURCHASE_TEMPLATE_HEADERS)?;

    for purchase in purchases {
        let row = [
            purchase.supplier_gstin.clone(),
            purchase.supplier_name.clone(),
            purchase.invoice_number.clone(),
            purchase.invoice_type.clone().unwrap_or_default(),
            purchase.invoice_date.clone(),
            format_amount(&purchase.invoice_value),
            purchase.place_of_supply.clone(),
            purchase.reverse_charge.clone(),
            format_amount(&purchase.taxable_value),
            format_amount(&purchase.integrated_tax),
            format_amount(&purchase.central_tax),
            format_amount(&purchase.state_tax),
            format_amount(&purchase.cess),
            purchase.itc_available.clone().unwrap_or_default(),
            purchase.tax_rate.clone(),
        ];
        csv_writer.write_record(&row)?;
    }

    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SAMPLE: &str = "\
Supplier GSTIN,Supplier Name,Invoice Number,Invoice Type,Invoice Date,Invoice Value,Place of Supply,Reverse Charge,Taxable Value,Integrated Tax,Central Tax,State Tax,Cess,ITC Available,Tax Rate
29ABCDE1234F1Z5,Alpha Supplies,P-100,Regular,15/04/2024,11800,29-Karnataka,No,10000,0,900,900,0,Yes,18%
27AAPFU0939F1ZV,\"Beta Traders, Pune\",P-101,Regular,2024-05-02,10500,27-Maharashtra,No,10000,500,0,0,0,Yes,5
,Missing Gstin,P-102,Regular,15/04/2024,100,,No,100,0,0,0,0,Yes,0
29ABCDE1234F1Z5,Short Row,P-103
29ABCDE1234F1Z5,Alpha Supplies,P-104,Regular,someday,1150,29-Karnataka,No,1000,0,75,75,0,No,15
";

    fn april() -> Month {
        Month::new(2024, 4).unwrap()
    }

    #[test]
    fn test_template_header() {
        assert_eq!(
            purchase_template(),
            "Supplier GSTIN,Supplier Name,Invoice Number,Invoice Type,Invoice Date,Invoice Value,Place of Supply,Reverse Charge,Taxable Value,Integrated Tax,Central Tax,State Tax,Cess,ITC Available,Tax Rate"
        );
    }

    #[test]
    fn test_parse_purchase_csv() {
        let fallback = Month::new(2024, 6).unwrap();
        let outcome = parse_purchase_csv(Cursor::new(SAMPLE), &fallback).unwrap();

        assert_eq!(outcome.records.len(), 3);
        assert_eq!(outcome.skipped.len(), 2);
        assert_eq!(outcome.skipped[0].line, 4);
        assert_eq!(outcome.skipped[1].line, 5);

        let first = &outcome.records[0];
        assert_eq!(first.month, "2024-04");
        assert_eq!(first.tax_rate, "18");
        assert_eq!(first.calculated_tax_rate.as_deref(), Some("18"));
        assert_eq!(first.central_tax, BigDecimal::from(900));
        assert_eq!(first.status.as_deref(), Some("imported"));

        let second = &outcome.records[1];
        assert_eq!(second.supplier_name, "Beta Traders, Pune");
        assert_eq!(second.month, "2024-05");
        assert_eq!(second.calculated_tax_rate.as_deref(), Some("5"));

        let third = &outcome.records[2];
        assert_eq!(third.month, "2024-06");
        assert_eq!(third.calculated_tax_rate.as_deref(), Some("15.00"));
        assert_eq!(third.itc_available.as_deref(), Some("No"));
    }

    #[test]
    fn test_rejects_file_without_usable_rows() {
        let header_only = format!("{}\n", purchase_template());
        assert!(matches!(
            parse_purchase_csv(Cursor::new(header_only), &april()),
            Err(GstError::Validation(_))
        ));
        assert!(matches!(
            parse_purchase_csv(Cursor::new("Name,Amount\nA,1\n"), &april()),
            Err(GstError::Validation(_))
        ));
    }

    #[test]
    fn test_export_reimports() {
        let outcome = parse_purchase_csv(Cursor::new(SAMPLE), &april()).unwrap();

        let mut buffer = Vec::new();
        write_purchase_csv(&mut buffer, &outcome.records).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert!(text.starts_with(&purchase_template()));
        assert!(text.contains("\"Beta Traders, Pune\""));
        assert!(text.contains("10000.00"));

        let again = parse_purchase_csv(Cursor::new(text), &april()).unwrap();
        assert_eq!(again.records.len(), 3);
        assert!(again.skipped.is_empty());
    }
}
