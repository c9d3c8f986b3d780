//! Validation utilities

use bigdecimal::{BigDecimal, Signed};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::period::FinancialYear;
use crate::tax::gstin;
use crate::traits::*;
use crate::types::*;

static TEMPLATE_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}/\d{2}/\d{4}$").expect("date pattern is a valid regex"));

/// Validate that an amount is not negative
pub fn validate_non_negative(field: &str, amount: &BigDecimal) -> GstResult<()> {
    if amount.is_negative() {
        Err(GstError::Validation(format!("{} cannot be negative", field)))
    } else {
        Ok(())
    }
}

/// Invoice dates on the purchase template are written DD/MM/YYYY
pub fn validate_template_date(date: &str) -> GstResult<()> {
    if !TEMPLATE_DATE.is_match(date.trim()) {
        return Err(GstError::Validation(format!(
            "Invalid invoice date '{}', expected DD/MM/YYYY",
            date
        )));
    }
    Ok(())
}

/// Yes/No columns accept `Yes`, `No` or nothing
pub fn validate_yes_no(field: &str, value: &str) -> GstResult<()> {
    match value.trim() {
        "" | "Yes" | "No" => Ok(()),
        other => Err(GstError::Validation(format!(
            "{} must be Yes or No, got '{}'",
            field, other
        ))),
    }
}

/// Every problem the purchase template rules find in a purchase
pub fn purchase_template_errors(purchase: &Purchase) -> Vec<String> {
    let mut errors = Vec::new();
    let mut check = |result: GstResult<()>| {
        if let Err(GstError::Validation(message)) = result {
            errors.push(message);
        }
    };

    check(require("Supplier GSTIN", &purchase.supplier_gstin));
    if !purchase.supplier_gstin.trim().is_empty() {
        check(gstin::validate_gstin(&purchase.supplier_gstin));
    }
    check(require("Supplier name", &purchase.supplier_name));
    check(require("Invoice number", &purchase.invoice_number));
    check(require("Invoice date", &purchase.invoice_date));
    if !purchase.invoice_date.trim().is_empty() {
        check(validate_template_date(&purchase.invoice_date));
    }
    if purchase.invoice_value <= BigDecimal::from(0) {
        errors.push("Invoice value must be greater than zero".to_string());
    }

    for (field, amount) in [
        ("Taxable value", &purchase.taxable_value),
        ("Integrated tax", &purchase.integrated_tax),
        ("Central tax", &purchase.central_tax),
        ("State tax", &purchase.state_tax),
        ("Cess", &purchase.cess),
    ] {
        if let Err(GstError::Validation(message)) = validate_non_negative(field, amount) {
            errors.push(message);
        }
    }

    if let Err(GstError::Validation(message)) =
        validate_yes_no("Reverse charge", &purchase.reverse_charge)
    {
        errors.push(message);
    }
    if let Some(itc) = &purchase.itc_available {
        if let Err(GstError::Validation(message)) = validate_yes_no("ITC available", itc) {
            errors.push(message);
        }
    }

    errors
}

/// Stricter client validator that also checks the financial year label
pub struct StrictClientValidator;

impl ClientValidator for StrictClientValidator {
    fn validate_client(&self, client: &NewClient) -> GstResult<()> {
        DefaultClientValidator.validate_client(client)?;
        FinancialYear::parse_label(&client.financial_year).map_err(|_| {
            GstError::Validation(format!(
                "Financial year must look like 01/04/2024 - 31/03/2025, got '{}'",
                client.financial_year
            ))
        })?;
        Ok(())
    }
}

/// Entry validator applying the purchase template rules and GSTIN formats
pub struct StrictEntryValidator;

impl EntryValidator for StrictEntryValidator {
    fn validate_sale(&self, sale: &Sale) -> GstResult<()> {
        DefaultEntryValidator.validate_sale(sale)?;
        if sale.transaction_type == TransactionType::B2b {
            gstin::validate_gstin(&sale.customer_gstin)?;
        }
        validate_non_negative("Taxable value", &sale.taxable_value)?;
        Ok(())
    }

    fn validate_b2c_sale(&self, sale: &B2cSale) -> GstResult<()> {
        DefaultEntryValidator.validate_b2c_sale(sale)?;
        validate_non_negative("GST rate", &amount::parse(&sale.gst_rate))
    }

    fn validate_purchase(&self, purchase: &Purchase) -> GstResult<()> {
        let errors = purchase_template_errors(purchase);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(GstError::Validation(errors.join("; ")))
        }
    }

    fn validate_sundry_debtor(&self, debtor: &SundryDebtor) -> GstResult<()> {
        DefaultEntryValidator.validate_sundry_debtor(debtor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn purchase() -> Purchase {
        Purchase {
            supplier_gstin: "29ABCDE1234F1Z5".to_string(),
            supplier_name: "Alpha Supplies".to_string(),
            invoice_number: "P-100".to_string(),
            invoice_date: "15/04/2024".to_string(),
            invoice_value: BigDecimal::from(11800),
            taxable_value: BigDecimal::from(10000),
            central_tax: BigDecimal::from(900),
            state_tax: BigDecimal::from(900),
            reverse_charge: "No".to_string(),
            itc_available: Some("Yes".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_purchase_passes_template_rules() {
        assert!(purchase_template_errors(&purchase()).is_empty());
        assert!(StrictEntryValidator.validate_purchase(&purchase()).is_ok());
    }

    #[test]
    fn test_template_rules_collect_every_error() {
        let mut bad = purchase();
        bad.supplier_gstin = "29ABCDE1234F1Z".to_string();
        bad.invoice_date = "2024-04-15".to_string();
        bad.reverse_charge = "Y".to_string();
        bad.cess = BigDecimal::from(-1);

        let errors = purchase_template_errors(&bad);
        assert_eq!(errors.len(), 4);
        assert!(StrictEntryValidator.validate_purchase(&bad).is_err());
    }

    #[test]
    fn test_strict_client_validator_checks_financial_year() {
        let mut client = NewClient {
            client_name: "Ravi Kumar".to_string(),
            business_name: "Kumar Textiles".to_string(),
            financial_year: "01/04/2024 - 31/03/2025".to_string(),
            gst_no: "29ABCDE1234F1Z5".to_string(),
            ..Default::default()
        };
        assert!(StrictClientValidator.validate_client(&client).is_ok());

        client.financial_year = "2024".to_string();
        assert!(StrictClientValidator.validate_client(&client).is_err());
        assert!(DefaultClientValidator.validate_client(&client).is_ok());
    }

    #[test]
    fn test_strict_sale_checks_gstin_format() {
        let sale = Sale {
            customer_gstin: "NOT-A-GSTIN".to_string(),
            customer_name: "Acme".to_string(),
            invoice_number: "INV-1".to_string(),
            month: "2024-04".to_string(),
            ..Default::default()
        };
        assert!(DefaultEntryValidator.validate_sale(&sale).is_ok());
        assert!(StrictEntryValidator.validate_sale(&sale).is_err());
    }
}
