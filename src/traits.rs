//! Traits for backend abstraction, tax records and validation

use async_trait::async_trait;
use bigdecimal::BigDecimal;

use crate::period::Month;
use crate::tax::gstin;
use crate::types::*;

/// Read access to the tax columns shared by sales, B2C sales and purchases.
///
/// Aggregators are written against this trait so the same fold works for
/// outward and inward supplies.
pub trait TaxRecord {
    fn taxable_value(&self) -> BigDecimal;
    fn central_tax(&self) -> BigDecimal;
    fn state_tax(&self) -> BigDecimal;
    fn integrated_tax(&self) -> BigDecimal;
    fn cess(&self) -> BigDecimal;
    fn invoice_value(&self) -> BigDecimal;

    /// Rate as entered, e.g. `"18"`
    fn rate_label(&self) -> &str;

    /// Numeric rate; unparsable labels count as 0
    fn tax_rate(&self) -> BigDecimal {
        amount::parse(self.rate_label())
    }

    fn hsn_code(&self) -> Option<&str>;
    fn quantity(&self) -> BigDecimal;
    fn unit(&self) -> Option<&str>;
    fn invoice_type(&self) -> Option<&str>;
    fn transaction_type(&self) -> TransactionType;
    fn place_of_supply(&self) -> Option<&str>;

    /// CGST / SGST / IGST of this record
    fn taxes(&self) -> TaxComponents {
        TaxComponents::new(self.central_tax(), self.state_tax(), self.integrated_tax())
    }
}

/// Persistence abstraction for the returns backend
///
/// Each method maps to one REST call. Identifiers are assigned by the backend
/// and returned from the create calls.
#[async_trait]
pub trait GstBackend: Send + Sync {
    /// Check that the backend is reachable
    async fn health(&self) -> GstResult<()>;

    /// List all clients
    async fn list_clients(&self) -> GstResult<Vec<Client>>;

    /// Create a client and return it with its assigned ID
    async fn create_client(&mut self, client: &NewClient) -> GstResult<Client>;

    /// Replace a client's details
    async fn update_client(&mut self, client_id: &str, client: &NewClient) -> GstResult<()>;

    /// Delete a client and everything recorded under it
    async fn delete_client(&mut self, client_id: &str) -> GstResult<()>;

    /// List sales, optionally filtered by month and transaction type
    async fn list_sales(&self, client_id: &str, filter: &SaleFilter) -> GstResult<Vec<Sale>>;

    /// Save a sale and return its ID
    async fn add_sale(&mut self, client_id: &str, sale: &Sale) -> GstResult<String>;

    async fn update_sale(&mut self, client_id: &str, sale_id: &str, sale: &Sale) -> GstResult<()>;

    async fn delete_sale(&mut self, client_id: &str, sale_id: &str) -> GstResult<()>;

    /// Save many sales in one call and return how many were stored
    async fn bulk_add_sales(&mut self, client_id: &str, sales: &[Sale]) -> GstResult<usize>;

    /// List B2C sales, optionally for one month
    async fn list_b2c_sales(&self, client_id: &str, month: Option<&Month>) -> GstResult<Vec<B2cSale>>;

    async fn add_b2c_sale(&mut self, client_id: &str, sale: &B2cSale) -> GstResult<String>;

    async fn update_b2c_sale(
        &mut self,
        client_id: &str,
        sale_id: &str,
        sale: &B2cSale,
    ) -> GstResult<()>;

    async fn delete_b2c_sale(&mut self, client_id: &str, sale_id: &str) -> GstResult<()>;

    async fn bulk_add_b2c_sales(&mut self, client_id: &str, sales: &[B2cSale]) -> GstResult<usize>;

    /// List purchases, optionally for one month
    async fn list_purchases(&self, client_id: &str, month: Option<&Month>) -> GstResult<Vec<Purchase>>;

    async fn add_purchase(&mut self, client_id: &str, purchase: &Purchase) -> GstResult<String>;

    async fn update_purchase(
        &mut self,
        client_id: &str,
        purchase_id: &str,
        purchase: &Purchase,
    ) -> GstResult<()>;

    async fn delete_purchase(&mut self, client_id: &str, purchase_id: &str) -> GstResult<()>;

    async fn bulk_add_purchases(&mut self, client_id: &str, purchases: &[Purchase]) -> GstResult<usize>;

    /// List the client's sundry debtors
    async fn list_sundry_debtors(&self, client_id: &str) -> GstResult<Vec<SundryDebtor>>;

    async fn add_sundry_debtor(&mut self, client_id: &str, debtor: &SundryDebtor) -> GstResult<String>;

    async fn update_sundry_debtor(
        &mut self,
        client_id: &str,
        debtor_id: &str,
        debtor: &SundryDebtor,
    ) -> GstResult<()>;

    async fn delete_sundry_debtor(&mut self, client_id: &str, debtor_id: &str) -> GstResult<()>;
}

/// Trait for implementing custom client validation rules
pub trait ClientValidator: Send + Sync {
    /// Validate client details before they are sent to the backend
    fn validate_client(&self, client: &NewClient) -> GstResult<()>;
}

/// Trait for implementing custom entry validation rules
pub trait EntryValidator: Send + Sync {
    fn validate_sale(&self, sale: &Sale) -> GstResult<()>;
    fn validate_b2c_sale(&self, sale: &B2cSale) -> GstResult<()>;
    fn validate_purchase(&self, purchase: &Purchase) -> GstResult<()>;
    fn validate_sundry_debtor(&self, debtor: &SundryDebtor) -> GstResult<()>;
}

pub(crate) fn require(field: &str, value: &str) -> GstResult<()> {
    if value.trim().is_empty() {
        return Err(GstError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

/// Default client validator: required fields and GSTIN format
pub struct DefaultClientValidator;

impl ClientValidator for DefaultClientValidator {
    fn validate_client(&self, client: &NewClient) -> GstResult<()> {
        require("Client name", &client.client_name)?;
        require("Business name", &client.business_name)?;
        require("Financial year", &client.financial_year)?;
        gstin::validate_gstin(&client.gst_no)
    }
}

/// Default entry validator with the fields the backend refuses to store without
pub struct DefaultEntryValidator;

impl EntryValidator for DefaultEntryValidator {
    fn validate_sale(&self, sale: &Sale) -> GstResult<()> {
        require("Customer name", &sale.customer_name)?;
        require("Invoice number", &sale.invoice_number)?;
        require("Month", &sale.month)?;
        if sale.transaction_type == TransactionType::B2b {
            require("Customer GSTIN", &sale.customer_gstin)?;
        }
        Ok(())
    }

    fn validate_b2c_sale(&self, sale: &B2cSale) -> GstResult<()> {
        require("Month", &sale.month)?;
        require("GST rate", &sale.gst_rate)?;
        if sale.taxable_value <= BigDecimal::from(0) {
            return Err(GstError::Validation(
                "Taxable value must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_purchase(&self, purchase: &Purchase) -> GstResult<()> {
        require("Supplier GSTIN", &purchase.supplier_gstin)?;
        require("Supplier name", &purchase.supplier_name)?;
        require("Invoice number", &purchase.invoice_number)?;
        Ok(())
    }

    fn validate_sundry_debtor(&self, debtor: &SundryDebtor) -> GstResult<()> {
        require("Debtor name", &debtor.debtor_name)?;
        gstin::validate_gstin(&debtor.gstin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> NewClient {
        NewClient {
            client_name: "Ravi Kumar".to_string(),
            business_name: "Kumar Textiles".to_string(),
            financial_year: "01/04/2024 - 31/03/2025".to_string(),
            gst_no: "29ABCDE1234F1Z5".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_client_validator() {
        let validator = DefaultClientValidator;
        assert!(validator.validate_client(&client()).is_ok());

        let mut missing_name = client();
        missing_name.business_name = "  ".to_string();
        assert!(matches!(
            validator.validate_client(&missing_name),
            Err(GstError::Validation(_))
        ));

        let mut bad_gstin = client();
        bad_gstin.gst_no = "29abcde1234f1z5".to_string();
        assert!(validator.validate_client(&bad_gstin).is_err());
    }

    #[test]
    fn test_b2b_sale_requires_gstin() {
        let validator = DefaultEntryValidator;
        let mut sale = Sale {
            customer_name: "Acme".to_string(),
            invoice_number: "INV-1".to_string(),
            month: "2024-04".to_string(),
            ..Default::default()
        };
        assert!(validator.validate_sale(&sale).is_err());

        sale.customer_gstin = "27AAPFU0939F1ZV".to_string();
        assert!(validator.validate_sale(&sale).is_ok());

        sale.customer_gstin.clear();
        sale.transaction_type = TransactionType::B2c;
        assert!(validator.validate_sale(&sale).is_ok());
    }

    #[test]
    fn test_b2c_sale_requires_taxable_value() {
        let validator = DefaultEntryValidator;
        let mut sale = B2cSale {
            month: "2024-04".to_string(),
            gst_rate: "18".to_string(),
            ..Default::default()
        };
        assert!(validator.validate_b2c_sale(&sale).is_err());
        sale.taxable_value = BigDecimal::from(1000);
        assert!(validator.validate_b2c_sale(&sale).is_ok());
    }

    #[test]
    fn test_tax_record_rate_parsing() {
        let sale = B2cSale {
            gst_rate: "12%".to_string(),
            ..Default::default()
        };
        assert_eq!(sale.tax_rate(), BigDecimal::from(12));
        assert_eq!(sale.transaction_type(), TransactionType::B2c);
        assert_eq!(sale.cess(), BigDecimal::from(0));
    }
}
