//! Sales, B2C sales, purchases and sundry debtors of a client

use bigdecimal::{BigDecimal, Zero};
use tracing::{debug, info, instrument};

use crate::period::Month;
use crate::tax::gst::{compute_tax, infer_tax_rate, GstCalculator};
use crate::tax::gstin;
use crate::traits::*;
use crate::types::*;

/// Entry manager for recording transactions against a client
pub struct EntryManager<B: GstBackend> {
    backend: B,
    validator: Box<dyn EntryValidator>,
}

impl<B: GstBackend> EntryManager<B> {
    /// Create a new entry manager
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            validator: Box::new(DefaultEntryValidator),
        }
    }

    /// Create a new entry manager with custom validator
    pub fn with_validator(backend: B, validator: Box<dyn EntryValidator>) -> Self {
        Self { backend, validator }
    }

    /// Record a B2B or B2C invoice and return it with its assigned ID
    #[instrument(skip(self, sale), fields(invoice = %sale.invoice_number))]
    pub async fn record_sale(&mut self, client_id: &str, mut sale: Sale) -> GstResult<Sale> {
        self.validator.validate_sale(&sale)?;
        let id = self.backend.add_sale(client_id, &sale).await?;
        debug!(sale_id = %id, "Recorded sale");
        sale.id = Some(id);
        Ok(sale)
    }

    /// Record a consolidated B2C entry
    #[instrument(skip(self, sale), fields(month = %sale.month))]
    pub async fn record_b2c_sale(&mut self, client_id: &str, mut sale: B2cSale) -> GstResult<B2cSale> {
        self.validator.validate_b2c_sale(&sale)?;
        let id = self.backend.add_b2c_sale(client_id, &sale).await?;
        debug!(sale_id = %id, "Recorded B2C sale");
        sale.id = Some(id);
        Ok(sale)
    }

    /// Record a purchase invoice.
    ///
    /// The implied tax rate is filled in when missing, and the month is taken
    /// from the invoice date when left blank.
    #[instrument(skip(self, purchase), fields(invoice = %purchase.invoice_number))]
    pub async fn record_purchase(
        &mut self,
        client_id: &str,
        mut purchase: Purchase,
    ) -> GstResult<Purchase> {
        prepare_purchase(&mut purchase)?;
        self.validator.validate_purchase(&purchase)?;
        let id = self.backend.add_purchase(client_id, &purchase).await?;
        debug!(purchase_id = %id, "Recorded purchase");
        purchase.id = Some(id);
        Ok(purchase)
    }

    /// Save a batch of sales; nothing is sent when any of them is invalid
    pub async fn record_sales(&mut self, client_id: &str, sales: &[Sale]) -> GstResult<usize> {
        for sale in sales {
            self.validator.validate_sale(sale).map_err(|e| in_invoice(&sale.invoice_number, e))?;
        }
        let count = self.backend.bulk_add_sales(client_id, sales).await?;
        info!(client_id, count, "Saved sales batch");
        Ok(count)
    }

    /// Save a batch of B2C entries
    pub async fn record_b2c_sales(&mut self, client_id: &str, sales: &[B2cSale]) -> GstResult<usize> {
        for sale in sales {
            self.validator.validate_b2c_sale(sale)?;
        }
        let count = self.backend.bulk_add_b2c_sales(client_id, sales).await?;
        info!(client_id, count, "Saved B2C sales batch");
        Ok(count)
    }

    /// Save a batch of purchases
    pub async fn record_purchases(
        &mut self,
        client_id: &str,
        mut purchases: Vec<Purchase>,
    ) -> GstResult<usize> {
        for purchase in purchases.iter_mut() {
            prepare_purchase(purchase).map_err(|e| in_invoice(&purchase.invoice_number, e))?;
            self.validator
                .validate_purchase(purchase)
                .map_err(|e| in_invoice(&purchase.invoice_number, e))?;
        }
        let count = self.backend.bulk_add_purchases(client_id, &purchases).await?;
        info!(client_id, count, "Saved purchases batch");
        Ok(count)
    }

    pub async fn list_sales(&self, client_id: &str, filter: &SaleFilter) -> GstResult<Vec<Sale>> {
        self.backend.list_sales(client_id, filter).await
    }

    pub async fn list_b2c_sales(&self, client_id: &str, month: Option<&Month>) -> GstResult<Vec<B2cSale>> {
        self.backend.list_b2c_sales(client_id, month).await
    }

    pub async fn list_purchases(&self, client_id: &str, month: Option<&Month>) -> GstResult<Vec<Purchase>> {
        self.backend.list_purchases(client_id, month).await
    }

    pub async fn update_sale(&mut self, client_id: &str, sale_id: &str, sale: &Sale) -> GstResult<()> {
        self.validator.validate_sale(sale)?;
        self.backend.update_sale(client_id, sale_id, sale).await
    }

    pub async fn update_b2c_sale(
        &mut self,
        client_id: &str,
        sale_id: &str,
        sale: &B2cSale,
    ) -> GstResult<()> {
        self.validator.validate_b2c_sale(sale)?;
        self.backend.update_b2c_sale(client_id, sale_id, sale).await
    }

    pub async fn update_purchase(
        &mut self,
        client_id: &str,
        purchase_id: &str,
        purchase: &Purchase,
    ) -> GstResult<()> {
        let mut purchase = purchase.clone();
        prepare_purchase(&mut purchase)?;
        self.validator.validate_purchase(&purchase)?;
        self.backend
            .update_purchase(client_id, purchase_id, &purchase)
            .await
    }

    pub async fn delete_sale(&mut self, client_id: &str, sale_id: &str) -> GstResult<()> {
        self.backend.delete_sale(client_id, sale_id).await
    }

    pub async fn delete_b2c_sale(&mut self, client_id: &str, sale_id: &str) -> GstResult<()> {
        self.backend.delete_b2c_sale(client_id, sale_id).await
    }

    pub async fn delete_purchase(&mut self, client_id: &str, purchase_id: &str) -> GstResult<()> {
        self.backend.delete_purchase(client_id, purchase_id).await
    }

    /// Register a sundry debtor
    pub async fn add_sundry_debtor(
        &mut self,
        client_id: &str,
        mut debtor: SundryDebtor,
    ) -> GstResult<SundryDebtor> {
        self.validator.validate_sundry_debtor(&debtor)?;
        let id = self.backend.add_sundry_debtor(client_id, &debtor).await?;
        debtor.id = Some(id);
        Ok(debtor)
    }

    pub async fn list_sundry_debtors(&self, client_id: &str) -> GstResult<Vec<SundryDebtor>> {
        self.backend.list_sundry_debtors(client_id).await
    }

    pub async fn update_sundry_debtor(
        &mut self,
        client_id: &str,
        debtor_id: &str,
        debtor: &SundryDebtor,
    ) -> GstResult<()> {
        self.validator.validate_sundry_debtor(debtor)?;
        self.backend
            .update_sundry_debtor(client_id, debtor_id, debtor)
            .await
    }

    pub async fn delete_sundry_debtor(&mut self, client_id: &str, debtor_id: &str) -> GstResult<()> {
        self.backend.delete_sundry_debtor(client_id, debtor_id).await
    }
}

fn in_invoice(invoice_number: &str, error: GstError) -> GstError {
    match error {
        GstError::Validation(message) => {
            GstError::Validation(format!("Invoice '{}': {}", invoice_number, message))
        }
        other => other,
    }
}

fn prepare_purchase(purchase: &mut Purchase) -> GstResult<()> {
    if purchase.calculated_tax_rate.is_none() {
        purchase.calculated_tax_rate = Some(infer_tax_rate(
            &purchase.taxable_value,
            &purchase.central_tax,
            &purchase.state_tax,
            &purchase.integrated_tax,
        ));
    }

    if purchase.month.trim().is_empty() {
        let month = Month::from_invoice_date(&purchase.invoice_date).ok_or_else(|| {
            GstError::Validation(format!(
                "Month is required when the invoice date '{}' cannot be read",
                purchase.invoice_date
            ))
        })?;
        purchase.month = month.to_string();
    }
    Ok(())
}

/// Builder for sale invoices; taxes are computed on [`SaleBuilder::build`]
#[derive(Debug)]
pub struct SaleBuilder {
    sale: Sale,
    month: Option<Month>,
    tax_rate: BigDecimal,
}

impl SaleBuilder {
    /// Create a new B2B sale builder
    pub fn new(
        customer_gstin: impl Into<String>,
        customer_name: impl Into<String>,
        invoice_number: impl Into<String>,
        invoice_date: impl Into<String>,
    ) -> Self {
        Self {
            sale: Sale {
                customer_gstin: customer_gstin.into(),
                customer_name: customer_name.into(),
                invoice_number: invoice_number.into(),
                invoice_date: invoice_date.into(),
                invoice_type: Some("Regular".to_string()),
                reverse_charge: "No".to_string(),
                status: Some("active".to_string()),
                ..Default::default()
            },
            month: None,
            tax_rate: BigDecimal::zero(),
        }
    }

    /// Return month; defaults to the month of the invoice date
    pub fn month(mut self, month: Month) -> Self {
        self.month = Some(month);
        self
    }

    pub fn place_of_supply(mut self, place_of_supply: impl Into<String>) -> Self {
        self.sale.place_of_supply = place_of_supply.into();
        self
    }

    pub fn taxable_value(mut self, taxable_value: BigDecimal) -> Self {
        self.sale.taxable_value = taxable_value;
        self
    }

    /// GST rate in percent
    pub fn tax_rate(mut self, rate: BigDecimal) -> Self {
        self.tax_rate = rate;
        self
    }

    pub fn cess(mut self, cess: BigDecimal) -> Self {
        self.sale.cess = cess;
        self
    }

    /// HSN code, quantity and unit of the goods sold
    pub fn hsn(mut self, hsn_code: impl Into<String>, quantity: BigDecimal, unit: impl Into<String>) -> Self {
        self.sale.hsn_code = Some(hsn_code.into());
        self.sale.quantity = Some(quantity);
        self.sale.unit = Some(unit.into());
        self
    }

    pub fn unit_price(mut self, unit_price: BigDecimal) -> Self {
        self.sale.unit_price = Some(unit_price);
        self
    }

    /// Document type, e.g. `Credit Note`
    pub fn invoice_type(mut self, invoice_type: impl Into<String>) -> Self {
        self.sale.invoice_type = Some(invoice_type.into());
        self
    }

    pub fn reverse_charge(mut self, reverse_charge: bool) -> Self {
        self.sale.reverse_charge = if reverse_charge { "Yes" } else { "No" }.to_string();
        self
    }

    pub fn ecommerce_gstin(mut self, gstin: impl Into<String>) -> Self {
        self.sale.ecommerce_gstin = Some(gstin.into());
        self
    }

    pub fn transaction_type(mut self, transaction_type: TransactionType) -> Self {
        self.sale.transaction_type = transaction_type;
        self
    }

    /// Compute the taxes for the calculator's home state and build the sale.
    ///
    /// An empty place of supply means the supplier's own state. The unit price
    /// is derived from the taxable value when only a quantity was given.
    pub fn build(mut self, calculator: &GstCalculator) -> GstResult<Sale> {
        if self.sale.place_of_supply.trim().is_empty() {
            self.sale.place_of_supply = gstin::place_of_supply_label(calculator.home_state_code())
                .unwrap_or_else(|| calculator.home_state_code().to_string());
        }

        let month = match self.month {
            Some(month) => month,
            None => Month::from_invoice_date(&self.sale.invoice_date).ok_or_else(|| {
                GstError::Validation(format!(
                    "Month is required when the invoice date '{}' cannot be read",
                    self.sale.invoice_date
                ))
            })?,
        };

        let tax = calculator
            .calculate(
                &self.sale.taxable_value,
                &self.tax_rate,
                &self.sale.place_of_supply,
                Some(&self.sale.cess),
            )
            .rounded();

        let mut sale = self.sale;
        if sale.unit_price.is_none() {
            if let Some(quantity) = sale.quantity.as_ref().filter(|q| !q.is_zero()) {
                sale.unit_price = Some((&tax.taxable_value / quantity).round(2));
            }
        }

        sale.month = month.to_string();
        sale.tax_rate = self.tax_rate.normalized().to_string();
        sale.taxable_value = tax.taxable_value;
        sale.central_tax = tax.cgst;
        sale.state_tax = tax.sgst;
        sale.integrated_tax = tax.igst;
        sale.cess = tax.cess;
        sale.invoice_value = tax.invoice_value;

        DefaultEntryValidator.validate_sale(&sale)?;
        Ok(sale)
    }
}

/// Details of a consolidated B2C entry before tax is computed
#[derive(Debug, Clone, PartialEq)]
pub struct B2cSaleInput {
    pub month: Month,
    /// Defaults to the supplier's own state
    pub place_of_supply: Option<String>,
    pub gst_rate: BigDecimal,
    pub taxable_value: BigDecimal,
    pub hsn_code: Option<String>,
    pub quantity: Option<BigDecimal>,
    pub unit_price: Option<BigDecimal>,
}

impl B2cSaleInput {
    pub fn new(month: Month, gst_rate: BigDecimal, taxable_value: BigDecimal) -> Self {
        Self {
            month,
            place_of_supply: None,
            gst_rate,
            taxable_value,
            hsn_code: None,
            quantity: None,
            unit_price: None,
        }
    }

    /// Compute the taxes and produce the stored record
    pub fn into_sale(self, calculator: &GstCalculator) -> B2cSale {
        let is_inter_state = self
            .place_of_supply
            .as_deref()
            .is_some_and(|pos| calculator.is_inter_state(pos));
        let tax = compute_tax(&self.taxable_value, &self.gst_rate, is_inter_state, None).rounded();

        B2cSale {
            id: None,
            month: self.month.to_string(),
            supply_type: SupplyType::from_inter_state(is_inter_state),
            place_of_supply: self
                .place_of_supply
                .or_else(|| gstin::place_of_supply_label(calculator.home_state_code())),
            gst_rate: self.gst_rate.normalized().to_string(),
            taxable_value: tax.taxable_value,
            central_tax: tax.cgst,
            state_tax: tax.sgst,
            integrated_tax: tax.igst,
            invoice_value: tax.invoice_value,
            hsn_code: self.hsn_code,
            quantity: self.quantity,
            unit_price: self.unit_price,
            status: Some("active".to_string()),
            created_at: None,
            updated_at: None,
        }
    }
}

/// Common entry patterns
pub mod patterns {
    use super::*;
    use chrono::Utc;

    pub const HSN_SUMMARY_GSTIN: &str = "HSN-SUMMARY";
    pub const HSN_SUMMARY_CUSTOMER: &str = "HSN Summary Entry";

    /// Sale line that only feeds the HSN summary of a month.
    ///
    /// Billed within the supplier's own state; the unit price is the taxable
    /// value per unit.
    pub fn hsn_summary_sale(
        calculator: &GstCalculator,
        month: Month,
        hsn_code: &str,
        unit: &str,
        quantity: BigDecimal,
        taxable_value: BigDecimal,
        tax_rate: BigDecimal,
    ) -> GstResult<Sale> {
        let now = Utc::now();
        SaleBuilder::new(
            HSN_SUMMARY_GSTIN,
            HSN_SUMMARY_CUSTOMER,
            format!("HSN-{}", now.timestamp_millis()),
            now.format("%Y-%m-%d").to_string(),
        )
        .month(month)
        .hsn(hsn_code, quantity, unit)
        .taxable_value(taxable_value)
        .tax_rate(tax_rate)
        .build(calculator)
    }

    /// Intra-state B2C entry at one rate
    pub fn b2c_sale(
        calculator: &GstCalculator,
        month: Month,
        taxable_value: BigDecimal,
        gst_rate: BigDecimal,
    ) -> B2cSale {
        B2cSaleInput::new(month, gst_rate, taxable_value).into_sale(calculator)
    }

    /// Credit note against a B2B invoice
    pub fn credit_note(
        calculator: &GstCalculator,
        customer_gstin: &str,
        customer_name: &str,
        note_number: &str,
        note_date: &str,
        taxable_value: BigDecimal,
        tax_rate: BigDecimal,
    ) -> GstResult<Sale> {
        let place_of_supply = gstin::state_code(customer_gstin)
            .and_then(gstin::place_of_supply_label)
            .unwrap_or_default();

        SaleBuilder::new(customer_gstin, customer_name, note_number, note_date)
            .invoice_type("Credit Note")
            .place_of_supply(place_of_supply)
            .taxable_value(taxable_value)
            .tax_rate(tax_rate)
            .build(calculator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::MemoryBackend;
    use std::str::FromStr;

    fn april() -> Month {
        Month::new(2024, 4).unwrap()
    }

    async fn backend_with_client() -> (MemoryBackend, String) {
        let mut backend = MemoryBackend::new();
        let client = backend
            .create_client(&NewClient {
                client_name: "Ravi Kumar".to_string(),
                business_name: "Kumar Textiles".to_string(),
                financial_year: "01/04/2024 - 31/03/2025".to_string(),
                gst_no: "29ABCDE1234F1Z5".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        (backend, client.id)
    }

    #[test]
    fn test_sale_builder_intra_state() {
        let calculator = GstCalculator::new("29");
        let sale = SaleBuilder::new("29AAACB1234C1Z2", "Local Buyer", "INV-1", "05/04/2024")
            .taxable_value(BigDecimal::from(45000))
            .tax_rate(BigDecimal::from(12))
            .build(&calculator)
            .unwrap();

        assert_eq!(sale.place_of_supply, "29-Karnataka");
        assert_eq!(sale.month, "2024-04");
        assert_eq!(sale.tax_rate, "12");
        assert_eq!(sale.central_tax, BigDecimal::from(2700));
        assert_eq!(sale.state_tax, BigDecimal::from(2700));
        assert_eq!(sale.integrated_tax, BigDecimal::from(0));
        assert_eq!(sale.invoice_value, BigDecimal::from(50400));
    }

    #[test]
    fn test_sale_builder_inter_state_with_hsn() {
        let calculator = GstCalculator::new("29");
        let sale = SaleBuilder::new("27AAPFU0939F1ZV", "Acme Pune", "INV-2", "not a date")
            .month(april())
            .place_of_supply("27-Maharashtra")
            .hsn("5208", BigDecimal::from(4), "MTR")
            .taxable_value(BigDecimal::from(1000))
            .tax_rate(BigDecimal::from(5))
            .build(&calculator)
            .unwrap();

        assert_eq!(sale.integrated_tax, BigDecimal::from(50));
        assert_eq!(sale.central_tax, BigDecimal::from(0));
        assert_eq!(sale.unit_price, Some(BigDecimal::from(250)));
        assert_eq!(sale.unit.as_deref(), Some("MTR"));
    }

    #[test]
    fn test_sale_builder_needs_a_month() {
        let calculator = GstCalculator::new("29");
        let result = SaleBuilder::new("29AAACB1234C1Z2", "Local Buyer", "INV-3", "someday")
            .taxable_value(BigDecimal::from(100))
            .build(&calculator);
        assert!(matches!(result, Err(GstError::Validation(_))));
    }

    #[test]
    fn test_rounded_sale_adds_up_to_invoice_value() {
        let calculator = GstCalculator::new("29");
        let sale = SaleBuilder::new("29AAACB1234C1Z2", "Local Buyer", "INV-4", "05/04/2024")
            .taxable_value(BigDecimal::from(105))
            .tax_rate(BigDecimal::from(5))
            .build(&calculator)
            .unwrap();

        assert_eq!(sale.central_tax, sale.state_tax);
        assert_eq!(
            sale.invoice_value,
            &sale.taxable_value + &sale.central_tax + &sale.state_tax + &sale.integrated_tax + &sale.cess
        );

        let b2c = B2cSaleInput::new(april(), BigDecimal::from(5), BigDecimal::from(105)).into_sale(&calculator);
        assert_eq!(b2c.central_tax, b2c.state_tax);
        assert_eq!(
            b2c.invoice_value,
            &b2c.taxable_value + &b2c.central_tax + &b2c.state_tax + &b2c.integrated_tax
        );
    }

    #[test]
    fn test_b2c_input_inter_state() {
        let calculator = GstCalculator::new("29");
        let mut input = B2cSaleInput::new(april(), BigDecimal::from(18), BigDecimal::from(1000));
        input.place_of_supply = Some("33-Tamil Nadu".to_string());

        let sale = input.into_sale(&calculator);
        assert_eq!(sale.supply_type, SupplyType::Inter);
        assert_eq!(sale.integrated_tax, BigDecimal::from(180));
        assert_eq!(sale.invoice_value, BigDecimal::from(1180));

        let local = patterns::b2c_sale(
            &calculator,
            april(),
            BigDecimal::from(1000),
            BigDecimal::from_str("18.0").unwrap(),
        );
        assert_eq!(local.supply_type, SupplyType::Intra);
        assert_eq!(local.gst_rate, "18");
        assert_eq!(local.place_of_supply.as_deref(), Some("29-Karnataka"));
        assert_eq!(local.central_tax, BigDecimal::from(90));
    }

    #[test]
    fn test_hsn_summary_sale() {
        let calculator = GstCalculator::new("27");
        let sale = patterns::hsn_summary_sale(
            &calculator,
            april(),
            "6109",
            "NOS",
            BigDecimal::from(10),
            BigDecimal::from(5000),
            BigDecimal::from(12),
        )
        .unwrap();

        assert_eq!(sale.customer_gstin, patterns::HSN_SUMMARY_GSTIN);
        assert!(sale.invoice_number.starts_with("HSN-"));
        assert_eq!(sale.month, "2024-04");
        assert_eq!(sale.central_tax, BigDecimal::from(300));
        assert_eq!(sale.unit_price, Some(BigDecimal::from(500)));
    }

    #[test]
    fn test_credit_note_uses_customer_state() {
        let calculator = GstCalculator::new("29");
        let note = patterns::credit_note(
            &calculator,
            "27AAPFU0939F1ZV",
            "Acme Pune",
            "CN-1",
            "20/04/2024",
            BigDecimal::from(1000),
            BigDecimal::from(18),
        )
        .unwrap();

        assert_eq!(note.invoice_type.as_deref(), Some("Credit Note"));
        assert_eq!(note.place_of_supply, "27-Maharashtra");
        assert_eq!(note.integrated_tax, BigDecimal::from(180));
    }

    #[tokio::test]
    async fn test_record_purchase_fills_rate_and_month() {
        let (backend, client_id) = backend_with_client().await;
        let mut entries = EntryManager::new(backend.clone());

        let purchase = Purchase {
            supplier_gstin: "27AAPFU0939F1ZV".to_string(),
            supplier_name: "Beta Traders".to_string(),
            invoice_number: "P-1".to_string(),
            invoice_date: "12/04/2024".to_string(),
            taxable_value: BigDecimal::from(10000),
            integrated_tax: BigDecimal::from(1800),
            ..Default::default()
        };
        let recorded = entries.record_purchase(&client_id, purchase).await.unwrap();

        assert!(recorded.id.is_some());
        assert_eq!(recorded.month, "2024-04");
        assert_eq!(recorded.calculated_tax_rate.as_deref(), Some("18"));

        let stored = entries.list_purchases(&client_id, Some(&april())).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].tax_rate, "18");
    }

    #[tokio::test]
    async fn test_invalid_batch_is_not_sent() {
        let (backend, client_id) = backend_with_client().await;
        let mut entries = EntryManager::new(backend);

        let good = Sale {
            customer_gstin: "27AAPFU0939F1ZV".to_string(),
            customer_name: "Acme".to_string(),
            invoice_number: "INV-1".to_string(),
            month: "2024-04".to_string(),
            ..Default::default()
        };
        let mut bad = good.clone();
        bad.invoice_number = "INV-2".to_string();
        bad.customer_name.clear();

        let result = entries.record_sales(&client_id, &[good.clone(), bad]).await;
        match result {
            Err(GstError::Validation(message)) => assert!(message.contains("INV-2")),
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(entries
            .list_sales(&client_id, &SaleFilter::default())
            .await
            .unwrap()
            .is_empty());

        assert_eq!(entries.record_sales(&client_id, &[good]).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_sundry_debtor_lifecycle() {
        let (backend, client_id) = backend_with_client().await;
        let mut entries = EntryManager::new(backend);

        let debtor = entries
            .add_sundry_debtor(
                &client_id,
                SundryDebtor {
                    debtor_name: "Acme".to_string(),
                    gstin: "27AAPFU0939F1ZV".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let debtor_id = debtor.id.clone().unwrap();

        let mut renamed = debtor.clone();
        renamed.debtor_name = "Acme Industries".to_string();
        entries
            .update_sundry_debtor(&client_id, &debtor_id, &renamed)
            .await
            .unwrap();
        assert_eq!(
            entries.list_sundry_debtors(&client_id).await.unwrap()[0].debtor_name,
            "Acme Industries"
        );

        entries.delete_sundry_debtor(&client_id, &debtor_id).await.unwrap();
        assert!(entries.list_sundry_debtors(&client_id).await.unwrap().is_empty());
    }
}
