//! Return preparation orchestrator that coordinates clients, entries and reports

use std::io::Read;

use tracing::{error, info, instrument};

use crate::import::{parse_b2b_csv, parse_purchase_csv, ImportOutcome, SkippedRow};
use crate::period::Month;
use crate::reconciliation::{reconcile_itc, ItcState, SetoffRegister};
use crate::returns::report::{build_monthly_report, MonthlyReport, PortfolioRow, PortfolioSummary};
use crate::returns::{B2cSaleInput, ClientManager, EntryManager};
use crate::tax::gst::GstCalculator;
use crate::traits::*;
use crate::types::*;

/// Rows saved by a CSV import and the rows left out
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSummary {
    pub saved: usize,
    pub skipped: Vec<SkippedRow>,
}

impl<T> From<(usize, ImportOutcome<T>)> for ImportSummary {
    fn from((saved, outcome): (usize, ImportOutcome<T>)) -> Self {
        Self {
            saved,
            skipped: outcome.skipped,
        }
    }
}

/// Main entry point for preparing a client's monthly returns
///
/// Every operation names the client and the month it works on; nothing is
/// remembered between calls except the old-setoff register.
pub struct GstReturns<B: GstBackend> {
    clients: ClientManager<B>,
    entries: EntryManager<B>,
    setoffs: SetoffRegister,
}

impl<B: GstBackend + Clone> GstReturns<B> {
    /// Create a new orchestrator over the given backend
    pub fn new(backend: B) -> Self {
        Self {
            clients: ClientManager::new(backend.clone()),
            entries: EntryManager::new(backend),
            setoffs: SetoffRegister::new(),
        }
    }

    /// Create a new orchestrator with custom validators
    pub fn with_validators(
        backend: B,
        client_validator: Box<dyn ClientValidator>,
        entry_validator: Box<dyn EntryValidator>,
    ) -> Self {
        Self {
            clients: ClientManager::with_validator(backend.clone(), client_validator),
            entries: EntryManager::with_validator(backend, entry_validator),
            setoffs: SetoffRegister::new(),
        }
    }

    /// Restore a previously saved old-setoff register
    pub fn with_setoffs(mut self, setoffs: SetoffRegister) -> Self {
        self.setoffs = setoffs;
        self
    }

    pub fn setoffs(&self) -> &SetoffRegister {
        &self.setoffs
    }

    /// Check that the backend answers
    pub async fn health(&self) -> GstResult<()> {
        self.clients.backend.health().await
    }

    // Client operations
    /// Register a new client
    pub async fn create_client(&mut self, client: NewClient) -> GstResult<Client> {
        self.clients.create_client(client).await
    }

    /// Get a client by ID
    pub async fn get_client(&self, client_id: &str) -> GstResult<Option<Client>> {
        self.clients.get_client(client_id).await
    }

    /// Get a client by ID, returning an error if not found
    pub async fn get_client_required(&self, client_id: &str) -> GstResult<Client> {
        self.clients.get_client_required(client_id).await
    }

    /// List all clients
    pub async fn list_clients(&self) -> GstResult<Vec<Client>> {
        self.clients.list_clients().await
    }

    /// Replace a client's details
    pub async fn update_client(&mut self, client_id: &str, client: &NewClient) -> GstResult<()> {
        self.clients.update_client(client_id, client).await
    }

    /// Delete a client, its records and its old setoff
    pub async fn delete_client(&mut self, client_id: &str) -> GstResult<()> {
        self.clients.delete_client(client_id).await?;
        self.setoffs.remove_client(client_id);
        Ok(())
    }

    // Entry operations
    /// Record a sale built with [`crate::returns::SaleBuilder`] or loaded from elsewhere
    pub async fn record_sale(&mut self, client_id: &str, sale: Sale) -> GstResult<Sale> {
        self.entries.record_sale(client_id, sale).await
    }

    /// Compute the taxes of a B2C entry for the client's state and record it
    pub async fn record_b2c_sale(&mut self, client: &Client, input: B2cSaleInput) -> GstResult<B2cSale> {
        let sale = input.into_sale(&GstCalculator::for_client(client));
        self.entries.record_b2c_sale(&client.id, sale).await
    }

    /// Record a purchase; the implied tax rate is filled in
    pub async fn record_purchase(&mut self, client_id: &str, purchase: Purchase) -> GstResult<Purchase> {
        self.entries.record_purchase(client_id, purchase).await
    }

    pub async fn list_sales(&self, client_id: &str, filter: &SaleFilter) -> GstResult<Vec<Sale>> {
        self.entries.list_sales(client_id, filter).await
    }

    pub async fn list_b2c_sales(&self, client_id: &str, month: Option<&Month>) -> GstResult<Vec<B2cSale>> {
        self.entries.list_b2c_sales(client_id, month).await
    }

    pub async fn list_purchases(&self, client_id: &str, month: Option<&Month>) -> GstResult<Vec<Purchase>> {
        self.entries.list_purchases(client_id, month).await
    }

    pub async fn update_sale(&mut self, client_id: &str, sale_id: &str, sale: &Sale) -> GstResult<()> {
        self.entries.update_sale(client_id, sale_id, sale).await
    }

    pub async fn update_b2c_sale(&mut self, client_id: &str, sale_id: &str, sale: &B2cSale) -> GstResult<()> {
        self.entries.update_b2c_sale(client_id, sale_id, sale).await
    }

    pub async fn update_purchase(
        &mut self,
        client_id: &str,
        purchase_id: &str,
        purchase: &Purchase,
    ) -> GstResult<()> {
        self.entries
            .update_purchase(client_id, purchase_id, purchase)
            .await
    }

    pub async fn delete_sale(&mut self, client_id: &str, sale_id: &str) -> GstResult<()> {
        self.entries.delete_sale(client_id, sale_id).await
    }

    pub async fn delete_b2c_sale(&mut self, client_id: &str, sale_id: &str) -> GstResult<()> {
        self.entries.delete_b2c_sale(client_id, sale_id).await
    }

    pub async fn delete_purchase(&mut self, client_id: &str, purchase_id: &str) -> GstResult<()> {
        self.entries.delete_purchase(client_id, purchase_id).await
    }

    // Sundry debtors
    pub async fn add_sundry_debtor(&mut self, client_id: &str, debtor: SundryDebtor) -> GstResult<SundryDebtor> {
        self.entries.add_sundry_debtor(client_id, debtor).await
    }

    pub async fn list_sundry_debtors(&self, client_id: &str) -> GstResult<Vec<SundryDebtor>> {
        self.entries.list_sundry_debtors(client_id).await
    }

    pub async fn update_sundry_debtor(
        &mut self,
        client_id: &str,
        debtor_id: &str,
        debtor: &SundryDebtor,
    ) -> GstResult<()> {
        self.entries
            .update_sundry_debtor(client_id, debtor_id, debtor)
            .await
    }

    pub async fn delete_sundry_debtor(&mut self, client_id: &str, debtor_id: &str) -> GstResult<()> {
        self.entries.delete_sundry_debtor(client_id, debtor_id).await
    }

    // CSV imports
    /// Import a purchase register CSV for a client.
    ///
    /// Rows without an invoice date that can be read are filed under
    /// `fallback_month`.
    #[instrument(skip(self, reader))]
    pub async fn import_purchases<R: Read>(
        &mut self,
        client_id: &str,
        reader: R,
        fallback_month: Month,
    ) -> GstResult<ImportSummary> {
        let outcome = parse_purchase_csv(reader, &fallback_month)?;
        let saved = self
            .entries
            .record_purchases(client_id, outcome.records.clone())
            .await?;
        info!(saved, skipped = outcome.skipped.len(), "Imported purchases");
        Ok((saved, outcome).into())
    }

    /// Import a GSTR-1 B2B CSV for a client; every row is filed under `month`
    #[instrument(skip(self, client, reader), fields(client_id = %client.id))]
    pub async fn import_b2b_sales<R: Read>(
        &mut self,
        client: &Client,
        reader: R,
        month: Month,
    ) -> GstResult<ImportSummary> {
        let outcome = parse_b2b_csv(reader, client.home_state_code(), &month)?;
        let saved = self.entries.record_sales(&client.id, &outcome.records).await?;
        info!(saved, skipped = outcome.skipped.len(), "Imported B2B sales");
        Ok((saved, outcome).into())
    }

    // Old setoff and ITC
    /// Add an operator-entered carry-forward credit and return the month's total
    pub fn add_old_setoff(&mut self, client_id: &str, month: Month, entry: &TaxComponents) -> TaxComponents {
        self.setoffs.add(client_id, month, entry)
    }

    pub fn old_setoff(&self, client_id: &str, month: &Month) -> TaxComponents {
        self.setoffs.get(client_id, month)
    }

    /// ITC position of a client for a month
    #[instrument(skip(self))]
    pub async fn itc_state(&self, client_id: &str, month: Month) -> GstResult<ItcState> {
        let (sales, b2c_sales, purchases) = self.load_month(client_id, &month).await?;
        Ok(reconcile_itc(
            &purchases,
            &sales,
            &b2c_sales,
            &self.setoffs.get(client_id, &month),
        ))
    }

    // Reporting operations
    /// Build the monthly report of a client
    #[instrument(skip(self, client), fields(client_id = %client.id))]
    pub async fn monthly_report(&self, client: &Client, month: Month) -> GstResult<MonthlyReport> {
        let (sales, b2c_sales, purchases) = self.load_month(&client.id, &month).await?;
        Ok(build_monthly_report(
            client,
            month,
            &sales,
            &b2c_sales,
            &purchases,
            &self.setoffs.get(&client.id, &month),
        ))
    }

    /// Net GST of every client for a month
    pub async fn portfolio_summary(&self, month: Month) -> GstResult<PortfolioSummary> {
        let clients = self.list_clients().await?;
        let mut rows = Vec::with_capacity(clients.len());
        for client in &clients {
            let report = self.monthly_report(client, month).await?;
            rows.push(PortfolioRow::from_report(client, &report));
        }
        info!(clients = rows.len(), month = %month, "Built portfolio summary");
        Ok(PortfolioSummary::new(month, rows))
    }

    async fn load_month(
        &self,
        client_id: &str,
        month: &Month,
    ) -> GstResult<(Vec<Sale>, Vec<B2cSale>, Vec<Purchase>)> {
        let loaded = async {
            let mut sales = Vec::new();
            for transaction_type in [TransactionType::B2b, TransactionType::B2c] {
                let filter = SaleFilter::for_month_of_type(*month, transaction_type);
                sales.extend(self.entries.list_sales(client_id, &filter).await?);
            }
            let b2c_sales = self.entries.list_b2c_sales(client_id, Some(month)).await?;
            let purchases = self.entries.list_purchases(client_id, Some(month)).await?;
            Ok::<_, GstError>((sales, b2c_sales, purchases))
        }
        .await;

        if let Err(ref e) = loaded {
            error!(client_id, month = %month, "Failed to load month: {}", e);
        }
        loaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::MemoryBackend;
    use bigdecimal::BigDecimal;

    fn new_client() -> NewClient {
        NewClient {
            client_name: "Ravi Kumar".to_string(),
            business_name: "Kumar Textiles".to_string(),
            financial_year: "01/04/2024 - 31/03/2025".to_string(),
            gst_no: "29ABCDE1234F1Z5".to_string(),
            ..Default::default()
        }
    }

    fn april() -> Month {
        Month::new(2024, 4).unwrap()
    }

    #[tokio::test]
    async fn test_old_setoff_feeds_itc_state() {
        let mut returns = GstReturns::new(MemoryBackend::new());
        let client = returns.create_client(new_client()).await.unwrap();

        returns
            .record_b2c_sale(
                &client,
                B2cSaleInput::new(april(), BigDecimal::from(18), BigDecimal::from(1000)),
            )
            .await
            .unwrap();

        let setoff = TaxComponents::new(BigDecimal::from(50), BigDecimal::from(50), BigDecimal::from(0));
        returns.add_old_setoff(&client.id, april(), &setoff);
        let total = returns.add_old_setoff(&client.id, april(), &setoff);
        assert_eq!(total.cgst, BigDecimal::from(100));

        let state = returns.itc_state(&client.id, april()).await.unwrap();
        assert_eq!(state.output.cgst, BigDecimal::from(90));
        assert_eq!(state.balance.cgst, BigDecimal::from(10));
        assert_eq!(state.balance.igst, BigDecimal::from(0));

        let may = Month::new(2024, 5).unwrap();
        assert_eq!(returns.old_setoff(&client.id, &may), TaxComponents::default());
    }

    #[tokio::test]
    async fn test_b2c_typed_sale_counts_as_output() {
        let mut returns = GstReturns::new(MemoryBackend::new());
        let client = returns.create_client(new_client()).await.unwrap();
        let calculator = GstCalculator::for_client(&client);

        let sale = crate::returns::SaleBuilder::new("", "Walk-in", "CS-1", "10/04/2024")
            .taxable_value(BigDecimal::from(1000))
            .tax_rate(BigDecimal::from(18))
            .transaction_type(TransactionType::B2c)
            .build(&calculator)
            .unwrap();
        assert_eq!(sale.central_tax, BigDecimal::from(90));
        returns.record_sale(&client.id, sale).await.unwrap();

        let state = returns.itc_state(&client.id, april()).await.unwrap();
        assert_eq!(state.output.cgst, BigDecimal::from(90));
        assert_eq!(state.output.sgst, BigDecimal::from(90));

        let report = returns.monthly_report(&client, april()).await.unwrap();
        assert_eq!(report.outward.total_invoices, 1);
        assert_eq!(report.outward.b2c_sales, BigDecimal::from(1000));
        assert_eq!(report.document_counts.invoices_issued, 1);
        assert!(report.b2b_sales.is_empty());
    }

    #[tokio::test]
    async fn test_delete_client_drops_setoff() {
        let mut returns = GstReturns::new(MemoryBackend::new());
        let client = returns.create_client(new_client()).await.unwrap();
        let setoff = TaxComponents::new(BigDecimal::from(10), BigDecimal::from(0), BigDecimal::from(0));
        returns.add_old_setoff(&client.id, april(), &setoff);

        returns.delete_client(&client.id).await.unwrap();
        assert_eq!(returns.old_setoff(&client.id, &april()), TaxComponents::default());
        assert!(matches!(
            returns.itc_state(&client.id, april()).await,
            Err(GstError::NotFound(_))
        ));
    }
}
