//! In-memory backend implementation for testing

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use uuid::Uuid;

use crate::period::Month;
use crate::traits::*;
use crate::types::*;

/// Records kept under one client
#[derive(Debug, Default)]
struct ClientBook {
    sales: Vec<Sale>,
    b2c_sales: Vec<B2cSale>,
    purchases: Vec<Purchase>,
    sundry_debtors: Vec<SundryDebtor>,
}

#[derive(Debug, Default)]
struct MemoryState {
    clients: Vec<Client>,
    books: HashMap<String, ClientBook>,
}

/// Records that carry a backend-assigned ID
trait Stored: Clone {
    const KIND: &'static str;
    fn id(&self) -> Option<&str>;
    fn assign(&mut self, id: String, timestamp: &str);
}

macro_rules! stored_record {
    ($ty:ty, $kind:expr, timestamps) => {
        impl Stored for $ty {
            const KIND: &'static str = $kind;
            fn id(&self) -> Option<&str> {
                self.id.as_deref()
            }
            fn assign(&mut self, id: String, timestamp: &str) {
                self.id = Some(id);
                if self.created_at.is_none() {
                    self.created_at = Some(timestamp.to_string());
                }
                self.updated_at = Some(timestamp.to_string());
            }
        }
    };
    ($ty:ty, $kind:expr) => {
        impl Stored for $ty {
            const KIND: &'static str = $kind;
            fn id(&self) -> Option<&str> {
                self.id.as_deref()
            }
            fn assign(&mut self, id: String, _timestamp: &str) {
                self.id = Some(id);
            }
        }
    };
}

stored_record!(Sale, "Sale", timestamps);
stored_record!(B2cSale, "B2C sale", timestamps);
stored_record!(Purchase, "Purchase", timestamps);
stored_record!(SundryDebtor, "Sundry debtor");

fn generate_id(prefix: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "{}_{}_{}",
        prefix,
        Utc::now().timestamp(),
        suffix[..8].to_uppercase()
    )
}

fn timestamp() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

fn lock_error<T>(_: PoisonError<T>) -> GstError {
    GstError::Storage("memory backend lock poisoned".to_string())
}

fn insert<T: Stored>(records: &mut Vec<T>, record: &T, prefix: &str) -> String {
    let id = generate_id(prefix);
    let mut stored = record.clone();
    stored.assign(id.clone(), &timestamp());
    records.push(stored);
    id
}

fn replace<T: Stored>(records: &mut [T], record_id: &str, record: &T) -> GstResult<()> {
    let slot = records
        .iter_mut()
        .find(|r| r.id() == Some(record_id))
        .ok_or_else(|| GstError::NotFound(format!("{} not found", T::KIND)))?;
    let mut updated = record.clone();
    updated.assign(record_id.to_string(), &timestamp());
    *slot = updated;
    Ok(())
}

fn remove<T: Stored>(records: &mut Vec<T>, record_id: &str) -> GstResult<()> {
    let before = records.len();
    records.retain(|r| r.id() != Some(record_id));
    if records.len() == before {
        return Err(GstError::NotFound(format!("{} not found", T::KIND)));
    }
    Ok(())
}

fn matches_month(record_month: &str, month: Option<&Month>) -> bool {
    month.map_or(true, |m| record_month == m.to_string())
}

/// In-memory backend for testing and development
///
/// Mirrors the REST backend's rules: required fields, ID format, default
/// filters and not-found errors. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryBackend {
    /// Create a new, empty memory backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) -> GstResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.clients.clear();
        state.books.clear();
        Ok(())
    }

    fn with_book<T>(
        &self,
        client_id: &str,
        f: impl FnOnce(&ClientBook) -> GstResult<T>,
    ) -> GstResult<T> {
        let state = self.state.read().map_err(lock_error)?;
        let book = state
            .books
            .get(client_id)
            .ok_or_else(|| GstError::NotFound("Client not found".to_string()))?;
        f(book)
    }

    fn with_book_mut<T>(
        &self,
        client_id: &str,
        f: impl FnOnce(&mut ClientBook) -> GstResult<T>,
    ) -> GstResult<T> {
        let mut state = self.state.write().map_err(lock_error)?;
        let book = state
            .books
            .get_mut(client_id)
            .ok_or_else(|| GstError::NotFound("Client not found".to_string()))?;
        f(book)
    }
}

fn check_new_client(client: &NewClient) -> GstResult<()> {
    require("clientName", &client.client_name)?;
    require("businessName", &client.business_name)?;
    require("indianFYear", &client.financial_year)?;
    require("gstNo", &client.gst_no)
}

fn non_empty<T>(records: &[T], what: &str) -> GstResult<()> {
    if records.is_empty() {
        return Err(GstError::Validation(format!("No {} provided", what)));
    }
    Ok(())
}

#[async_trait]
impl GstBackend for MemoryBackend {
    async fn health(&self) -> GstResult<()> {
        let _state = self.state.read().map_err(lock_error)?;
        Ok(())
    }

    async fn list_clients(&self) -> GstResult<Vec<Client>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.clients.iter().rev().cloned().collect())
    }

    async fn create_client(&mut self, client: &NewClient) -> GstResult<Client> {
        check_new_client(client)?;

        let now = timestamp();
        let mut created = client.clone().into_client(generate_id("CLI"));
        created.created_at = Some(now.clone());
        created.updated_at = Some(now);

        let mut state = self.state.write().map_err(lock_error)?;
        state.books.insert(created.id.clone(), ClientBook::default());
        state.clients.push(created.clone());
        Ok(created)
    }

    async fn update_client(&mut self, client_id: &str, client: &NewClient) -> GstResult<()> {
        check_new_client(client)?;

        let mut state = self.state.write().map_err(lock_error)?;
        let existing = state
            .clients
            .iter_mut()
            .find(|c| c.id == client_id)
            .ok_or_else(|| GstError::NotFound("Client not found".to_string()))?;

        let mut updated = client.clone().into_client(client_id.to_string());
        updated.created_at = existing.created_at.take();
        updated.updated_at = Some(timestamp());
        *existing = updated;
        Ok(())
    }

    async fn delete_client(&mut self, client_id: &str) -> GstResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let before = state.clients.len();
        state.clients.retain(|c| c.id != client_id);
        if state.clients.len() == before {
            return Err(GstError::NotFound("Client not found".to_string()));
        }
        state.books.remove(client_id);
        Ok(())
    }

    async fn list_sales(&self, client_id: &str, filter: &SaleFilter) -> GstResult<Vec<Sale>> {
        let transaction_type = filter.transaction_type.unwrap_or_default();
        self.with_book(client_id, |book| {
            Ok(book
                .sales
                .iter()
                .rev()
                .filter(|s| s.transaction_type == transaction_type)
                .filter(|s| matches_month(&s.month, filter.month.as_ref()))
                .cloned()
                .collect())
        })
    }

    async fn add_sale(&mut self, client_id: &str, sale: &Sale) -> GstResult<String> {
        require("customerName", &sale.customer_name)?;
        require("invoiceNumber", &sale.invoice_number)?;
        require("month", &sale.month)?;
        if sale.transaction_type == TransactionType::B2b {
            require("customerGSTIN", &sale.customer_gstin)?;
        }
        self.with_book_mut(client_id, |book| Ok(insert(&mut book.sales, sale, "SAL")))
    }

    async fn update_sale(&mut self, client_id: &str, sale_id: &str, sale: &Sale) -> GstResult<()> {
        self.with_book_mut(client_id, |book| replace(&mut book.sales, sale_id, sale))
    }

    async fn delete_sale(&mut self, client_id: &str, sale_id: &str) -> GstResult<()> {
        self.with_book_mut(client_id, |book| remove(&mut book.sales, sale_id))
    }

    async fn bulk_add_sales(&mut self, client_id: &str, sales: &[Sale]) -> GstResult<usize> {
        non_empty(sales, "sales")?;
        self.with_book_mut(client_id, |book| {
            for sale in sales {
                insert(&mut book.sales, sale, "SAL");
            }
            Ok(sales.len())
        })
    }

    async fn list_b2c_sales(&self, client_id: &str, month: Option<&Month>) -> GstResult<Vec<B2cSale>> {
        self.with_book(client_id, |book| {
            Ok(book
                .b2c_sales
                .iter()
                .rev()
                .filter(|s| matches_month(&s.month, month))
                .cloned()
                .collect())
        })
    }

    async fn add_b2c_sale(&mut self, client_id: &str, sale: &B2cSale) -> GstResult<String> {
        require("month", &sale.month)?;
        require("gstRate", &sale.gst_rate)?;
        if sale.taxable_value <= bigdecimal::BigDecimal::from(0) {
            return Err(GstError::Validation("taxableValue is required".to_string()));
        }
        self.with_book_mut(client_id, |book| Ok(insert(&mut book.b2c_sales, sale, "B2C")))
    }

    async fn update_b2c_sale(
        &mut self,
        client_id: &str,
        sale_id: &str,
        sale: &B2cSale,
    ) -> GstResult<()> {
        self.with_book_mut(client_id, |book| replace(&mut book.b2c_sales, sale_id, sale))
    }

    async fn delete_b2c_sale(&mut self, client_id: &str, sale_id: &str) -> GstResult<()> {
        self.with_book_mut(client_id, |book| remove(&mut book.b2c_sales, sale_id))
    }

    async fn bulk_add_b2c_sales(&mut self, client_id: &str, sales: &[B2cSale]) -> GstResult<usize> {
        non_empty(sales, "B2C sales")?;
        self.with_book_mut(client_id, |book| {
            for sale in sales {
                insert(&mut book.b2c_sales, sale, "B2C");
            }
            Ok(sales.len())
        })
    }

    async fn list_purchases(&self, client_id: &str, month: Option<&Month>) -> GstResult<Vec<Purchase>> {
        self.with_book(client_id, |book| {
            Ok(book
                .purchases
                .iter()
                .rev()
                .filter(|p| matches_month(&p.month, month))
                .cloned()
                .collect())
        })
    }

    async fn add_purchase(&mut self, client_id: &str, purchase: &Purchase) -> GstResult<String> {
        require("supplierGSTIN", &purchase.supplier_gstin)?;
        require("supplierName", &purchase.supplier_name)?;
        require("invoiceNumber", &purchase.invoice_number)?;
        require("month", &purchase.month)?;
        let stored = stored_purchase(purchase);
        self.with_book_mut(client_id, |book| Ok(insert(&mut book.purchases, &stored, "PUR")))
    }

    async fn update_purchase(
        &mut self,
        client_id: &str,
        purchase_id: &str,
        purchase: &Purchase,
    ) -> GstResult<()> {
        let stored = stored_purchase(purchase);
        self.with_book_mut(client_id, |book| {
            replace(&mut book.purchases, purchase_id, &stored)
        })
    }

    async fn delete_purchase(&mut self, client_id: &str, purchase_id: &str) -> GstResult<()> {
        self.with_book_mut(client_id, |book| remove(&mut book.purchases, purchase_id))
    }

    async fn bulk_add_purchases(&mut self, client_id: &str, purchases: &[Purchase]) -> GstResult<usize> {
        non_empty(purchases, "purchases")?;
        self.with_book_mut(client_id, |book| {
            for purchase in purchases {
                insert(&mut book.purchases, &stored_purchase(purchase), "PUR");
            }
            Ok(purchases.len())
        })
    }

    async fn list_sundry_debtors(&self, client_id: &str) -> GstResult<Vec<SundryDebtor>> {
        self.with_book(client_id, |book| Ok(book.sundry_debtors.clone()))
    }

    async fn add_sundry_debtor(&mut self, client_id: &str, debtor: &SundryDebtor) -> GstResult<String> {
        require("debtorName", &debtor.debtor_name)?;
        require("gstin", &debtor.gstin)?;
        self.with_book_mut(client_id, |book| {
            if book.sundry_debtors.iter().any(|d| d.gstin == debtor.gstin) {
                return Err(GstError::Validation(format!(
                    "A sundry debtor with GSTIN {} already exists",
                    debtor.gstin
                )));
            }
            Ok(insert(&mut book.sundry_debtors, debtor, "DEB"))
        })
    }

    async fn update_sundry_debtor(
        &mut self,
        client_id: &str,
        debtor_id: &str,
        debtor: &SundryDebtor,
    ) -> GstResult<()> {
        self.with_book_mut(client_id, |book| {
            let clash = book
                .sundry_debtors
                .iter()
                .any(|d| d.gstin == debtor.gstin && d.id.as_deref() != Some(debtor_id));
            if clash {
                return Err(GstError::Validation(format!(
                    "A sundry debtor with GSTIN {} already exists",
                    debtor.gstin
                )));
            }
            replace(&mut book.sundry_debtors, debtor_id, debtor)
        })
    }

    async fn delete_sundry_debtor(&mut self, client_id: &str, debtor_id: &str) -> GstResult<()> {
        self.with_book_mut(client_id, |book| remove(&mut book.sundry_debtors, debtor_id))
    }
}

/// The backend stores the calculated rate as the purchase's tax rate
fn stored_purchase(purchase: &Purchase) -> Purchase {
    let mut stored = purchase.clone();
    stored.tax_rate = purchase
        .calculated_tax_rate
        .clone()
        .unwrap_or_else(|| "0".to_string());
    if stored.itc_available.is_none() {
        stored.itc_available = Some("Yes".to_string());
    }
    stored
}
