//! Core types and data structures for GST return preparation

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::period::Month;
use crate::traits::TaxRecord;

/// Lenient amount (de)serialization for backend records.
///
/// The backend and the CSV templates hand amounts over as JSON numbers, numeric
/// strings, empty strings or `null`. Anything that does not parse becomes zero.
pub mod amount {
    use bigdecimal::BigDecimal;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::str::FromStr;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
        Flag(bool),
    }

    fn from_raw(raw: Raw) -> BigDecimal {
        match raw {
            Raw::Number(value) => parse(&value.to_string()),
            Raw::Text(text) => parse(&text),
            Raw::Flag(_) => BigDecimal::from(0),
        }
    }

    /// Parse a user-entered amount or percentage, falling back to zero
    pub fn parse(text: &str) -> BigDecimal {
        let cleaned: String = text
            .trim()
            .trim_end_matches('%')
            .chars()
            .filter(|c| !c.is_whitespace() && *c != ',' && *c != '₹')
            .collect();
        BigDecimal::from_str(&cleaned).unwrap_or_else(|_| BigDecimal::from(0))
    }

    /// Written as a JSON number rounded to `scale` decimals. The float is
    /// parsed from the decimal text so it prints back as the same digits.
    fn serialize_scaled<S: Serializer>(
        value: &BigDecimal,
        scale: i64,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let text = value.round(scale).to_plain_string();
        serializer.serialize_f64(f64::from_str(&text).unwrap_or(0.0))
    }

    /// Amounts go on the wire in paise precision
    pub fn serialize<S: Serializer>(value: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_scaled(value, 2, serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigDecimal, D::Error> {
        Ok(Option::<Raw>::deserialize(deserializer)?
            .map(from_raw)
            .unwrap_or_else(|| BigDecimal::from(0)))
    }

    /// Optional amounts (quantity, unit price): blank and `null` stay `None`
    pub mod option {
        use super::*;

        pub fn serialize<S: Serializer>(
            value: &Option<BigDecimal>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(amount) => serialize_scaled(amount, 3, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<BigDecimal>, D::Error> {
            Ok(match Option::<Raw>::deserialize(deserializer)? {
                None => None,
                Some(Raw::Text(text)) if text.trim().is_empty() => None,
                Some(raw) => Some(from_raw(raw)),
            })
        }
    }

    /// Rate labels such as `"18"`, `"18%"` or `18` kept as entered text
    pub mod label {
        use super::*;

        pub fn serialize<S: Serializer>(value: &str, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(value)
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
            Ok(match Option::<Raw>::deserialize(deserializer)? {
                None | Some(Raw::Flag(_)) => String::new(),
                Some(Raw::Number(value)) => value.to_string(),
                Some(Raw::Text(text)) => text,
            })
        }
    }
}

/// GST registration type of a client
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GstType {
    /// Regular taxpayer filing GSTR-1 and GSTR-3B
    #[default]
    Regular,
    /// Composition scheme taxpayer paying a flat rate on turnover
    Composition,
}

/// How often a client files returns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReturnFrequency {
    #[default]
    Monthly,
    Quarterly,
}

/// Sales category used by the backend's `transactionType` column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    #[default]
    #[serde(rename = "B2B")]
    B2b,
    #[serde(rename = "B2C")]
    B2c,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::B2b => "B2B",
            TransactionType::B2c => "B2C",
        }
    }
}

/// Whether a B2C supply stays inside the supplier's state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupplyType {
    /// Intra-state supply, taxed as CGST + SGST
    #[default]
    Intra,
    /// Inter-state supply, taxed as IGST
    Inter,
}

impl SupplyType {
    pub fn from_inter_state(is_inter_state: bool) -> Self {
        if is_inter_state {
            SupplyType::Inter
        } else {
            SupplyType::Intra
        }
    }

    pub fn is_inter_state(&self) -> bool {
        matches!(self, SupplyType::Inter)
    }
}

/// CGST / SGST / IGST triple used for ITC inputs, outputs and balances
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaxComponents {
    pub cgst: BigDecimal,
    pub sgst: BigDecimal,
    pub igst: BigDecimal,
}

impl TaxComponents {
    pub fn new(cgst: BigDecimal, sgst: BigDecimal, igst: BigDecimal) -> Self {
        Self { cgst, sgst, igst }
    }

    /// Sum of the three components
    pub fn total(&self) -> BigDecimal {
        &self.cgst + &self.sgst + &self.igst
    }

    /// Add another triple into this one
    pub fn accumulate(&mut self, other: &TaxComponents) {
        self.cgst += &other.cgst;
        self.sgst += &other.sgst;
        self.igst += &other.igst;
    }

    pub fn plus(&self, other: &TaxComponents) -> TaxComponents {
        TaxComponents {
            cgst: &self.cgst + &other.cgst,
            sgst: &self.sgst + &other.sgst,
            igst: &self.igst + &other.igst,
        }
    }

    pub fn minus(&self, other: &TaxComponents) -> TaxComponents {
        TaxComponents {
            cgst: &self.cgst - &other.cgst,
            sgst: &self.sgst - &other.sgst,
            igst: &self.igst - &other.igst,
        }
    }
}

/// A client (taxpayer) whose returns are being prepared
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    /// Backend-assigned identifier (`CLI_<timestamp>_<suffix>`)
    pub id: String,
    /// Legal name
    pub client_name: String,
    /// Trade name
    pub business_name: String,
    /// Financial year label, e.g. `01/04/2024 - 31/03/2025`
    #[serde(rename = "indianFYear")]
    pub financial_year: String,
    pub gst_type: GstType,
    /// GSTIN of the client
    pub gst_no: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
    pub return_frequency: ReturnFrequency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Client {
    /// Two-digit state code taken from the client's GSTIN
    pub fn home_state_code(&self) -> &str {
        self.gst_no.get(..2).unwrap_or("")
    }

    /// Trade name, falling back to the legal name
    pub fn trade_name(&self) -> &str {
        if self.business_name.trim().is_empty() {
            &self.client_name
        } else {
            &self.business_name
        }
    }
}

/// Client details submitted on creation or update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClient {
    pub client_name: String,
    pub business_name: String,
    #[serde(rename = "indianFYear")]
    pub financial_year: String,
    pub gst_type: GstType,
    pub gst_no: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
    pub return_frequency: ReturnFrequency,
}

impl NewClient {
    /// Attach a backend identifier, producing a full client record
    pub fn into_client(self, id: String) -> Client {
        Client {
            id,
            client_name: self.client_name,
            business_name: self.business_name,
            financial_year: self.financial_year,
            gst_type: self.gst_type,
            gst_no: self.gst_no,
            address: self.address,
            contact: self.contact,
            return_frequency: self.return_frequency,
            created_at: None,
            updated_at: None,
        }
    }
}

/// Invoice-level outward supply (B2B sales table)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "customerGSTIN", default)]
    pub customer_gstin: String,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub invoice_number: String,
    #[serde(default)]
    pub invoice_type: Option<String>,
    /// DD/MM/YYYY or ISO date as entered
    #[serde(default)]
    pub invoice_date: String,
    #[serde(with = "amount", default)]
    pub invoice_value: BigDecimal,
    #[serde(default)]
    pub place_of_supply: String,
    #[serde(default)]
    pub reverse_charge: String,
    #[serde(with = "amount", default)]
    pub taxable_value: BigDecimal,
    #[serde(with = "amount", default)]
    pub integrated_tax: BigDecimal,
    #[serde(with = "amount", default)]
    pub central_tax: BigDecimal,
    #[serde(with = "amount", default)]
    pub state_tax: BigDecimal,
    #[serde(with = "amount", default)]
    pub cess: BigDecimal,
    #[serde(with = "amount::label", default)]
    pub tax_rate: String,
    /// Return month, `YYYY-MM`
    #[serde(default)]
    pub month: String,
    #[serde(default)]
    pub transaction_type: TransactionType,
    #[serde(default)]
    pub hsn_code: Option<String>,
    #[serde(with = "amount::option", default)]
    pub quantity: Option<BigDecimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(with = "amount::option", default)]
    pub unit_price: Option<BigDecimal>,
    #[serde(rename = "ecommerceGSTIN", default)]
    pub ecommerce_gstin: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Consolidated business-to-consumer supply, scoped by month
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct B2cSale {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub month: String,
    #[serde(default)]
    pub supply_type: SupplyType,
    #[serde(default)]
    pub place_of_supply: Option<String>,
    #[serde(with = "amount::label", default)]
    pub gst_rate: String,
    #[serde(with = "amount", default)]
    pub taxable_value: BigDecimal,
    #[serde(with = "amount", default)]
    pub central_tax: BigDecimal,
    #[serde(with = "amount", default)]
    pub state_tax: BigDecimal,
    #[serde(with = "amount", default)]
    pub integrated_tax: BigDecimal,
    #[serde(with = "amount", default)]
    pub invoice_value: BigDecimal,
    #[serde(default)]
    pub hsn_code: Option<String>,
    #[serde(with = "amount::option", default)]
    pub quantity: Option<BigDecimal>,
    #[serde(with = "amount::option", default)]
    pub unit_price: Option<BigDecimal>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Inward supply (purchase invoice)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "supplierGSTIN", default)]
    pub supplier_gstin: String,
    #[serde(default)]
    pub supplier_name: String,
    #[serde(default)]
    pub invoice_number: String,
    #[serde(default)]
    pub invoice_type: Option<String>,
    #[serde(default)]
    pub invoice_date: String,
    #[serde(with = "amount", default)]
    pub invoice_value: BigDecimal,
    #[serde(default)]
    pub place_of_supply: String,
    #[serde(default)]
    pub reverse_charge: String,
    #[serde(with = "amount", default)]
    pub taxable_value: BigDecimal,
    #[serde(with = "amount", default)]
    pub integrated_tax: BigDecimal,
    #[serde(with = "amount", default)]
    pub central_tax: BigDecimal,
    #[serde(with = "amount", default)]
    pub state_tax: BigDecimal,
    #[serde(with = "amount", default)]
    pub cess: BigDecimal,
    /// `Yes` / `No` as entered on the purchase template
    #[serde(default)]
    pub itc_available: Option<String>,
    /// Explicit eligibility flag; only `Some(false)` removes the invoice from ITC
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub itc_eligible: Option<bool>,
    #[serde(with = "amount::label", default)]
    pub tax_rate: String,
    /// Rate implied by the tax amounts, stored by the backend as the tax rate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculated_tax_rate: Option<String>,
    #[serde(default)]
    pub month: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hsn_code: Option<String>,
    #[serde(with = "amount::option", default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<BigDecimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Purchase {
    /// Missing eligibility counts as eligible; only an explicit `false` excludes
    pub fn is_itc_eligible(&self) -> bool {
        self.itc_eligible != Some(false)
    }
}

/// Customer on the client's sundry debtors list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SundryDebtor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub debtor_name: String,
    pub gstin: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Query filters for the sales endpoint
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaleFilter {
    pub month: Option<Month>,
    pub transaction_type: Option<TransactionType>,
}

impl SaleFilter {
    pub fn for_month(month: Month) -> Self {
        Self {
            month: Some(month),
            transaction_type: None,
        }
    }

    pub fn for_month_of_type(month: Month, transaction_type: TransactionType) -> Self {
        Self {
            month: Some(month),
            transaction_type: Some(transaction_type),
        }
    }
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.trim().is_empty())
}

impl TaxRecord for Sale {
    fn taxable_value(&self) -> BigDecimal {
        self.taxable_value.clone()
    }
    fn central_tax(&self) -> BigDecimal {
        self.central_tax.clone()
    }
    fn state_tax(&self) -> BigDecimal {
        self.state_tax.clone()
    }
    fn integrated_tax(&self) -> BigDecimal {
        self.integrated_tax.clone()
    }
    fn cess(&self) -> BigDecimal {
        self.cess.clone()
    }
    fn invoice_value(&self) -> BigDecimal {
        self.invoice_value.clone()
    }
    fn rate_label(&self) -> &str {
        &self.tax_rate
    }
    fn hsn_code(&self) -> Option<&str> {
        non_blank(self.hsn_code.as_ref())
    }
    fn quantity(&self) -> BigDecimal {
        self.quantity.clone().unwrap_or_default()
    }
    fn unit(&self) -> Option<&str> {
        non_blank(self.unit.as_ref())
    }
    fn invoice_type(&self) -> Option<&str> {
        non_blank(self.invoice_type.as_ref())
    }
    fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }
    fn place_of_supply(&self) -> Option<&str> {
        Some(self.place_of_supply.as_str()).filter(|s| !s.is_empty())
    }
}

impl TaxRecord for B2cSale {
    fn taxable_value(&self) -> BigDecimal {
        self.taxable_value.clone()
    }
    fn central_tax(&self) -> BigDecimal {
        self.central_tax.clone()
    }
    fn state_tax(&self) -> BigDecimal {
        self.state_tax.clone()
    }
    fn integrated_tax(&self) -> BigDecimal {
        self.integrated_tax.clone()
    }
    fn cess(&self) -> BigDecimal {
        BigDecimal::from(0)
    }
    fn invoice_value(&self) -> BigDecimal {
        self.invoice_value.clone()
    }
    fn rate_label(&self) -> &str {
        &self.gst_rate
    }
    fn hsn_code(&self) -> Option<&str> {
        non_blank(self.hsn_code.as_ref())
    }
    fn quantity(&self) -> BigDecimal {
        self.quantity.clone().unwrap_or_default()
    }
    fn unit(&self) -> Option<&str> {
        None
    }
    fn invoice_type(&self) -> Option<&str> {
        None
    }
    fn transaction_type(&self) -> TransactionType {
        TransactionType::B2c
    }
    fn place_of_supply(&self) -> Option<&str> {
        non_blank(self.place_of_supply.as_ref())
    }
}

impl TaxRecord for Purchase {
    fn taxable_value(&self) -> BigDecimal {
        self.taxable_value.clone()
    }
    fn central_tax(&self) -> BigDecimal {
        self.central_tax.clone()
    }
    fn state_tax(&self) -> BigDecimal {
        self.state_tax.clone()
    }
    fn integrated_tax(&self) -> BigDecimal {
        self.integrated_tax.clone()
    }
    fn cess(&self) -> BigDecimal {
        self.cess.clone()
    }
    fn invoice_value(&self) -> BigDecimal {
        self.invoice_value.clone()
    }
    fn rate_label(&self) -> &str {
        &self.tax_rate
    }
    fn hsn_code(&self) -> Option<&str> {
        non_blank(self.hsn_code.as_ref())
    }
    fn quantity(&self) -> BigDecimal {
        self.quantity.clone().unwrap_or_default()
    }
    fn unit(&self) -> Option<&str> {
        non_blank(self.unit.as_ref())
    }
    fn invoice_type(&self) -> Option<&str> {
        non_blank(self.invoice_type.as_ref())
    }
    fn transaction_type(&self) -> TransactionType {
        TransactionType::B2b
    }
    fn place_of_supply(&self) -> Option<&str> {
        Some(self.place_of_supply.as_str()).filter(|s| !s.is_empty())
    }
}

/// Errors that can occur while preparing returns
#[derive(Debug, thiserror::Error)]
pub enum GstError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid GST rate: {0}")]
    InvalidRate(String),
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),
    #[error("Backend error ({status}): {message}")]
    Backend { status: u16, message: String },
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Storage error: {0}")]
    Storage(String),
}

impl GstError {
    /// Input was rejected before anything was saved
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            GstError::Validation(_) | GstError::InvalidRate(_) | GstError::InvalidPeriod(_)
        )
    }
}

/// Result type for GST operations
pub type GstResult<T> = Result<T, GstError>;
