//! Aggregators that fold transaction records into return summaries.
//!
//! Every fold is a single pass over the records and its result does not depend
//! on the order of the input; grouped output is sorted by group key.

pub mod document;
pub mod hsn;
pub mod outward;
pub mod purchase;

pub use document::{DocumentLine, DocumentSummary};
pub use hsn::{HsnLine, HsnSummary, HsnTotals};
pub use outward::{is_export_supply, OutwardSummary, TaxLiabilitySummary};
pub use purchase::{PurchaseTotals, SupplierGroup, SupplierSummary};
