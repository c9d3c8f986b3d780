//! # GST Core
//!
//! Indian GST return preparation: tax computation, Input Tax Credit (ITC)
//! reconciliation, HSN and GSTR-3B summaries, CSV import/export, and a typed
//! client for the returns backend that owns persistence.
//!
//! ## Features
//!
//! - **Tax calculation**: CGST/SGST for intra-state supplies, IGST for inter-state supplies
//! - **GSTIN checks**: format validation and state code lookup
//! - **Aggregation**: GSTR-3B outward totals, HSN summaries, document and supplier summaries
//! - **ITC reconciliation**: input vs output tax with an operator-entered carry-forward
//! - **Backend abstraction**: trait-based storage with HTTP and in-memory implementations
//!
//! ## Quick Start
//!
//! ```rust
//! use gst_core::compute_tax;
//! use bigdecimal::BigDecimal;
//!
//! let tax = compute_tax(&BigDecimal::from(45000), &BigDecimal::from(12), false, None);
//! assert_eq!(tax.cgst, BigDecimal::from(2700));
//! assert_eq!(tax.sgst, BigDecimal::from(2700));
//! assert_eq!(tax.invoice_value, BigDecimal::from(50400));
//! ```

pub mod backend;
pub mod config;
pub mod import;
pub mod period;
pub mod reconciliation;
pub mod returns;
pub mod summary;
pub mod tax;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use backend::HttpBackend;
pub use config::BackendConfig;
pub use period::*;
pub use reconciliation::*;
pub use returns::*;
pub use summary::*;
pub use tax::gst::*;
pub use tax::gstin::{is_inter_state, is_valid_gstin, validate_gstin};
pub use traits::*;
pub use types::*;

// Re-export entry patterns for convenience
pub use returns::entries::patterns;
