//! Tax computation: GST split, GSTIN checks and liability helpers

pub mod gst;
pub mod gstin;
pub mod liability;

pub use gst::{compute_tax, infer_tax_rate, GstCalculator, GstRate, GstSlab, TaxBreakdown};
pub use liability::{
    composition_tax, delayed_payment_interest, late_fee, net_gst, reverse_charge_tax,
    CompositionTax, DelayedPaymentInterest, LateFee, NetGst, ReverseChargeTax,
};
