//! GST (Goods and Services Tax) calculation engine for Indian tax compliance

use bigdecimal::{BigDecimal, Signed, Zero};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::tax::gstin;
use crate::types::{Client, GstError, GstResult};

/// GST rate structure for Indian taxation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GstRate {
    /// Total GST rate percentage (e.g., 18 for 18%)
    pub total_rate: BigDecimal,
    /// CGST rate percentage (Central GST)
    pub cgst_rate: BigDecimal,
    /// SGST rate percentage (State GST)
    pub sgst_rate: BigDecimal,
    /// IGST rate percentage (Integrated GST)
    pub igst_rate: BigDecimal,
}

impl GstRate {
    /// Create a new GST rate with intra-state rates (CGST + SGST)
    pub fn intra_state(total_rate: BigDecimal) -> Self {
        let half_rate = &total_rate / BigDecimal::from(2);
        Self {
            total_rate,
            cgst_rate: half_rate.clone(),
            sgst_rate: half_rate,
            igst_rate: BigDecimal::zero(),
        }
    }

    /// Create a new GST rate with inter-state rates (IGST)
    pub fn inter_state(total_rate: BigDecimal) -> Self {
        Self {
            total_rate: total_rate.clone(),
            cgst_rate: BigDecimal::zero(),
            sgst_rate: BigDecimal::zero(),
            igst_rate: total_rate,
        }
    }

    /// Pick the split for the given supply type
    pub fn for_supply(total_rate: BigDecimal, is_inter_state: bool) -> Self {
        if is_inter_state {
            Self::inter_state(total_rate)
        } else {
            Self::intra_state(total_rate)
        }
    }

    pub fn is_inter_state(&self) -> bool {
        self.igst_rate > BigDecimal::zero()
    }

    /// Validate that the GST rate structure is correct
    pub fn validate(&self) -> GstResult<()> {
        if self.total_rate.is_negative() {
            return Err(GstError::InvalidRate(format!(
                "GST rate cannot be negative: {}",
                self.total_rate
            )));
        }

        let calculated_total = &self.cgst_rate + &self.sgst_rate + &self.igst_rate;

        if calculated_total != self.total_rate {
            return Err(GstError::InvalidRate(format!(
                "GST components don't add up to total rate: {} != {}",
                calculated_total, self.total_rate
            )));
        }

        // For intra-state supplies, CGST and SGST should be equal
        if self.igst_rate.is_zero() && self.cgst_rate != self.sgst_rate {
            return Err(GstError::InvalidRate(
                "CGST and SGST rates must be equal for intra-state supplies".to_string(),
            ));
        }

        // For inter-state supplies, only IGST should be non-zero
        if self.igst_rate > BigDecimal::zero()
            && (self.cgst_rate > BigDecimal::zero() || self.sgst_rate > BigDecimal::zero())
        {
            return Err(GstError::InvalidRate(
                "Only IGST should be applicable for inter-state supplies".to_string(),
            ));
        }

        Ok(())
    }
}

fn non_negative(value: &BigDecimal) -> BigDecimal {
    if value.is_negative() {
        BigDecimal::zero()
    } else {
        value.clone()
    }
}

/// Tax split for one supply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    /// Value before GST
    pub taxable_value: BigDecimal,
    /// Rate used for the split
    pub gst_rate: GstRate,
    pub cgst: BigDecimal,
    pub sgst: BigDecimal,
    pub igst: BigDecimal,
    /// CGST + SGST + IGST
    pub total_tax: BigDecimal,
    pub cess: BigDecimal,
    /// Taxable value + total tax + cess
    pub invoice_value: BigDecimal,
}

impl TaxBreakdown {
    fn from_rate(taxable_value: BigDecimal, gst_rate: GstRate, cess: BigDecimal) -> Self {
        let hundred = BigDecimal::from(100);
        let cgst = (&taxable_value * &gst_rate.cgst_rate) / &hundred;
        let sgst = (&taxable_value * &gst_rate.sgst_rate) / &hundred;
        let igst = (&taxable_value * &gst_rate.igst_rate) / &hundred;

        let total_tax = &cgst + &sgst + &igst;
        let invoice_value = &taxable_value + &total_tax + &cess;

        Self {
            taxable_value,
            gst_rate,
            cgst,
            sgst,
            igst,
            total_tax,
            cess,
            invoice_value,
        }
    }

    /// Derive the split from an invoice total, as GSTR-1 uploads carry it.
    ///
    /// Total tax is `invoice − taxable − cess`; inter-state supplies put all of
    /// it on IGST, intra-state supplies halve it into CGST and SGST.
    pub fn from_invoice_value(
        invoice_value: &BigDecimal,
        taxable_value: &BigDecimal,
        cess: &BigDecimal,
        is_inter_state: bool,
    ) -> Self {
        let total_tax = invoice_value - taxable_value - cess;
        let rate = if taxable_value.is_zero() {
            BigDecimal::zero()
        } else {
            ((&total_tax * BigDecimal::from(100)) / taxable_value).round(2)
        };

        let (cgst, sgst, igst) = if is_inter_state {
            (BigDecimal::zero(), BigDecimal::zero(), total_tax.clone())
        } else {
            let half = &total_tax / BigDecimal::from(2);
            (half.clone(), half, BigDecimal::zero())
        };

        Self {
            taxable_value: taxable_value.clone(),
            gst_rate: GstRate::for_supply(rate, is_inter_state),
            cgst,
            sgst,
            igst,
            total_tax,
            cess: cess.clone(),
            invoice_value: invoice_value.clone(),
        }
    }

    /// Calculate the taxable value from a tax-inclusive amount
    pub fn reverse_calculate(inclusive_amount: &BigDecimal, gst_rate: GstRate) -> GstResult<Self> {
        gst_rate.validate()?;

        let divisor = BigDecimal::from(100) + &gst_rate.total_rate;
        let taxable_value = (non_negative(inclusive_amount) * BigDecimal::from(100)) / divisor;

        Ok(Self::from_rate(taxable_value, gst_rate, BigDecimal::zero()))
    }

    /// Same breakdown rounded to paise.
    ///
    /// The components are rounded and the totals rebuilt from them, so the
    /// invoice value stays the sum of its parts and CGST stays equal to SGST.
    pub fn rounded(&self) -> Self {
        let taxable_value = self.taxable_value.round(2);
        let cgst = self.cgst.round(2);
        let sgst = if self.sgst == self.cgst {
            cgst.clone()
        } else {
            self.sgst.round(2)
        };
        let igst = self.igst.round(2);
        let cess = self.cess.round(2);
        let total_tax = &cgst + &sgst + &igst;
        let invoice_value = &taxable_value + &total_tax + &cess;

        Self {
            taxable_value,
            gst_rate: self.gst_rate.clone(),
            cgst,
            sgst,
            igst,
            total_tax,
            cess,
            invoice_value,
        }
    }
}

/// Compute CGST/SGST/IGST for a taxable value at a GST rate.
///
/// Negative inputs are treated as zero. The rate has no upper bound.
pub fn compute_tax(
    taxable_value: &BigDecimal,
    rate_percent: &BigDecimal,
    is_inter_state: bool,
    cess: Option<&BigDecimal>,
) -> TaxBreakdown {
    let taxable_value = non_negative(taxable_value);
    let rate = non_negative(rate_percent);
    let cess = cess.map(non_negative).unwrap_or_else(BigDecimal::zero);

    if rate.is_zero() || taxable_value.is_zero() {
        return TaxBreakdown::from_rate(
            taxable_value,
            GstRate::for_supply(BigDecimal::zero(), is_inter_state),
            cess,
        );
    }

    TaxBreakdown::from_rate(taxable_value, GstRate::for_supply(rate, is_inter_state), cess)
}

/// Standard rates the implied-rate inference snaps to
const SNAP_RATES: [i32; 5] = [0, 5, 12, 18, 28];

/// Rate implied by the tax amounts of an invoice.
///
/// Snaps to the nearest of 0/5/12/18/28 when within half a point, otherwise
/// returns the computed rate with two decimals. A zero taxable value gives `"0"`.
pub fn infer_tax_rate(
    taxable_value: &BigDecimal,
    cgst: &BigDecimal,
    sgst: &BigDecimal,
    igst: &BigDecimal,
) -> String {
    if taxable_value.is_zero() {
        return "0".to_string();
    }

    let rate = ((cgst + sgst + igst) * BigDecimal::from(100)) / taxable_value;
    let closest = SNAP_RATES
        .iter()
        .map(|r| BigDecimal::from(*r))
        .min_by(|a, b| (a - &rate).abs().cmp(&(b - &rate).abs()))
        .unwrap_or_else(BigDecimal::zero);

    if (&closest - &rate).abs() <= BigDecimal::new(5.into(), 1) {
        closest.to_string()
    } else {
        rate.round(2).with_scale(2).to_string()
    }
}

/// GST slabs offered on sales entry forms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GstSlab {
    /// Exempt and nil-rated supplies - 0%
    Nil,
    /// Rough precious and semi-precious stones - 0.25%
    PreciousStones,
    /// Gold, silver and jewellery - 3%
    Bullion,
    /// Reduced rate items - 5%
    Reduced,
    /// Standard rate items - 12%
    Standard,
    /// Higher rate items - 18%
    Higher,
    /// Luxury/Sin goods - 28%
    Luxury,
}

impl GstSlab {
    pub const ALL: [GstSlab; 7] = [
        GstSlab::Nil,
        GstSlab::PreciousStones,
        GstSlab::Bullion,
        GstSlab::Reduced,
        GstSlab::Standard,
        GstSlab::Higher,
        GstSlab::Luxury,
    ];

    /// Get the GST rate for this slab
    pub fn rate(&self) -> BigDecimal {
        match self {
            GstSlab::Nil => BigDecimal::zero(),
            GstSlab::PreciousStones => BigDecimal::new(25.into(), 2),
            GstSlab::Bullion => BigDecimal::from(3),
            GstSlab::Reduced => BigDecimal::from(5),
            GstSlab::Standard => BigDecimal::from(12),
            GstSlab::Higher => BigDecimal::from(18),
            GstSlab::Luxury => BigDecimal::from(28),
        }
    }

    /// Slab matching an entered rate, if it is one of the standard ones
    pub fn from_rate(rate: &BigDecimal) -> Option<GstSlab> {
        Self::ALL.iter().copied().find(|slab| &slab.rate() == rate)
    }

    /// Create intra-state GST rate for this slab
    pub fn intra_state_rate(&self) -> GstRate {
        GstRate::intra_state(self.rate())
    }

    /// Create inter-state GST rate for this slab
    pub fn inter_state_rate(&self) -> GstRate {
        GstRate::inter_state(self.rate())
    }
}

/// GST calculator bound to a supplier's home state
#[derive(Debug, Clone)]
pub struct GstCalculator {
    /// Two-digit state code of the supplier
    home_state_code: String,
    /// Rates registered per HSN code
    hsn_rates: HashMap<String, BigDecimal>,
}

impl GstCalculator {
    /// Create a new GST calculator for a supplier registered in `home_state_code`
    pub fn new(home_state_code: impl Into<String>) -> Self {
        Self {
            home_state_code: home_state_code.into(),
            hsn_rates: HashMap::new(),
        }
    }

    /// Calculator for a client, using the state code of its GSTIN
    pub fn for_client(client: &Client) -> Self {
        Self::new(client.home_state_code())
    }

    pub fn home_state_code(&self) -> &str {
        &self.home_state_code
    }

    /// Register the GST rate charged on an HSN code
    pub fn set_hsn_rate(&mut self, hsn_code: impl Into<String>, rate: BigDecimal) -> GstResult<()> {
        GstRate::intra_state(rate.clone()).validate()?;
        self.hsn_rates.insert(hsn_code.into(), rate);
        Ok(())
    }

    pub fn hsn_rate(&self, hsn_code: &str) -> Option<&BigDecimal> {
        self.hsn_rates.get(hsn_code)
    }

    /// Whether a supply to `place_of_supply` leaves the supplier's state
    pub fn is_inter_state(&self, place_of_supply: &str) -> bool {
        gstin::is_inter_state(&self.home_state_code, place_of_supply)
    }

    /// Calculate GST for a supply to `place_of_supply`
    pub fn calculate(
        &self,
        taxable_value: &BigDecimal,
        rate_percent: &BigDecimal,
        place_of_supply: &str,
        cess: Option<&BigDecimal>,
    ) -> TaxBreakdown {
        compute_tax(
            taxable_value,
            rate_percent,
            self.is_inter_state(place_of_supply),
            cess,
        )
    }

    /// Calculate GST using the rate registered for an HSN code
    pub fn calculate_for_hsn(
        &self,
        taxable_value: &BigDecimal,
        hsn_code: &str,
        place_of_supply: &str,
    ) -> GstResult<TaxBreakdown> {
        let rate = self
            .hsn_rates
            .get(hsn_code)
            .ok_or_else(|| GstError::NotFound(format!("No GST rate registered for HSN {}", hsn_code)))?;

        Ok(self.calculate(taxable_value, rate, place_of_supply, None))
    }
}
