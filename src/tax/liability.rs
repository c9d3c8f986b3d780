//! Liability helpers: net GST position, composition and reverse-charge tax,
//! interest on delayed payment and late filing fees

use bigdecimal::{BigDecimal, Signed, Zero};
use serde::{Deserialize, Serialize};

use crate::types::GstType;

/// Default composition scheme rate, percent of turnover
pub const DEFAULT_COMPOSITION_RATE: u32 = 1;
/// Default annual interest rate on delayed payment
pub const DEFAULT_INTEREST_RATE: u32 = 18;

/// Net position after setting purchase GST against sales GST
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetGst {
    pub sales_gst: BigDecimal,
    pub purchase_gst: BigDecimal,
    /// Sales GST minus purchase GST
    pub net_gst: BigDecimal,
    /// Amount due when the net is positive
    pub gst_payable: BigDecimal,
    /// Credit available when the net is negative
    pub gst_credit: BigDecimal,
}

pub fn net_gst(sales_gst: &BigDecimal, purchase_gst: &BigDecimal) -> NetGst {
    let net = sales_gst - purchase_gst;
    let (gst_payable, gst_credit) = if net.is_positive() {
        (net.clone(), BigDecimal::zero())
    } else if net.is_negative() {
        (BigDecimal::zero(), net.abs())
    } else {
        (BigDecimal::zero(), BigDecimal::zero())
    };

    NetGst {
        sales_gst: sales_gst.clone(),
        purchase_gst: purchase_gst.clone(),
        net_gst: net,
        gst_payable,
        gst_credit,
    }
}

/// Flat tax on turnover under the composition scheme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionTax {
    pub turnover: BigDecimal,
    pub rate: BigDecimal,
    pub tax_amount: BigDecimal,
    pub total_amount: BigDecimal,
}

pub fn composition_tax(turnover: &BigDecimal, rate: Option<&BigDecimal>) -> CompositionTax {
    let rate = rate
        .cloned()
        .unwrap_or_else(|| BigDecimal::from(DEFAULT_COMPOSITION_RATE));
    let tax_amount = (turnover * &rate) / BigDecimal::from(100);

    CompositionTax {
        turnover: turnover.clone(),
        total_amount: turnover + &tax_amount,
        rate,
        tax_amount,
    }
}

/// Tax the recipient pays on a reverse-charge supply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReverseChargeTax {
    pub amount: BigDecimal,
    pub rate: BigDecimal,
    pub tax_amount: BigDecimal,
    pub total_amount: BigDecimal,
}

pub fn reverse_charge_tax(amount: &BigDecimal, rate: &BigDecimal) -> ReverseChargeTax {
    let tax_amount = (amount * rate) / BigDecimal::from(100);

    ReverseChargeTax {
        amount: amount.clone(),
        rate: rate.clone(),
        total_amount: amount + &tax_amount,
        tax_amount,
    }
}

/// Simple interest on tax paid after the due date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelayedPaymentInterest {
    pub principal: BigDecimal,
    pub days_delayed: u32,
    /// Annual rate, percent
    pub annual_rate: BigDecimal,
    /// Rounded to paise
    pub interest: BigDecimal,
    pub total_amount: BigDecimal,
}

/// Interest = amount × annual rate / 365 / 100 × days
pub fn delayed_payment_interest(
    amount: &BigDecimal,
    days_delayed: u32,
    annual_rate: Option<&BigDecimal>,
) -> DelayedPaymentInterest {
    let annual_rate = annual_rate
        .cloned()
        .unwrap_or_else(|| BigDecimal::from(DEFAULT_INTEREST_RATE));
    let interest = ((amount * &annual_rate * BigDecimal::from(days_delayed))
        / BigDecimal::from(365 * 100))
    .round(2);

    DelayedPaymentInterest {
        principal: amount.clone(),
        days_delayed,
        annual_rate,
        total_amount: amount + &interest,
        interest,
    }
}

/// Late fee for filing a return after the due date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LateFee {
    pub days_delayed: u32,
    pub gst_type: GstType,
    pub late_fee: BigDecimal,
}

/// Tiered fee: up to 15 days, up to 30 days, beyond 30 days
pub fn late_fee(days_delayed: u32, gst_type: GstType) -> LateFee {
    let tiers: [u32; 3] = match gst_type {
        GstType::Regular => [200, 500, 1000],
        GstType::Composition => [100, 200, 500],
    };

    let fee = match days_delayed {
        0 => 0,
        1..=15 => tiers[0],
        16..=30 => tiers[1],
        _ => tiers[2],
    };

    LateFee {
        days_delayed,
        gst_type,
        late_fee: BigDecimal::from(fee),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_net_gst_payable() {
        let net = net_gst(&BigDecimal::from(18000), &BigDecimal::from(12000));
        assert_eq!(net.net_gst, BigDecimal::from(6000));
        assert_eq!(net.gst_payable, BigDecimal::from(6000));
        assert_eq!(net.gst_credit, BigDecimal::from(0));
    }

    #[test]
    fn test_net_gst_credit() {
        let net = net_gst(&BigDecimal::from(5000), &BigDecimal::from(8000));
        assert_eq!(net.net_gst, BigDecimal::from(-3000));
        assert_eq!(net.gst_payable, BigDecimal::from(0));
        assert_eq!(net.gst_credit, BigDecimal::from(3000));
    }

    #[test]
    fn test_composition_tax_default_rate() {
        let tax = composition_tax(&BigDecimal::from(500000), None);
        assert_eq!(tax.rate, BigDecimal::from(1));
        assert_eq!(tax.tax_amount, BigDecimal::from(5000));
        assert_eq!(tax.total_amount, BigDecimal::from(505000));

        let tax = composition_tax(&BigDecimal::from(500000), Some(&BigDecimal::from(5)));
        assert_eq!(tax.tax_amount, BigDecimal::from(25000));
    }

    #[test]
    fn test_reverse_charge() {
        let tax = reverse_charge_tax(&BigDecimal::from(20000), &BigDecimal::from(18));
        assert_eq!(tax.tax_amount, BigDecimal::from(3600));
        assert_eq!(tax.total_amount, BigDecimal::from(23600));
    }

    #[test]
    fn test_delayed_payment_interest() {
        let interest = delayed_payment_interest(&BigDecimal::from(100000), 30, None);
        assert_eq!(interest.annual_rate, BigDecimal::from(18));
        assert_eq!(interest.interest, BigDecimal::from_str("1479.45").unwrap());
        assert_eq!(interest.total_amount, BigDecimal::from_str("101479.45").unwrap());

        let none = delayed_payment_interest(&BigDecimal::from(100000), 0, None);
        assert_eq!(none.interest, BigDecimal::from(0));
    }

    #[test]
    fn test_late_fee_tiers() {
        assert_eq!(late_fee(10, GstType::Regular).late_fee, BigDecimal::from(200));
        assert_eq!(late_fee(15, GstType::Regular).late_fee, BigDecimal::from(200));
        assert_eq!(late_fee(16, GstType::Regular).late_fee, BigDecimal::from(500));
        assert_eq!(late_fee(45, GstType::Regular).late_fee, BigDecimal::from(1000));
        assert_eq!(late_fee(5, GstType::Composition).late_fee, BigDecimal::from(100));
        assert_eq!(late_fee(30, GstType::Composition).late_fee, BigDecimal::from(200));
        assert_eq!(late_fee(31, GstType::Composition).late_fee, BigDecimal::from(500));
        assert_eq!(late_fee(0, GstType::Regular).late_fee, BigDecimal::from(0));
    }
}
