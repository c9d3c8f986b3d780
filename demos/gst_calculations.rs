//! GST calculation examples

use bigdecimal::BigDecimal;
use gst_core::tax::liability::{composition_tax, delayed_payment_interest, late_fee, net_gst};
use gst_core::{
    compute_tax, infer_tax_rate, is_valid_gstin, GstCalculator, GstRate, GstSlab, GstType,
    TaxBreakdown,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🧾 GST Core - GST Calculation Examples\n");

    // 1. Slabs offered on the sales forms
    println!("📊 GST Slabs:");
    for slab in GstSlab::ALL.iter() {
        println!("  {:?}: {}%", slab, slab.rate());
    }
    println!();

    // 2. Intra-state vs inter-state for a supplier registered in Karnataka
    let calculator = GstCalculator::new("29");
    let taxable = BigDecimal::from(45000);
    let rate = BigDecimal::from(12);

    println!("🏢 Intra-state Supply (CGST + SGST):");
    let intra = calculator.calculate(&taxable, &rate, "29-Karnataka", None);
    println!("  Taxable Value: ₹{}", intra.taxable_value);
    println!("  CGST (6%):     ₹{}", intra.cgst);
    println!("  SGST (6%):     ₹{}", intra.sgst);
    println!("  IGST:          ₹{}", intra.igst);
    println!("  Invoice Value: ₹{}", intra.invoice_value);
    println!();

    println!("🌍 Inter-state Supply (IGST only):");
    let inter = calculator.calculate(&taxable, &rate, "27-Maharashtra", Some(&BigDecimal::from(500)));
    println!("  Taxable Value: ₹{}", inter.taxable_value);
    println!("  IGST (12%):    ₹{}", inter.igst);
    println!("  Cess:          ₹{}", inter.cess);
    println!("  Invoice Value: ₹{}", inter.invoice_value);
    println!();

    // 3. Reverse calculation (from total to taxable value)
    println!("🔄 Reverse Calculation (Total to Taxable):");
    let inclusive = BigDecimal::from(11800);
    let reverse = TaxBreakdown::reverse_calculate(&inclusive, GstRate::intra_state(BigDecimal::from(18)))?;
    println!("  Given Total:   ₹{}", inclusive);
    println!("  Taxable Value: ₹{}", reverse.taxable_value.round(2));
    println!("  CGST:          ₹{}", reverse.cgst.round(2));
    println!("  SGST:          ₹{}", reverse.sgst.round(2));
    println!();

    // 4. Rates registered per HSN code
    println!("📦 HSN Rates:");
    let mut hsn_calculator = GstCalculator::new("29");
    hsn_calculator.set_hsn_rate("5208", BigDecimal::from(5))?;
    hsn_calculator.set_hsn_rate("8471", BigDecimal::from(18))?;
    for hsn in ["5208", "8471"] {
        let tax = hsn_calculator.calculate_for_hsn(&BigDecimal::from(10000), hsn, "33-Tamil Nadu")?;
        println!("  HSN {}: IGST ₹{} on ₹{}", hsn, tax.igst, tax.taxable_value);
    }
    println!();

    // 5. Implied rate of a purchase invoice
    println!("🔍 Implied Rate of a Purchase:");
    let implied = infer_tax_rate(
        &BigDecimal::from(10000),
        &BigDecimal::from(900),
        &BigDecimal::from(900),
        &BigDecimal::from(0),
    );
    println!("  ₹10000 taxable with ₹900 CGST + ₹900 SGST → {}%", implied);
    println!();

    // 6. Liability helpers
    println!("💰 Liability Helpers:");
    let net = net_gst(&BigDecimal::from(25000), &BigDecimal::from(18000));
    println!("  Net GST: ₹{} (payable ₹{}, credit ₹{})", net.net_gst, net.gst_payable, net.gst_credit);
    let composition = composition_tax(&BigDecimal::from(1500000), None);
    println!("  Composition tax on ₹{}: ₹{}", composition.turnover, composition.tax_amount);
    let interest = delayed_payment_interest(&BigDecimal::from(50000), 30, None);
    println!("  Interest on ₹50000 for 30 days: ₹{}", interest.interest.round(2));
    let fee = late_fee(20, GstType::Regular);
    println!("  Late fee for 20 days (regular): ₹{}", fee.late_fee);
    println!();

    // 7. Validation examples
    println!("✅ Validation:");
    for gstin in ["29ABCDE1234F1Z5", "29abcde1234f1z5", "29ABCDE1234F1Z"] {
        println!("  {} → {}", gstin, if is_valid_gstin(gstin) { "valid" } else { "invalid" });
    }

    let invalid_rate = GstRate {
        total_rate: BigDecimal::from(18),
        cgst_rate: BigDecimal::from(10),
        sgst_rate: BigDecimal::from(9),
        igst_rate: BigDecimal::from(0),
    };
    match invalid_rate.validate() {
        Ok(()) => println!("  ✓ Valid rate"),
        Err(e) => println!("  ❌ Invalid rate: {}", e),
    }

    let zero = compute_tax(&BigDecimal::from(1000), &BigDecimal::from(0), false, None);
    println!("  Nil-rated ₹1000 → invoice ₹{}", zero.invoice_value);

    println!("\n🎉 GST calculation examples completed successfully!");
    Ok(())
}
