//! Preparing a month's return against the in-memory backend

use bigdecimal::BigDecimal;
use gst_core::utils::{init_tracing, MemoryBackend};
use gst_core::{
    patterns, B2cSaleInput, GstCalculator, GstReturns, Month, NewClient, Purchase, SaleBuilder,
    TaxComponents,
};
use std::io::Cursor;

const PURCHASES_CSV: &str = "\
Supplier GSTIN,Supplier Name,Invoice Number,Invoice Type,Invoice Date,Invoice Value,Place of Supply,Reverse Charge,Taxable Value,Integrated Tax,Central Tax,State Tax,Cess,ITC Available,Tax Rate
29AAACB1234C1Z2,Alpha Yarns,AY-881,Regular,08/04/2024,23600,29-Karnataka,No,20000,0,1800,1800,0,Yes,18
27AAPFU0939F1ZV,Beta Dyes,BD-19,Regular,17/04/2024,5250,27-Maharashtra,No,5000,250,0,0,0,Yes,5
";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    println!("🧾 GST Core - Monthly Return Example\n");

    let mut returns = GstReturns::new(MemoryBackend::new());
    let april = Month::new(2024, 4)?;

    // 1. Register the client
    let client = returns
        .create_client(NewClient {
            client_name: "Ravi Kumar".to_string(),
            business_name: "Kumar Textiles".to_string(),
            financial_year: "01/04/2024 - 31/03/2025".to_string(),
            gst_no: "29ABCDE1234F1Z5".to_string(),
            ..Default::default()
        })
        .await?;
    println!("👤 Client {} ({})", client.trade_name(), client.gst_no);
    println!();

    // 2. Sales
    println!("📤 Recording Sales...");
    let calculator = GstCalculator::for_client(&client);

    let local = SaleBuilder::new("29AAACB1234C1Z2", "Alpha Yarns", "KT-101", "05/04/2024")
        .hsn("5208", BigDecimal::from(300), "MTR")
        .taxable_value(BigDecimal::from(45000))
        .tax_rate(BigDecimal::from(12))
        .build(&calculator)?;
    let local = returns.record_sale(&client.id, local).await?;
    println!(
        "  ✓ {} to {}: CGST ₹{} + SGST ₹{}",
        local.invoice_number, local.customer_name, local.central_tax, local.state_tax
    );

    let outstation = SaleBuilder::new("27AAPFU0939F1ZV", "Beta Dyes", "KT-102", "12/04/2024")
        .place_of_supply("27-Maharashtra")
        .hsn("5208", BigDecimal::from(100), "MTR")
        .taxable_value(BigDecimal::from(15000))
        .tax_rate(BigDecimal::from(12))
        .build(&calculator)?;
    let outstation = returns.record_sale(&client.id, outstation).await?;
    println!(
        "  ✓ {} to {}: IGST ₹{}",
        outstation.invoice_number, outstation.customer_name, outstation.integrated_tax
    );

    let counter_sales = B2cSaleInput::new(april, BigDecimal::from(5), BigDecimal::from(12000));
    let b2c = returns.record_b2c_sale(&client, counter_sales).await?;
    println!("  ✓ B2C counter sales: invoice value ₹{}", b2c.invoice_value);

    let hsn_line = patterns::hsn_summary_sale(
        &calculator,
        april,
        "6109",
        "NOS",
        BigDecimal::from(40),
        BigDecimal::from(8000),
        BigDecimal::from(5),
    )?;
    returns.record_sale(&client.id, hsn_line).await?;
    println!("  ✓ HSN summary line for 6109");
    println!();

    // 3. Purchases
    println!("📥 Importing Purchases...");
    let imported = returns
        .import_purchases(&client.id, Cursor::new(PURCHASES_CSV), april)
        .await?;
    println!("  ✓ Imported {} purchases", imported.saved);

    let blocked = Purchase {
        supplier_gstin: "29AAACB1234C1Z2".to_string(),
        supplier_name: "Alpha Yarns".to_string(),
        invoice_number: "AY-890".to_string(),
        invoice_date: "25/04/2024".to_string(),
        taxable_value: BigDecimal::from(2000),
        central_tax: BigDecimal::from(180),
        state_tax: BigDecimal::from(180),
        invoice_value: BigDecimal::from(2360),
        itc_eligible: Some(false),
        ..Default::default()
    };
    returns.record_purchase(&client.id, blocked).await?;
    println!("  ✓ Recorded a purchase without ITC");
    println!();

    // 4. Carry-forward credit and ITC position
    println!("⚖️ ITC Position:");
    returns.add_old_setoff(
        &client.id,
        april,
        &TaxComponents::new(BigDecimal::from(500), BigDecimal::from(500), BigDecimal::from(0)),
    );
    let itc = returns.itc_state(&client.id, april).await?;
    println!("  Input:   CGST ₹{} SGST ₹{} IGST ₹{}", itc.input.cgst, itc.input.sgst, itc.input.igst);
    println!("  Output:  CGST ₹{} SGST ₹{} IGST ₹{}", itc.output.cgst, itc.output.sgst, itc.output.igst);
    println!("  Balance: CGST ₹{} SGST ₹{} IGST ₹{}", itc.balance.cgst, itc.balance.sgst, itc.balance.igst);
    println!();

    // 5. Monthly report
    println!("📋 Report for {}:", april.display_name());
    let report = returns.monthly_report(&client, april).await?;
    println!("  Invoices issued:   {}", report.document_counts.invoices_issued);
    println!("  Invoices received: {}", report.document_counts.invoices_received);
    println!("  Outward taxable:   ₹{}", report.outward.taxable_value);
    println!("  Tax liability:     ₹{}", report.tax_summary.total_liability);
    println!("  ITC available:     ₹{}", report.itc_summary.total_itc);
    for line in &report.hsn_outward.lines {
        println!(
            "  HSN {} @ {}%: {} {} for ₹{}",
            line.hsn_code, line.tax_rate, line.quantity, line.unit, line.taxable_value
        );
    }
    println!();

    // 6. Portfolio across clients
    let portfolio = returns.portfolio_summary(april).await?;
    let mut csv = Vec::new();
    portfolio.write_csv(&mut csv)?;
    println!("📑 Portfolio CSV:\n{}", String::from_utf8(csv)?);

    println!("🎉 Monthly return example completed successfully!");
    Ok(())
}
