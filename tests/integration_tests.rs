//! Integration tests for gst-core

use bigdecimal::BigDecimal;
use gst_core::{
    compute_tax,
    import::purchase_template,
    patterns,
    utils::{MemoryBackend, StrictClientValidator, StrictEntryValidator},
    B2cSaleInput, Client, GstBackend, GstCalculator, GstError, GstReturns, Month, NewClient,
    Purchase, SaleBuilder, SaleFilter, TaxComponents, TransactionType,
};
use std::io::Cursor;

const PURCHASES_CSV: &str = "\
Supplier GSTIN,Supplier Name,Invoice Number,Invoice Type,Invoice Date,Invoice Value,Place of Supply,Reverse Charge,Taxable Value,Integrated Tax,Central Tax,State Tax,Cess,ITC Available,Tax Rate
29AAACB1234C1Z2,Alpha Yarns,AY-881,Regular,08/04/2024,23600,29-Karnataka,No,20000,0,1800,1800,0,Yes,18
27AAPFU0939F1ZV,Beta Dyes,BD-19,Regular,17/04/2024,5250,27-Maharashtra,No,5000,250,0,0,0,Yes,5
,Nameless,X-1,Regular,17/04/2024,100,,No,100,0,0,0,0,Yes,0
";

const B2B_CSV: &str = "\
GSTIN/UIN of Recipient,Receiver Name,Invoice Number,Invoice date,Invoice Value,Place Of Supply,Reverse Charge,Applicable % of Tax Rate,Invoice Type,E-Commerce GSTIN,Rate,Taxable Value,Cess Amount
27AAPFU0939F1ZV,Beta Dyes,KT-201,03-May-2024,11800,27-Maharashtra,N,,Regular B2B,,18,10000,0
29AAACB1234C1Z2,Alpha Yarns,KT-202,09-May-2024,5600,29-Karnataka,N,,Regular B2B,,12,5000,0
";

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

async fn returns_with_client() -> (GstReturns<MemoryBackend>, Client) {
    let mut returns = GstReturns::new(MemoryBackend::new());
    let client = returns.create_client(new_client()).await.unwrap();
    (returns, client)
}

#[tokio::test]
async fn test_complete_return_workflow() {
    let (mut returns, client) = returns_with_client().await;
    let calculator = GstCalculator::for_client(&client);

    let local = SaleBuilder::new("29AAACB1234C1Z2", "Alpha Yarns", "KT-101", "05/04/2024")
        .hsn("5208", BigDecimal::from(300), "MTR")
        .taxable_value(BigDecimal::from(45000))
        .tax_rate(BigDecimal::from(12))
        .build(&calculator)
        .unwrap();
    let local = returns.record_sale(&client.id, local).await.unwrap();
    assert!(local.id.as_deref().unwrap().starts_with("SAL_"));

    let outstation = SaleBuilder::new("27AAPFU0939F1ZV", "Beta Dyes", "KT-102", "12/04/2024")
        .place_of_supply("27-Maharashtra")
        .hsn("5208", BigDecimal::from(100), "MTR")
        .taxable_value(BigDecimal::from(15000))
        .tax_rate(BigDecimal::from(12))
        .build(&calculator)
        .unwrap();
    returns.record_sale(&client.id, outstation).await.unwrap();

    returns
        .record_b2c_sale(
            &client,
            B2cSaleInput::new(april(), BigDecimal::from(5), BigDecimal::from(12000)),
        )
        .await
        .unwrap();

    let imported = returns
        .import_purchases(&client.id, Cursor::new(PURCHASES_CSV), april())
        .await
        .unwrap();
    assert_eq!(imported.saved, 2);
    assert_eq!(imported.skipped.len(), 1);

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
    returns.record_purchase(&client.id, blocked).await.unwrap();

    returns.add_old_setoff(
        &client.id,
        april(),
        &TaxComponents::new(BigDecimal::from(500), BigDecimal::from(500), BigDecimal::from(0)),
    );

    let itc = returns.itc_state(&client.id, april()).await.unwrap();
    assert_eq!(itc.input.cgst, BigDecimal::from(1800));
    assert_eq!(itc.input.igst, BigDecimal::from(250));
    assert_eq!(itc.output.cgst, BigDecimal::from(3000));
    assert_eq!(itc.output.igst, BigDecimal::from(1800));
    assert_eq!(itc.total.cgst, BigDecimal::from(2300));
    assert_eq!(itc.balance.cgst, BigDecimal::from(-700));
    assert_eq!(itc.balance.sgst, BigDecimal::from(-700));
    assert_eq!(itc.balance.igst, BigDecimal::from(-1550));

    let report = returns.monthly_report(&client, april()).await.unwrap();
    assert_eq!(report.basic.gstin, "29ABCDE1234F1Z5");
    assert_eq!(report.basic.period, "April 2024");
    assert_eq!(report.document_counts.invoices_issued, 3);
    assert_eq!(report.document_counts.invoices_received, 3);
    assert_eq!(report.outward.taxable_value, BigDecimal::from(72000));
    assert_eq!(report.tax_summary.total_liability, BigDecimal::from(7800));
    assert_eq!(report.itc_summary.total_itc, BigDecimal::from(3850));
    assert_eq!(report.itc, itc);

    let fabric = &report.hsn_outward.lines[0];
    assert_eq!(fabric.hsn_code, "5208");
    assert_eq!(fabric.tax_rate, "12");
    assert_eq!(fabric.quantity, BigDecimal::from(400));
    assert_eq!(fabric.unit, "MTR");
    assert_eq!(report.hsn_outward.lines[1].hsn_code, "Not Specified");
}

#[tokio::test]
async fn test_b2b_import_and_month_filter() {
    let (mut returns, client) = returns_with_client().await;
    let may = Month::new(2024, 5).unwrap();

    let imported = returns
        .import_b2b_sales(&client, Cursor::new(B2B_CSV), may)
        .await
        .unwrap();
    assert_eq!(imported.saved, 2);
    assert!(imported.skipped.is_empty());

    let sales = returns
        .list_sales(&client.id, &SaleFilter::for_month(may))
        .await
        .unwrap();
    assert_eq!(sales.len(), 2);

    let inter = sales.iter().find(|s| s.invoice_number == "KT-201").unwrap();
    assert_eq!(inter.integrated_tax, BigDecimal::from(1800));
    let intra = sales.iter().find(|s| s.invoice_number == "KT-202").unwrap();
    assert_eq!(intra.central_tax, BigDecimal::from(300));
    assert_eq!(intra.state_tax, BigDecimal::from(300));

    let april_sales = returns
        .list_sales(&client.id, &SaleFilter::for_month(april()))
        .await
        .unwrap();
    assert!(april_sales.is_empty());
}

#[tokio::test]
async fn test_client_validation() {
    let mut returns = GstReturns::with_validators(
        MemoryBackend::new(),
        Box::new(StrictClientValidator),
        Box::new(StrictEntryValidator),
    );

    let mut lowercase = new_client();
    lowercase.gst_no = "29abcde1234f1z5".to_string();
    let result = returns.create_client(lowercase).await;
    assert!(result.unwrap_err().is_validation());

    let mut bad_year = new_client();
    bad_year.financial_year = "2024".to_string();
    assert!(returns.create_client(bad_year).await.is_err());

    let client = returns.create_client(new_client()).await.unwrap();
    assert!(matches!(
        returns.create_client(new_client()).await,
        Err(GstError::Validation(_))
    ));

    let mut renamed = new_client();
    renamed.business_name = "Kumar Silks".to_string();
    returns.update_client(&client.id, &renamed).await.unwrap();
    let stored = returns.get_client_required(&client.id).await.unwrap();
    assert_eq!(stored.trade_name(), "Kumar Silks");
}

#[tokio::test]
async fn test_strict_purchase_rules() {
    let mut returns = GstReturns::with_validators(
        MemoryBackend::new(),
        Box::new(StrictClientValidator),
        Box::new(StrictEntryValidator),
    );
    let client = returns.create_client(new_client()).await.unwrap();

    let purchase = Purchase {
        supplier_gstin: "29AAACB1234C1Z2".to_string(),
        supplier_name: "Alpha Yarns".to_string(),
        invoice_number: "AY-900".to_string(),
        invoice_date: "2024-04-10".to_string(),
        invoice_value: BigDecimal::from(1180),
        taxable_value: BigDecimal::from(1000),
        central_tax: BigDecimal::from(90),
        state_tax: BigDecimal::from(90),
        reverse_charge: "No".to_string(),
        ..Default::default()
    };
    assert!(matches!(
        returns.record_purchase(&client.id, purchase.clone()).await,
        Err(GstError::Validation(_))
    ));

    let mut fixed = purchase;
    fixed.invoice_date = "10/04/2024".to_string();
    let stored = returns.record_purchase(&client.id, fixed).await.unwrap();
    assert_eq!(stored.month, "2024-04");
    assert_eq!(stored.calculated_tax_rate.as_deref(), Some("18"));
}

#[tokio::test]
async fn test_entries_update_and_delete() {
    let (mut returns, client) = returns_with_client().await;
    let calculator = GstCalculator::for_client(&client);

    let sale = returns
        .record_sale(
            &client.id,
            patterns::hsn_summary_sale(
                &calculator,
                april(),
                "6109",
                "NOS",
                BigDecimal::from(10),
                BigDecimal::from(1000),
                BigDecimal::from(5),
            )
            .unwrap(),
        )
        .await
        .unwrap();
    let sale_id = sale.id.clone().unwrap();

    let mut corrected = sale.clone();
    corrected.quantity = Some(BigDecimal::from(12));
    returns.update_sale(&client.id, &sale_id, &corrected).await.unwrap();

    let listed = returns
        .list_sales(&client.id, &SaleFilter::for_month(april()))
        .await
        .unwrap();
    assert_eq!(listed[0].quantity, Some(BigDecimal::from(12)));
    assert_eq!(listed[0].transaction_type, TransactionType::B2b);

    returns.delete_sale(&client.id, &sale_id).await.unwrap();
    assert!(matches!(
        returns.delete_sale(&client.id, &sale_id).await,
        Err(GstError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_unknown_client_is_not_found() {
    let returns = GstReturns::new(MemoryBackend::new());
    assert!(matches!(
        returns.get_client_required("CLI_0_DEADBEEF").await,
        Err(GstError::NotFound(_))
    ));
    assert!(matches!(
        returns.itc_state("CLI_0_DEADBEEF", april()).await,
        Err(GstError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_portfolio_summary() {
    let backend = MemoryBackend::new();
    let mut returns = GstReturns::new(backend.clone());
    let first = returns.create_client(new_client()).await.unwrap();

    let mut second = new_client();
    second.client_name = "Meena Iyer".to_string();
    second.business_name = "Iyer Foods".to_string();
    second.gst_no = "33AAACI5678D1Z9".to_string();
    let second = returns.create_client(second).await.unwrap();

    returns
        .record_b2c_sale(
            &first,
            B2cSaleInput::new(april(), BigDecimal::from(18), BigDecimal::from(10000)),
        )
        .await
        .unwrap();

    returns
        .import_purchases(&second.id, Cursor::new(PURCHASES_CSV), april())
        .await
        .unwrap();

    let summary = returns.portfolio_summary(april()).await.unwrap();
    assert_eq!(summary.total_clients(), 2);
    assert_eq!(summary.total_gst_payable, BigDecimal::from(1800));
    assert_eq!(summary.total_gst_credit, BigDecimal::from(3850));
    assert_eq!(summary.net_gst, BigDecimal::from(-2050));

    assert_eq!(backend.list_clients().await.unwrap().len(), 2);
}

#[test]
fn test_gst_calculations() {
    let intra = compute_tax(&BigDecimal::from(45000), &BigDecimal::from(12), false, None);
    assert_eq!(intra.cgst, BigDecimal::from(2700));
    assert_eq!(intra.sgst, BigDecimal::from(2700));
    assert_eq!(intra.igst, BigDecimal::from(0));
    assert_eq!(intra.invoice_value, BigDecimal::from(50400));

    let unusual = compute_tax(&BigDecimal::from(100), &BigDecimal::from(65), true, None);
    assert_eq!(unusual.igst, BigDecimal::from(65));

    assert!(purchase_template().starts_with("Supplier GSTIN,"));
}
