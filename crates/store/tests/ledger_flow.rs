//! End-to-end flows through the store, shaped like the dialogs that drive it:
//! cost logging, invoicing, payment + receipt, reminders, reporting.

use anyhow::Result;
use bigdecimal::BigDecimal;
use chrono::{NaiveDate, Utc};

use costledger_ledger::{
    CostCategory, CostEntryDraftPatch, DateRange, DraftInvoiceItem, InvoiceStatus, InvoiceUpdate,
    NotificationChannel, PaymentMethod, ReceiptFormat, ReportFilters,
};
use costledger_store::LedgerStore;
use costledger_tax::TaxRegion;

fn day(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn draft_item(name: &str, quantity: i64, unit_price: i64) -> DraftInvoiceItem {
    DraftInvoiceItem {
        name: name.to_string(),
        quantity,
        unit_price: BigDecimal::from(unit_price),
    }
}

#[test]
fn cost_entry_lifecycle() -> Result<()> {
    costledger_observability::init();
    let mut store = LedgerStore::opened_on(day("2026-02-10"));

    store.update_cost_entry_draft(CostEntryDraftPatch {
        category: Some(CostCategory::Materials),
        amount: Some("120.00".to_string()),
        ..Default::default()
    })?;
    assert_eq!(store.snapshot().cost_entry_draft().amount, "120.00");

    let entry_id = store.add_cost_entry(
        CostCategory::Materials,
        BigDecimal::from(120),
        day("2026-02-09"),
        "lumber",
    )?;
    assert_eq!(store.snapshot().cost_entries().len(), 1);

    assert!(store.delete_cost_entry(entry_id)?);
    assert!(store.snapshot().cost_entries().is_empty());
    // Deleting again is an accepted no-op.
    assert!(!store.delete_cost_entry(entry_id)?);

    Ok(())
}

#[test]
fn invoice_payment_and_receipt_flow() -> Result<()> {
    costledger_observability::init();
    let mut store = LedgerStore::opened_on(day("2026-02-10"));

    let invoice_id = store.generate_invoice(
        "client-1".into(),
        vec![draft_item("design work", 2, 50)],
        BigDecimal::from(0),
        BigDecimal::from(0),
        day("2026-03-12"),
        Some(TaxRegion::Eu),
    )?;

    let invoice = store.invoice(invoice_id).expect("invoice just created");
    assert_eq!(invoice.subtotal, BigDecimal::from(100));
    assert_eq!(invoice.tax_amount, BigDecimal::from(21));
    assert_eq!(invoice.total, BigDecimal::from(121));
    assert_eq!(invoice.status, InvoiceStatus::Draft);

    store.send_invoice_reminder(
        invoice_id,
        NotificationChannel::Email,
        "billing@client.example",
        "Invoice due in 30 days",
    )?;
    assert_eq!(store.snapshot().notifications().len(), 1);

    // Partial payment, then a digital receipt for exactly that payment.
    let partial = store.log_payment(
        invoice_id,
        BigDecimal::from(60),
        PaymentMethod::BankTransfer,
        day("2026-02-20"),
        Some("first installment".to_string()),
    )?;
    assert_eq!(partial.status_change, Some(InvoiceStatus::PartiallyPaid));
    assert_eq!(
        store.snapshot().balance_due(invoice_id),
        Some(BigDecimal::from(61))
    );

    store.generate_receipt(invoice_id, partial.payment_id, ReceiptFormat::Digital)?;
    assert_eq!(store.snapshot().receipts().len(), 1);
    assert_eq!(store.snapshot().receipts()[0].amount, BigDecimal::from(60));

    // Settle the rest; status lands on paid and stays there.
    let settling = store.log_payment(
        invoice_id,
        BigDecimal::from(61),
        PaymentMethod::BankTransfer,
        day("2026-02-25"),
        None,
    )?;
    assert_eq!(settling.status_change, Some(InvoiceStatus::Paid));

    let extra = store.log_payment(
        invoice_id,
        BigDecimal::from(10),
        PaymentMethod::Cash,
        day("2026-02-26"),
        None,
    )?;
    assert_eq!(extra.status_change, None);
    assert_eq!(
        store.invoice(invoice_id).expect("still present").status,
        InvoiceStatus::Paid
    );

    Ok(())
}

#[test]
fn edit_and_report_flow() -> Result<()> {
    costledger_observability::init();
    let mut store = LedgerStore::opened_on(day("2026-02-10"));

    let invoice_id = store.generate_invoice(
        "client-1".into(),
        vec![draft_item("widgets", 3, 40)],
        BigDecimal::from(10),
        BigDecimal::from(0),
        day("2026-03-12"),
        None,
    )?;

    store.edit_invoice(
        invoice_id,
        InvoiceUpdate {
            discount_rate: Some(BigDecimal::from(25)),
            status: Some(InvoiceStatus::Sent),
            ..Default::default()
        },
    )?;
    let invoice = store.invoice(invoice_id).expect("edited invoice");
    assert_eq!(invoice.subtotal, BigDecimal::from(120));
    assert_eq!(invoice.discount_amount, BigDecimal::from(30));
    assert_eq!(
        invoice.total,
        &invoice.subtotal + &invoice.tax_amount - &invoice.discount_amount
    );
    assert_eq!(invoice.status, InvoiceStatus::Sent);

    let report_id = store.generate_summary_report(
        DateRange {
            start: "2026-01-01T00:00:00Z".parse()?,
            end: Utc::now(),
        },
        ReportFilters {
            status: Some(vec![InvoiceStatus::Sent]),
            client_id: None,
        },
    )?;
    let report = store
        .snapshot()
        .reports()
        .iter()
        .find(|r| r.id == report_id)
        .expect("report just generated");
    assert_eq!(report.data.total_invoices, 1);
    assert_eq!(report.data.unpaid_amount, report.data.total_amount);

    // The journal saw every applied event.
    assert_eq!(store.journal().len() as u64, store.version());

    Ok(())
}
