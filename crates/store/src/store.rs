//! Command execution over the ledger (application-level orchestration).
//!
//! The store implements a small synchronous pipeline:
//!
//! ```text
//! Command
//!   ↓
//! 1. Check the caller's version expectation (optimistic)
//!   ↓
//! 2. Handle command (pure decision logic, produces events)
//!   ↓
//! 3. Apply events to the snapshot
//!   ↓
//! 4. Journal events (append-only, monotonic sequence numbers)
//! ```
//!
//! Every operation runs to completion before the next is observed; callers
//! (typically a single-threaded UI event loop) serialize dispatches. The
//! typed operations mint identifiers and timestamps at this boundary and
//! hand back the created entity's id, so callers never have to re-read the
//! snapshot to find what they just created.

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, Utc};
use tracing::debug;
use uuid::Uuid;

use costledger_core::{
    Aggregate, AggregateRoot, ClientId, DomainResult, EntityId, ExpectedVersion,
};
use costledger_events::{Event, EventEnvelope};
use costledger_ledger::{
    AddCostEntry, CostCategory, CostEntryDraftPatch, CostEntryId, DateRange, DeleteCostEntry,
    DraftInvoiceItem, EditInvoice, GenerateInvoice, GenerateReceipt, GenerateSummaryReport,
    Invoice, InvoiceDraftPatch, InvoiceId, InvoiceItemId, InvoiceItemInput, InvoiceStatus,
    InvoiceUpdate, Ledger, LedgerCommand, LedgerEvent, LedgerId, LogPayment, NotificationChannel,
    NotificationId, PaymentId, PaymentMethod, ReceiptFormat, ReceiptId, ReportFilters, ReportId,
    SendInvoiceReminder, UpdateCostEntryDraft, UpdateInvoiceDraft, UpdateInvoiceStatus,
};
use costledger_tax::TaxRegion;

const AGGREGATE_TYPE: &str = "costledger.ledger";

/// Outcome of [`LedgerStore::log_payment`]: the created payment plus the
/// status transition it triggered, if any.
///
/// Returning the payment id directly makes log-then-receipt a two-call
/// sequence with no snapshot re-read in between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggedPayment {
    pub payment_id: PaymentId,
    pub status_change: Option<InvoiceStatus>,
}

/// Application-facing handle on the ledger: one mutable snapshot plus an
/// append-only journal of everything that changed it.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerStore {
    ledger: Ledger,
    journal: Vec<EventEnvelope<LedgerEvent>>,
}

impl LedgerStore {
    /// Store opened "today" (drafts seeded relative to the current date).
    pub fn new() -> Self {
        Self::opened_on(Utc::now().date_naive())
    }

    /// Store whose form drafts are seeded relative to the given day.
    /// Prefer this in tests for determinism.
    pub fn opened_on(today: NaiveDate) -> Self {
        Self {
            ledger: Ledger::new(LedgerId::new(EntityId::new()), today),
            journal: Vec::new(),
        }
    }

    /// Complete, consistent snapshot of the ledger.
    pub fn snapshot(&self) -> &Ledger {
        &self.ledger
    }

    /// Append-only journal of applied events.
    pub fn journal(&self) -> &[EventEnvelope<LedgerEvent>] {
        &self.journal
    }

    pub fn version(&self) -> u64 {
        self.ledger.version()
    }

    /// Dispatch a command through the handle → apply → journal pipeline and
    /// return the committed events.
    pub fn dispatch(&mut self, command: LedgerCommand) -> DomainResult<Vec<LedgerEvent>> {
        self.dispatch_expecting(ExpectedVersion::Any, command)
    }

    /// Like [`LedgerStore::dispatch`], but fail with a conflict when the
    /// ledger has moved past the version the caller decided against.
    pub fn dispatch_expecting(
        &mut self,
        expected: ExpectedVersion,
        command: LedgerCommand,
    ) -> DomainResult<Vec<LedgerEvent>> {
        expected.check(self.ledger.version())?;

        let events = self.ledger.handle(&command)?;
        for event in &events {
            self.ledger.apply(event);
            let sequence_number = self.journal.len() as u64 + 1;
            self.journal.push(EventEnvelope::new(
                Uuid::now_v7(),
                self.ledger.id_typed().0,
                AGGREGATE_TYPE,
                sequence_number,
                event.clone(),
            ));
            debug!(
                event_type = event.event_type(),
                version = self.ledger.version(),
                "applied ledger event"
            );
        }
        Ok(events)
    }

    // -- typed operations ---------------------------------------------------

    pub fn add_cost_entry(
        &mut self,
        category: CostCategory,
        amount: BigDecimal,
        date: NaiveDate,
        description: impl Into<String>,
    ) -> DomainResult<CostEntryId> {
        let entry_id = CostEntryId::new(EntityId::new());
        self.dispatch(LedgerCommand::AddCostEntry(AddCostEntry {
            entry_id,
            category,
            amount,
            date,
            description: description.into(),
            occurred_at: Utc::now(),
        }))?;
        Ok(entry_id)
    }

    /// Returns whether an entry was actually removed.
    pub fn delete_cost_entry(&mut self, entry_id: CostEntryId) -> DomainResult<bool> {
        let events = self.dispatch(LedgerCommand::DeleteCostEntry(DeleteCostEntry {
            entry_id,
            occurred_at: Utc::now(),
        }))?;
        Ok(!events.is_empty())
    }

    pub fn generate_invoice(
        &mut self,
        client_id: ClientId,
        items: Vec<DraftInvoiceItem>,
        tax_rate: BigDecimal,
        discount_rate: BigDecimal,
        due_date: NaiveDate,
        tax_region: Option<TaxRegion>,
    ) -> DomainResult<InvoiceId> {
        let invoice_id = InvoiceId::new(EntityId::new());
        let items = items
            .into_iter()
            .map(|draft| InvoiceItemInput {
                id: InvoiceItemId::new(EntityId::new()),
                name: draft.name,
                quantity: draft.quantity,
                unit_price: draft.unit_price,
            })
            .collect();
        self.dispatch(LedgerCommand::GenerateInvoice(GenerateInvoice {
            invoice_id,
            client_id,
            items,
            tax_rate,
            discount_rate,
            due_date,
            tax_region,
            occurred_at: Utc::now(),
        }))?;
        Ok(invoice_id)
    }

    pub fn edit_invoice(
        &mut self,
        invoice_id: InvoiceId,
        updates: InvoiceUpdate,
    ) -> DomainResult<()> {
        self.dispatch(LedgerCommand::EditInvoice(EditInvoice {
            invoice_id,
            updates,
            occurred_at: Utc::now(),
        }))?;
        Ok(())
    }

    pub fn send_invoice_reminder(
        &mut self,
        invoice_id: InvoiceId,
        channel: NotificationChannel,
        client_contact: impl Into<String>,
        message: impl Into<String>,
    ) -> DomainResult<NotificationId> {
        let notification_id = NotificationId::new(EntityId::new());
        self.dispatch(LedgerCommand::SendInvoiceReminder(SendInvoiceReminder {
            notification_id,
            invoice_id,
            channel,
            client_contact: client_contact.into(),
            message: message.into(),
            occurred_at: Utc::now(),
        }))?;
        Ok(notification_id)
    }

    /// Record a payment and return it together with the status transition it
    /// triggered, in one synchronous operation.
    pub fn log_payment(
        &mut self,
        invoice_id: InvoiceId,
        amount: BigDecimal,
        method: PaymentMethod,
        date: NaiveDate,
        notes: Option<String>,
    ) -> DomainResult<LoggedPayment> {
        let payment_id = PaymentId::new(EntityId::new());
        let events = self.dispatch(LedgerCommand::LogPayment(LogPayment {
            payment_id,
            invoice_id,
            amount,
            method,
            date,
            notes,
            occurred_at: Utc::now(),
        }))?;
        let status_change = events.iter().find_map(|event| match event {
            LedgerEvent::PaymentLogged(e) => e.status_change,
            _ => None,
        });
        Ok(LoggedPayment {
            payment_id,
            status_change,
        })
    }

    pub fn generate_receipt(
        &mut self,
        invoice_id: InvoiceId,
        payment_id: PaymentId,
        format: ReceiptFormat,
    ) -> DomainResult<ReceiptId> {
        let receipt_id = ReceiptId::new(EntityId::new());
        self.dispatch(LedgerCommand::GenerateReceipt(GenerateReceipt {
            receipt_id,
            invoice_id,
            payment_id,
            format,
            occurred_at: Utc::now(),
        }))?;
        Ok(receipt_id)
    }

    pub fn update_invoice_status(
        &mut self,
        invoice_id: InvoiceId,
        status: InvoiceStatus,
    ) -> DomainResult<()> {
        self.dispatch(LedgerCommand::UpdateInvoiceStatus(UpdateInvoiceStatus {
            invoice_id,
            status,
            occurred_at: Utc::now(),
        }))?;
        Ok(())
    }

    pub fn generate_summary_report(
        &mut self,
        date_range: DateRange,
        filters: ReportFilters,
    ) -> DomainResult<ReportId> {
        let report_id = ReportId::new(EntityId::new());
        self.dispatch(LedgerCommand::GenerateSummaryReport(GenerateSummaryReport {
            report_id,
            date_range,
            filters,
            occurred_at: Utc::now(),
        }))?;
        Ok(report_id)
    }

    pub fn update_cost_entry_draft(&mut self, patch: CostEntryDraftPatch) -> DomainResult<()> {
        self.dispatch(LedgerCommand::UpdateCostEntryDraft(UpdateCostEntryDraft {
            patch,
            occurred_at: Utc::now(),
        }))?;
        Ok(())
    }

    pub fn update_invoice_draft(&mut self, patch: InvoiceDraftPatch) -> DomainResult<()> {
        self.dispatch(LedgerCommand::UpdateInvoiceDraft(UpdateInvoiceDraft {
            patch,
            occurred_at: Utc::now(),
        }))?;
        Ok(())
    }

    /// Convenience lookup mirroring [`Ledger::invoice`].
    pub fn invoice(&self, invoice_id: InvoiceId) -> Option<&Invoice> {
        self.ledger.invoice(invoice_id)
    }
}

impl Default for LedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use costledger_core::DomainError;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn test_store() -> LedgerStore {
        LedgerStore::opened_on(day("2026-02-10"))
    }

    fn draft_item(name: &str, quantity: i64, unit_price: i64) -> DraftInvoiceItem {
        DraftInvoiceItem {
            name: name.to_string(),
            quantity,
            unit_price: BigDecimal::from(unit_price),
        }
    }

    #[test]
    fn journal_sequence_numbers_are_monotonic() {
        let mut store = test_store();
        store
            .add_cost_entry(
                CostCategory::Materials,
                BigDecimal::from(10),
                day("2026-02-09"),
                "paint",
            )
            .unwrap();
        store
            .generate_invoice(
                ClientId::from("client-1"),
                vec![draft_item("labor", 1, 100)],
                BigDecimal::from(0),
                BigDecimal::from(0),
                day("2026-03-12"),
                None,
            )
            .unwrap();

        let sequences: Vec<u64> = store.journal().iter().map(|e| e.sequence_number()).collect();
        assert_eq!(sequences, vec![1, 2]);
        assert_eq!(store.version(), 2);
        assert!(
            store
                .journal()
                .iter()
                .all(|e| e.aggregate_type() == "costledger.ledger")
        );
    }

    #[test]
    fn dispatch_expecting_rejects_stale_version() {
        let mut store = test_store();
        let observed = store.version();
        store
            .add_cost_entry(
                CostCategory::Labor,
                BigDecimal::from(50),
                day("2026-02-09"),
                "hours",
            )
            .unwrap();

        // A second caller decided against the old snapshot.
        let err = store
            .dispatch_expecting(
                ExpectedVersion::Exact(observed),
                LedgerCommand::DeleteCostEntry(DeleteCostEntry {
                    entry_id: CostEntryId::new(EntityId::new()),
                    occurred_at: Utc::now(),
                }),
            )
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn rejected_commands_leave_snapshot_and_journal_untouched() {
        let mut store = test_store();
        let before_version = store.version();
        let err = store
            .update_invoice_status(InvoiceId::new(EntityId::new()), InvoiceStatus::Sent)
            .unwrap_err();

        assert_eq!(err, DomainError::NotFound);
        assert_eq!(store.version(), before_version);
        assert!(store.journal().is_empty());
    }

    #[test]
    fn journal_envelopes_serialize_to_json() {
        let mut store = test_store();
        store
            .add_cost_entry(
                CostCategory::Materials,
                BigDecimal::from(10),
                day("2026-02-09"),
                "paint",
            )
            .unwrap();

        let json = serde_json::to_value(&store.journal()[0]).unwrap();
        assert_eq!(json["aggregate_type"], "costledger.ledger");
        assert_eq!(json["sequence_number"], 1);
        assert_eq!(
            json["payload"]["CostEntryAdded"]["entry"]["category"],
            "materials"
        );
    }

    #[test]
    fn log_payment_returns_created_payment_and_transition() {
        let mut store = test_store();
        let invoice_id = store
            .generate_invoice(
                ClientId::from("client-1"),
                vec![draft_item("design", 2, 50)],
                BigDecimal::from(0),
                BigDecimal::from(0),
                day("2026-03-12"),
                Some(TaxRegion::Eu),
            )
            .unwrap();

        let logged = store
            .log_payment(
                invoice_id,
                BigDecimal::from(121),
                PaymentMethod::BankTransfer,
                day("2026-02-20"),
                None,
            )
            .unwrap();

        assert_eq!(logged.status_change, Some(InvoiceStatus::Paid));
        // The returned id resolves without re-reading any payment list.
        assert!(store.snapshot().payment(logged.payment_id).is_some());
    }
}
