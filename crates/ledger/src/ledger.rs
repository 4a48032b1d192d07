use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use costledger_core::{
    Aggregate, AggregateRoot, ClientId, DomainError, DomainResult, EntityId,
};
use costledger_events::Event;
use costledger_tax::TaxRegion;

use crate::cost_entry::{CostCategory, CostEntry, CostEntryId};
use crate::drafts::{CostEntryDraft, CostEntryDraftPatch, InvoiceDraft, InvoiceDraftPatch};
use crate::invoice::{
    Invoice, InvoiceFinancials, InvoiceId, InvoiceItem, InvoiceItemInput, InvoiceNumber,
    InvoiceStatus, InvoiceUpdate,
};
use crate::notification::{
    DeliveryStatus, Notification, NotificationChannel, NotificationId,
};
use crate::payment::{Payment, PaymentId, PaymentMethod};
use crate::receipt::{Receipt, ReceiptFormat, ReceiptId};
use crate::report::{DateRange, InvoiceSummary, InvoiceSummaryReport, ReportFilters, ReportId};

/// Ledger identifier (aggregate id).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LedgerId(pub EntityId);

impl LedgerId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for LedgerId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Aggregate root: the complete cost-management ledger.
///
/// Owns every financial collection plus the two transient form drafts.
/// `handle` decides events without mutating; `apply` evolves state and bumps
/// the version, so each applied event yields a new observable snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    id: LedgerId,
    cost_entries: Vec<CostEntry>,
    invoices: Vec<Invoice>,
    payments: Vec<Payment>,
    receipts: Vec<Receipt>,
    notifications: Vec<Notification>,
    reports: Vec<InvoiceSummaryReport>,
    cost_entry_draft: CostEntryDraft,
    invoice_draft: InvoiceDraft,
    version: u64,
}

impl Ledger {
    /// Empty ledger; drafts are seeded relative to the given day.
    pub fn new(id: LedgerId, today: NaiveDate) -> Self {
        Self {
            id,
            cost_entries: Vec::new(),
            invoices: Vec::new(),
            payments: Vec::new(),
            receipts: Vec::new(),
            notifications: Vec::new(),
            reports: Vec::new(),
            cost_entry_draft: CostEntryDraft::seed(today),
            invoice_draft: InvoiceDraft::seed(today),
            version: 0,
        }
    }

    pub fn id_typed(&self) -> LedgerId {
        self.id
    }

    pub fn cost_entries(&self) -> &[CostEntry] {
        &self.cost_entries
    }

    pub fn invoices(&self) -> &[Invoice] {
        &self.invoices
    }

    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    pub fn receipts(&self) -> &[Receipt] {
        &self.receipts
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn reports(&self) -> &[InvoiceSummaryReport] {
        &self.reports
    }

    pub fn cost_entry_draft(&self) -> &CostEntryDraft {
        &self.cost_entry_draft
    }

    pub fn invoice_draft(&self) -> &InvoiceDraft {
        &self.invoice_draft
    }

    pub fn cost_entry(&self, id: CostEntryId) -> Option<&CostEntry> {
        self.cost_entries.iter().find(|e| e.id == id)
    }

    pub fn invoice(&self, id: InvoiceId) -> Option<&Invoice> {
        self.invoices.iter().find(|i| i.id == id)
    }

    pub fn payment(&self, id: PaymentId) -> Option<&Payment> {
        self.payments.iter().find(|p| p.id == id)
    }

    /// Sum of all payments recorded against the invoice.
    pub fn total_paid(&self, invoice_id: InvoiceId) -> BigDecimal {
        self.payments
            .iter()
            .filter(|p| p.invoice_id == invoice_id)
            .map(|p| &p.amount)
            .sum()
    }

    /// What is still owed on the invoice; negative when overpaid.
    pub fn balance_due(&self, invoice_id: InvoiceId) -> Option<BigDecimal> {
        self.invoice(invoice_id)
            .map(|inv| &inv.total - self.total_paid(invoice_id))
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// Command: AddCostEntry.
///
/// The amount is recorded as given; sign checks stay with the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddCostEntry {
    pub entry_id: CostEntryId,
    pub category: CostCategory,
    pub amount: BigDecimal,
    pub date: NaiveDate,
    pub description: String,
    pub occurred_at: DateTime<Utc>,
}

/// Command: DeleteCostEntry. Deleting an absent entry is an accepted no-op.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteCostEntry {
    pub entry_id: CostEntryId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: GenerateInvoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateInvoice {
    pub invoice_id: InvoiceId,
    pub client_id: ClientId,
    pub items: Vec<InvoiceItemInput>,
    /// Manual rate in percent; ignored when `tax_region` is given.
    pub tax_rate: BigDecimal,
    pub discount_rate: BigDecimal,
    pub due_date: NaiveDate,
    pub tax_region: Option<TaxRegion>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: EditInvoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditInvoice {
    pub invoice_id: InvoiceId,
    pub updates: InvoiceUpdate,
    pub occurred_at: DateTime<Utc>,
}

/// Command: SendInvoiceReminder.
///
/// The referenced invoice is not checked; the notification is a log entry,
/// not a delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendInvoiceReminder {
    pub notification_id: NotificationId,
    pub invoice_id: InvoiceId,
    pub channel: NotificationChannel,
    pub client_contact: String,
    pub message: String,
    pub occurred_at: DateTime<Utc>,
}

/// Command: LogPayment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogPayment {
    pub payment_id: PaymentId,
    pub invoice_id: InvoiceId,
    pub amount: BigDecimal,
    pub method: PaymentMethod,
    pub date: NaiveDate,
    pub notes: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: GenerateReceipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateReceipt {
    pub receipt_id: ReceiptId,
    pub invoice_id: InvoiceId,
    pub payment_id: PaymentId,
    pub format: ReceiptFormat,
    pub occurred_at: DateTime<Utc>,
}

/// Command: UpdateInvoiceStatus.
///
/// Unconditional overwrite: any status is reachable from any status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateInvoiceStatus {
    pub invoice_id: InvoiceId,
    pub status: InvoiceStatus,
    pub occurred_at: DateTime<Utc>,
}

/// Command: GenerateSummaryReport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateSummaryReport {
    pub report_id: ReportId,
    pub date_range: DateRange,
    pub filters: ReportFilters,
    pub occurred_at: DateTime<Utc>,
}

/// Command: UpdateCostEntryDraft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCostEntryDraft {
    pub patch: CostEntryDraftPatch,
    pub occurred_at: DateTime<Utc>,
}

/// Command: UpdateInvoiceDraft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateInvoiceDraft {
    pub patch: InvoiceDraftPatch,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerCommand {
    AddCostEntry(AddCostEntry),
    DeleteCostEntry(DeleteCostEntry),
    GenerateInvoice(GenerateInvoice),
    EditInvoice(EditInvoice),
    SendInvoiceReminder(SendInvoiceReminder),
    LogPayment(LogPayment),
    GenerateReceipt(GenerateReceipt),
    UpdateInvoiceStatus(UpdateInvoiceStatus),
    GenerateSummaryReport(GenerateSummaryReport),
    UpdateCostEntryDraft(UpdateCostEntryDraft),
    UpdateInvoiceDraft(UpdateInvoiceDraft),
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Event: CostEntryAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostEntryAdded {
    pub entry: CostEntry,
    pub occurred_at: DateTime<Utc>,
}

/// Event: CostEntryDeleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostEntryDeleted {
    pub entry_id: CostEntryId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: InvoiceGenerated. Carries the fully-computed invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceGenerated {
    pub invoice: Invoice,
    pub occurred_at: DateTime<Utc>,
}

/// Event: InvoiceEdited. Carries the merged, recomputed invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceEdited {
    pub invoice: Invoice,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ReminderSent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderSent {
    pub notification: Notification,
    pub occurred_at: DateTime<Utc>,
}

/// Event: PaymentLogged.
///
/// `status_change` is the transition this payment triggered on its invoice,
/// if any; `None` also covers payments against an unknown invoice, which are
/// still recorded as orphaned references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentLogged {
    pub payment: Payment,
    pub status_change: Option<InvoiceStatus>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ReceiptGenerated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptGenerated {
    pub receipt: Receipt,
    pub occurred_at: DateTime<Utc>,
}

/// Event: InvoiceStatusUpdated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceStatusUpdated {
    pub invoice_id: InvoiceId,
    pub status: InvoiceStatus,
    pub occurred_at: DateTime<Utc>,
}

/// Event: SummaryReportGenerated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryReportGenerated {
    pub report: InvoiceSummaryReport,
    pub occurred_at: DateTime<Utc>,
}

/// Event: CostEntryDraftUpdated. Carries the merged draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostEntryDraftUpdated {
    pub draft: CostEntryDraft,
    pub occurred_at: DateTime<Utc>,
}

/// Event: InvoiceDraftUpdated. Carries the merged draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceDraftUpdated {
    pub draft: InvoiceDraft,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    CostEntryAdded(CostEntryAdded),
    CostEntryDeleted(CostEntryDeleted),
    InvoiceGenerated(InvoiceGenerated),
    InvoiceEdited(InvoiceEdited),
    ReminderSent(ReminderSent),
    PaymentLogged(PaymentLogged),
    ReceiptGenerated(ReceiptGenerated),
    InvoiceStatusUpdated(InvoiceStatusUpdated),
    SummaryReportGenerated(SummaryReportGenerated),
    CostEntryDraftUpdated(CostEntryDraftUpdated),
    InvoiceDraftUpdated(InvoiceDraftUpdated),
}

impl Event for LedgerEvent {
    fn event_type(&self) -> &'static str {
        match self {
            LedgerEvent::CostEntryAdded(_) => "ledger.cost_entry.added",
            LedgerEvent::CostEntryDeleted(_) => "ledger.cost_entry.deleted",
            LedgerEvent::InvoiceGenerated(_) => "ledger.invoice.generated",
            LedgerEvent::InvoiceEdited(_) => "ledger.invoice.edited",
            LedgerEvent::ReminderSent(_) => "ledger.invoice.reminder_sent",
            LedgerEvent::PaymentLogged(_) => "ledger.payment.logged",
            LedgerEvent::ReceiptGenerated(_) => "ledger.receipt.generated",
            LedgerEvent::InvoiceStatusUpdated(_) => "ledger.invoice.status_updated",
            LedgerEvent::SummaryReportGenerated(_) => "ledger.report.generated",
            LedgerEvent::CostEntryDraftUpdated(_) => "ledger.cost_entry_draft.updated",
            LedgerEvent::InvoiceDraftUpdated(_) => "ledger.invoice_draft.updated",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            LedgerEvent::CostEntryAdded(e) => e.occurred_at,
            LedgerEvent::CostEntryDeleted(e) => e.occurred_at,
            LedgerEvent::InvoiceGenerated(e) => e.occurred_at,
            LedgerEvent::InvoiceEdited(e) => e.occurred_at,
            LedgerEvent::ReminderSent(e) => e.occurred_at,
            LedgerEvent::PaymentLogged(e) => e.occurred_at,
            LedgerEvent::ReceiptGenerated(e) => e.occurred_at,
            LedgerEvent::InvoiceStatusUpdated(e) => e.occurred_at,
            LedgerEvent::SummaryReportGenerated(e) => e.occurred_at,
            LedgerEvent::CostEntryDraftUpdated(e) => e.occurred_at,
            LedgerEvent::InvoiceDraftUpdated(e) => e.occurred_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregate
// ---------------------------------------------------------------------------

impl AggregateRoot for Ledger {
    type Id = LedgerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

impl Aggregate for Ledger {
    type Command = LedgerCommand;
    type Event = LedgerEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            LedgerEvent::CostEntryAdded(e) => {
                self.cost_entries.push(e.entry.clone());
            }
            LedgerEvent::CostEntryDeleted(e) => {
                self.cost_entries.retain(|entry| entry.id != e.entry_id);
            }
            LedgerEvent::InvoiceGenerated(e) => {
                self.invoices.push(e.invoice.clone());
            }
            LedgerEvent::InvoiceEdited(e) => {
                if let Some(slot) = self.invoices.iter_mut().find(|i| i.id == e.invoice.id) {
                    *slot = e.invoice.clone();
                }
            }
            LedgerEvent::ReminderSent(e) => {
                self.notifications.push(e.notification.clone());
            }
            LedgerEvent::PaymentLogged(e) => {
                self.payments.push(e.payment.clone());
                if let Some(status) = e.status_change {
                    if let Some(invoice) = self
                        .invoices
                        .iter_mut()
                        .find(|i| i.id == e.payment.invoice_id)
                    {
                        invoice.status = status;
                        invoice.updated_at = e.occurred_at;
                    }
                }
            }
            LedgerEvent::ReceiptGenerated(e) => {
                self.receipts.push(e.receipt.clone());
            }
            LedgerEvent::InvoiceStatusUpdated(e) => {
                if let Some(invoice) = self.invoices.iter_mut().find(|i| i.id == e.invoice_id) {
                    invoice.status = e.status;
                    invoice.updated_at = e.occurred_at;
                }
            }
            LedgerEvent::SummaryReportGenerated(e) => {
                self.reports.push(e.report.clone());
            }
            LedgerEvent::CostEntryDraftUpdated(e) => {
                self.cost_entry_draft = e.draft.clone();
            }
            LedgerEvent::InvoiceDraftUpdated(e) => {
                self.invoice_draft = e.draft.clone();
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            LedgerCommand::AddCostEntry(cmd) => self.handle_add_cost_entry(cmd),
            LedgerCommand::DeleteCostEntry(cmd) => self.handle_delete_cost_entry(cmd),
            LedgerCommand::GenerateInvoice(cmd) => self.handle_generate_invoice(cmd),
            LedgerCommand::EditInvoice(cmd) => self.handle_edit_invoice(cmd),
            LedgerCommand::SendInvoiceReminder(cmd) => self.handle_send_reminder(cmd),
            LedgerCommand::LogPayment(cmd) => self.handle_log_payment(cmd),
            LedgerCommand::GenerateReceipt(cmd) => self.handle_generate_receipt(cmd),
            LedgerCommand::UpdateInvoiceStatus(cmd) => self.handle_update_status(cmd),
            LedgerCommand::GenerateSummaryReport(cmd) => self.handle_generate_report(cmd),
            LedgerCommand::UpdateCostEntryDraft(cmd) => self.handle_update_cost_entry_draft(cmd),
            LedgerCommand::UpdateInvoiceDraft(cmd) => self.handle_update_invoice_draft(cmd),
        }
    }
}

/// Status transition a payment triggers, if any.
///
/// Fully paid invoices never regress, and the overdue/cancelled lifecycles
/// are managed through explicit status updates only.
fn payment_status_transition(
    current: InvoiceStatus,
    total_paid: &BigDecimal,
    invoice_total: &BigDecimal,
) -> Option<InvoiceStatus> {
    match current {
        InvoiceStatus::Paid | InvoiceStatus::Overdue | InvoiceStatus::Cancelled => None,
        _ => {
            let next = if total_paid >= invoice_total {
                InvoiceStatus::Paid
            } else if *total_paid > BigDecimal::from(0) {
                InvoiceStatus::PartiallyPaid
            } else {
                return None;
            };
            (next != current).then_some(next)
        }
    }
}

impl Ledger {
    fn handle_add_cost_entry(&self, cmd: &AddCostEntry) -> DomainResult<Vec<LedgerEvent>> {
        let entry = CostEntry {
            id: cmd.entry_id,
            category: cmd.category,
            amount: cmd.amount.clone(),
            date: cmd.date,
            description: cmd.description.clone(),
            created_at: cmd.occurred_at,
        };
        Ok(vec![LedgerEvent::CostEntryAdded(CostEntryAdded {
            entry,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_delete_cost_entry(&self, cmd: &DeleteCostEntry) -> DomainResult<Vec<LedgerEvent>> {
        if self.cost_entry(cmd.entry_id).is_none() {
            // Idempotent: deleting what is already gone changes nothing.
            return Ok(vec![]);
        }
        Ok(vec![LedgerEvent::CostEntryDeleted(CostEntryDeleted {
            entry_id: cmd.entry_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_generate_invoice(&self, cmd: &GenerateInvoice) -> DomainResult<Vec<LedgerEvent>> {
        if self.invoice(cmd.invoice_id).is_some() {
            return Err(DomainError::conflict("invoice already exists"));
        }

        let items = InvoiceItem::build(&cmd.items)?;
        let financials = InvoiceFinancials::on_generate(
            &items,
            &cmd.tax_rate,
            &cmd.discount_rate,
            cmd.tax_region,
        );

        let mut invoice = Invoice {
            id: cmd.invoice_id,
            invoice_number: InvoiceNumber::generate(cmd.invoice_id, cmd.occurred_at),
            client_id: cmd.client_id.clone(),
            items,
            subtotal: BigDecimal::from(0),
            tax_rate: cmd.tax_rate.clone(),
            tax_amount: BigDecimal::from(0),
            tax_region: cmd.tax_region,
            discount_rate: cmd.discount_rate.clone(),
            discount_amount: BigDecimal::from(0),
            total: BigDecimal::from(0),
            due_date: cmd.due_date,
            status: InvoiceStatus::Draft,
            created_at: cmd.occurred_at,
            updated_at: cmd.occurred_at,
        };
        invoice.apply_financials(financials);

        Ok(vec![LedgerEvent::InvoiceGenerated(InvoiceGenerated {
            invoice,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_edit_invoice(&self, cmd: &EditInvoice) -> DomainResult<Vec<LedgerEvent>> {
        let current = self.invoice(cmd.invoice_id).ok_or(DomainError::NotFound)?;
        let updates = &cmd.updates;

        let mut next = current.clone();
        if let Some(client_id) = &updates.client_id {
            next.client_id = client_id.clone();
        }
        if let Some(items) = &updates.items {
            next.items = InvoiceItem::build(items)?;
        }
        if let Some(tax_rate) = &updates.tax_rate {
            next.tax_rate = tax_rate.clone();
        }
        if let Some(region) = updates.tax_region {
            next.tax_region = Some(region);
        }
        if let Some(discount_rate) = &updates.discount_rate {
            next.discount_rate = discount_rate.clone();
        }
        if let Some(due_date) = updates.due_date {
            next.due_date = due_date;
        }
        if let Some(status) = updates.status {
            next.status = status;
        }

        if updates.touches_financials() {
            let financials =
                InvoiceFinancials::on_edit(&next.items, &next.tax_rate, &next.discount_rate);
            next.apply_financials(financials);
        }
        next.updated_at = cmd.occurred_at;

        Ok(vec![LedgerEvent::InvoiceEdited(InvoiceEdited {
            invoice: next,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_send_reminder(&self, cmd: &SendInvoiceReminder) -> DomainResult<Vec<LedgerEvent>> {
        let notification = Notification {
            id: cmd.notification_id,
            invoice_id: cmd.invoice_id,
            channel: cmd.channel,
            client_contact: cmd.client_contact.clone(),
            message: cmd.message.clone(),
            sent_at: cmd.occurred_at,
            delivery: DeliveryStatus::Sent,
        };
        Ok(vec![LedgerEvent::ReminderSent(ReminderSent {
            notification,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_log_payment(&self, cmd: &LogPayment) -> DomainResult<Vec<LedgerEvent>> {
        if cmd.amount <= BigDecimal::from(0) {
            return Err(DomainError::validation("payment amount must be positive"));
        }

        let payment = Payment {
            id: cmd.payment_id,
            invoice_id: cmd.invoice_id,
            amount: cmd.amount.clone(),
            method: cmd.method,
            date: cmd.date,
            notes: cmd.notes.clone(),
        };

        // A payment against an unknown invoice is still recorded; it simply
        // triggers no status transition.
        let status_change = self.invoice(cmd.invoice_id).and_then(|invoice| {
            let total_paid = self.total_paid(cmd.invoice_id) + &cmd.amount;
            payment_status_transition(invoice.status, &total_paid, &invoice.total)
        });

        Ok(vec![LedgerEvent::PaymentLogged(PaymentLogged {
            payment,
            status_change,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_generate_receipt(&self, cmd: &GenerateReceipt) -> DomainResult<Vec<LedgerEvent>> {
        let payment = self.payment(cmd.payment_id).ok_or(DomainError::NotFound)?;

        let receipt = Receipt {
            id: cmd.receipt_id,
            invoice_id: cmd.invoice_id,
            payment_id: cmd.payment_id,
            amount: payment.amount.clone(),
            date: cmd.occurred_at,
            format: cmd.format,
        };
        Ok(vec![LedgerEvent::ReceiptGenerated(ReceiptGenerated {
            receipt,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_update_status(&self, cmd: &UpdateInvoiceStatus) -> DomainResult<Vec<LedgerEvent>> {
        if self.invoice(cmd.invoice_id).is_none() {
            return Err(DomainError::NotFound);
        }
        Ok(vec![LedgerEvent::InvoiceStatusUpdated(
            InvoiceStatusUpdated {
                invoice_id: cmd.invoice_id,
                status: cmd.status,
                occurred_at: cmd.occurred_at,
            },
        )])
    }

    fn handle_generate_report(&self, cmd: &GenerateSummaryReport) -> DomainResult<Vec<LedgerEvent>> {
        let matching = self.invoices.iter().filter(|invoice| {
            cmd.date_range.contains(invoice.created_at) && cmd.filters.matches(invoice)
        });
        let data = InvoiceSummary::compute(matching);

        let report = InvoiceSummaryReport {
            id: cmd.report_id,
            date_range: cmd.date_range,
            filters: cmd.filters.clone(),
            data,
            generated_at: cmd.occurred_at,
        };
        Ok(vec![LedgerEvent::SummaryReportGenerated(
            SummaryReportGenerated {
                report,
                occurred_at: cmd.occurred_at,
            },
        )])
    }

    fn handle_update_cost_entry_draft(
        &self,
        cmd: &UpdateCostEntryDraft,
    ) -> DomainResult<Vec<LedgerEvent>> {
        Ok(vec![LedgerEvent::CostEntryDraftUpdated(
            CostEntryDraftUpdated {
                draft: self.cost_entry_draft.merged(&cmd.patch),
                occurred_at: cmd.occurred_at,
            },
        )])
    }

    fn handle_update_invoice_draft(
        &self,
        cmd: &UpdateInvoiceDraft,
    ) -> DomainResult<Vec<LedgerEvent>> {
        Ok(vec![LedgerEvent::InvoiceDraftUpdated(InvoiceDraftUpdated {
            draft: self.invoice_draft.merged(&cmd.patch),
            occurred_at: cmd.occurred_at,
        })])
    }
}
