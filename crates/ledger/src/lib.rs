//! Cost-management ledger domain (state machine).
//!
//! This crate contains the business rules for cost entries, invoices,
//! payments, receipts, reminder notifications and summary reports,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no
//! storage). The [`Ledger`] aggregate owns every collection; commands decide
//! events, events evolve state.

pub mod cost_entry;
pub mod drafts;
pub mod invoice;
pub mod ledger;
pub mod notification;
pub mod payment;
pub mod receipt;
pub mod report;

pub use cost_entry::{CostCategory, CostEntry, CostEntryId};
pub use drafts::{
    CostEntryDraft, CostEntryDraftPatch, DraftInvoiceItem, InvoiceDraft, InvoiceDraftPatch,
};
pub use invoice::{
    Invoice, InvoiceFinancials, InvoiceId, InvoiceItem, InvoiceItemId, InvoiceItemInput,
    InvoiceNumber, InvoiceStatus, InvoiceUpdate,
};
pub use ledger::{
    AddCostEntry, CostEntryAdded, CostEntryDeleted, CostEntryDraftUpdated, DeleteCostEntry,
    EditInvoice, GenerateInvoice, GenerateReceipt, GenerateSummaryReport, InvoiceDraftUpdated,
    InvoiceEdited, InvoiceGenerated, InvoiceStatusUpdated, Ledger, LedgerCommand, LedgerEvent,
    LedgerId, LogPayment, PaymentLogged, ReceiptGenerated, ReminderSent, SendInvoiceReminder,
    SummaryReportGenerated, UpdateCostEntryDraft, UpdateInvoiceDraft, UpdateInvoiceStatus,
};
pub use notification::{DeliveryStatus, Notification, NotificationChannel, NotificationId};
pub use payment::{Payment, PaymentId, PaymentMethod};
pub use receipt::{Receipt, ReceiptFormat, ReceiptId};
pub use report::{DateRange, InvoiceSummary, InvoiceSummaryReport, ReportFilters, ReportId};
