use std::collections::BTreeMap;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use costledger_core::{ClientId, EntityId};

use crate::invoice::{Invoice, InvoiceStatus};

/// Report identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportId(pub EntityId);

impl ReportId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ReportId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Inclusive business-time window over invoice creation instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }
}

/// Optional narrowing applied on top of the date range.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReportFilters {
    /// Keep only invoices whose status is in the set.
    pub status: Option<Vec<InvoiceStatus>>,
    /// Keep only invoices billed to this client.
    pub client_id: Option<ClientId>,
}

impl ReportFilters {
    pub fn matches(&self, invoice: &Invoice) -> bool {
        let status_ok = self
            .status
            .as_ref()
            .is_none_or(|wanted| wanted.contains(&invoice.status));
        let client_ok = self
            .client_id
            .as_ref()
            .is_none_or(|client| *client == invoice.client_id);
        status_ok && client_ok
    }
}

/// Aggregates over a filtered invoice set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceSummary {
    pub total_invoices: u64,
    pub total_amount: BigDecimal,
    /// Sum of totals with status `paid`.
    pub paid_amount: BigDecimal,
    /// Sum of totals with status `draft`, `sent` or `partially_paid`.
    pub unpaid_amount: BigDecimal,
    /// Sum of totals with status `overdue`.
    pub overdue_amount: BigDecimal,
    pub invoices_by_status: BTreeMap<InvoiceStatus, u64>,
}

impl InvoiceSummary {
    pub fn compute<'a>(invoices: impl IntoIterator<Item = &'a Invoice>) -> Self {
        let zero = || BigDecimal::from(0);
        let mut summary = Self {
            total_invoices: 0,
            total_amount: zero(),
            paid_amount: zero(),
            unpaid_amount: zero(),
            overdue_amount: zero(),
            invoices_by_status: BTreeMap::new(),
        };

        for invoice in invoices {
            summary.total_invoices += 1;
            summary.total_amount += &invoice.total;
            match invoice.status {
                InvoiceStatus::Paid => summary.paid_amount += &invoice.total,
                InvoiceStatus::Overdue => summary.overdue_amount += &invoice.total,
                status if status.is_unpaid() => summary.unpaid_amount += &invoice.total,
                // Cancelled totals count toward the overall amount only.
                _ => {}
            }
            *summary.invoices_by_status.entry(invoice.status).or_insert(0) += 1;
        }

        summary
    }

    pub fn is_empty(&self) -> bool {
        self.total_invoices == 0
    }
}

/// Snapshot of invoice aggregates at generation time.
///
/// Reports are never recomputed: numbers reflect the ledger as it stood when
/// the report was generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceSummaryReport {
    pub id: ReportId,
    pub date_range: DateRange,
    pub filters: ReportFilters,
    pub data: InvoiceSummary,
    pub generated_at: DateTime<Utc>,
}
