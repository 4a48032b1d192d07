use bigdecimal::BigDecimal;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use costledger_core::ClientId;
use costledger_tax::TaxRegion;

use crate::cost_entry::CostCategory;

/// Transient mirror of the cost-entry form.
///
/// Drafts are not authoritative: numeric fields stay raw text until the
/// caller parses and submits them as a real command. The ledger only keeps
/// the mirror so every reader sees the same in-progress input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostEntryDraft {
    pub category: CostCategory,
    pub amount: String,
    pub date: NaiveDate,
    pub description: String,
}

impl CostEntryDraft {
    /// Fresh form state, dated to the given day.
    pub fn seed(today: NaiveDate) -> Self {
        Self {
            category: CostCategory::Materials,
            amount: String::new(),
            date: today,
            description: String::new(),
        }
    }

    pub fn merged(&self, patch: &CostEntryDraftPatch) -> Self {
        Self {
            category: patch.category.unwrap_or(self.category),
            amount: patch.amount.clone().unwrap_or_else(|| self.amount.clone()),
            date: patch.date.unwrap_or(self.date),
            description: patch
                .description
                .clone()
                .unwrap_or_else(|| self.description.clone()),
        }
    }
}

/// Partial update for [`CostEntryDraft`]; `None` keeps the current value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CostEntryDraftPatch {
    pub category: Option<CostCategory>,
    pub amount: Option<String>,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
}

/// One in-progress invoice line in the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftInvoiceItem {
    pub name: String,
    pub quantity: i64,
    pub unit_price: BigDecimal,
}

impl Default for DraftInvoiceItem {
    fn default() -> Self {
        Self {
            name: String::new(),
            quantity: 1,
            unit_price: BigDecimal::from(0),
        }
    }
}

/// Transient mirror of the invoice form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceDraft {
    pub client_id: ClientId,
    pub items: Vec<DraftInvoiceItem>,
    pub tax_rate: String,
    /// Whether submission should bill by region instead of the manual rate.
    pub use_tax_region: bool,
    pub tax_region: TaxRegion,
    pub discount_rate: String,
    pub due_date: NaiveDate,
}

impl InvoiceDraft {
    /// Fresh form state: one empty line, manual taxing, due in 30 days.
    pub fn seed(today: NaiveDate) -> Self {
        Self {
            client_id: ClientId::new(""),
            items: vec![DraftInvoiceItem::default()],
            tax_rate: "0".to_string(),
            use_tax_region: false,
            tax_region: TaxRegion::Usa,
            discount_rate: "0".to_string(),
            due_date: today + Days::new(30),
        }
    }

    pub fn merged(&self, patch: &InvoiceDraftPatch) -> Self {
        Self {
            client_id: patch
                .client_id
                .clone()
                .unwrap_or_else(|| self.client_id.clone()),
            items: patch.items.clone().unwrap_or_else(|| self.items.clone()),
            tax_rate: patch
                .tax_rate
                .clone()
                .unwrap_or_else(|| self.tax_rate.clone()),
            use_tax_region: patch.use_tax_region.unwrap_or(self.use_tax_region),
            tax_region: patch.tax_region.unwrap_or(self.tax_region),
            discount_rate: patch
                .discount_rate
                .clone()
                .unwrap_or_else(|| self.discount_rate.clone()),
            due_date: patch.due_date.unwrap_or(self.due_date),
        }
    }
}

/// Partial update for [`InvoiceDraft`]; `None` keeps the current value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InvoiceDraftPatch {
    pub client_id: Option<ClientId>,
    pub items: Option<Vec<DraftInvoiceItem>>,
    pub tax_rate: Option<String>,
    pub use_tax_region: Option<bool>,
    pub tax_region: Option<TaxRegion>,
    pub discount_rate: Option<String>,
    pub due_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn seeded_invoice_draft_is_due_in_30_days() {
        let draft = InvoiceDraft::seed(day("2026-01-01"));
        assert_eq!(draft.due_date, day("2026-01-31"));
        assert_eq!(draft.items.len(), 1);
        assert_eq!(draft.items[0].quantity, 1);
        assert!(!draft.use_tax_region);
    }

    #[test]
    fn merge_keeps_unpatched_fields() {
        let draft = CostEntryDraft::seed(day("2026-01-01"));
        let merged = draft.merged(&CostEntryDraftPatch {
            amount: Some("42.50".to_string()),
            ..Default::default()
        });
        assert_eq!(merged.amount, "42.50");
        assert_eq!(merged.category, CostCategory::Materials);
        assert_eq!(merged.date, day("2026-01-01"));
    }

    #[test]
    fn merge_replaces_item_rows_wholesale() {
        let draft = InvoiceDraft::seed(day("2026-01-01"));
        let merged = draft.merged(&InvoiceDraftPatch {
            items: Some(vec![
                DraftInvoiceItem {
                    name: "consulting".to_string(),
                    quantity: 3,
                    unit_price: BigDecimal::from(150),
                },
                DraftInvoiceItem::default(),
            ]),
            ..Default::default()
        });
        assert_eq!(merged.items.len(), 2);
        assert_eq!(merged.items[0].name, "consulting");
    }
}
