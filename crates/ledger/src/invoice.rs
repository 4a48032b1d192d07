use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use costledger_core::{ClientId, DomainError, DomainResult, EntityId};
use costledger_tax::{TaxRegion, percent_of};

/// Invoice identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceId(pub EntityId);

impl InvoiceId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for InvoiceId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Invoice line-item identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceItemId(pub EntityId);

impl InvoiceItemId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for InvoiceItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Invoice status lifecycle.
///
/// Payment logging only ever moves an invoice toward `PartiallyPaid`/`Paid`;
/// `Overdue` and `Cancelled` are managed through explicit status updates.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Paid,
    PartiallyPaid,
    Overdue,
    Cancelled,
}

impl InvoiceStatus {
    /// Statuses counted as outstanding receivables in summary reports.
    pub fn is_unpaid(self) -> bool {
        matches!(
            self,
            InvoiceStatus::Draft | InvoiceStatus::Sent | InvoiceStatus::PartiallyPaid
        )
    }
}

/// Line item owned by exactly one invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceItem {
    pub id: InvoiceItemId,
    pub name: String,
    pub quantity: i64,
    pub unit_price: BigDecimal,
    /// `quantity × unit_price`, fixed whenever the item list is built.
    pub subtotal: BigDecimal,
}

impl InvoiceItem {
    /// Validate inputs and materialize them as owned items with computed
    /// subtotals.
    pub fn build(inputs: &[InvoiceItemInput]) -> DomainResult<Vec<InvoiceItem>> {
        let mut items = Vec::with_capacity(inputs.len());
        for input in inputs {
            if input.quantity < 0 {
                return Err(DomainError::validation(
                    "invoice item quantity must not be negative",
                ));
            }
            if input.unit_price < BigDecimal::from(0) {
                return Err(DomainError::validation(
                    "invoice item unit price must not be negative",
                ));
            }
            items.push(InvoiceItem {
                id: input.id,
                name: input.name.clone(),
                quantity: input.quantity,
                unit_price: input.unit_price.clone(),
                subtotal: BigDecimal::from(input.quantity) * &input.unit_price,
            });
        }
        Ok(items)
    }
}

/// Caller-supplied item fields; subtotals are always derived, never taken
/// from the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceItemInput {
    pub id: InvoiceItemId,
    pub name: String,
    pub quantity: i64,
    pub unit_price: BigDecimal,
}

/// Human-readable invoice number, `INV-<timestamp suffix>-<3 digits>`.
///
/// A readable tag, not a uniqueness guarantee.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceNumber(String);

impl InvoiceNumber {
    /// Derive the number from the invoice id and issue instant, so the same
    /// generation command always yields the same number.
    pub fn generate(id: InvoiceId, at: DateTime<Utc>) -> Self {
        let millis = at.timestamp_millis().to_string();
        let suffix = millis.get(7..).unwrap_or(millis.as_str());
        let tag = id.0.as_uuid().as_u128() % 1000;
        Self(format!("INV-{suffix}-{tag:03}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for InvoiceNumber {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derived money fields of an invoice, always computed together so the
/// `total = subtotal + tax − discount` identity holds by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceFinancials {
    pub subtotal: BigDecimal,
    pub tax_amount: BigDecimal,
    pub discount_amount: BigDecimal,
    pub total: BigDecimal,
}

impl InvoiceFinancials {
    /// Region-aware computation used when an invoice is generated: a region
    /// selects its table base rate and the manual rate is ignored.
    pub fn on_generate(
        items: &[InvoiceItem],
        tax_rate: &BigDecimal,
        discount_rate: &BigDecimal,
        tax_region: Option<TaxRegion>,
    ) -> Self {
        let subtotal = subtotal_of(items);
        let tax_amount = costledger_tax::tax_amount(&subtotal, tax_rate, tax_region);
        Self::complete(subtotal, tax_amount, discount_rate)
    }

    /// Manual-rate recomputation used when an invoice is edited. Unlike
    /// [`InvoiceFinancials::on_generate`], a stored `tax_region` is NOT
    /// reapplied here, so editing a region-taxed invoice re-derives tax from
    /// its manual rate.
    ///
    /// TODO: decide with product whether edits should reapply `tax_region`
    /// instead of the manual rate before unifying the two paths.
    pub fn on_edit(
        items: &[InvoiceItem],
        tax_rate: &BigDecimal,
        discount_rate: &BigDecimal,
    ) -> Self {
        let subtotal = subtotal_of(items);
        let tax_amount = percent_of(&subtotal, tax_rate);
        Self::complete(subtotal, tax_amount, discount_rate)
    }

    fn complete(subtotal: BigDecimal, tax_amount: BigDecimal, discount_rate: &BigDecimal) -> Self {
        let discount_amount = percent_of(&subtotal, discount_rate);
        let total = &subtotal + &tax_amount - &discount_amount;
        Self {
            subtotal,
            tax_amount,
            discount_amount,
            total,
        }
    }
}

fn subtotal_of(items: &[InvoiceItem]) -> BigDecimal {
    items.iter().map(|item| &item.subtotal).sum()
}

/// A billed invoice with its derived financials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    pub invoice_number: InvoiceNumber,
    pub client_id: ClientId,
    pub items: Vec<InvoiceItem>,
    pub subtotal: BigDecimal,
    /// Manual rate in percent; superseded by `tax_region` at generation time.
    pub tax_rate: BigDecimal,
    pub tax_amount: BigDecimal,
    pub tax_region: Option<TaxRegion>,
    /// Discount rate in percent, applied to the subtotal.
    pub discount_rate: BigDecimal,
    pub discount_amount: BigDecimal,
    pub total: BigDecimal,
    pub due_date: NaiveDate,
    pub status: InvoiceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    pub fn apply_financials(&mut self, financials: InvoiceFinancials) {
        self.subtotal = financials.subtotal;
        self.tax_amount = financials.tax_amount;
        self.discount_amount = financials.discount_amount;
        self.total = financials.total;
    }
}

/// Field-wise partial update for an invoice edit. `None` keeps the stored
/// value; `id`, `invoice_number` and `created_at` are never editable.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InvoiceUpdate {
    pub client_id: Option<ClientId>,
    pub items: Option<Vec<InvoiceItemInput>>,
    pub tax_rate: Option<BigDecimal>,
    pub tax_region: Option<TaxRegion>,
    pub discount_rate: Option<BigDecimal>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<InvoiceStatus>,
}

impl InvoiceUpdate {
    /// Whether applying this update must re-derive the invoice's money
    /// fields.
    pub fn touches_financials(&self) -> bool {
        self.items.is_some() || self.tax_rate.is_some() || self.discount_rate.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item_input(quantity: i64, unit_price: i64) -> InvoiceItemInput {
        InvoiceItemInput {
            id: InvoiceItemId::new(EntityId::new()),
            name: "widget".to_string(),
            quantity,
            unit_price: BigDecimal::from(unit_price),
        }
    }

    #[test]
    fn built_items_carry_derived_subtotals() {
        let items = InvoiceItem::build(&[item_input(2, 50), item_input(3, 10)]).unwrap();
        assert_eq!(items[0].subtotal, BigDecimal::from(100));
        assert_eq!(items[1].subtotal, BigDecimal::from(30));
    }

    #[test]
    fn negative_quantity_is_rejected() {
        let err = InvoiceItem::build(&[item_input(-1, 50)]).unwrap_err();
        match err {
            DomainError::Validation(msg) => assert!(msg.contains("quantity")),
            _ => panic!("Expected Validation"),
        }
    }

    #[test]
    fn negative_unit_price_is_rejected() {
        let err = InvoiceItem::build(&[item_input(1, -50)]).unwrap_err();
        match err {
            DomainError::Validation(msg) => assert!(msg.contains("unit price")),
            _ => panic!("Expected Validation"),
        }
    }

    #[test]
    fn zero_quantity_is_allowed() {
        let items = InvoiceItem::build(&[item_input(0, 50)]).unwrap();
        assert_eq!(items[0].subtotal, BigDecimal::from(0));
    }

    #[test]
    fn generation_financials_use_region_base_rate() {
        let items = InvoiceItem::build(&[item_input(2, 50)]).unwrap();
        let fin = InvoiceFinancials::on_generate(
            &items,
            &BigDecimal::from(5),
            &BigDecimal::from(0),
            Some(TaxRegion::Eu),
        );
        assert_eq!(fin.subtotal, BigDecimal::from(100));
        assert_eq!(fin.tax_amount, BigDecimal::from(21));
        assert_eq!(fin.total, BigDecimal::from(121));
    }

    #[test]
    fn edit_financials_use_manual_rate_even_for_region_taxed_invoices() {
        let items = InvoiceItem::build(&[item_input(2, 50)]).unwrap();
        let fin = InvoiceFinancials::on_edit(&items, &BigDecimal::from(5), &BigDecimal::from(0));
        assert_eq!(fin.tax_amount, BigDecimal::from(5));
        assert_eq!(fin.total, BigDecimal::from(105));
    }

    #[test]
    fn discount_subtracts_from_total() {
        let items = InvoiceItem::build(&[item_input(1, 200)]).unwrap();
        let fin =
            InvoiceFinancials::on_edit(&items, &BigDecimal::from(10), &BigDecimal::from(25));
        assert_eq!(fin.tax_amount, BigDecimal::from(20));
        assert_eq!(fin.discount_amount, BigDecimal::from(50));
        assert_eq!(fin.total, BigDecimal::from(170));
    }

    #[test]
    fn invoice_number_has_prefix_and_three_digit_tag() {
        let id = InvoiceId::new(EntityId::new());
        let at = "2026-03-01T12:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let number = InvoiceNumber::generate(id, at);
        let parts: Vec<&str> = number.as_str().split('-').collect();
        assert_eq!(parts[0], "INV");
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[2].len(), 3);
        assert!(parts[2].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn invoice_number_is_stable_for_same_inputs() {
        let id = InvoiceId::new(EntityId::new());
        let at = "2026-03-01T12:00:00Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(InvoiceNumber::generate(id, at), InvoiceNumber::generate(id, at));
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_value(InvoiceStatus::PartiallyPaid).unwrap();
        assert_eq!(json, serde_json::json!("partially_paid"));
    }

    #[test]
    fn unpaid_statuses_are_draft_sent_partially_paid() {
        assert!(InvoiceStatus::Draft.is_unpaid());
        assert!(InvoiceStatus::Sent.is_unpaid());
        assert!(InvoiceStatus::PartiallyPaid.is_unpaid());
        assert!(!InvoiceStatus::Paid.is_unpaid());
        assert!(!InvoiceStatus::Overdue.is_unpaid());
        assert!(!InvoiceStatus::Cancelled.is_unpaid());
    }
}
