use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use costledger_core::EntityId;

use crate::invoice::InvoiceId;
use crate::payment::PaymentId;

/// Receipt identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReceiptId(pub EntityId);

impl ReceiptId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ReceiptId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Delivery format a receipt is produced in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiptFormat {
    Pdf,
    Digital,
}

/// Proof-of-payment record.
///
/// The amount is copied from the referenced payment at creation time, so the
/// receipt stays truthful even though `payment_id` is only a weak reference.
/// At most one receipt per payment is expected but not enforced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub id: ReceiptId,
    pub invoice_id: InvoiceId,
    pub payment_id: PaymentId,
    pub amount: BigDecimal,
    pub date: DateTime<Utc>,
    pub format: ReceiptFormat,
}
