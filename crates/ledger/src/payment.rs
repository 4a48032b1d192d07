use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use costledger_core::EntityId;

use crate::invoice::InvoiceId;

/// Payment identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentId(pub EntityId);

impl PaymentId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for PaymentId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// How a payment was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Credit,
    BankTransfer,
    Check,
    Other,
}

/// Write-once record of money received against an invoice.
///
/// `invoice_id` is a weak reference: the invoice may since have been edited
/// or may never have existed, and several payments may point at the same
/// invoice. Payments are never mutated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub invoice_id: InvoiceId,
    pub amount: BigDecimal,
    pub method: PaymentMethod,
    pub date: NaiveDate,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_serializes_snake_case() {
        let json = serde_json::to_value(PaymentMethod::BankTransfer).unwrap();
        assert_eq!(json, serde_json::json!("bank_transfer"));
    }
}
