use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use costledger_core::EntityId;

/// Cost entry identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CostEntryId(pub EntityId);

impl CostEntryId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for CostEntryId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Spending bucket for a logged cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostCategory {
    Materials,
    Labor,
    Overhead,
    Marketing,
    Other,
}

/// A single logged cost.
///
/// Immutable once recorded; removable by id. The amount is taken as given —
/// sign and magnitude checks are the caller's concern, so refunds can be
/// logged as negative costs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostEntry {
    pub id: CostEntryId,
    pub category: CostCategory,
    pub amount: BigDecimal,
    pub date: NaiveDate,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_serializes_lowercase() {
        let json = serde_json::to_value(CostCategory::Marketing).unwrap();
        assert_eq!(json, serde_json::json!("marketing"));
    }
}
