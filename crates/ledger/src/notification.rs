use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use costledger_core::EntityId;

use crate::invoice::InvoiceId;

/// Notification identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(pub EntityId);

impl NotificationId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for NotificationId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Channel a reminder goes out on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationChannel {
    Email,
    Sms,
    InApp,
}

/// Delivery state of a sent notification.
///
/// There is no delivery integration behind this; reminders are recorded as
/// `Sent` and the state is never revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Sent,
    Delivered,
    Failed,
}

/// Write-once log entry for an invoice reminder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub invoice_id: InvoiceId,
    pub channel: NotificationChannel,
    pub client_contact: String,
    pub message: String,
    pub sent_at: DateTime<Utc>,
    pub delivery: DeliveryStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_app_channel_serializes_with_dash() {
        let json = serde_json::to_value(NotificationChannel::InApp).unwrap();
        assert_eq!(json, serde_json::json!("in-app"));
    }
}
