use chrono::{DateTime, Utc};

use serde::Serialize;

use crate::domain::{NotificationDate, ShowId};

/// New next-episode subscription request
#[derive(Debug)]
pub struct NewSubscription {
    pub show_id: ShowId,
    pub notification_date: NotificationDate,
}

/// Stored subscription record.
///
/// `notification_date` is kept as the raw stored text (an ISO date or the
/// `N/A` sentinel) so historical records round-trip unchanged. Records are
/// immutable: a changed air date produces a new record with the same show id.
#[derive(Debug, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    /// External catalog id of the show, stored as text
    #[serde(rename = "id")]
    pub show_id: String,
    pub date_created: DateTime<Utc>,
    pub notification_date: String,
}
