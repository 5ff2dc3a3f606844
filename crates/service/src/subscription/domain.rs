use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One user's paid service interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub service_name: String,
    pub price: i64,
    pub user_id: String,
    pub start_date: DateTime<Utc>,
    /// `None` means open-ended.
    pub end_date: Option<DateTime<Utc>>,
}

impl Subscription {
    /// True if `[start_date, end_date or forever]` intersects `[start, end]`.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_date <= end && self.end_date.map_or(true, |e| e >= start)
    }
}

/// Create/update payload. Periods are `MM-YYYY` strings; an empty
/// `end_date` leaves the subscription open-ended.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SubscriptionInput {
    pub service_name: String,
    pub price: i64,
    pub user_id: String,
    pub start_date: String,
    pub end_date: String,
}

/// Equality filters, AND-combined; `None` is a wildcard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionFilter {
    pub user_id: Option<String>,
    pub service_name: Option<String>,
}

impl SubscriptionFilter {
    /// Empty strings mean "no filter", not "match the empty value".
    pub fn from_params(user_id: &str, service_name: &str) -> Self {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        Self { user_id: non_empty(user_id), service_name: non_empty(service_name) }
    }

    pub fn matches(&self, sub: &Subscription) -> bool {
        self.user_id.as_deref().map_or(true, |u| u == sub.user_id)
            && self.service_name.as_deref().map_or(true, |n| n == sub.service_name)
    }
}
