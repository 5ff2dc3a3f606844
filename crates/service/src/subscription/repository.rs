use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::domain::{Subscription, SubscriptionFilter};
use crate::errors::ServiceError;

/// Persistence seam for subscription records.
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    async fn create(&self, sub: Subscription) -> Result<Subscription, ServiceError>;
    async fn get(&self, id: &str) -> Result<Option<Subscription>, ServiceError>;
    /// Matching records ordered by `start_date`, then `id`.
    async fn list(&self, filter: &SubscriptionFilter) -> Result<Vec<Subscription>, ServiceError>;
    /// Full overwrite keyed by `sub.id`; `NotFound` if there is no such record.
    async fn replace(&self, sub: Subscription) -> Result<Subscription, ServiceError>;
    /// Returns true if a record was removed.
    async fn delete(&self, id: &str) -> Result<bool, ServiceError>;
    /// Sum of `price` over matching records overlapping `[start, end]`.
    async fn sum_price_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        filter: &SubscriptionFilter,
    ) -> Result<i64, ServiceError>;
}

/// In-memory repository for tests, doc examples and `storage = "memory"`.
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Mutex, MutexGuard};

    #[derive(Default)]
    pub struct MockSubscriptionRepository {
        rows: Mutex<HashMap<String, Subscription>>, // key: id
    }

    impl MockSubscriptionRepository {
        fn rows(&self) -> Result<MutexGuard<'_, HashMap<String, Subscription>>, ServiceError> {
            self.rows
                .lock()
                .map_err(|_| ServiceError::Storage("in-memory store poisoned".into()))
        }
    }

    #[async_trait]
    impl SubscriptionRepository for MockSubscriptionRepository {
        async fn create(&self, sub: Subscription) -> Result<Subscription, ServiceError> {
            let mut rows = self.rows()?;
            if rows.contains_key(&sub.id) {
                return Err(ServiceError::Storage(format!("duplicate key {}", sub.id)));
            }
            rows.insert(sub.id.clone(), sub.clone());
            Ok(sub)
        }

        async fn get(&self, id: &str) -> Result<Option<Subscription>, ServiceError> {
            Ok(self.rows()?.get(id).cloned())
        }

        async fn list(&self, filter: &SubscriptionFilter) -> Result<Vec<Subscription>, ServiceError> {
            let mut out: Vec<Subscription> = self
                .rows()?
                .values()
                .filter(|s| filter.matches(s))
                .cloned()
                .collect();
            out.sort_by(|a, b| a.start_date.cmp(&b.start_date).then_with(|| a.id.cmp(&b.id)));
            Ok(out)
        }

        async fn replace(&self, sub: Subscription) -> Result<Subscription, ServiceError> {
            let mut rows = self.rows()?;
            let Some(slot) = rows.get_mut(&sub.id) else {
                return Err(ServiceError::not_found("subscription"));
            };
            *slot = sub.clone();
            Ok(sub)
        }

        async fn delete(&self, id: &str) -> Result<bool, ServiceError> {
            Ok(self.rows()?.remove(id).is_some())
        }

        async fn sum_price_in_range(
            &self,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
            filter: &SubscriptionFilter,
        ) -> Result<i64, ServiceError> {
            self.rows()?
                .values()
                .filter(|s| filter.matches(s) && s.overlaps(start, end))
                .try_fold(0i64, |acc, s| acc.checked_add(s.price))
                .ok_or_else(|| ServiceError::Storage("total cost overflow".into()))
        }
    }

}
