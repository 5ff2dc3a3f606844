use chrono::{DateTime, Utc};
use models::subscription::{self as rows, Filter};
use sea_orm::DatabaseConnection;

use crate::errors::ServiceError;
use crate::subscription::domain::{Subscription, SubscriptionFilter};
use crate::subscription::repository::SubscriptionRepository;

/// Postgres-backed repository on top of `models::subscription`.
pub struct SeaOrmSubscriptionRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmSubscriptionRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn to_domain(m: rows::Model) -> Subscription {
    Subscription {
        id: m.id,
        service_name: m.service_name,
        price: m.price,
        user_id: m.user_id,
        start_date: m.start_date,
        end_date: m.end_date,
    }
}

fn to_row(s: Subscription) -> rows::Model {
    rows::Model {
        id: s.id,
        service_name: s.service_name,
        price: s.price,
        user_id: s.user_id,
        start_date: s.start_date,
        end_date: s.end_date,
    }
}

fn as_filter(f: &SubscriptionFilter) -> Filter<'_> {
    Filter { user_id: f.user_id.as_deref(), service_name: f.service_name.as_deref() }
}

#[async_trait::async_trait]
impl SubscriptionRepository for SeaOrmSubscriptionRepository {
    async fn create(&self, sub: Subscription) -> Result<Subscription, ServiceError> {
        let created = rows::insert(&self.db, to_row(sub)).await?;
        Ok(to_domain(created))
    }

    async fn get(&self, id: &str) -> Result<Option<Subscription>, ServiceError> {
        Ok(rows::find(&self.db, id).await?.map(to_domain))
    }

    async fn list(&self, filter: &SubscriptionFilter) -> Result<Vec<Subscription>, ServiceError> {
        let found = rows::list(&self.db, as_filter(filter)).await?;
        Ok(found.into_iter().map(to_domain).collect())
    }

    async fn replace(&self, sub: Subscription) -> Result<Subscription, ServiceError> {
        let updated = rows::replace(&self.db, to_row(sub)).await?;
        Ok(to_domain(updated))
    }

    async fn delete(&self, id: &str) -> Result<bool, ServiceError> {
        Ok(rows::delete(&self.db, id).await?)
    }

    async fn sum_price_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        filter: &SubscriptionFilter,
    ) -> Result<i64, ServiceError> {
        Ok(rows::sum_price_in_range(&self.db, start, end, as_filter(filter)).await?)
    }
}
