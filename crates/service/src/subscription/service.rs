use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{error, info, instrument, warn};

use super::domain::{Subscription, SubscriptionFilter, SubscriptionInput};
use super::ident::{is_valid_identifier, new_identifier};
use super::period::parse_period;
use super::repository::SubscriptionRepository;
use crate::errors::ServiceError;

/// Application service for subscription records.
///
/// Every operation validates its input before reaching the repository, and
/// every failure is logged before it is returned.
pub struct SubscriptionService<R: SubscriptionRepository + ?Sized = dyn SubscriptionRepository> {
    repo: Arc<R>,
}

/// Input that passed the create/update checks, still without an identity.
struct Validated {
    service_name: String,
    price: i64,
    user_id: String,
    start_date: DateTime<Utc>,
    end_date: Option<DateTime<Utc>>,
}

impl Validated {
    fn with_id(self, id: String) -> Subscription {
        Subscription {
            id,
            service_name: self.service_name,
            price: self.price,
            user_id: self.user_id,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

fn reject(reason: &str, value: &str) -> ServiceError {
    warn!(reason, value, "request rejected");
    ServiceError::Validation(reason.to_string())
}

fn period(field: &str, raw: &str) -> Result<DateTime<Utc>, ServiceError> {
    parse_period(raw).map_err(|e| {
        warn!(field, value = raw, error = %e, "invalid period");
        ServiceError::from(e)
    })
}

fn check_order(start: DateTime<Utc>, end: DateTime<Utc>, reason: &str) -> Result<(), ServiceError> {
    if end < start {
        warn!(%start, %end, "period ends before it starts");
        return Err(ServiceError::Validation(reason.to_string()));
    }
    Ok(())
}

fn storage_failed(op: &'static str) -> impl Fn(&ServiceError) {
    move |e| error!(op, error = %e, "repository call failed")
}

fn validate(input: SubscriptionInput) -> Result<Validated, ServiceError> {
    if !is_valid_identifier(&input.user_id) {
        return Err(reject("invalid user_id format", &input.user_id));
    }
    if input.price <= 0 {
        return Err(reject("price must be a positive integer", &input.price.to_string()));
    }
    let start_date = period("start_date", &input.start_date)?;
    let end_date = if input.end_date.is_empty() {
        None
    } else {
        let end = period("end_date", &input.end_date)?;
        check_order(start_date, end, "end_date must not be before start_date")?;
        Some(end)
    };
    Ok(Validated {
        service_name: input.service_name,
        price: input.price,
        user_id: input.user_id,
        start_date,
        end_date,
    })
}

impl<R: SubscriptionRepository + ?Sized> SubscriptionService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Validate and store a new subscription under a freshly generated id.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::subscription::{SubscriptionService, domain::SubscriptionInput};
    /// use service::subscription::repository::mock::MockSubscriptionRepository;
    ///
    /// let svc = SubscriptionService::new(Arc::new(MockSubscriptionRepository::default()));
    /// let input = SubscriptionInput {
    ///     service_name: "Yandex Plus".into(),
    ///     price: 400,
    ///     user_id: "60601fee-2bf1-4721-ae6f-7636e79a0cba".into(),
    ///     start_date: "07-2025".into(),
    ///     end_date: String::new(),
    /// };
    /// let sub = tokio_test::block_on(svc.create(input)).unwrap();
    /// assert_eq!(sub.id.len(), 36);
    /// assert!(sub.end_date.is_none());
    /// ```
    #[instrument(skip(self, input), fields(user_id = %input.user_id, service_name = %input.service_name))]
    pub async fn create(&self, input: SubscriptionInput) -> Result<Subscription, ServiceError> {
        let valid = validate(input)?;
        let id = new_identifier().inspect_err(|e| error!(error = %e, "identifier generation failed"))?;
        let created = self
            .repo
            .create(valid.with_id(id))
            .await
            .inspect_err(storage_failed("create"))?;
        info!(id = %created.id, "subscription_created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: &str) -> Result<Subscription, ServiceError> {
        if !is_valid_identifier(id) {
            return Err(reject("invalid id format", id));
        }
        self.repo
            .get(id)
            .await
            .inspect_err(storage_failed("get"))?
            .ok_or_else(|| {
                warn!(id, "subscription not found");
                ServiceError::not_found("subscription")
            })
    }

    /// List subscriptions; empty `user_id` / `service_name` match everything.
    #[instrument(skip(self))]
    pub async fn list_all(&self, user_id: &str, service_name: &str) -> Result<Vec<Subscription>, ServiceError> {
        if !user_id.is_empty() && !is_valid_identifier(user_id) {
            return Err(reject("invalid user_id format", user_id));
        }
        let filter = SubscriptionFilter::from_params(user_id, service_name);
        let found = self.repo.list(&filter).await.inspect_err(storage_failed("list"))?;
        info!(count = found.len(), "subscriptions_listed");
        Ok(found)
    }

    /// Replace every field of an existing subscription. The id is kept.
    #[instrument(skip(self, input), fields(user_id = %input.user_id, service_name = %input.service_name))]
    pub async fn update(&self, id: &str, input: SubscriptionInput) -> Result<Subscription, ServiceError> {
        if !is_valid_identifier(id) {
            return Err(reject("invalid id format", id));
        }
        let valid = validate(input)?;
        let updated = self
            .repo
            .replace(valid.with_id(id.to_string()))
            .await
            .inspect_err(|e| match e {
                ServiceError::NotFound(_) => warn!(id, "subscription not found"),
                other => error!(op = "replace", error = %other, "repository call failed"),
            })?;
        info!(id = %updated.id, "subscription_updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        if !is_valid_identifier(id) {
            return Err(reject("invalid id format", id));
        }
        if !self.repo.delete(id).await.inspect_err(storage_failed("delete"))? {
            warn!(id, "subscription not found");
            return Err(ServiceError::not_found("subscription"));
        }
        info!(id, "subscription_deleted");
        Ok(())
    }

    /// Sum of prices of every subscription overlapping `[start, end]`
    /// (both `MM-YYYY`). Open-ended subscriptions count for every period
    /// after their start. No match yields 0.
    #[instrument(skip(self))]
    pub async fn total_cost(
        &self,
        start: &str,
        end: &str,
        user_id: &str,
        service_name: &str,
    ) -> Result<i64, ServiceError> {
        let from = period("start", start)?;
        let to = period("end", end)?;
        check_order(from, to, "end must not be before start")?;
        if !user_id.is_empty() && !is_valid_identifier(user_id) {
            return Err(reject("invalid user_id format", user_id));
        }
        let filter = SubscriptionFilter::from_params(user_id, service_name);
        let total = self
            .repo
            .sum_price_in_range(from, to, &filter)
            .await
            .inspect_err(storage_failed("sum_price_in_range"))?;
        info!(total, "total_cost_computed");
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::TimeZone;

    use super::*;
    use crate::subscription::repository::mock::MockSubscriptionRepository;

    const USER_A: &str = "60601fee-2bf1-4721-ae6f-7636e79a0cba";
    const USER_B: &str = "0b6f1e5c-7d0e-4a53-9b5e-0c8f1d2a3b4c";

    fn svc() -> SubscriptionService<MockSubscriptionRepository> {
        SubscriptionService::new(Arc::new(MockSubscriptionRepository::default()))
    }

    fn input(user_id: &str, name: &str, price: i64, start: &str, end: &str) -> SubscriptionInput {
        SubscriptionInput {
            service_name: name.into(),
            price,
            user_id: user_id.into(),
            start_date: start.into(),
            end_date: end.into(),
        }
    }

    fn month(y: i32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, 1, 0, 0, 0).unwrap()
    }

    fn validation_message(res: Result<impl std::fmt::Debug, ServiceError>) -> String {
        match res {
            Err(ServiceError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    /// Repository whose every call fails, to exercise storage error paths.
    struct FailingRepository;

    #[async_trait]
    impl SubscriptionRepository for FailingRepository {
        async fn create(&self, _: Subscription) -> Result<Subscription, ServiceError> { Err(ServiceError::Storage("down".into())) }
        async fn get(&self, _: &str) -> Result<Option<Subscription>, ServiceError> { Err(ServiceError::Storage("down".into())) }
        async fn list(&self, _: &SubscriptionFilter) -> Result<Vec<Subscription>, ServiceError> { Err(ServiceError::Storage("down".into())) }
        async fn replace(&self, _: Subscription) -> Result<Subscription, ServiceError> { Err(ServiceError::Storage("down".into())) }
        async fn delete(&self, _: &str) -> Result<bool, ServiceError> { Err(ServiceError::Storage("down".into())) }
        async fn sum_price_in_range(&self, _: DateTime<Utc>, _: DateTime<Utc>, _: &SubscriptionFilter) -> Result<i64, ServiceError> {
            Err(ServiceError::Storage("down".into()))
        }
    }

    #[tokio::test]
    async fn create_populates_record() {
        let s = svc();
        let sub = s.create(input(USER_A, "Netflix", 10, "01-2025", "03-2025")).await.unwrap();
        assert!(is_valid_identifier(&sub.id));
        assert_eq!(sub.service_name, "Netflix");
        assert_eq!(sub.price, 10);
        assert_eq!(sub.start_date, month(2025, 1));
        assert_eq!(sub.end_date, Some(month(2025, 3)));
        assert_eq!(s.get_by_id(&sub.id).await.unwrap(), sub);
    }

    #[tokio::test]
    async fn create_rejects_non_positive_price() {
        for price in [0, -1, i64::MIN] {
            let msg = validation_message(svc().create(input(USER_A, "Netflix", price, "01-2025", "")).await);
            assert_eq!(msg, "price must be a positive integer");
        }
    }

    #[tokio::test]
    async fn create_rejects_malformed_user_id() {
        let msg = validation_message(svc().create(input("not-a-uuid", "Netflix", 10, "01-2025", "")).await);
        assert_eq!(msg, "invalid user_id format");
    }

    #[tokio::test]
    async fn user_id_is_checked_before_price_and_dates() {
        let msg = validation_message(svc().create(input("x", "Netflix", 0, "bad", "bad")).await);
        assert_eq!(msg, "invalid user_id format");
        let msg = validation_message(svc().create(input(USER_A, "Netflix", 0, "bad", "bad")).await);
        assert_eq!(msg, "price must be a positive integer");
    }

    #[tokio::test]
    async fn create_propagates_period_errors() {
        let msg = validation_message(svc().create(input(USER_A, "Netflix", 10, "2025-01", "")).await);
        assert_eq!(msg, "invalid month, should be between [1-12]");
        let msg = validation_message(svc().create(input(USER_A, "Netflix", 10, "01-2025", "01/2026")).await);
        assert_eq!(msg, "invalid date format, expected MM-YYYY");
    }

    #[tokio::test]
    async fn create_rejects_end_before_start() {
        let msg = validation_message(svc().create(input(USER_A, "Netflix", 10, "05-2025", "04-2025")).await);
        assert_eq!(msg, "end_date must not be before start_date");
        // same month is a one-month subscription
        assert!(svc().create(input(USER_A, "Netflix", 10, "05-2025", "05-2025")).await.is_ok());
    }

    #[tokio::test]
    async fn get_validates_and_reports_missing() {
        let s = svc();
        assert_eq!(validation_message(s.get_by_id("123").await), "invalid id format");
        let missing = s.get_by_id(USER_B).await.unwrap_err();
        assert!(matches!(missing, ServiceError::NotFound(msg) if msg == "subscription not found"));
    }

    #[tokio::test]
    async fn list_all_filters_are_wildcards_when_empty() {
        let s = svc();
        let a = s.create(input(USER_A, "Netflix", 10, "02-2025", "")).await.unwrap();
        let b = s.create(input(USER_A, "Spotify", 5, "01-2025", "")).await.unwrap();
        let c = s.create(input(USER_B, "Netflix", 7, "03-2025", "")).await.unwrap();

        assert_eq!(s.list_all("", "").await.unwrap(), vec![b.clone(), a.clone(), c.clone()]);
        assert_eq!(s.list_all(USER_A, "").await.unwrap(), vec![b.clone(), a.clone()]);
        assert_eq!(s.list_all("", "Netflix").await.unwrap(), vec![a.clone(), c.clone()]);
        assert_eq!(s.list_all(USER_B, "Spotify").await.unwrap(), vec![]);
        assert_eq!(validation_message(s.list_all("nope", "").await), "invalid user_id format");
    }

    #[tokio::test]
    async fn update_keeps_identity_and_replaces_fields() {
        let s = svc();
        let original = s.create(input(USER_A, "Netflix", 10, "01-2025", "")).await.unwrap();
        let updated = s.update(&original.id, input(USER_B, "Netflix Premium", 15, "02-2025", "06-2025")).await.unwrap();

        assert_eq!(updated.id, original.id);
        assert_eq!(updated.user_id, USER_B);
        assert_eq!(updated.price, 15);
        assert_eq!(updated.end_date, Some(month(2025, 6)));
        assert_eq!(s.list_all("", "").await.unwrap(), vec![updated]);
    }

    #[tokio::test]
    async fn update_validates_and_reports_missing() {
        let s = svc();
        assert_eq!(validation_message(s.update("bad", input(USER_A, "N", 1, "01-2025", "")).await), "invalid id format");
        assert_eq!(
            validation_message(s.update(USER_B, input(USER_A, "N", -3, "01-2025", "")).await),
            "price must be a positive integer"
        );
        let err = s.update(USER_B, input(USER_A, "N", 1, "01-2025", "")).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_removes_once() {
        let s = svc();
        let sub = s.create(input(USER_A, "Netflix", 10, "01-2025", "")).await.unwrap();
        s.delete(&sub.id).await.unwrap();
        assert!(matches!(s.delete(&sub.id).await, Err(ServiceError::NotFound(_))));
        assert_eq!(validation_message(s.delete("").await), "invalid id format");
    }

    #[tokio::test]
    async fn total_cost_sums_overlapping_records() {
        let s = svc();
        s.create(input(USER_A, "A", 10, "01-2025", "")).await.unwrap();
        s.create(input(USER_A, "B", 20, "02-2025", "03-2025")).await.unwrap();

        assert_eq!(s.total_cost("01-2025", "02-2025", "", "").await.unwrap(), 30);
        assert_eq!(s.total_cost("04-2025", "04-2025", "", "").await.unwrap(), 10);
        assert_eq!(s.total_cost("01-2025", "03-2025", "", "B").await.unwrap(), 20);
        assert_eq!(s.total_cost("01-2024", "12-2024", "", "").await.unwrap(), 0);
        assert_eq!(s.total_cost("01-2025", "12-2025", USER_B, "").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn total_cost_validates_bounds_and_user() {
        let s = svc();
        assert_eq!(validation_message(s.total_cost("1-2-3", "01-2025", "", "").await), "invalid date format, expected MM-YYYY");
        assert_eq!(validation_message(s.total_cost("01-2025", "00-2025", "", "").await), "invalid month, should be between [1-12]");
        assert_eq!(validation_message(s.total_cost("03-2025", "01-2025", "", "").await), "end must not be before start");
        assert_eq!(validation_message(s.total_cost("01-2025", "02-2025", "bad", "").await), "invalid user_id format");
    }

    #[tokio::test]
    async fn storage_failures_surface_unchanged() {
        let s: SubscriptionService = SubscriptionService::new(Arc::new(FailingRepository) as Arc<dyn SubscriptionRepository>);
        let is_storage = |e: ServiceError| matches!(e, ServiceError::Storage(msg) if msg == "down");
        assert!(is_storage(s.create(input(USER_A, "N", 1, "01-2025", "")).await.unwrap_err()));
        assert!(is_storage(s.get_by_id(USER_A).await.unwrap_err()));
        assert!(is_storage(s.list_all("", "").await.unwrap_err()));
        assert!(is_storage(s.update(USER_A, input(USER_A, "N", 1, "01-2025", "")).await.unwrap_err()));
        assert!(is_storage(s.delete(USER_A).await.unwrap_err()));
        assert!(is_storage(s.total_cost("01-2025", "01-2025", "", "").await.unwrap_err()));
    }

    #[tokio::test]
    async fn total_cost_overflow_is_storage_error() {
        let s = svc();
        s.create(input(USER_A, "A", i64::MAX, "01-2025", "")).await.unwrap();
        s.create(input(USER_B, "B", i64::MAX, "01-2025", "")).await.unwrap();
        let res = s.total_cost("01-2025", "01-2025", "", "").await;
        assert!(matches!(res, Err(ServiceError::Storage(msg)) if msg == "total cost overflow"));
        assert_eq!(s.total_cost("01-2025", "01-2025", USER_A, "").await.unwrap(), i64::MAX);
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> { Ok(()) }
    }

    #[tokio::test]
    async fn rejections_are_logged_to_the_injected_subscriber() {
        let captured = Captured::default();
        let sink = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || sink.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let _ = svc().create(input(USER_A, "Netflix", 0, "01-2025", "")).await;

        let logs = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(logs.contains("request rejected"), "logs: {logs}");
        assert!(logs.contains("price must be a positive integer"), "logs: {logs}");
    }
}
