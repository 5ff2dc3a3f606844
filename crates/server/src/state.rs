use std::sync::Arc;

use service::subscription::repository::{mock::MockSubscriptionRepository, SubscriptionRepository};
use service::SubscriptionService;

/// Shared handler state; cloning is cheap.
#[derive(Clone)]
pub struct ServerState {
    pub subs: Arc<SubscriptionService>,
}

impl ServerState {
    pub fn new(repo: Arc<dyn SubscriptionRepository>) -> Self {
        Self { subs: Arc::new(SubscriptionService::new(repo)) }
    }

    /// Process-local storage; records are gone when the process exits.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MockSubscriptionRepository::default()))
    }
}
