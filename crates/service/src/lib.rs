//! Service layer for subscription records.
//! - Validates identifiers, prices and billing periods before touching storage.
//! - Talks to persistence only through the `SubscriptionRepository` trait.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod subscription;
#[cfg(test)]
pub mod test_support;

pub use subscription::SubscriptionService;
