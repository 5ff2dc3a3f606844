//! Subscription records: domain types, input validation, persistence seam and
//! the application service on top of them.

pub mod domain;
pub mod ident;
pub mod period;
pub mod repository;
pub mod repo;
pub mod service;

pub use service::SubscriptionService;
