//! Shared building blocks for the subscriptions workspace: HTTP payload
//! types and tracing initialisation.

pub mod types;
pub mod utils;
