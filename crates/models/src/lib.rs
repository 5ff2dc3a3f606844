//! Persistence models: sea-orm entities, connection setup and row-level queries.

pub mod errors;
pub mod db;
pub mod subscription;
