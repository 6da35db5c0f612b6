// [libs/store/src/lib.rs]
//! Turso/libSQL-backed persistence (spec §4.6 and [ADDED] ambient
//! storage concerns). Each repository owns one table family and exposes
//! domain types directly — callers never see a `Row`.

pub mod client;
pub mod errors;
pub mod models;
pub mod repositories;
pub mod schema;

pub use client::StoreClient;
pub use errors::StoreError;
pub use models::Account;
pub use repositories::{IncidentRepository, PresenceRepository, UserRepository};
