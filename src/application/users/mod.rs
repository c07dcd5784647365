//! Users module — user management use-cases
//!
//! Contains the `UserService` which orchestrates listing, lookup,
//! creation, upsert and deletion of user records.

pub mod service;

pub use service::{UpsertOutcome, UserService};
