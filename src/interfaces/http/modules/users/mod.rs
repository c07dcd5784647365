//! Users module — CRUD over the `users` table

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
