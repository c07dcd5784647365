//! # Users Service
//!
//! Minimal users CRUD web API backed by a single `users` table.
//!
//! ## Architecture
//!
//! - **domain**: User entity, field validation rules and the repository port
//! - **application**: `UserService`, the upsert decision and derived read fields
//! - **infrastructure**: SeaORM/SQLite repository, migrations, in-memory repository
//! - **interfaces**: REST API with Swagger documentation, health and metrics
//! - **support**: error types, tracing setup, graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod support;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig};

// Re-export API router
pub use interfaces::http::create_api_router;
