//! HTTP REST API interfaces
//!
//! - `common`: error body and the validated JSON extractor
//! - `modules`: handlers per resource (users, health, metrics) and middleware
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod modules;
pub mod router;

pub use router::{create_api_router, ApiDoc, AppState};
