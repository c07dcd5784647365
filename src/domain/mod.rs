pub mod user;

pub use user::{NewUser, User, UserDetails, UserPatch, UserRepository};

// Re-export DomainError from support for convenience
pub use crate::support::errors::{DomainError, DomainResult};
