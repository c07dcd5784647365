//! User aggregate
//!
//! Contains the User entity, its write/read shapes, validation rules
//! and the repository interface.

pub mod age;
pub mod model;
pub mod repository;
pub mod validation;

pub use model::{NewUser, User, UserDetails, UserPatch};
pub use repository::UserRepository;
pub use validation::{validate_new_user, validate_user_patch};
