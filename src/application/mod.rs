pub mod users;

pub use users::{UpsertOutcome, UserService};
