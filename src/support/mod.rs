pub mod errors;
pub mod shutdown;
pub mod telemetry;

pub use errors::{DomainError, DomainResult};
pub use shutdown::{ShutdownCoordinator, ShutdownSignal};
