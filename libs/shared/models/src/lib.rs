pub mod error;
pub mod healthcheck;

pub use error::AppError;
pub use healthcheck::{HealthCheck, Item, User};
