pub mod comparison;
pub mod config;

pub use comparison::{ComparisonRequest, ComparisonResult};
pub use config::{AppConfig, DeliveryMode};
