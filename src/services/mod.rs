pub mod comparison;
pub mod diff_store;

pub use comparison::ComparisonService;
pub use diff_store::DiffDelivery;
