pub mod calculations;
pub mod models;

pub use calculations::{SavingsCalculator, compute};
pub use models::*;
