mod config;
mod feature;
mod inputs;
mod results;

pub use config::{
    CalculatorConfig, CalculatorConfigError, DEFAULT_MONTHLY_VISIT_BASELINE,
    MAX_MONTHLY_VISIT_BASELINE,
};
pub use feature::{Feature, FeatureToggles};
pub use inputs::CalculatorInputs;
pub use results::{AdjustedRates, AutomatedProjection, CalculatorResults, Projection};
