use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Scheduled visits per month used as the starting volume of both projections.
pub const DEFAULT_MONTHLY_VISIT_BASELINE: Decimal = dec!(1000);

/// Largest accepted monthly visit baseline.
pub const MAX_MONTHLY_VISIT_BASELINE: Decimal = dec!(1000000000);

/// Errors raised by an invalid [`CalculatorConfig`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalculatorConfigError {
    /// The monthly visit baseline must be non-negative.
    #[error("monthly visit baseline must be non-negative, got {0}")]
    NegativeVisitBaseline(Decimal),

    /// The monthly visit baseline exceeds [`MAX_MONTHLY_VISIT_BASELINE`].
    #[error("monthly visit baseline must be at most 1000000000, got {0}")]
    VisitBaselineTooLarge(Decimal),
}

/// Model parameters that are not collected from the clinic.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use savings_core::{CalculatorConfig, CalculatorConfigError};
///
/// let config = CalculatorConfig { monthly_visit_baseline: dec!(-1) };
///
/// assert_eq!(
///     config.validate(),
///     Err(CalculatorConfigError::NegativeVisitBaseline(dec!(-1)))
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculatorConfig {
    /// Visits scheduled per month before any automation is applied.
    ///
    /// Independent of the clinic's active patient count.
    pub monthly_visit_baseline: Decimal,
}

impl CalculatorConfig {
    pub fn validate(&self) -> Result<(), CalculatorConfigError> {
        if self.monthly_visit_baseline < Decimal::ZERO {
            return Err(CalculatorConfigError::NegativeVisitBaseline(
                self.monthly_visit_baseline,
            ));
        }
        if self.monthly_visit_baseline > MAX_MONTHLY_VISIT_BASELINE {
            return Err(CalculatorConfigError::VisitBaselineTooLarge(
                self.monthly_visit_baseline,
            ));
        }
        Ok(())
    }
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            monthly_visit_baseline: DEFAULT_MONTHLY_VISIT_BASELINE,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_uses_one_thousand_visits() {
        assert_eq!(
            CalculatorConfig::default().monthly_visit_baseline,
            dec!(1000)
        );
    }

    #[test]
    fn validate_accepts_zero_baseline() {
        let config = CalculatorConfig {
            monthly_visit_baseline: Decimal::ZERO,
        };

        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_negative_baseline() {
        let config = CalculatorConfig {
            monthly_visit_baseline: dec!(-10),
        };

        assert_eq!(
            config.validate(),
            Err(CalculatorConfigError::NegativeVisitBaseline(dec!(-10)))
        );
    }

    #[test]
    fn validate_accepts_maximum_baseline() {
        let config = CalculatorConfig {
            monthly_visit_baseline: MAX_MONTHLY_VISIT_BASELINE,
        };

        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_baseline_above_maximum() {
        let config = CalculatorConfig {
            monthly_visit_baseline: dec!(100000000000000000000),
        };

        assert_eq!(
            config.validate(),
            Err(CalculatorConfigError::VisitBaselineTooLarge(dec!(
                100000000000000000000
            )))
        );
    }
}
