//! Savings comparison between a clinic with and without automation.
//!
//! Both projections run the same [`VisitFunnel`]. The "without automation"
//! projection uses the clinic's current rates and refills no cancelled slots.
//! The "with automation" projection starts from the current rates, including
//! the current backfill rate, and folds the enabled
//! [`Adjustment`](super::Adjustment)s over them.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use savings_core::{CalculatorInputs, compute};
//!
//! let results = compute(&CalculatorInputs::default());
//!
//! assert_eq!(results.without_automation.visits_scheduled, dec!(1000));
//! assert_eq!(results.with_automation.projection.visits_scheduled, dec!(1540));
//! assert!(results.savings_per_month > dec!(0));
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use super::adjustments::{OperatingState, apply_adjustments};
use super::common::{clamp_rate, round_whole};
use super::funnel::VisitFunnel;
use crate::{
    AdjustedRates, AutomatedProjection, CalculatorConfig, CalculatorConfigError, CalculatorInputs,
    CalculatorResults,
};

const MONTHS_PER_YEAR: Decimal = dec!(12);
const THOUSAND: Decimal = dec!(1000);

/// Calculator for the automation savings comparison.
///
/// Stateless apart from its configuration; [`calculate`](Self::calculate) can
/// be called any number of times, from any thread.
#[derive(Debug, Clone, Default)]
pub struct SavingsCalculator {
    config: CalculatorConfig,
}

impl SavingsCalculator {
    /// Creates a calculator with the given model configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CalculatorConfigError`] if the configuration is invalid.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use savings_core::{CalculatorConfig, SavingsCalculator};
    ///
    /// let calculator = SavingsCalculator::new(CalculatorConfig {
    ///     monthly_visit_baseline: dec!(1500),
    /// })
    /// .unwrap();
    ///
    /// assert_eq!(calculator.config().monthly_visit_baseline, dec!(1500));
    /// ```
    pub fn new(config: CalculatorConfig) -> Result<Self, CalculatorConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    /// Computes both projections and the monthly savings.
    ///
    /// Never fails and never mutates `inputs`. Figures are rounded to whole
    /// units only after every line has been computed.
    pub fn calculate(
        &self,
        inputs: &CalculatorInputs,
    ) -> CalculatorResults {
        let funnel = VisitFunnel::new(inputs);

        let current = OperatingState::without_automation(inputs, &self.config);
        let without = funnel.run(&current);

        let automated = apply_adjustments(inputs, &self.config);
        let with = funnel.run(&automated);

        let savings = with.net_revenue.saturating_sub(without.net_revenue);
        debug!(
            without_net_revenue = %without.net_revenue,
            with_net_revenue = %with.net_revenue,
            savings = %savings,
            "Calculated automation savings"
        );

        CalculatorResults {
            without_automation: without.to_projection(),
            with_automation: AutomatedProjection {
                projection: with.to_projection(),
                rates: adjusted_rates(&automated),
            },
            savings_per_month: round_whole(savings),
            annual_savings_thousands: round_whole(
                savings.saturating_mul(MONTHS_PER_YEAR) / THOUSAND,
            ),
        }
    }
}

/// Rounds the automated operating state for display.
fn adjusted_rates(state: &OperatingState) -> AdjustedRates {
    AdjustedRates {
        active_patients: round_whole(state.active_patients),
        cancellation_rate: round_whole(state.cancellation_rate),
        no_show_rate: round_whole(state.no_show_rate),
        plan_of_care_scheduled: round_whole(state.plan_of_care_scheduled),
        cancellation_backfill_rate: clamp_rate(round_whole(state.cancellation_backfill_rate)),
        no_show_fee_collection_rate: round_whole(state.no_show_fee_collection_rate),
        cancellation_fee_collection_rate: round_whole(state.cancellation_fee_collection_rate),
        front_office_staff: round_whole(state.front_office_staff),
        reminder_texts: round_whole(state.reminder_texts),
    }
}

/// Computes the savings comparison with the default model configuration.
pub fn compute(inputs: &CalculatorInputs) -> CalculatorResults {
    SavingsCalculator::default().calculate(inputs)
}
