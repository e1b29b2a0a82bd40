use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::FeatureToggles;

/// Clinic operating parameters and the automation features to model.
///
/// Rates are percentages on a 0-100 scale. Counts and amounts are
/// non-negative; the engine does not reject other values, that is left to the
/// form that collects them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculatorInputs {
    // Baseline clinic metrics
    pub active_patients: Decimal,
    pub no_show_rate: Decimal,
    pub cancellation_rate: Decimal,
    pub avg_visits_per_patient: Decimal,
    pub avg_revenue_per_visit: Decimal,
    pub cancellation_fee: Decimal,
    /// Share of cancellations that are charged a fee.
    pub cancellation_fee_application_rate: Decimal,
    pub no_show_fee: Decimal,
    pub cost_per_reminder_text: Decimal,
    pub monthly_salary_per_front_office: Decimal,
    pub number_of_front_office_employees: Decimal,

    // Front office performance
    pub avg_plan_of_care_scheduled: Decimal,
    pub current_cancellation_backfill_rate: Decimal,
    pub no_show_fee_collection_rate: Decimal,
    pub cancellation_fee_collection_rate: Decimal,

    pub features: FeatureToggles,
}

impl CalculatorInputs {
    /// Returns a copy with the given feature toggles.
    pub fn with_features(
        &self,
        features: FeatureToggles,
    ) -> Self {
        Self {
            features,
            ..self.clone()
        }
    }
}

impl Default for CalculatorInputs {
    /// A mid-sized outpatient clinic with every automation feature enabled.
    fn default() -> Self {
        Self {
            active_patients: dec!(250),
            no_show_rate: dec!(10),
            cancellation_rate: dec!(20),
            avg_visits_per_patient: dec!(10),
            avg_revenue_per_visit: dec!(80),
            cancellation_fee: dec!(35),
            cancellation_fee_application_rate: dec!(50),
            no_show_fee: dec!(100),
            cost_per_reminder_text: dec!(0.02),
            monthly_salary_per_front_office: dec!(3000),
            number_of_front_office_employees: dec!(3),
            avg_plan_of_care_scheduled: dec!(40),
            current_cancellation_backfill_rate: dec!(10),
            no_show_fee_collection_rate: dec!(30),
            cancellation_fee_collection_rate: dec!(20),
            features: FeatureToggles::all(),
        }
    }
}
