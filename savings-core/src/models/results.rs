use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One month of clinic operations, rounded to whole units for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projection {
    pub visits_scheduled: Decimal,
    pub visits_occurred: Decimal,
    /// Revenue from visits that took place.
    pub revenue: Decimal,
    pub cancellation_fees_collected: Decimal,
    pub no_show_fees_collected: Decimal,
    pub total_revenue: Decimal,
    pub front_office_staff_expense: Decimal,
    pub reminder_text_expense: Decimal,
    pub total_costs: Decimal,
    pub net_revenue: Decimal,
}

/// Operating rates after the enabled automation features were applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustedRates {
    pub active_patients: Decimal,
    pub cancellation_rate: Decimal,
    pub no_show_rate: Decimal,
    pub plan_of_care_scheduled: Decimal,
    /// Capped at 100.
    pub cancellation_backfill_rate: Decimal,
    pub no_show_fee_collection_rate: Decimal,
    pub cancellation_fee_collection_rate: Decimal,
    pub front_office_staff: Decimal,
    pub reminder_texts: Decimal,
}

/// The automated projection together with the rates that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomatedProjection {
    #[serde(flatten)]
    pub projection: Projection,
    #[serde(flatten)]
    pub rates: AdjustedRates,
}

/// Side-by-side comparison of the clinic with and without automation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculatorResults {
    pub without_automation: Projection,
    pub with_automation: AutomatedProjection,
    /// Net revenue gained per month by automating.
    pub savings_per_month: Decimal,
    /// Yearly savings in thousands, for the "NK+ annual savings" headline.
    pub annual_savings_thousands: Decimal,
}
