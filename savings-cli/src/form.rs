//! Editable calculator form.
//!
//! Holds the clinic inputs as the user edits them and keeps a results record
//! that is recomputed in full after every accepted change. Input validation
//! lives here; the engine accepts whatever numbers it is given.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use savings_core::{CalculatorInputs, CalculatorResults, Feature, SavingsCalculator};
use thiserror::Error;
use tracing::debug;

use crate::utils::{ParseDecimalError, parse_decimal, parse_switch};

/// Largest value accepted for any numeric field.
pub const MAX_FIELD_VALUE: Decimal = dec!(1000000000000);

const MAX_RATE: Decimal = dec!(100);

/// Errors produced while editing the form. A rejected edit leaves the form
/// unchanged.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("unknown field '{0}'")]
    UnknownField(String),

    #[error("expected 'field=value', got '{0}'")]
    MalformedAssignment(String),

    #[error("{field} must be a number")]
    InvalidNumber {
        field: &'static str,
        #[source]
        source: ParseDecimalError,
    },

    #[error("{field} cannot be negative, got {value}")]
    Negative { field: &'static str, value: Decimal },

    #[error("{field} must be between 0 and 100, got {value}")]
    RateOutOfRange { field: &'static str, value: Decimal },

    #[error("{field} is too large, got {value}")]
    TooLarge { field: &'static str, value: Decimal },

    #[error("{feature} must be on or off, got '{value}'")]
    InvalidSwitch { feature: &'static str, value: String },
}

/// A numeric field of the calculator form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputField {
    ActivePatients,
    NoShowRate,
    CancellationRate,
    AvgVisitsPerPatient,
    AvgRevenuePerVisit,
    CancellationFee,
    CancellationFeeApplicationRate,
    NoShowFee,
    CostPerReminderText,
    MonthlySalaryPerFrontOffice,
    NumberOfFrontOfficeEmployees,
    AvgPlanOfCareScheduled,
    CurrentCancellationBackfillRate,
    NoShowFeeCollectionRate,
    CancellationFeeCollectionRate,
}

impl InputField {
    pub const ALL: [InputField; 15] = [
        InputField::ActivePatients,
        InputField::NoShowRate,
        InputField::CancellationRate,
        InputField::AvgVisitsPerPatient,
        InputField::AvgRevenuePerVisit,
        InputField::CancellationFee,
        InputField::CancellationFeeApplicationRate,
        InputField::NoShowFee,
        InputField::CostPerReminderText,
        InputField::MonthlySalaryPerFrontOffice,
        InputField::NumberOfFrontOfficeEmployees,
        InputField::AvgPlanOfCareScheduled,
        InputField::CurrentCancellationBackfillRate,
        InputField::NoShowFeeCollectionRate,
        InputField::CancellationFeeCollectionRate,
    ];

    /// The snake_case key used on the command line and in CSV headers.
    pub fn key(&self) -> &'static str {
        match self {
            Self::ActivePatients => "active_patients",
            Self::NoShowRate => "no_show_rate",
            Self::CancellationRate => "cancellation_rate",
            Self::AvgVisitsPerPatient => "avg_visits_per_patient",
            Self::AvgRevenuePerVisit => "avg_revenue_per_visit",
            Self::CancellationFee => "cancellation_fee",
            Self::CancellationFeeApplicationRate => "cancellation_fee_application_rate",
            Self::NoShowFee => "no_show_fee",
            Self::CostPerReminderText => "cost_per_reminder_text",
            Self::MonthlySalaryPerFrontOffice => "monthly_salary_per_front_office",
            Self::NumberOfFrontOfficeEmployees => "number_of_front_office_employees",
            Self::AvgPlanOfCareScheduled => "avg_plan_of_care_scheduled",
            Self::CurrentCancellationBackfillRate => "current_cancellation_backfill_rate",
            Self::NoShowFeeCollectionRate => "no_show_fee_collection_rate",
            Self::CancellationFeeCollectionRate => "cancellation_fee_collection_rate",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::ActivePatients => "Active patients",
            Self::NoShowRate => "No show rate (%)",
            Self::CancellationRate => "Cancellation rate (%)",
            Self::AvgVisitsPerPatient => "Average visits per patient",
            Self::AvgRevenuePerVisit => "Average revenue per visit",
            Self::CancellationFee => "Cancellation fee",
            Self::CancellationFeeApplicationRate => "Cancellations charged a fee (%)",
            Self::NoShowFee => "No show fee",
            Self::CostPerReminderText => "Cost per reminder text",
            Self::MonthlySalaryPerFrontOffice => "Monthly salary per front office employee",
            Self::NumberOfFrontOfficeEmployees => "Number of front office employees",
            Self::AvgPlanOfCareScheduled => "Average plan of care scheduled",
            Self::CurrentCancellationBackfillRate => "Cancellation backfill rate (%)",
            Self::NoShowFeeCollectionRate => "No show fee collection rate (%)",
            Self::CancellationFeeCollectionRate => "Cancellation fee collection rate (%)",
        }
    }

    /// Percentage fields are limited to 0-100.
    pub fn is_rate(&self) -> bool {
        matches!(
            self,
            Self::NoShowRate
                | Self::CancellationRate
                | Self::CancellationFeeApplicationRate
                | Self::CurrentCancellationBackfillRate
                | Self::NoShowFeeCollectionRate
                | Self::CancellationFeeCollectionRate
        )
    }

    pub fn get(
        &self,
        inputs: &CalculatorInputs,
    ) -> Decimal {
        match self {
            Self::ActivePatients => inputs.active_patients,
            Self::NoShowRate => inputs.no_show_rate,
            Self::CancellationRate => inputs.cancellation_rate,
            Self::AvgVisitsPerPatient => inputs.avg_visits_per_patient,
            Self::AvgRevenuePerVisit => inputs.avg_revenue_per_visit,
            Self::CancellationFee => inputs.cancellation_fee,
            Self::CancellationFeeApplicationRate => inputs.cancellation_fee_application_rate,
            Self::NoShowFee => inputs.no_show_fee,
            Self::CostPerReminderText => inputs.cost_per_reminder_text,
            Self::MonthlySalaryPerFrontOffice => inputs.monthly_salary_per_front_office,
            Self::NumberOfFrontOfficeEmployees => inputs.number_of_front_office_employees,
            Self::AvgPlanOfCareScheduled => inputs.avg_plan_of_care_scheduled,
            Self::CurrentCancellationBackfillRate => inputs.current_cancellation_backfill_rate,
            Self::NoShowFeeCollectionRate => inputs.no_show_fee_collection_rate,
            Self::CancellationFeeCollectionRate => inputs.cancellation_fee_collection_rate,
        }
    }

    pub fn set(
        &self,
        inputs: &mut CalculatorInputs,
        value: Decimal,
    ) {
        *self.slot(inputs) = value;
    }

    fn slot<'a>(
        &self,
        inputs: &'a mut CalculatorInputs,
    ) -> &'a mut Decimal {
        match self {
            Self::ActivePatients => &mut inputs.active_patients,
            Self::NoShowRate => &mut inputs.no_show_rate,
            Self::CancellationRate => &mut inputs.cancellation_rate,
            Self::AvgVisitsPerPatient => &mut inputs.avg_visits_per_patient,
            Self::AvgRevenuePerVisit => &mut inputs.avg_revenue_per_visit,
            Self::CancellationFee => &mut inputs.cancellation_fee,
            Self::CancellationFeeApplicationRate => &mut inputs.cancellation_fee_application_rate,
            Self::NoShowFee => &mut inputs.no_show_fee,
            Self::CostPerReminderText => &mut inputs.cost_per_reminder_text,
            Self::MonthlySalaryPerFrontOffice => &mut inputs.monthly_salary_per_front_office,
            Self::NumberOfFrontOfficeEmployees => &mut inputs.number_of_front_office_employees,
            Self::AvgPlanOfCareScheduled => &mut inputs.avg_plan_of_care_scheduled,
            Self::CurrentCancellationBackfillRate => {
                &mut inputs.current_cancellation_backfill_rate
            }
            Self::NoShowFeeCollectionRate => &mut inputs.no_show_fee_collection_rate,
            Self::CancellationFeeCollectionRate => &mut inputs.cancellation_fee_collection_rate,
        }
    }

    /// Parses and validates text typed into this field.
    pub fn parse_value(
        &self,
        text: &str,
    ) -> Result<Decimal, FormError> {
        let value = parse_decimal(text).map_err(|source| FormError::InvalidNumber {
            field: self.key(),
            source,
        })?;
        self.validate(value)
    }

    /// Checks a value against the field's range.
    pub fn validate(
        &self,
        value: Decimal,
    ) -> Result<Decimal, FormError> {
        let field = self.key();
        if value < Decimal::ZERO {
            return Err(FormError::Negative { field, value });
        }
        if self.is_rate() && value > MAX_RATE {
            return Err(FormError::RateOutOfRange { field, value });
        }
        if value > MAX_FIELD_VALUE {
            return Err(FormError::TooLarge { field, value });
        }
        Ok(value)
    }
}

/// Lowercases and strips separators so `noShowRate`, `no_show_rate` and
/// `no-show-rate` compare equal.
fn fold_key(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

impl FromStr for InputField {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = fold_key(s);
        InputField::ALL
            .into_iter()
            .find(|field| fold_key(field.key()) == wanted)
            .ok_or_else(|| FormError::UnknownField(s.trim().to_string()))
    }
}

/// The calculator form: current inputs plus the results derived from them.
#[derive(Debug, Clone)]
pub struct CalculatorForm {
    calculator: SavingsCalculator,
    inputs: CalculatorInputs,
    results: CalculatorResults,
}

impl CalculatorForm {
    /// A form populated with the reference defaults.
    pub fn new(calculator: SavingsCalculator) -> Self {
        Self::with_inputs(calculator, CalculatorInputs::default())
    }

    pub fn with_inputs(
        calculator: SavingsCalculator,
        inputs: CalculatorInputs,
    ) -> Self {
        let results = calculator.calculate(&inputs);
        Self {
            calculator,
            inputs,
            results,
        }
    }

    pub fn inputs(&self) -> &CalculatorInputs {
        &self.inputs
    }

    pub fn results(&self) -> &CalculatorResults {
        &self.results
    }

    /// Updates one numeric field from user text and recomputes.
    pub fn set_field(
        &mut self,
        field: InputField,
        text: &str,
    ) -> Result<&CalculatorResults, FormError> {
        let value = field.parse_value(text)?;
        debug!(field = field.key(), value = %value, "Form field updated");
        field.set(&mut self.inputs, value);
        Ok(self.recompute())
    }

    /// Switches one feature and recomputes.
    pub fn set_feature(
        &mut self,
        feature: Feature,
        enabled: bool,
    ) -> &CalculatorResults {
        debug!(feature = feature.as_str(), enabled, "Form feature toggled");
        self.inputs.features.set(feature, enabled);
        self.recompute()
    }

    /// Applies a `field=value` assignment. The name may be a numeric field or
    /// a feature; features take an on/off value.
    pub fn apply_assignment(
        &mut self,
        assignment: &str,
    ) -> Result<&CalculatorResults, FormError> {
        let (name, value) = assignment
            .split_once('=')
            .ok_or_else(|| FormError::MalformedAssignment(assignment.to_string()))?;

        if let Some(feature) = Feature::parse(name) {
            let enabled = parse_switch(value).ok_or_else(|| FormError::InvalidSwitch {
                feature: feature.as_str(),
                value: value.trim().to_string(),
            })?;
            return Ok(self.set_feature(feature, enabled));
        }

        let field: InputField = name.parse()?;
        self.set_field(field, value)
    }

    fn recompute(&mut self) -> &CalculatorResults {
        self.results = self.calculator.calculate(&self.inputs);
        &self.results
    }
}
