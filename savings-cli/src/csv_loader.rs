//! CSV loader for calculator scenarios.
//!
//! ## CSV Format
//!
//! Each row is one clinic scenario. Headers are matched by name, so column
//! order does **not** matter. Only `name` is required; any other column may be
//! left out entirely or left empty, in which case the reference default is used.
//!
//! | Column | Type | Notes |
//! |--------------------------------------|---------|--------------------------------|
//! | `name` | string | Scenario label |
//! | `active_patients` | decimal | |
//! | `no_show_rate` | decimal | Percent, 0-100 |
//! | `cancellation_rate` | decimal | Percent, 0-100 |
//! | `avg_visits_per_patient` | decimal | |
//! | `avg_revenue_per_visit` | decimal | |
//! | `cancellation_fee` | decimal | |
//! | `cancellation_fee_application_rate` | decimal | Percent, 0-100 |
//! | `no_show_fee` | decimal | |
//! | `cost_per_reminder_text` | decimal | |
//! | `monthly_salary_per_front_office` | decimal | |
//! | `number_of_front_office_employees` | decimal | |
//! | `avg_plan_of_care_scheduled` | decimal | |
//! | `current_cancellation_backfill_rate` | decimal | Percent, 0-100 |
//! | `no_show_fee_collection_rate` | decimal | Percent, 0-100 |
//! | `cancellation_fee_collection_rate` | decimal | Percent, 0-100 |
//! | `calendar_invites` ... `automated_cancellation_fee_collection` | switch | `true`/`false`, `yes`/`no`, `on`/`off`, `1`/`0` |
//!
//! ### Minimal example
//!
//! ```csv
//! name,active_patients,avg_revenue_per_visit
//! Small practice,120,95
//! ```
use rust_decimal::Decimal;
use savings_core::{CalculatorInputs, Feature};
use serde::Deserialize;

use crate::form::{FormError, InputField};
use crate::utils::parse_switch;

// ---------------------------------------------------------------------------
// Serde-compatible row that mirrors the CSV layout exactly
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CsvRow {
    name: String,
    active_patients: Option<Decimal>,
    no_show_rate: Option<Decimal>,
    cancellation_rate: Option<Decimal>,
    avg_visits_per_patient: Option<Decimal>,
    avg_revenue_per_visit: Option<Decimal>,
    cancellation_fee: Option<Decimal>,
    cancellation_fee_application_rate: Option<Decimal>,
    no_show_fee: Option<Decimal>,
    cost_per_reminder_text: Option<Decimal>,
    monthly_salary_per_front_office: Option<Decimal>,
    number_of_front_office_employees: Option<Decimal>,
    avg_plan_of_care_scheduled: Option<Decimal>,
    current_cancellation_backfill_rate: Option<Decimal>,
    no_show_fee_collection_rate: Option<Decimal>,
    cancellation_fee_collection_rate: Option<Decimal>,
    calendar_invites: Option<String>,
    automated_review_collection: Option<String>,
    automated_reminders: Option<String>,
    automated_waitlist: Option<String>,
    automated_plan_of_care: Option<String>,
    automated_rescheduling: Option<String>,
    automated_no_show_fee_collection: Option<String>,
    automated_cancellation_fee_collection: Option<String>,
}

impl CsvRow {
    fn numeric_cells(&self) -> [(InputField, Option<Decimal>); 15] {
        [
            (InputField::ActivePatients, self.active_patients),
            (InputField::NoShowRate, self.no_show_rate),
            (InputField::CancellationRate, self.cancellation_rate),
            (InputField::AvgVisitsPerPatient, self.avg_visits_per_patient),
            (InputField::AvgRevenuePerVisit, self.avg_revenue_per_visit),
            (InputField::CancellationFee, self.cancellation_fee),
            (
                InputField::CancellationFeeApplicationRate,
                self.cancellation_fee_application_rate,
            ),
            (InputField::NoShowFee, self.no_show_fee),
            (InputField::CostPerReminderText, self.cost_per_reminder_text),
            (
                InputField::MonthlySalaryPerFrontOffice,
                self.monthly_salary_per_front_office,
            ),
            (
                InputField::NumberOfFrontOfficeEmployees,
                self.number_of_front_office_employees,
            ),
            (InputField::AvgPlanOfCareScheduled, self.avg_plan_of_care_scheduled),
            (
                InputField::CurrentCancellationBackfillRate,
                self.current_cancellation_backfill_rate,
            ),
            (InputField::NoShowFeeCollectionRate, self.no_show_fee_collection_rate),
            (
                InputField::CancellationFeeCollectionRate,
                self.cancellation_fee_collection_rate,
            ),
        ]
    }

    fn switch_cells(&self) -> [(Feature, Option<&str>); 8] {
        [
            (Feature::CalendarInvites, self.calendar_invites.as_deref()),
            (
                Feature::ReviewCollection,
                self.automated_review_collection.as_deref(),
            ),
            (Feature::Reminders, self.automated_reminders.as_deref()),
            (Feature::Waitlist, self.automated_waitlist.as_deref()),
            (Feature::PlanOfCare, self.automated_plan_of_care.as_deref()),
            (Feature::Rescheduling, self.automated_rescheduling.as_deref()),
            (
                Feature::NoShowFeeCollection,
                self.automated_no_show_fee_collection.as_deref(),
            ),
            (
                Feature::CancellationFeeCollection,
                self.automated_cancellation_fee_collection.as_deref(),
            ),
        ]
    }
}

/// One named set of calculator inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub name: String,
    pub inputs: CalculatorInputs,
}

// ---------------------------------------------------------------------------
// Public error type
// ---------------------------------------------------------------------------

/// Errors that can occur while loading or converting CSV data.
#[derive(Debug, thiserror::Error)]
pub enum CsvLoadError {
    /// The underlying CSV deserialisation failed (bad structure, missing
    /// `name` column, non-numeric cell, etc.).
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// A cell held a value the calculator form would reject. `row` is 1-based
    /// (header = row 0).
    #[error("invalid value on row {row}: {source}")]
    InvalidField {
        row: usize,
        #[source]
        source: FormError,
    },
}

// ---------------------------------------------------------------------------
// Core loader
// ---------------------------------------------------------------------------

/// Convert a single CSV row into a scenario on top of the reference defaults.
fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<Scenario, CsvLoadError> {
    let invalid = |source| CsvLoadError::InvalidField {
        row: row_number,
        source,
    };
    let mut inputs = CalculatorInputs::default();

    for (field, cell) in row.numeric_cells() {
        if let Some(value) = cell {
            let value = field.validate(value).map_err(invalid)?;
            field.set(&mut inputs, value);
        }
    }

    for (feature, cell) in row.switch_cells() {
        let Some(text) = cell.map(str::trim).filter(|t| !t.is_empty()) else {
            continue;
        };
        let enabled = parse_switch(text).ok_or_else(|| {
            invalid(FormError::InvalidSwitch {
                feature: feature.as_str(),
                value: text.to_string(),
            })
        })?;
        inputs.features.set(feature, enabled);
    }

    Ok(Scenario {
        name: row.name,
        inputs,
    })
}

/// Parse CSV text (the full file contents as a &str) and return the
/// scenarios in file order.
///
/// # Errors
///
/// * [CsvLoadError::Parse] – if the CSV is structurally invalid or a cell
///   cannot be deserialised.
/// * [CsvLoadError::InvalidField] – if a value is out of range or a switch
///   cell is not recognised.
pub fn load_from_str(input: &str) -> Result<Vec<Scenario>, CsvLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All) // tolerate whitespace around values
        .flexible(false) // strict column count
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            let row_number = idx + 1; // 1-based for user-facing messages
            convert_row(row, row_number)
        })
        .collect()
}

/// Convenience wrapper: read a file from disk and delegate to [load_from_str].
///
/// # Errors
///
/// Returns an io::Error when the file cannot be read, or a
/// [CsvLoadError] when the contents are invalid.
pub fn load_from_file(
    path: &std::path::Path
) -> Result<Vec<Scenario>, Box<dyn std::error::Error + Send + Sync>> {
    let contents = std::fs::read_to_string(path)?;
    let scenarios = load_from_str(&contents)?;
    Ok(scenarios)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use savings_core::FeatureToggles;

    // -----------------------------------------------------------------------
    // Helper: only the required column
    // -----------------------------------------------------------------------
    const MINIMAL_CSV: &str = "\
name
Reference clinic
";

    // -----------------------------------------------------------------------
    // Helper: a few overrides, in a different column order
    // -----------------------------------------------------------------------
    const PARTIAL_CSV: &str = "\
avg_revenue_per_visit,name,automated_waitlist,no_show_rate
95.50,Small practice,no,
120,Large practice,,7.5
";

    // -----------------------------------------------------------------------
    // 1. Minimal CSV – everything falls back to the defaults
    // -----------------------------------------------------------------------
    #[test]
    fn test_minimal_csv_uses_defaults() {
        let scenarios = load_from_str(MINIMAL_CSV).expect("should parse minimal CSV");

        assert_eq!(
            scenarios,
            vec![Scenario {
                name: "Reference clinic".to_string(),
                inputs: CalculatorInputs::default(),
            }]
        );
    }

    // -----------------------------------------------------------------------
    // 2. Partial CSV – overrides land on the right fields
    // -----------------------------------------------------------------------
    #[test]
    fn test_partial_csv_overrides_named_columns() {
        let scenarios = load_from_str(PARTIAL_CSV).expect("should parse");

        assert_eq!(scenarios.len(), 2);

        let small = &scenarios[0];
        assert_eq!(small.name, "Small practice");
        assert_eq!(small.inputs.avg_revenue_per_visit, dec!(95.50));
        assert_eq!(small.inputs.no_show_rate, dec!(10)); // default
        assert!(!small.inputs.features.automated_waitlist);
        assert!(small.inputs.features.automated_reminders);

        let large = &scenarios[1];
        assert_eq!(large.inputs.avg_revenue_per_visit, dec!(120));
        assert_eq!(large.inputs.no_show_rate, dec!(7.5));
        assert_eq!(large.inputs.features, FeatureToggles::all());
    }

    // -----------------------------------------------------------------------
    // 3. Whitespace around values is tolerated
    // -----------------------------------------------------------------------
    #[test]
    fn test_whitespace_is_trimmed() {
        let csv = "name , active_patients , automated_reminders\n  Trimmed ,  300 , off \n";

        let scenarios = load_from_str(csv).expect("should parse");

        assert_eq!(scenarios[0].name, "Trimmed");
        assert_eq!(scenarios[0].inputs.active_patients, dec!(300));
        assert!(!scenarios[0].inputs.features.automated_reminders);
    }

    // -----------------------------------------------------------------------
    // 4. Errors
    // -----------------------------------------------------------------------
    #[test]
    fn test_missing_name_column_is_parse_error() {
        let err = load_from_str("active_patients\n300\n").unwrap_err();

        assert!(matches!(err, CsvLoadError::Parse(_)));
    }

    #[test]
    fn test_non_numeric_cell_is_parse_error() {
        let err = load_from_str("name,active_patients\nBad,lots\n").unwrap_err();

        assert!(matches!(err, CsvLoadError::Parse(_)));
    }

    #[test]
    fn test_rate_out_of_range_reports_row() {
        let csv = "name,cancellation_rate\nFine,20\nBroken,140\n";

        let err = load_from_str(csv).unwrap_err();

        match err {
            CsvLoadError::InvalidField { row, source } => {
                assert_eq!(row, 2);
                assert!(matches!(source, FormError::RateOutOfRange { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_negative_value_is_rejected() {
        let err = load_from_str("name,no_show_fee\nOdd,-10\n").unwrap_err();

        assert!(matches!(
            err,
            CsvLoadError::InvalidField {
                row: 1,
                source: FormError::Negative { .. }
            }
        ));
    }

    #[test]
    fn test_unrecognised_switch_is_rejected() {
        let err = load_from_str("name,automated_waitlist\nOdd,sometimes\n").unwrap_err();

        assert!(matches!(
            err,
            CsvLoadError::InvalidField {
                source: FormError::InvalidSwitch { feature: "waitlist", .. },
                ..
            }
        ));
    }

    #[test]
    fn test_ragged_rows_are_rejected() {
        let err = load_from_str("name,active_patients\nA,1,2\n").unwrap_err();

        assert!(matches!(err, CsvLoadError::Parse(_)));
    }
}
