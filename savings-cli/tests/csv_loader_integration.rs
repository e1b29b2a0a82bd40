//! Integration tests that load scenarios from an on-disk fixture file and run
//! them through the calculator.

use std::path::Path;

use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use savings_cli::csv_loader;
use savings_cli::form::CalculatorForm;
use savings_core::{CalculatorInputs, FeatureToggles, SavingsCalculator, compute};

/// Path to the sample CSV shipped with the test fixtures.
fn fixture_path() -> &'static Path {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("sample_scenarios.csv")
        .leak()
}

#[test]
fn test_load_fixture_file_succeeds() {
    let scenarios =
        csv_loader::load_from_file(fixture_path()).expect("fixture file should load without error");

    assert_eq!(scenarios.len(), 3);
    let names: Vec<&str> = scenarios.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Reference clinic", "No automation", "Solo practitioner"]);
}

#[test]
fn test_fully_specified_row_matches_defaults() {
    let scenarios = csv_loader::load_from_file(fixture_path()).unwrap();

    assert_eq!(scenarios[0].inputs, CalculatorInputs::default());

    let results = compute(&scenarios[0].inputs);
    assert_eq!(results.savings_per_month, dec!(61836));
    assert_eq!(results.annual_savings_thousands, dec!(742));
}

#[test]
fn test_row_without_automation_saves_nothing() {
    let scenarios = csv_loader::load_from_file(fixture_path()).unwrap();
    let inputs = &scenarios[1].inputs;

    assert_eq!(inputs.features, FeatureToggles::none());
    assert_eq!(inputs.current_cancellation_backfill_rate, Decimal::ZERO);

    let results = compute(inputs);
    assert_eq!(results.savings_per_month, Decimal::ZERO);
    assert_eq!(
        results.without_automation,
        results.with_automation.projection
    );
}

#[test]
fn test_sparse_row_falls_back_to_defaults() {
    let scenarios = csv_loader::load_from_file(fixture_path()).unwrap();
    let inputs = &scenarios[2].inputs;
    let defaults = CalculatorInputs::default();

    assert_eq!(inputs.active_patients, dec!(120));
    assert_eq!(inputs.avg_revenue_per_visit, dec!(95));
    assert_eq!(inputs.number_of_front_office_employees, dec!(1));
    assert_eq!(inputs.no_show_rate, defaults.no_show_rate);
    assert_eq!(inputs.cost_per_reminder_text, defaults.cost_per_reminder_text);
    assert!(!inputs.features.calendar_invites);
    assert!(inputs.features.automated_reminders);

    // Staff floor keeps the one employee.
    let results = compute(inputs);
    assert_eq!(results.with_automation.rates.front_office_staff, dec!(1));
}

#[test]
fn test_loaded_scenario_can_be_edited_in_form() {
    let scenarios = csv_loader::load_from_file(fixture_path()).unwrap();
    let mut form = CalculatorForm::with_inputs(
        SavingsCalculator::default(),
        scenarios[0].inputs.clone(),
    );
    let before = form.results().clone();

    form.apply_assignment("avg_revenue_per_visit=$120").unwrap();

    assert!(form.results().savings_per_month > before.savings_per_month);
    assert!(form.apply_assignment("no_show_rate=abc").is_err());
    assert_eq!(form.inputs().avg_revenue_per_visit, dec!(120));
}

#[test]
fn test_missing_file_is_error() {
    let result = csv_loader::load_from_file(Path::new("/nonexistent/scenarios.csv"));

    assert!(result.is_err());
}
