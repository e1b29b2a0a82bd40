//! Text and JSON rendering of calculator results.

use std::fmt::Write;

use rust_decimal::Decimal;
use savings_core::calculations::Adjustment;
use savings_core::{CalculatorInputs, CalculatorResults, FeatureToggles};
use serde::Serialize;

use crate::format::{format_annual_thousands, format_count, format_currency, format_percent};

const LABEL_WIDTH: usize = 34;
const VALUE_WIDTH: usize = 20;

/// Output format selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    scenario: Option<&'a str>,
    inputs: &'a CalculatorInputs,
    results: &'a CalculatorResults,
}

fn row(
    out: &mut String,
    label: &str,
    without: String,
    with: String,
) {
    let _ = writeln!(
        out,
        "{label:<LABEL_WIDTH$}{without:>VALUE_WIDTH$}{with:>VALUE_WIDTH$}"
    );
}

fn money_row(
    out: &mut String,
    label: &str,
    without: Decimal,
    with: Decimal,
) {
    row(out, label, format_currency(without), format_currency(with));
}

/// Renders the side-by-side comparison as plain text.
pub fn render_text(
    title: Option<&str>,
    inputs: &CalculatorInputs,
    results: &CalculatorResults,
) -> String {
    let without = &results.without_automation;
    let with = &results.with_automation.projection;
    let rates = &results.with_automation.rates;
    let mut out = String::new();

    if let Some(title) = title {
        let _ = writeln!(out, "== {title} ==");
    }

    let _ = writeln!(out, "Results comparison");
    row(
        &mut out,
        "",
        "Without automation".to_string(),
        "With automation".to_string(),
    );
    row(
        &mut out,
        "Visits scheduled",
        format_count(without.visits_scheduled),
        format_count(with.visits_scheduled),
    );
    row(
        &mut out,
        "Visits occurred",
        format_count(without.visits_occurred),
        format_count(with.visits_occurred),
    );
    row(
        &mut out,
        "Cancellation rate",
        format_percent(inputs.cancellation_rate),
        format_percent(rates.cancellation_rate),
    );
    row(
        &mut out,
        "No-show rate",
        format_percent(inputs.no_show_rate),
        format_percent(rates.no_show_rate),
    );

    let _ = writeln!(out);
    let _ = writeln!(out, "Financial impact");
    money_row(&mut out, "Revenue from visits", without.revenue, with.revenue);
    money_row(
        &mut out,
        "Cancellation fees",
        without.cancellation_fees_collected,
        with.cancellation_fees_collected,
    );
    money_row(
        &mut out,
        "No-show fees",
        without.no_show_fees_collected,
        with.no_show_fees_collected,
    );
    money_row(&mut out, "Total revenue", without.total_revenue, with.total_revenue);
    money_row(
        &mut out,
        "Front office staff",
        without.front_office_staff_expense,
        with.front_office_staff_expense,
    );
    money_row(
        &mut out,
        "Reminder texts",
        without.reminder_text_expense,
        with.reminder_text_expense,
    );
    money_row(&mut out, "Total costs", without.total_costs, with.total_costs);
    money_row(&mut out, "Net revenue", without.net_revenue, with.net_revenue);

    let _ = writeln!(out);
    let _ = writeln!(out, "With automation");
    let detail = |out: &mut String, label: &str, value: String| {
        let _ = writeln!(out, "  {label:<32}{value:>VALUE_WIDTH$}");
    };
    detail(&mut out, "Active patients", format_count(rates.active_patients));
    detail(
        &mut out,
        "Plan of care scheduled",
        format_count(rates.plan_of_care_scheduled),
    );
    detail(
        &mut out,
        "Cancellation backfill rate",
        format_percent(rates.cancellation_backfill_rate),
    );
    detail(
        &mut out,
        "No-show fee collection rate",
        format_percent(rates.no_show_fee_collection_rate),
    );
    detail(
        &mut out,
        "Cancellation fee collection rate",
        format_percent(rates.cancellation_fee_collection_rate),
    );
    detail(
        &mut out,
        "Front office staff",
        format_count(rates.front_office_staff),
    );
    detail(&mut out, "Reminder texts", format_count(rates.reminder_texts));

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Savings per month: {} ({} annual savings)",
        format_currency(results.savings_per_month),
        format_annual_thousands(results.annual_savings_thousands)
    );
    out
}

/// Renders inputs and results as pretty-printed JSON.
pub fn render_json(
    scenario: Option<&str>,
    inputs: &CalculatorInputs,
    results: &CalculatorResults,
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport {
        scenario,
        inputs,
        results,
    })
}

/// Renders several scenarios as one pretty-printed JSON array.
pub fn render_json_batch<'a, I>(reports: I) -> serde_json::Result<String>
where
    I: IntoIterator<Item = (&'a str, &'a CalculatorInputs, &'a CalculatorResults)>,
{
    let reports: Vec<JsonReport<'a>> = reports
        .into_iter()
        .map(|(scenario, inputs, results)| JsonReport {
            scenario: Some(scenario),
            inputs,
            results,
        })
        .collect();
    serde_json::to_string_pretty(&reports)
}

/// Lists the automation adjustments in application order, marking the ones
/// the toggles switch on.
pub fn render_adjustments(toggles: &FeatureToggles) -> String {
    let mut out = String::new();
    for (i, adjustment) in Adjustment::ORDER.iter().enumerate() {
        let mark = if adjustment.is_enabled(toggles) { "x" } else { " " };
        let _ = writeln!(
            out,
            "{:>2}. [{mark}] {:<30} {}",
            i + 1,
            adjustment.name(),
            adjustment.description()
        );
    }
    out
}
