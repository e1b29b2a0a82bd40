//! The monthly visit funnel.
//!
//! Turns an [`OperatingState`] into visits, revenue and costs:
//!
//! | Line | Description |
//! |------|-------------|
//! | 1    | Cancellations: visits scheduled × cancellation rate |
//! | 2    | Backfilled: cancellations × backfill rate (capped at 100%) |
//! | 3    | Actual cancellations: line 1 − line 2 |
//! | 4    | No-shows: (visits scheduled − line 3) × no-show rate |
//! | 5    | Visits occurred: visits scheduled − line 3 − line 4 |
//! | 6    | Revenue: line 5 × revenue per visit |
//! | 7    | Cancellation fees: line 3 × application rate × fee × collection rate |
//! | 8    | No-show fees: line 4 × fee × collection rate |
//! | 9    | Total revenue: line 6 + line 7 + line 8 |
//! | 10   | Front office expense: salary × staff |
//! | 11   | Reminder text expense: reminder texts × cost per text |
//! | 12   | Total costs: line 10 + line 11 |
//! | 13   | Net revenue: line 9 − line 12 |
//!
//! Every line is kept unrounded; [`FunnelLines::to_projection`] rounds once
//! for display. Lines saturate at the `Decimal` range, so extreme inputs give
//! `Decimal::MAX`-sized figures rather than a panic.

use rust_decimal::Decimal;
use tracing::warn;

use super::adjustments::OperatingState;
use super::common::{PERCENT_SCALE, clamp_rate, percent_of, round_whole};
use crate::{CalculatorInputs, Projection};

/// Unrounded result of every funnel line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunnelLines {
    pub visits_scheduled: Decimal,
    pub cancellations: Decimal,
    pub backfilled: Decimal,
    pub actual_cancellations: Decimal,
    pub no_shows: Decimal,
    pub visits_occurred: Decimal,
    pub revenue: Decimal,
    pub cancellation_fees_collected: Decimal,
    pub no_show_fees_collected: Decimal,
    pub total_revenue: Decimal,
    pub front_office_staff_expense: Decimal,
    pub reminder_text_expense: Decimal,
    pub total_costs: Decimal,
    pub net_revenue: Decimal,
}

impl FunnelLines {
    /// Rounds every line to whole units.
    pub fn to_projection(&self) -> Projection {
        Projection {
            visits_scheduled: round_whole(self.visits_scheduled),
            visits_occurred: round_whole(self.visits_occurred),
            revenue: round_whole(self.revenue),
            cancellation_fees_collected: round_whole(self.cancellation_fees_collected),
            no_show_fees_collected: round_whole(self.no_show_fees_collected),
            total_revenue: round_whole(self.total_revenue),
            front_office_staff_expense: round_whole(self.front_office_staff_expense),
            reminder_text_expense: round_whole(self.reminder_text_expense),
            total_costs: round_whole(self.total_costs),
            net_revenue: round_whole(self.net_revenue),
        }
    }
}

/// Runs the funnel lines for one operating state.
///
/// The per-visit amounts (revenue, fees, salary, text cost) always come from
/// the clinic inputs; only the rates and volumes come from the state.
#[derive(Debug, Clone, Copy)]
pub struct VisitFunnel<'a> {
    inputs: &'a CalculatorInputs,
}

impl<'a> VisitFunnel<'a> {
    pub fn new(inputs: &'a CalculatorInputs) -> Self {
        Self { inputs }
    }

    pub fn run(
        &self,
        state: &OperatingState,
    ) -> FunnelLines {
        let visits_scheduled = state.visits_scheduled;

        // Lines 1-3
        let cancellations = self.cancellations(visits_scheduled, state.cancellation_rate);
        let backfilled = self.backfilled(cancellations, state.cancellation_backfill_rate);
        let actual_cancellations = cancellations.saturating_sub(backfilled);

        // Lines 4-5
        let no_shows = self.no_shows(visits_scheduled, actual_cancellations, state.no_show_rate);
        let visits_occurred = visits_scheduled
            .saturating_sub(actual_cancellations)
            .saturating_sub(no_shows);

        // Lines 6-9
        let revenue = visits_occurred.saturating_mul(self.inputs.avg_revenue_per_visit);
        let cancellation_fees_collected = self.cancellation_fees(
            actual_cancellations,
            state.cancellation_fee_collection_rate,
        );
        let no_show_fees_collected =
            self.no_show_fees(no_shows, state.no_show_fee_collection_rate);
        let total_revenue = revenue
            .saturating_add(cancellation_fees_collected)
            .saturating_add(no_show_fees_collected);

        // Lines 10-13
        let front_office_staff_expense = self.front_office_expense(state.front_office_staff);
        let reminder_text_expense = state
            .reminder_texts
            .saturating_mul(self.inputs.cost_per_reminder_text);
        let total_costs = front_office_staff_expense.saturating_add(reminder_text_expense);
        let net_revenue = total_revenue.saturating_sub(total_costs);

        FunnelLines {
            visits_scheduled,
            cancellations,
            backfilled,
            actual_cancellations,
            no_shows,
            visits_occurred,
            revenue,
            cancellation_fees_collected,
            no_show_fees_collected,
            total_revenue,
            front_office_staff_expense,
            reminder_text_expense,
            total_costs,
            net_revenue,
        }
    }

    /// Line 1.
    fn cancellations(
        &self,
        visits_scheduled: Decimal,
        cancellation_rate: Decimal,
    ) -> Decimal {
        percent_of(visits_scheduled, cancellation_rate)
    }

    /// Line 2. A backfill rate above 100% cannot refill more slots than were
    /// cancelled, so the rate is capped before it is applied.
    fn backfilled(
        &self,
        cancellations: Decimal,
        backfill_rate: Decimal,
    ) -> Decimal {
        if backfill_rate > PERCENT_SCALE {
            warn!(
                backfill_rate = %backfill_rate,
                "Backfill rate exceeds 100%; capping"
            );
        }
        percent_of(cancellations, clamp_rate(backfill_rate))
    }

    /// Line 4. No-shows are counted on the visits that were not cancelled.
    fn no_shows(
        &self,
        visits_scheduled: Decimal,
        actual_cancellations: Decimal,
        no_show_rate: Decimal,
    ) -> Decimal {
        percent_of(visits_scheduled.saturating_sub(actual_cancellations), no_show_rate)
    }

    /// Line 7.
    fn cancellation_fees(
        &self,
        actual_cancellations: Decimal,
        collection_rate: Decimal,
    ) -> Decimal {
        let charged = percent_of(
            actual_cancellations,
            self.inputs.cancellation_fee_application_rate,
        );
        percent_of(charged.saturating_mul(self.inputs.cancellation_fee), collection_rate)
    }

    /// Line 8.
    fn no_show_fees(
        &self,
        no_shows: Decimal,
        collection_rate: Decimal,
    ) -> Decimal {
        percent_of(no_shows.saturating_mul(self.inputs.no_show_fee), collection_rate)
    }

    /// Line 10.
    fn front_office_expense(
        &self,
        staff: Decimal,
    ) -> Decimal {
        self.inputs.monthly_salary_per_front_office.saturating_mul(staff)
    }
}
