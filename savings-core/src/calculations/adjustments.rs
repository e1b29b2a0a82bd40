//! Automation adjustments applied to the clinic's operating rates.
//!
//! Each enabled feature is a named step that transforms an
//! [`OperatingState`]. The steps run in a fixed order:
//!
//! | Step | Gate | Effect |
//! |------|------|--------|
//! | Review collection | review collection | active patients +10% |
//! | Calendar invites | calendar invites | cancellation ×0.90, no-show ×0.80 |
//! | Reminders | reminders | cancellation ×0.75, no-show ×0.60, no reminder texts |
//! | Rescheduling | rescheduling | cancellation ×0.80, visits scheduled ×1.10 |
//! | Waitlist | waitlist | backfill rate +50 points |
//! | Plan of care | plan of care | plan of care ×1.30, visits scheduled ×1.40 |
//! | No-show fee collection | no-show fees | collection rate set to 90 |
//! | Cancellation fee collection | cancellation fees | collection rate set to 80 |
//! | Staff reduction | reminders and waitlist | staff = max(1, employees − 1) |
//!
//! Several steps scale the same rate and are always applied in this order.
//! Arithmetic saturates at the `Decimal` range instead of overflowing.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, warn};

use crate::{CalculatorConfig, CalculatorInputs, FeatureToggles};

pub const REVIEW_COLLECTION_PATIENT_GROWTH: Decimal = dec!(0.10);
pub const CALENDAR_INVITE_CANCELLATION_FACTOR: Decimal = dec!(0.90);
pub const CALENDAR_INVITE_NO_SHOW_FACTOR: Decimal = dec!(0.80);
pub const REMINDER_CANCELLATION_FACTOR: Decimal = dec!(0.75);
pub const REMINDER_NO_SHOW_FACTOR: Decimal = dec!(0.60);
pub const RESCHEDULING_CANCELLATION_FACTOR: Decimal = dec!(0.80);
pub const RESCHEDULING_VISIT_FACTOR: Decimal = dec!(1.10);
pub const WAITLIST_BACKFILL_POINTS: Decimal = dec!(50);
pub const PLAN_OF_CARE_SCHEDULED_FACTOR: Decimal = dec!(1.30);
pub const PLAN_OF_CARE_VISIT_FACTOR: Decimal = dec!(1.40);
pub const AUTOMATED_NO_SHOW_FEE_COLLECTION_RATE: Decimal = dec!(90);
pub const AUTOMATED_CANCELLATION_FEE_COLLECTION_RATE: Decimal = dec!(80);
pub const MIN_FRONT_OFFICE_STAFF: Decimal = Decimal::ONE;

/// Unrounded operating figures that the automation steps act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatingState {
    pub active_patients: Decimal,
    pub visits_scheduled: Decimal,
    pub cancellation_rate: Decimal,
    pub no_show_rate: Decimal,
    pub plan_of_care_scheduled: Decimal,
    /// Not clamped here; the funnel caps it at 100 when it is used.
    pub cancellation_backfill_rate: Decimal,
    pub no_show_fee_collection_rate: Decimal,
    pub cancellation_fee_collection_rate: Decimal,
    pub front_office_staff: Decimal,
    pub reminder_texts: Decimal,
}

impl OperatingState {
    /// The clinic as it runs today: input rates and the configured visit volume.
    pub fn baseline(
        inputs: &CalculatorInputs,
        config: &CalculatorConfig,
    ) -> Self {
        Self {
            active_patients: inputs.active_patients,
            visits_scheduled: config.monthly_visit_baseline,
            cancellation_rate: inputs.cancellation_rate,
            no_show_rate: inputs.no_show_rate,
            plan_of_care_scheduled: inputs.avg_plan_of_care_scheduled,
            cancellation_backfill_rate: inputs.current_cancellation_backfill_rate,
            no_show_fee_collection_rate: inputs.no_show_fee_collection_rate,
            cancellation_fee_collection_rate: inputs.cancellation_fee_collection_rate,
            front_office_staff: inputs.number_of_front_office_employees,
            reminder_texts: config.monthly_visit_baseline,
        }
    }

    /// The state behind the "without automation" projection: the clinic as it
    /// runs today, with no cancelled slot refilled.
    pub fn without_automation(
        inputs: &CalculatorInputs,
        config: &CalculatorConfig,
    ) -> Self {
        Self {
            cancellation_backfill_rate: Decimal::ZERO,
            ..Self::baseline(inputs, config)
        }
    }
}

/// A single automation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Adjustment {
    ReviewCollection,
    CalendarInvites,
    Reminders,
    Rescheduling,
    Waitlist,
    PlanOfCare,
    NoShowFeeCollection,
    CancellationFeeCollection,
    StaffReduction,
}

impl Adjustment {
    /// Application order.
    pub const ORDER: [Adjustment; 9] = [
        Adjustment::ReviewCollection,
        Adjustment::CalendarInvites,
        Adjustment::Reminders,
        Adjustment::Rescheduling,
        Adjustment::Waitlist,
        Adjustment::PlanOfCare,
        Adjustment::NoShowFeeCollection,
        Adjustment::CancellationFeeCollection,
        Adjustment::StaffReduction,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::ReviewCollection => "review collection",
            Self::CalendarInvites => "calendar invites",
            Self::Reminders => "reminders",
            Self::Rescheduling => "rescheduling",
            Self::Waitlist => "waitlist",
            Self::PlanOfCare => "plan of care",
            Self::NoShowFeeCollection => "no-show fee collection",
            Self::CancellationFeeCollection => "cancellation fee collection",
            Self::StaffReduction => "front office staff reduction",
        }
    }

    /// Human readable effect, for listings.
    pub fn description(&self) -> &'static str {
        match self {
            Self::ReviewCollection => "active patients +10%",
            Self::CalendarInvites => "cancellation rate x0.90, no-show rate x0.80",
            Self::Reminders => "cancellation rate x0.75, no-show rate x0.60, no reminder texts",
            Self::Rescheduling => "cancellation rate x0.80, visits scheduled x1.10",
            Self::Waitlist => "backfill rate +50 points",
            Self::PlanOfCare => "plan of care x1.30, visits scheduled x1.40",
            Self::NoShowFeeCollection => "no-show fee collection rate 90%",
            Self::CancellationFeeCollection => "cancellation fee collection rate 80%",
            Self::StaffReduction => "one fewer front office employee (minimum 1)",
        }
    }

    /// Whether the toggles switch this step on.
    pub fn is_enabled(
        &self,
        toggles: &FeatureToggles,
    ) -> bool {
        match self {
            Self::ReviewCollection => toggles.automated_review_collection,
            Self::CalendarInvites => toggles.calendar_invites,
            Self::Reminders => toggles.automated_reminders,
            Self::Rescheduling => toggles.automated_rescheduling,
            Self::Waitlist => toggles.automated_waitlist,
            Self::PlanOfCare => toggles.automated_plan_of_care,
            Self::NoShowFeeCollection => toggles.automated_no_show_fee_collection,
            Self::CancellationFeeCollection => toggles.automated_cancellation_fee_collection,
            Self::StaffReduction => toggles.automated_reminders && toggles.automated_waitlist,
        }
    }

    /// Applies this step unconditionally.
    pub fn apply(
        &self,
        state: OperatingState,
        inputs: &CalculatorInputs,
    ) -> OperatingState {
        match self {
            Self::ReviewCollection => OperatingState {
                active_patients: state.active_patients.saturating_add(
                    inputs
                        .active_patients
                        .saturating_mul(REVIEW_COLLECTION_PATIENT_GROWTH),
                ),
                ..state
            },
            Self::CalendarInvites => OperatingState {
                cancellation_rate: state
                    .cancellation_rate
                    .saturating_mul(CALENDAR_INVITE_CANCELLATION_FACTOR),
                no_show_rate: state.no_show_rate.saturating_mul(CALENDAR_INVITE_NO_SHOW_FACTOR),
                ..state
            },
            Self::Reminders => OperatingState {
                cancellation_rate: state.cancellation_rate.saturating_mul(REMINDER_CANCELLATION_FACTOR),
                no_show_rate: state.no_show_rate.saturating_mul(REMINDER_NO_SHOW_FACTOR),
                reminder_texts: Decimal::ZERO,
                ..state
            },
            Self::Rescheduling => OperatingState {
                cancellation_rate: state
                    .cancellation_rate
                    .saturating_mul(RESCHEDULING_CANCELLATION_FACTOR),
                visits_scheduled: state.visits_scheduled.saturating_mul(RESCHEDULING_VISIT_FACTOR),
                ..state
            },
            Self::Waitlist => OperatingState {
                cancellation_backfill_rate: state
                    .cancellation_backfill_rate
                    .saturating_add(WAITLIST_BACKFILL_POINTS),
                ..state
            },
            Self::PlanOfCare => OperatingState {
                plan_of_care_scheduled: state
                    .plan_of_care_scheduled
                    .saturating_mul(PLAN_OF_CARE_SCHEDULED_FACTOR),
                visits_scheduled: state.visits_scheduled.saturating_mul(PLAN_OF_CARE_VISIT_FACTOR),
                ..state
            },
            Self::NoShowFeeCollection => OperatingState {
                no_show_fee_collection_rate: AUTOMATED_NO_SHOW_FEE_COLLECTION_RATE,
                ..state
            },
            Self::CancellationFeeCollection => OperatingState {
                cancellation_fee_collection_rate: AUTOMATED_CANCELLATION_FEE_COLLECTION_RATE,
                ..state
            },
            Self::StaffReduction => {
                let employees = inputs.number_of_front_office_employees;
                let staff = employees
                    .saturating_sub(Decimal::ONE)
                    .max(MIN_FRONT_OFFICE_STAFF);
                if staff > employees {
                    warn!(
                        employees = %employees,
                        staff = %staff,
                        "Staff reduction floor exceeds current front office headcount"
                    );
                }
                OperatingState {
                    front_office_staff: staff,
                    ..state
                }
            }
        }
    }
}

/// Lists the steps the toggles switch on, in application order.
pub fn enabled_adjustments(toggles: &FeatureToggles) -> Vec<Adjustment> {
    Adjustment::ORDER
        .into_iter()
        .filter(|adjustment| adjustment.is_enabled(toggles))
        .collect()
}

/// Folds every enabled step over the baseline operating state.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use savings_core::{CalculatorConfig, CalculatorInputs, Feature, FeatureToggles};
/// use savings_core::calculations::apply_adjustments;
///
/// let inputs = CalculatorInputs {
///     features: FeatureToggles::none().with(Feature::Reminders, true),
///     ..CalculatorInputs::default()
/// };
///
/// let state = apply_adjustments(&inputs, &CalculatorConfig::default());
///
/// // 20% × 0.75
/// assert_eq!(state.cancellation_rate, dec!(15));
/// assert_eq!(state.reminder_texts, dec!(0));
/// ```
pub fn apply_adjustments(
    inputs: &CalculatorInputs,
    config: &CalculatorConfig,
) -> OperatingState {
    enabled_adjustments(&inputs.features).into_iter().fold(
        OperatingState::baseline(inputs, config),
        |state, adjustment| {
            debug!(adjustment = adjustment.name(), "Applying automation adjustment");
            adjustment.apply(state, inputs)
        },
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tracing_subscriber::fmt::format::FmtSpan;

    use super::*;
    use crate::Feature;

    fn inputs_with(toggles: FeatureToggles) -> CalculatorInputs {
        CalculatorInputs::default().with_features(toggles)
    }

    fn baseline() -> OperatingState {
        OperatingState::baseline(&CalculatorInputs::default(), &CalculatorConfig::default())
    }

    /// Initializes tracing subscriber for tests that verify log output.
    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_span_events(FmtSpan::NONE)
            .with_test_writer()
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    // =========================================================================
    // OperatingState::baseline tests
    // =========================================================================

    #[test]
    fn baseline_copies_input_rates() {
        let state = baseline();

        assert_eq!(state.active_patients, dec!(250));
        assert_eq!(state.visits_scheduled, dec!(1000));
        assert_eq!(state.cancellation_rate, dec!(20));
        assert_eq!(state.no_show_rate, dec!(10));
        assert_eq!(state.plan_of_care_scheduled, dec!(40));
        assert_eq!(state.cancellation_backfill_rate, dec!(10));
        assert_eq!(state.no_show_fee_collection_rate, dec!(30));
        assert_eq!(state.cancellation_fee_collection_rate, dec!(20));
        assert_eq!(state.front_office_staff, dec!(3));
        assert_eq!(state.reminder_texts, dec!(1000));
    }

    #[test]
    fn baseline_uses_configured_visit_volume() {
        let config = CalculatorConfig {
            monthly_visit_baseline: dec!(400),
        };

        let state = OperatingState::baseline(&CalculatorInputs::default(), &config);

        assert_eq!(state.visits_scheduled, dec!(400));
        assert_eq!(state.reminder_texts, dec!(400));
    }

    // =========================================================================
    // Adjustment::apply tests
    // =========================================================================

    #[test]
    fn review_collection_grows_active_patients_by_ten_percent() {
        let state = Adjustment::ReviewCollection.apply(baseline(), &CalculatorInputs::default());

        assert_eq!(state.active_patients, dec!(275));
    }

    #[test]
    fn calendar_invites_reduce_cancellations_and_no_shows() {
        let state = Adjustment::CalendarInvites.apply(baseline(), &CalculatorInputs::default());

        assert_eq!(state.cancellation_rate, dec!(18));
        assert_eq!(state.no_show_rate, dec!(8));
    }

    #[test]
    fn reminders_reduce_rates_and_remove_reminder_texts() {
        let state = Adjustment::Reminders.apply(baseline(), &CalculatorInputs::default());

        assert_eq!(state.cancellation_rate, dec!(15));
        assert_eq!(state.no_show_rate, dec!(6));
        assert_eq!(state.reminder_texts, Decimal::ZERO);
    }

    #[test]
    fn rescheduling_reduces_cancellations_and_adds_visits() {
        let state = Adjustment::Rescheduling.apply(baseline(), &CalculatorInputs::default());

        assert_eq!(state.cancellation_rate, dec!(16));
        assert_eq!(state.visits_scheduled, dec!(1100));
    }

    #[test]
    fn waitlist_adds_fifty_backfill_points() {
        let state = Adjustment::Waitlist.apply(baseline(), &CalculatorInputs::default());

        assert_eq!(state.cancellation_backfill_rate, dec!(60));
    }

    #[test]
    fn plan_of_care_grows_scheduling() {
        let state = Adjustment::PlanOfCare.apply(baseline(), &CalculatorInputs::default());

        assert_eq!(state.plan_of_care_scheduled, dec!(52));
        assert_eq!(state.visits_scheduled, dec!(1400));
    }

    #[test]
    fn fee_collection_steps_set_fixed_rates() {
        let inputs = CalculatorInputs {
            no_show_fee_collection_rate: dec!(95),
            cancellation_fee_collection_rate: dec!(5),
            ..CalculatorInputs::default()
        };
        let state = OperatingState::baseline(&inputs, &CalculatorConfig::default());

        let state = Adjustment::NoShowFeeCollection.apply(state, &inputs);
        let state = Adjustment::CancellationFeeCollection.apply(state, &inputs);

        assert_eq!(state.no_show_fee_collection_rate, dec!(90));
        assert_eq!(state.cancellation_fee_collection_rate, dec!(80));
    }

    #[test]
    fn staff_reduction_removes_one_employee() {
        let state = Adjustment::StaffReduction.apply(baseline(), &CalculatorInputs::default());

        assert_eq!(state.front_office_staff, dec!(2));
    }

    #[test]
    fn staff_reduction_keeps_at_least_one_employee() {
        let inputs = CalculatorInputs {
            number_of_front_office_employees: dec!(1),
            ..CalculatorInputs::default()
        };
        let state = OperatingState::baseline(&inputs, &CalculatorConfig::default());

        let state = Adjustment::StaffReduction.apply(state, &inputs);

        assert_eq!(state.front_office_staff, dec!(1));
    }

    #[test]
    fn staff_reduction_logs_warning_when_floor_adds_staff() {
        let _guard = init_test_tracing();
        let inputs = CalculatorInputs {
            number_of_front_office_employees: Decimal::ZERO,
            ..CalculatorInputs::default()
        };
        let state = OperatingState::baseline(&inputs, &CalculatorConfig::default());

        let state = Adjustment::StaffReduction.apply(state, &inputs);

        assert_eq!(state.front_office_staff, dec!(1));
        // Warning is logged (verified by test_writer capturing output)
    }

    // =========================================================================
    // Adjustment::is_enabled tests
    // =========================================================================

    #[test]
    fn staff_reduction_requires_reminders_and_waitlist() {
        let reminders = FeatureToggles::none().with(Feature::Reminders, true);
        let waitlist = FeatureToggles::none().with(Feature::Waitlist, true);
        let both = reminders.with(Feature::Waitlist, true);

        assert!(!Adjustment::StaffReduction.is_enabled(&reminders));
        assert!(!Adjustment::StaffReduction.is_enabled(&waitlist));
        assert!(Adjustment::StaffReduction.is_enabled(&both));
    }

    #[test]
    fn enabled_adjustments_is_empty_without_features() {
        assert_eq!(enabled_adjustments(&FeatureToggles::none()), vec![]);
    }

    #[test]
    fn enabled_adjustments_lists_everything_in_order() {
        assert_eq!(
            enabled_adjustments(&FeatureToggles::all()),
            Adjustment::ORDER.to_vec()
        );
    }

    // =========================================================================
    // apply_adjustments tests
    // =========================================================================

    #[test]
    fn apply_adjustments_without_features_is_baseline() {
        let inputs = inputs_with(FeatureToggles::none());

        let state = apply_adjustments(&inputs, &CalculatorConfig::default());

        assert_eq!(state, baseline());
    }

    #[test]
    fn apply_adjustments_compounds_cancellation_reductions() {
        let inputs = inputs_with(FeatureToggles::all());

        let state = apply_adjustments(&inputs, &CalculatorConfig::default());

        // 20 × 0.90 × 0.75 × 0.80
        assert_eq!(state.cancellation_rate, dec!(10.8));
        // 10 × 0.80 × 0.60
        assert_eq!(state.no_show_rate, dec!(4.8));
        // 1000 × 1.10 × 1.40
        assert_eq!(state.visits_scheduled, dec!(1540));
        assert_eq!(state.active_patients, dec!(275));
        assert_eq!(state.plan_of_care_scheduled, dec!(52));
        assert_eq!(state.cancellation_backfill_rate, dec!(60));
        assert_eq!(state.no_show_fee_collection_rate, dec!(90));
        assert_eq!(state.cancellation_fee_collection_rate, dec!(80));
        assert_eq!(state.front_office_staff, dec!(2));
        assert_eq!(state.reminder_texts, Decimal::ZERO);
    }

    #[test]
    fn apply_adjustments_matches_manual_steps_in_order() {
        let inputs = inputs_with(
            FeatureToggles::none()
                .with(Feature::CalendarInvites, true)
                .with(Feature::Rescheduling, true),
        );
        let config = CalculatorConfig::default();

        let manual = Adjustment::Rescheduling.apply(
            Adjustment::CalendarInvites.apply(OperatingState::baseline(&inputs, &config), &inputs),
            &inputs,
        );

        assert_eq!(apply_adjustments(&inputs, &config), manual);
        // 20 × 0.90 × 0.80
        assert_eq!(manual.cancellation_rate, dec!(14.4));
    }

    #[test]
    fn no_show_fee_collection_overrides_zero_baseline_rate() {
        let inputs = CalculatorInputs {
            no_show_fee_collection_rate: dec!(0),
            features: FeatureToggles::none().with(Feature::NoShowFeeCollection, true),
            ..CalculatorInputs::default()
        };

        let state = apply_adjustments(&inputs, &CalculatorConfig::default());

        assert_eq!(state.no_show_fee_collection_rate, dec!(90));
    }
}
