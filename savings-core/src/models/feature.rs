use serde::{Deserialize, Serialize};

/// An automation feature that can be switched on for the clinic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Feature {
    CalendarInvites,
    ReviewCollection,
    Reminders,
    Waitlist,
    PlanOfCare,
    Rescheduling,
    NoShowFeeCollection,
    CancellationFeeCollection,
}

impl Feature {
    pub const ALL: [Feature; 8] = [
        Feature::CalendarInvites,
        Feature::ReviewCollection,
        Feature::Reminders,
        Feature::Waitlist,
        Feature::PlanOfCare,
        Feature::Rescheduling,
        Feature::NoShowFeeCollection,
        Feature::CancellationFeeCollection,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CalendarInvites => "calendar-invites",
            Self::ReviewCollection => "review-collection",
            Self::Reminders => "reminders",
            Self::Waitlist => "waitlist",
            Self::PlanOfCare => "plan-of-care",
            Self::Rescheduling => "rescheduling",
            Self::NoShowFeeCollection => "no-show-fees",
            Self::CancellationFeeCollection => "cancellation-fees",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::CalendarInvites => "Calendar invites",
            Self::ReviewCollection => "Automated review collection",
            Self::Reminders => "Automated reminders",
            Self::Waitlist => "Automated waitlist",
            Self::PlanOfCare => "Automated plan of care",
            Self::Rescheduling => "Automated rescheduling",
            Self::NoShowFeeCollection => "Automated no-show fees",
            Self::CancellationFeeCollection => "Automated cancellation fees",
        }
    }

    /// Parses a feature key. Accepts the kebab-case key as well as the
    /// snake_case input field name (`automated_waitlist`, `calendar_invites`).
    pub fn parse(s: &str) -> Option<Self> {
        let key = s.trim().to_ascii_lowercase().replace('_', "-");
        let key = key.strip_prefix("automated-").unwrap_or(&key);
        match key {
            "calendar-invites" => Some(Self::CalendarInvites),
            "review-collection" => Some(Self::ReviewCollection),
            "reminders" => Some(Self::Reminders),
            "waitlist" => Some(Self::Waitlist),
            "plan-of-care" => Some(Self::PlanOfCare),
            "rescheduling" => Some(Self::Rescheduling),
            "no-show-fees" | "no-show-fee-collection" => Some(Self::NoShowFeeCollection),
            "cancellation-fees" | "cancellation-fee-collection" => {
                Some(Self::CancellationFeeCollection)
            }
            _ => None,
        }
    }
}

/// On/off switches for each automation feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureToggles {
    pub calendar_invites: bool,
    pub automated_review_collection: bool,
    pub automated_reminders: bool,
    pub automated_waitlist: bool,
    pub automated_plan_of_care: bool,
    pub automated_rescheduling: bool,
    pub automated_no_show_fee_collection: bool,
    pub automated_cancellation_fee_collection: bool,
}

impl FeatureToggles {
    /// Every feature switched on.
    pub fn all() -> Self {
        Self {
            calendar_invites: true,
            automated_review_collection: true,
            automated_reminders: true,
            automated_waitlist: true,
            automated_plan_of_care: true,
            automated_rescheduling: true,
            automated_no_show_fee_collection: true,
            automated_cancellation_fee_collection: true,
        }
    }

    /// Every feature switched off.
    pub fn none() -> Self {
        Self {
            calendar_invites: false,
            automated_review_collection: false,
            automated_reminders: false,
            automated_waitlist: false,
            automated_plan_of_care: false,
            automated_rescheduling: false,
            automated_no_show_fee_collection: false,
            automated_cancellation_fee_collection: false,
        }
    }

    pub fn is_enabled(
        &self,
        feature: Feature,
    ) -> bool {
        match feature {
            Feature::CalendarInvites => self.calendar_invites,
            Feature::ReviewCollection => self.automated_review_collection,
            Feature::Reminders => self.automated_reminders,
            Feature::Waitlist => self.automated_waitlist,
            Feature::PlanOfCare => self.automated_plan_of_care,
            Feature::Rescheduling => self.automated_rescheduling,
            Feature::NoShowFeeCollection => self.automated_no_show_fee_collection,
            Feature::CancellationFeeCollection => self.automated_cancellation_fee_collection,
        }
    }

    pub fn set(
        &mut self,
        feature: Feature,
        enabled: bool,
    ) {
        let slot = match feature {
            Feature::CalendarInvites => &mut self.calendar_invites,
            Feature::ReviewCollection => &mut self.automated_review_collection,
            Feature::Reminders => &mut self.automated_reminders,
            Feature::Waitlist => &mut self.automated_waitlist,
            Feature::PlanOfCare => &mut self.automated_plan_of_care,
            Feature::Rescheduling => &mut self.automated_rescheduling,
            Feature::NoShowFeeCollection => &mut self.automated_no_show_fee_collection,
            Feature::CancellationFeeCollection => &mut self.automated_cancellation_fee_collection,
        };
        *slot = enabled;
    }

    /// Returns a copy with a single feature switched.
    pub fn with(
        mut self,
        feature: Feature,
        enabled: bool,
    ) -> Self {
        self.set(feature, enabled);
        self
    }

    pub fn any_enabled(&self) -> bool {
        Feature::ALL.iter().any(|f| self.is_enabled(*f))
    }
}

impl Default for FeatureToggles {
    fn default() -> Self {
        Self::all()
    }
}
