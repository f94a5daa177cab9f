use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Subscription term, recognised from the human readable plan label.
///
/// Matching is a case-insensitive substring test: a label containing
/// "3 year" is a three year term, "5 year" a five year term, anything else
/// falls back to one year. A new plan name that mentions neither marker
/// silently becomes a one year plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PlanTerm {
    OneYear,
    ThreeYears,
    FiveYears,
}

impl PlanTerm {
    pub fn from_plan_name(plan_name: &str) -> Self {
        let name = plan_name.to_lowercase();
        if name.contains("3 year") {
            PlanTerm::ThreeYears
        } else if name.contains("5 year") {
            PlanTerm::FiveYears
        } else {
            PlanTerm::OneYear
        }
    }

    pub fn years(self) -> u32 {
        match self {
            PlanTerm::OneYear => 1,
            PlanTerm::ThreeYears => 3,
            PlanTerm::FiveYears => 5,
        }
    }
}

/// Expiry of a purchase: the term is added to the calendar year with month,
/// day and time of day held fixed.
///
/// A Feb 29 purchase lands on Feb 28 of the target year when that year is not
/// a leap year (chrono clamps month arithmetic to the last valid day).
/// Returns `None` when the purchase timestamp is missing.
pub fn compute_expiry(
    purchased_at: Option<DateTime<Utc>>,
    plan_name: &str,
) -> Option<DateTime<Utc>> {
    let purchased_at = purchased_at?;
    let term = PlanTerm::from_plan_name(plan_name);
    purchased_at.checked_add_months(Months::new(term.years() * 12))
}
