use crate::error::{AppError, AppResult};
use crate::lifecycle::PlanTerm;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// An offer from the plan catalog. Prices are in paise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Plan {
    pub id: i32,
    /// Display label, also written to payment records as `plan_name`.
    pub label: String,
    pub subtitle: String,
    pub description: String,
    pub price: i64,
    pub period: String,
    pub features: Vec<String>,
    pub badge: String,
    pub savings: Option<String>,
}

impl Plan {
    pub fn term(&self) -> PlanTerm {
        PlanTerm::from_plan_name(&self.label)
    }
}

#[allow(clippy::too_many_arguments)]
fn plan(
    id: i32,
    label: &str,
    subtitle: &str,
    description: &str,
    rupees: i64,
    period: &str,
    features: &[&str],
    badge: &str,
    savings: Option<&str>,
) -> Plan {
    Plan {
        id,
        label: label.to_string(),
        subtitle: subtitle.to_string(),
        description: description.to_string(),
        price: rupees * 100,
        period: period.to_string(),
        features: features.iter().map(|f| f.to_string()).collect(),
        badge: badge.to_string(),
        savings: savings.map(str::to_string),
    }
}

pub fn plan_catalog() -> Vec<Plan> {
    vec![
        plan(
            1,
            "1 Year Access",
            "Standard License",
            "Full access to the admin console and POS systems for 12 months.",
            15_000,
            "/year",
            &[
                "Full Admin Console Access",
                "Up to 5 POS Terminals",
                "Standard Email Support",
                "Regular Updates",
            ],
            "STARTER",
            None,
        ),
        plan(
            2,
            "3 Years Access",
            "Growth Plan",
            "Lock in the price with priority support for 36 months.",
            38_000,
            "/3 years",
            &[
                "Everything in 1 Year Plan",
                "Unlimited POS Terminals",
                "Priority 24/7 Support",
                "Free Staff Training Session",
            ],
            "MOST POPULAR",
            Some("Save ₹7,000 vs Yearly"),
        ),
        plan(
            3,
            "5 Years Access",
            "Enterprise Suite",
            "Dedicated account management and the lowest cost per year.",
            55_000,
            "/5 years",
            &[
                "Everything in 3 Year Plan",
                "Dedicated Account Manager",
                "Custom Feature Development",
                "Lifetime Price Lock",
            ],
            "BEST VALUE",
            Some("Save ₹20,000 vs Yearly"),
        ),
    ]
}

pub fn find_plan(plan_id: i32) -> AppResult<Plan> {
    plan_catalog()
        .into_iter()
        .find(|p| p.id == plan_id)
        .ok_or_else(|| AppError::NotFound(format!("Plan {plan_id} not found")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_prices_in_paise() {
        let prices: Vec<i64> = plan_catalog().iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![1_500_000, 3_800_000, 5_500_000]);
    }

    #[test]
    fn test_catalog_labels_map_to_terms() {
        let terms: Vec<PlanTerm> = plan_catalog().iter().map(Plan::term).collect();
        assert_eq!(
            terms,
            vec![PlanTerm::OneYear, PlanTerm::ThreeYears, PlanTerm::FiveYears]
        );
    }

    #[test]
    fn test_find_plan() {
        assert_eq!(find_plan(2).unwrap().label, "3 Years Access");
        assert!(matches!(find_plan(9), Err(AppError::NotFound(_))));
    }
}
