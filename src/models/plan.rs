use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BillingCycle {
    #[serde(rename = "month")]
    Month,
    #[serde(rename = "one-time")]
    OneTime,
}

impl BillingCycle {
    pub fn label(&self) -> &'static str {
        match self {
            BillingCycle::Month => "per month",
            BillingCycle::OneTime => "one-time",
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            BillingCycle::Month => BillingCycle::OneTime,
            BillingCycle::OneTime => BillingCycle::Month,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanIcon {
    Sparkle,
    Zap,
    Crown,
}

impl PlanIcon {
    pub fn glyph(&self) -> &'static str {
        match self {
            PlanIcon::Sparkle => "✦",
            PlanIcon::Zap => "⚡",
            PlanIcon::Crown => "♛",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            PlanIcon::Sparkle => PlanIcon::Zap,
            PlanIcon::Zap => PlanIcon::Crown,
            PlanIcon::Crown => PlanIcon::Sparkle,
        }
    }
}

/// A subscription pricing plan as stored server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionPlan {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub price: f64,
    pub currency: String,
    #[serde(rename = "billingCycle")]
    pub billing_cycle: BillingCycle,
    pub description: String,
    #[serde(default)]
    pub benefits: Vec<String>,
    pub icon: PlanIcon,
    #[serde(rename = "accentColor", default)]
    pub accent_color: String,
    #[serde(rename = "isActive")]
    pub is_active: bool,
    #[serde(rename = "sortOrder", default)]
    pub sort_order: i32,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionPlansResponse {
    pub plans: Vec<SubscriptionPlan>,
    pub pagination: super::PaginationMeta,
}

/// Create/update payload for a plan. Optional fields are omitted from the
/// body when unset so the server keeps its defaults.
#[derive(Debug, Clone, Serialize)]
pub struct PlanPayload {
    pub name: String,
    pub price: f64,
    #[serde(rename = "billingCycle")]
    pub billing_cycle: BillingCycle,
    pub description: String,
    pub benefits: Vec<String>,
    pub icon: PlanIcon,
    #[serde(rename = "accentColor", skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<String>,
    #[serde(rename = "sortOrder", skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
    #[serde(rename = "isActive", skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plan() {
        let json = r##"{
            "_id": "66c900aa12",
            "name": "Pro",
            "price": 49.99,
            "currency": "EUR",
            "billingCycle": "month",
            "description": "For growing coaches",
            "benefits": ["Unlimited clients", "Priority support"],
            "icon": "zap",
            "accentColor": "#7c5cff",
            "isActive": true,
            "sortOrder": 2,
            "createdAt": "2024-08-01T10:00:00.000Z",
            "updatedAt": "2024-08-20T10:00:00.000Z"
        }"##;

        let plan: SubscriptionPlan = serde_json::from_str(json).expect("plan parses");
        assert_eq!(plan.billing_cycle, BillingCycle::Month);
        assert_eq!(plan.icon, PlanIcon::Zap);
        assert_eq!(plan.benefits.len(), 2);
        assert!(plan.is_active);
    }

    #[test]
    fn test_one_time_cycle_wire_name() {
        let plan: SubscriptionPlan = serde_json::from_str(
            r#"{
                "_id": "66c900bb34", "name": "Lifetime", "price": 299.0,
                "currency": "EUR", "billingCycle": "one-time",
                "description": "", "icon": "crown",
                "isActive": false,
                "createdAt": "2024-08-01T10:00:00.000Z",
                "updatedAt": "2024-08-01T10:00:00.000Z"
            }"#,
        )
        .expect("plan parses");
        assert_eq!(plan.billing_cycle, BillingCycle::OneTime);
        assert!(plan.benefits.is_empty());
        assert_eq!(plan.sort_order, 0);
    }

    #[test]
    fn test_payload_omits_unset_optionals() {
        let payload = PlanPayload {
            name: "Starter".to_string(),
            price: 9.0,
            billing_cycle: BillingCycle::Month,
            description: "Entry plan".to_string(),
            benefits: vec!["1 client".to_string()],
            icon: PlanIcon::Sparkle,
            accent_color: None,
            sort_order: None,
            is_active: Some(true),
        };

        let value = serde_json::to_value(&payload).unwrap();
        let obj = value.as_object().unwrap();
        assert!(!obj.contains_key("accentColor"));
        assert!(!obj.contains_key("sortOrder"));
        assert_eq!(obj["billingCycle"], "month");
        assert_eq!(obj["icon"], "sparkle");
        assert_eq!(obj["isActive"], true);
    }
}
