use serde::{Deserialize, Serialize};

/// One point of the joinings-per-month series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyJoining {
    pub month: u32,
    pub label: String,
    pub count: u64,
}

/// Aggregate metrics for the overview tab.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub year: i32,
    #[serde(rename = "totalUsers", default)]
    pub total_users: u64,
    #[serde(rename = "activeSubscriptions", default)]
    pub active_subscriptions: u64,
    #[serde(rename = "totalRevenue", default)]
    pub total_revenue: f64,
    #[serde(rename = "monthlyJoinings", default)]
    pub monthly_joinings: Vec<MonthlyJoining>,
}

impl DashboardStats {
    /// Largest monthly count, used to scale the overview bars.
    pub fn peak_monthly_count(&self) -> u64 {
        self.monthly_joinings
            .iter()
            .map(|m| m.count)
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stats() {
        let json = r#"{
            "year": 2025,
            "totalUsers": 1204,
            "activeSubscriptions": 371,
            "totalRevenue": 18459.5,
            "monthlyJoinings": [
                {"month": 1, "label": "Jan", "count": 80},
                {"month": 2, "label": "Feb", "count": 132}
            ]
        }"#;

        let stats: DashboardStats = serde_json::from_str(json).expect("stats parse");
        assert_eq!(stats.total_users, 1204);
        assert_eq!(stats.monthly_joinings.len(), 2);
        assert_eq!(stats.peak_monthly_count(), 132);
    }

    #[test]
    fn test_defaults_for_sparse_payload() {
        let stats: DashboardStats = serde_json::from_str("{}").expect("empty object parses");
        assert_eq!(stats.total_users, 0);
        assert!(stats.monthly_joinings.is_empty());
        assert_eq!(stats.peak_monthly_count(), 0);
    }
}
