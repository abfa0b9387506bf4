use serde::{Deserialize, Serialize};

/// Pagination block attached to every list response.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    #[serde(rename = "totalPages")]
    pub total_pages: u32,
}

impl PaginationMeta {
    /// "Showing X to Y of Z results" label for table footers.
    pub fn results_label(&self) -> String {
        if self.total == 0 {
            return "Showing 0 results".to_string();
        }
        let from = (self.page as u64 - 1) * self.limit as u64 + 1;
        let to = (self.page as u64 * self.limit as u64).min(self.total);
        format!("Showing {} to {} of {} results", from, to, self.total)
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserStatus {
    Paid,
    Free,
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserStatus::Paid => write!(f, "Paid"),
            UserStatus::Free => write!(f, "Free"),
        }
    }
}

/// One row of the admin user list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUser {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(rename = "joinedDate")]
    pub joined_date: Option<String>,
    #[serde(rename = "spentOnSubscription")]
    pub spent_on_subscription: f64,
    #[serde(rename = "planName")]
    pub plan_name: String,
    pub status: UserStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUsersResponse {
    pub users: Vec<AdminUser>,
    pub pagination: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_users_response() {
        let json = r#"{
            "users": [{
                "_id": "66b1f3a2c9d8f001",
                "name": "Jane Coach",
                "email": "jane@example.com",
                "avatar": "https://cdn.example.com/a/jane.png",
                "joinedDate": "2024-05-12T09:30:00.000Z",
                "spentOnSubscription": 149.97,
                "planName": "Pro",
                "status": "Paid"
            }, {
                "_id": "66b1f3a2c9d8f002",
                "name": "Sam Starter",
                "email": "sam@example.com",
                "joinedDate": null,
                "spentOnSubscription": 0,
                "planName": "-",
                "status": "Free"
            }],
            "pagination": { "page": 2, "limit": 10, "total": 57, "totalPages": 6 }
        }"#;

        let resp: AdminUsersResponse = serde_json::from_str(json).expect("users response parses");
        assert_eq!(resp.users.len(), 2);
        assert_eq!(resp.users[0].status, UserStatus::Paid);
        assert_eq!(resp.users[1].joined_date, None);
        assert_eq!(resp.users[1].avatar, "");
        assert_eq!(resp.pagination.total_pages, 6);
    }

    #[test]
    fn test_results_label() {
        let meta = PaginationMeta {
            page: 2,
            limit: 10,
            total: 57,
            total_pages: 6,
        };
        assert_eq!(meta.results_label(), "Showing 11 to 20 of 57 results");
        assert!(meta.has_next());
        assert!(meta.has_prev());

        let last = PaginationMeta {
            page: 6,
            limit: 10,
            total: 57,
            total_pages: 6,
        };
        assert_eq!(last.results_label(), "Showing 51 to 57 of 57 results");
        assert!(!last.has_next());

        let empty = PaginationMeta::default();
        assert_eq!(empty.results_label(), "Showing 0 results");
        assert!(!empty.has_prev());
    }
}
