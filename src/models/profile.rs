use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Avatar {
    pub public_id: Option<String>,
    pub url: Option<String>,
}

/// The signed-in admin's own profile, from `/user/profile`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: Option<String>,
    pub username: Option<String>,
    pub email: String,
    #[serde(default)]
    pub avatar: Option<Avatar>,
    pub role: Option<String>,
}

impl Profile {
    /// Name to show in the header: name, then username, then email.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.username.as_deref())
            .unwrap_or(&self.email)
    }

    pub fn handle(&self) -> String {
        format!("@{}", self.username.as_deref().unwrap_or("admin"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_profile() {
        let json = r#"{
            "_id": "64f0c1aa01",
            "name": "Avery Admin",
            "username": "avery",
            "email": "avery@example.com",
            "avatar": { "public_id": "avatars/x1", "url": "https://cdn.example.com/x1.png" },
            "role": "admin"
        }"#;

        let profile: Profile = serde_json::from_str(json).expect("profile parses");
        assert_eq!(profile.display_name(), "Avery Admin");
        assert_eq!(profile.handle(), "@avery");
        assert_eq!(
            profile.avatar.unwrap().url.as_deref(),
            Some("https://cdn.example.com/x1.png")
        );
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        let json = r#"{ "_id": "64f0c1aa02", "email": "bare@example.com" }"#;
        let profile: Profile = serde_json::from_str(json).expect("profile parses");
        assert_eq!(profile.display_name(), "bare@example.com");
        assert_eq!(profile.handle(), "@admin");
    }
}
