//! HTTP client for the admin backend.
//!
//! Every response body is wrapped as `{ success, message, data }`. Two
//! channels exist: authenticated requests attach the session's bearer token
//! (and surface 401 as `ApiError::Unauthorized` so the caller can force a
//! sign-out), while the auth endpoints (login, refresh, the OTP flow) never
//! attach credentials.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize};
use tracing::debug;

use crate::auth::{RefreshedTokens, SessionData};
use crate::models::{
    AdminUsersResponse, DashboardStats, PlanPayload, Profile, SubscriptionPlan,
    SubscriptionPlansResponse,
};

use super::ApiError;

/// HTTP request timeout in seconds.
/// 30s allows for slow responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Response envelope used by every backend endpoint.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: String,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct LoginData {
    #[serde(rename = "accessToken")]
    access_token: String,
    #[serde(rename = "refreshToken", default)]
    refresh_token: Option<String>,
    #[serde(default)]
    role: String,
    #[serde(rename = "_id")]
    id: String,
    #[serde(default)]
    user: LoginUser,
}

#[derive(Debug, Default, Deserialize)]
struct LoginUser {
    email: Option<String>,
    name: Option<String>,
    username: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RefreshData {
    #[serde(rename = "accessToken")]
    access_token: String,
    #[serde(rename = "refreshToken")]
    refresh_token: String,
}

/// API client for the admin backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<Arc<str>>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// New client with the given token, sharing the connection pool.
    pub fn with_token(&self, token: Arc<str>) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            token: Some(token),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the bearer token when one is present. With no token the
    /// request goes out unauthenticated and the server answers 401 if the
    /// endpoint requires auth.
    fn apply_auth(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    fn parse_envelope<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
        let envelope: Envelope<T> =
            serde_json::from_str(body).map_err(|e| ApiError::InvalidResponse(e.to_string()))?;
        envelope
            .data
            .ok_or_else(|| ApiError::InvalidResponse("response envelope missing data".to_string()))
    }

    fn parse_message(body: &str) -> Result<String, ApiError> {
        let envelope: Envelope<serde_json::Value> =
            serde_json::from_str(body).map_err(|e| ApiError::InvalidResponse(e.to_string()))?;
        debug!(success = envelope.success, "Envelope without payload");
        Ok(envelope.message)
    }

    async fn read_checked(response: reqwest::Response) -> Result<String, ApiError> {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(ApiError::from_status(status, &body));
        }
        Ok(body)
    }

    /// Dispatch a request and unwrap `data` from the envelope.
    async fn send<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, ApiError> {
        let body = Self::read_checked(req.send().await?).await?;
        Self::parse_envelope(&body)
    }

    /// Dispatch a request whose envelope carries no payload; returns the
    /// server's `message` for the status line.
    async fn send_for_message(req: RequestBuilder) -> Result<String, ApiError> {
        let body = Self::read_checked(req.send().await?).await?;
        Self::parse_message(&body)
    }

    // ===== Auth endpoints (public channel, never authenticated) =====

    /// Exchange credentials for a session.
    pub async fn login(&self, email: &str, password: &str) -> Result<SessionData, ApiError> {
        let body = serde_json::json!({ "email": email, "password": password });
        let data: LoginData =
            Self::send(self.http.post(self.url("/auth/login")).json(&body)).await?;

        let resolved_email = data.user.email.clone().unwrap_or_else(|| email.to_string());
        let name = data
            .user
            .name
            .clone()
            .or_else(|| data.user.username.clone())
            .unwrap_or_else(|| resolved_email.clone());

        Ok(SessionData::new(
            data.access_token,
            data.refresh_token,
            data.id,
            data.role,
            resolved_email,
            name,
        ))
    }

    /// Rotate the token pair.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<RefreshedTokens, ApiError> {
        let body = serde_json::json!({ "refreshToken": refresh_token });
        let data: RefreshData =
            Self::send(self.http.post(self.url("/auth/refresh-token")).json(&body)).await?;
        Ok(RefreshedTokens {
            access_token: data.access_token,
            refresh_token: data.refresh_token,
        })
    }

    /// Ask the backend to email an OTP for a password reset.
    pub async fn forgot_password(&self, email: &str) -> Result<String, ApiError> {
        let body = serde_json::json!({ "email": email });
        Self::send_for_message(self.http.post(self.url("/auth/forgot-password")).json(&body)).await
    }

    /// Validate an OTP before allowing a reset.
    pub async fn verify_otp(&self, email: &str, otp: &str) -> Result<String, ApiError> {
        let body = serde_json::json!({ "email": email, "otp": otp });
        Self::send_for_message(self.http.post(self.url("/auth/verify-otp")).json(&body)).await
    }

    /// Set a new password, authorized by the OTP.
    pub async fn reset_password(
        &self,
        email: &str,
        otp: &str,
        password: &str,
    ) -> Result<String, ApiError> {
        let body = serde_json::json!({ "email": email, "otp": otp, "password": password });
        Self::send_for_message(self.http.post(self.url("/auth/reset-password")).json(&body)).await
    }

    // ===== Authenticated endpoints =====

    pub async fn fetch_profile(&self) -> Result<Profile, ApiError> {
        Self::send(self.apply_auth(self.http.get(self.url("/user/profile")))).await
    }

    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<String, ApiError> {
        let body = serde_json::json!({
            "currentPassword": current_password,
            "newPassword": new_password,
            "confirmPassword": confirm_password,
        });
        Self::send_for_message(self.apply_auth(self.http.put(self.url("/user/password")).json(&body)))
            .await
    }

    pub async fn fetch_dashboard_stats(
        &self,
        year: Option<i32>,
    ) -> Result<DashboardStats, ApiError> {
        let mut req = self.http.get(self.url("/admin/dashboard/stats"));
        if let Some(year) = year {
            req = req.query(&[("year", year)]);
        }
        Self::send(self.apply_auth(req)).await
    }

    pub async fn fetch_users(
        &self,
        page: u32,
        limit: u32,
        search: Option<&str>,
    ) -> Result<AdminUsersResponse, ApiError> {
        let req = self
            .http
            .get(self.url("/admin/users"))
            .query(&Self::list_params(page, limit, search));
        Self::send(self.apply_auth(req)).await
    }

    pub async fn fetch_plans(
        &self,
        page: u32,
        limit: u32,
        search: Option<&str>,
    ) -> Result<SubscriptionPlansResponse, ApiError> {
        let req = self
            .http
            .get(self.url("/admin/plans"))
            .query(&Self::list_params(page, limit, search));
        Self::send(self.apply_auth(req)).await
    }

    pub async fn fetch_plan(&self, id: &str) -> Result<SubscriptionPlan, ApiError> {
        let url = format!("{}/admin/plans/{}", self.base_url, id);
        Self::send(self.apply_auth(self.http.get(&url))).await
    }

    pub async fn create_plan(&self, payload: &PlanPayload) -> Result<SubscriptionPlan, ApiError> {
        Self::send(self.apply_auth(self.http.post(self.url("/admin/plans")).json(payload))).await
    }

    pub async fn update_plan(
        &self,
        id: &str,
        payload: &PlanPayload,
    ) -> Result<SubscriptionPlan, ApiError> {
        let url = format!("{}/admin/plans/{}", self.base_url, id);
        Self::send(self.apply_auth(self.http.put(&url).json(payload))).await
    }

    fn list_params(page: u32, limit: u32, search: Option<&str>) -> Vec<(&'static str, String)> {
        let mut params = vec![("page", page.to_string()), ("limit", limit.to_string())];
        if let Some(search) = search.map(str::trim).filter(|s| !s.is_empty()) {
            params.push(("search", search.to_string()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_login_envelope() {
        let body = r#"{
            "success": true,
            "message": "Login successful",
            "data": {
                "accessToken": "h.p.s",
                "refreshToken": "r-token",
                "role": "admin",
                "_id": "64f0c1aa01",
                "user": { "email": "avery@example.com", "name": "Avery Admin" }
            }
        }"#;

        let data: LoginData = ApiClient::parse_envelope(body).expect("login data parses");
        assert_eq!(data.access_token, "h.p.s");
        assert_eq!(data.refresh_token.as_deref(), Some("r-token"));
        assert_eq!(data.role, "admin");
        assert_eq!(data.user.name.as_deref(), Some("Avery Admin"));
    }

    #[test]
    fn test_parse_refresh_envelope() {
        let body = r#"{
            "success": true,
            "message": "",
            "data": { "accessToken": "new-a", "refreshToken": "new-r" }
        }"#;
        let data: RefreshData = ApiClient::parse_envelope(body).expect("refresh data parses");
        assert_eq!(data.access_token, "new-a");
        assert_eq!(data.refresh_token, "new-r");
    }

    #[test]
    fn test_envelope_without_data_is_invalid() {
        let body = r#"{ "success": true, "message": "ok", "data": null }"#;
        let result: Result<RefreshData, _> = ApiClient::parse_envelope(body);
        assert!(matches!(result, Err(ApiError::InvalidResponse(_))));
    }

    #[test]
    fn test_message_extraction_without_payload() {
        let body = r#"{ "success": true, "message": "OTP sent to your email", "data": null }"#;
        assert_eq!(
            ApiClient::parse_message(body).unwrap(),
            "OTP sent to your email"
        );
    }

    #[test]
    fn test_bearer_attached_only_with_token() {
        let client = ApiClient::new("http://localhost:5000/api/v1").unwrap();

        let request = client
            .apply_auth(client.http.get(client.url("/user/profile")))
            .build()
            .unwrap();
        assert!(request.headers().get(reqwest::header::AUTHORIZATION).is_none());

        let authed = client.with_token(Arc::from("access-token"));
        let request = authed
            .apply_auth(authed.http.get(authed.url("/user/profile")))
            .build()
            .unwrap();
        assert_eq!(
            request.headers()[reqwest::header::AUTHORIZATION],
            "Bearer access-token"
        );
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ApiClient::new("http://localhost:5000/api/v1///").unwrap();
        assert_eq!(client.url("/auth/login"), "http://localhost:5000/api/v1/auth/login");
    }

    #[test]
    fn test_list_params_skip_blank_search() {
        let params = ApiClient::list_params(2, 10, Some("   "));
        assert_eq!(
            params,
            vec![("page", "2".to_string()), ("limit", "10".to_string())]
        );

        let params = ApiClient::list_params(1, 10, Some(" jane "));
        assert_eq!(params[2], ("search", "jane".to_string()));
    }
}
