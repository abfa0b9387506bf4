use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized - session is no longer valid")]
    Unauthorized,

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Shown when neither the response body nor the transport gave us anything.
const FALLBACK_MESSAGE: &str = "Something went wrong";

/// Minimal view of an error body - we only care about `message`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl ApiError {
    /// Build an error from a non-success HTTP status and its response body.
    ///
    /// The backend wraps failures as `{ success, message, data }`; the
    /// `message` field is what users see, so pull it out here. 401 is kept
    /// as its own variant because it forces a sign-out upstream.
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        if status.as_u16() == 401 {
            return ApiError::Unauthorized;
        }

        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));

        ApiError::Api {
            status: status.as_u16(),
            message,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }

    /// Normalize to a single human-readable line: the server's `message`
    /// when present, then the transport error text, then a fixed fallback.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Unauthorized => "Session expired. Please log in again.".to_string(),
            ApiError::Api { message, .. } => message.clone(),
            ApiError::Network(e) => {
                let text = e.to_string();
                if text.is_empty() {
                    FALLBACK_MESSAGE.to_string()
                } else {
                    text
                }
            }
            ApiError::InvalidResponse(_) => FALLBACK_MESSAGE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_message_extracted_from_envelope() {
        let err = ApiError::from_status(
            StatusCode::BAD_REQUEST,
            r#"{"success":false,"message":"Plan name already exists","data":null}"#,
        );
        match err {
            ApiError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Plan name already exists");
            }
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn test_401_maps_to_unauthorized() {
        let err = ApiError::from_status(StatusCode::UNAUTHORIZED, r#"{"message":"jwt expired"}"#);
        assert!(err.is_unauthorized());
    }

    #[test]
    fn test_status_fallback_when_body_unusable() {
        for body in ["", "<html>oops</html>", r#"{"message":""}"#] {
            let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, body);
            match err {
                ApiError::Api { status, message } => {
                    assert_eq!(status, 500);
                    assert_eq!(message, "Request failed with status 500");
                }
                other => panic!("unexpected variant: {:?}", other),
            }
        }
    }

    #[test]
    fn test_user_message_ladder() {
        let api = ApiError::Api {
            status: 409,
            message: "Email already registered".to_string(),
        };
        assert_eq!(api.user_message(), "Email already registered");

        let invalid = ApiError::InvalidResponse("truncated body".to_string());
        assert_eq!(invalid.user_message(), FALLBACK_MESSAGE);

        let unauthorized = ApiError::Unauthorized;
        assert_eq!(
            unauthorized.user_message(),
            "Session expired. Please log in again."
        );
    }
}
