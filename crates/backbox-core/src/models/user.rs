use serde::{Deserialize, Serialize};

/// User record returned by the API on login.
///
/// Only `email` is interpreted by the client; any other fields are kept so the
/// record round-trips through the session store unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl User {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            extra: serde_json::Map::new(),
        }
    }
}

/// Authenticated identity held client-side after login or OTP verification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// Request DTO for `POST /api/users/login` and `POST /api/users/signup`
#[derive(Debug, Serialize)]
pub struct CredentialsRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Request DTO for `POST /api/users/request-otp`
#[derive(Debug, Serialize)]
pub struct OtpRequest<'a> {
    pub email: &'a str,
}

/// Request DTO for `POST /api/users/verify-otp`
#[derive(Debug, Serialize)]
pub struct VerifyOtpRequest<'a> {
    pub email: &'a str,
    pub otp: &'a str,
}

/// Successful login / OTP verification body.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

impl From<AuthResponse> for Session {
    fn from(response: AuthResponse) -> Self {
        Session {
            token: response.token,
            user: response.user,
        }
    }
}

/// Generic `{ "message": ... }` body used by the API for both success and error replies.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_keeps_unknown_fields() {
        let raw = r#"{"email":"a@b.com","_id":"u1","createdAt":"2024-01-01"}"#;
        let user: User = serde_json::from_str(raw).unwrap();
        assert_eq!(user.email, "a@b.com");
        assert_eq!(user.extra.get("_id").and_then(|v| v.as_str()), Some("u1"));

        let back: serde_json::Value = serde_json::to_value(&user).unwrap();
        assert_eq!(back["createdAt"], "2024-01-01");
    }

    #[test]
    fn message_response_tolerates_missing_message() {
        let body: MessageResponse = serde_json::from_str("{}").unwrap();
        assert!(body.message.is_none());
    }
}
