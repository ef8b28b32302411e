//! Auth API adapter: registration (JSON) and login (form-urlencoded).

use std::fmt;

use reqwest::Method;
use serde::Serialize;

use crate::error::ClientError;
use crate::http::{HttpClient, RequestBody, RequestConfig};
use crate::types::RegisterData;

pub const REGISTER_PATH: &str = "/api/v1/auth/register";
pub const LOGIN_PATH: &str = "/api/v1/auth/login";

/// OAuth2 password-flow form.
#[derive(Clone, Serialize)]
pub struct LoginPayload {
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grant_type: Option<String>,
}

impl fmt::Debug for LoginPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginPayload")
            .field("username", &self.username)
            .field("password", &"***")
            .field("grant_type", &self.grant_type)
            .finish()
    }
}

impl LoginPayload {
    fn form_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("username".to_string(), self.username.clone()),
            ("password".to_string(), self.password.clone()),
        ];
        if let Some(grant_type) = &self.grant_type {
            pairs.push(("grant_type".to_string(), grant_type.clone()));
        }
        pairs
    }
}

#[derive(Debug, Clone)]
pub struct AuthService {
    http: HttpClient,
}

impl AuthService {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Returns the server's user record as-is.
    pub async fn register(&self, payload: &RegisterData) -> Result<serde_json::Value, ClientError> {
        log::info!("Registering account for {}", payload.email);
        let result = self
            .http
            .post(REGISTER_PATH, payload, RequestConfig::default())
            .await
            .map_err(|e| e.with_http_fallback("Error en el registro"));
        if let Err(e) = &result {
            log::warn!("Registration failed: {}", e);
        }
        result
    }

    /// Returns the server's token + user envelope. Its shape is not
    /// constrained here; the repository picks the fields it needs.
    pub async fn login(&self, payload: &LoginPayload) -> Result<serde_json::Value, ClientError> {
        log::info!("Logging in {}", payload.username);
        let result = self
            .http
            .send(
                Method::POST,
                LOGIN_PATH,
                Some(RequestBody::Form(payload.form_pairs())),
                RequestConfig::default(),
            )
            .await
            .map_err(|e| e.with_http_fallback("Error en el inicio de sesión"));
        if let Err(e) = &result {
            log::warn!("Login failed: {}", e);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_form_omits_missing_grant_type() {
        let payload = LoginPayload {
            username: "ana@empresa.co".into(),
            password: "secreto".into(),
            grant_type: None,
        };
        let keys: Vec<String> = payload.form_pairs().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["username", "password"]);
    }

    #[test]
    fn test_login_form_includes_grant_type() {
        let payload = LoginPayload {
            username: "ana@empresa.co".into(),
            password: "secreto".into(),
            grant_type: Some("password".into()),
        };
        assert_eq!(payload.form_pairs().len(), 3);
    }

    #[test]
    fn test_debug_redacts_password() {
        let payload = LoginPayload {
            username: "ana@empresa.co".into(),
            password: "secreto".into(),
            grant_type: None,
        };
        let rendered = format!("{:?}", payload);
        assert!(!rendered.contains("secreto"));
        assert!(rendered.contains("***"));
    }
}
