//! Uniform request primitive used by every service adapter.
//!
//! `base_url + endpoint`, optional flat query params, JSON by default with a
//! raw/form body override. Non-2xx responses become `ClientError::Http` with
//! the body's `detail` or `message` when the server sent one. No retries and
//! no auth header injection; a timeout is only applied when the caller asks.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ClientError;

const JSON_CONTENT_TYPE: &str = "application/json";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Per-request options.
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    pub params: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub timeout: Option<Duration>,
}

impl RequestConfig {
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Request body. JSON unless a caller overrides it.
#[derive(Debug, Clone)]
pub enum RequestBody {
    Json(serde_json::Value),
    Form(Vec<(String, String)>),
    Raw { content_type: String, body: String },
}

impl RequestBody {
    fn content_type(&self) -> &str {
        match self {
            RequestBody::Json(_) => JSON_CONTENT_TYPE,
            RequestBody::Form(_) => FORM_CONTENT_TYPE,
            RequestBody::Raw { content_type, .. } => content_type,
        }
    }

    fn into_bytes(self) -> Result<Vec<u8>, ClientError> {
        match self {
            RequestBody::Json(value) => Ok(serde_json::to_vec(&value)?),
            RequestBody::Form(pairs) => serde_urlencoded::to_string(&pairs)
                .map(String::into_bytes)
                .map_err(|e| ClientError::Decode(format!("form encoding: {}", e))),
            RequestBody::Raw { body, .. } => Ok(body.into_bytes()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Compose the absolute URL for an endpoint plus query params.
    pub fn url_for(&self, endpoint: &str, params: &[(String, String)]) -> Result<url::Url, ClientError> {
        let raw = format!("{}{}", self.base_url, endpoint);
        let mut url = url::Url::parse(&raw)
            .map_err(|e| ClientError::Config(format!("URL inválida '{}': {}", raw, e)))?;
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        config: RequestConfig,
    ) -> Result<T, ClientError> {
        self.send(Method::GET, endpoint, None, config).await
    }

    pub async fn post<T, B>(&self, endpoint: &str, body: &B, config: RequestConfig) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = RequestBody::Json(serde_json::to_value(body)?);
        self.send(Method::POST, endpoint, Some(body), config).await
    }

    pub async fn put<T, B>(&self, endpoint: &str, body: &B, config: RequestConfig) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = RequestBody::Json(serde_json::to_value(body)?);
        self.send(Method::PUT, endpoint, Some(body), config).await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        config: RequestConfig,
    ) -> Result<T, ClientError> {
        self.send(Method::DELETE, endpoint, None, config).await
    }

    /// The single request path every verb goes through.
    pub async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<RequestBody>,
        config: RequestConfig,
    ) -> Result<T, ClientError> {
        let url = self.url_for(endpoint, &config.params)?;

        let content_type = body
            .as_ref()
            .map(|b| b.content_type().to_string())
            .unwrap_or_else(|| JSON_CONTENT_TYPE.to_string());
        let headers = merge_headers(&content_type, &config.headers)?;

        log::debug!("{} {}", method, url);

        let mut request = self.client.request(method.clone(), url.clone()).headers(headers);
        if let Some(body) = body {
            request = request.body(body.into_bytes()?);
        }
        if let Some(timeout) = config.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = extract_error_message(&text);
            log::warn!("{} {} failed with {}", method, url, status);
            return Err(ClientError::Http {
                status: status.as_u16(),
                message,
            });
        }

        parse_body(&text)
    }
}

/// Default `Content-Type` first, caller headers override it.
fn merge_headers(content_type: &str, extra: &[(String, String)]) -> Result<HeaderMap, ClientError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_str(content_type)
            .map_err(|e| ClientError::Config(format!("Content-Type inválido: {}", e)))?,
    );
    for (name, value) in extra {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ClientError::Config(format!("cabecera inválida '{}': {}", name, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| ClientError::Config(format!("valor de cabecera inválido: {}", e)))?;
        headers.insert(name, value);
    }
    Ok(headers)
}

/// Pull `detail` (then `message`) out of an error body.
pub fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["detail", "message"].iter().find_map(|key| match value.get(*key) {
        Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(serde_json::Value::Null) | None => None,
        Some(serde_json::Value::String(_)) => None,
        Some(other) => Some(other.to_string()),
    })
}

/// Empty bodies decode as JSON `null`.
fn parse_body<T: DeserializeOwned>(text: &str) -> Result<T, ClientError> {
    if text.trim().is_empty() {
        return Ok(serde_json::from_value(serde_json::Value::Null)?);
    }
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_composition_with_params() {
        let http = HttpClient::new("http://localhost:3000/api");
        let url = http
            .url_for(
                "/licitaciones",
                &[("sector".to_string(), "Tecnología".to_string())],
            )
            .unwrap();
        assert_eq!(url.path(), "/api/licitaciones");
        assert_eq!(
            url.query_pairs().next().map(|(k, v)| (k.into_owned(), v.into_owned())),
            Some(("sector".to_string(), "Tecnología".to_string()))
        );
    }

    #[test]
    fn test_url_without_params_has_no_query() {
        let http = HttpClient::new("http://localhost:3000/api");
        let url = http.url_for("/chat", &[]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/chat");
    }

    #[test]
    fn test_caller_header_overrides_content_type() {
        let headers = merge_headers(
            JSON_CONTENT_TYPE,
            &[("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string())],
        )
        .unwrap();
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), FORM_CONTENT_TYPE);
    }

    #[test]
    fn test_extract_detail_then_message() {
        assert_eq!(
            extract_error_message(r#"{"detail":"Usuario ya existe","message":"otro"}"#),
            Some("Usuario ya existe".to_string())
        );
        assert_eq!(
            extract_error_message(r#"{"message":"Credenciales inválidas"}"#),
            Some("Credenciales inválidas".to_string())
        );
        assert_eq!(extract_error_message(r#"{"error":"x"}"#), None);
        assert_eq!(extract_error_message("<html>502</html>"), None);
    }

    #[test]
    fn test_structured_detail_is_stringified() {
        let msg = extract_error_message(r#"{"detail":[{"loc":["body","email"]}]}"#).unwrap();
        assert!(msg.contains("email"));
    }

    #[test]
    fn test_form_body_encoding() {
        let body = RequestBody::Form(vec![
            ("username".to_string(), "ana@empresa.co".to_string()),
            ("password".to_string(), "s3cret&1".to_string()),
        ]);
        let encoded = String::from_utf8(body.into_bytes().unwrap()).unwrap();
        assert_eq!(encoded, "username=ana%40empresa.co&password=s3cret%261");
    }

    #[test]
    fn test_empty_body_decodes_as_null() {
        let value: serde_json::Value = parse_body("").unwrap();
        assert!(value.is_null());
        let unit: Option<String> = parse_body("  ").unwrap();
        assert!(unit.is_none());
    }
}
