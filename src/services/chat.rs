//! Chat assistant adapter.
//!
//! Two endpoints on the chat origin: `/chat` for incremental exchange and
//! `/finalize` for the closing summary. The finalize payload comes in
//! several shapes; `normalize_finalize_response` turns all of them into
//! display text.

use serde::Serialize;
use serde_json::Value;

use crate::error::ClientError;
use crate::http::{HttpClient, RequestConfig};

pub const CHAT_PATH: &str = "/chat";
pub const FINALIZE_PATH: &str = "/finalize";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    text: &'a str,
    user_id: &'a str,
}

#[derive(Debug, Serialize)]
struct FinalizeRequest<'a> {
    user_id: &'a str,
}

#[derive(Debug, Clone)]
pub struct ChatService {
    http: HttpClient,
    user_id: String,
}

impl ChatService {
    pub fn new(http: HttpClient, user_id: impl Into<String>) -> Self {
        Self {
            http,
            user_id: user_id.into(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Send one user message; the reply is read as plain text.
    pub async fn send_message(&self, text: &str) -> Result<String, ClientError> {
        let body = ChatRequest {
            text,
            user_id: &self.user_id,
        };
        let value: Value = self
            .http
            .post(CHAT_PATH, &body, accept_json())
            .await
            .map_err(|e| status_only(e, "Chat Service Error"))?;
        Ok(value_as_text(&value))
    }

    /// Ask for the conversation summary. `user_id` defaults to the
    /// configured one.
    pub async fn finalize_conversation(&self, user_id: Option<&str>) -> Result<String, ClientError> {
        let body = FinalizeRequest {
            user_id: user_id.unwrap_or(&self.user_id),
        };
        let value: Value = self
            .http
            .post(FINALIZE_PATH, &body, accept_json())
            .await
            .map_err(|e| status_only(e, "Finalize Service Error"))?;
        normalize_finalize_response(&value)
    }
}

fn accept_json() -> RequestConfig {
    RequestConfig::default().header("Accept", "application/json")
}

/// The chat origin's error bodies are not meaningful to users; report the
/// status only.
fn status_only(err: ClientError, prefix: &str) -> ClientError {
    match err {
        ClientError::Http { status, .. } => ClientError::Http {
            status,
            message: Some(format!("{}: {}", prefix, status)),
        },
        other => other,
    }
}

fn value_as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

fn push_numbered(out: &mut String, heading: &str, items: Option<&Value>) {
    let Some(Value::Array(items)) = items else {
        return;
    };
    if items.is_empty() {
        return;
    }
    out.push_str(heading);
    for (index, item) in items.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", index + 1, value_as_text(item)));
    }
}

/// Turn a finalize payload into display text.
///
/// - string: returned as-is
/// - `{error}`: raised as `ClientError::Finalize`
/// - `{raw_response}`: the raw response text
/// - `{resumen_conversacion, puntos_importantes[], pasos_desarrollo[]}`:
///   canonical markdown block, empty lists omitted
/// - anything else: compact JSON
pub fn normalize_finalize_response(payload: &Value) -> Result<String, ClientError> {
    let map = match payload {
        Value::String(s) => return Ok(s.clone()),
        Value::Object(map) => map,
        other => return Ok(other.to_string()),
    };

    if is_present(map.get("error")) {
        let message = map.get("error").map(value_as_text).unwrap_or_default();
        log::warn!("Finalize returned an error payload: {}", message);
        return Err(ClientError::Finalize(message));
    }

    if is_present(map.get("raw_response")) {
        return Ok(map.get("raw_response").map(value_as_text).unwrap_or_default());
    }

    if let Some(resumen) = map.get("resumen_conversacion") {
        let mut out = format!(
            "**Resumen de la conversación:**\n\n{}",
            value_as_text(resumen)
        );
        push_numbered(
            &mut out,
            "\n\n**Puntos importantes:**\n",
            map.get("puntos_importantes"),
        );
        push_numbered(
            &mut out,
            "\n**Pasos de desarrollo:**\n",
            map.get("pasos_desarrollo"),
        );
        return Ok(out);
    }

    Ok(payload.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_payload_passes_through() {
        let out = normalize_finalize_response(&json!("Hasta luego")).unwrap();
        assert_eq!(out, "Hasta luego");
    }

    #[test]
    fn test_raw_response_is_identity() {
        let out = normalize_finalize_response(&json!({ "raw_response": "texto libre" })).unwrap();
        assert_eq!(out, "texto libre");
    }

    #[test]
    fn test_error_payload_raises() {
        let err = normalize_finalize_response(&json!({ "error": "boom" })).unwrap_err();
        assert!(matches!(err, ClientError::Finalize(_)));
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn test_error_wins_over_raw_response() {
        let err = normalize_finalize_response(&json!({
            "error": "no se pudo interpretar",
            "raw_response": "{ resumen: ..."
        }))
        .unwrap_err();
        assert_eq!(err.to_string(), "no se pudo interpretar");
    }

    #[test]
    fn test_structured_summary_skips_empty_lists() {
        let out = normalize_finalize_response(&json!({
            "resumen_conversacion": "R",
            "puntos_importantes": ["p1", "p2"],
            "pasos_desarrollo": []
        }))
        .unwrap();
        assert_eq!(
            out,
            "**Resumen de la conversación:**\n\nR\n\n**Puntos importantes:**\n1. p1\n2. p2\n"
        );
    }

    #[test]
    fn test_structured_summary_with_both_lists() {
        let out = normalize_finalize_response(&json!({
            "resumen_conversacion": "R",
            "puntos_importantes": ["p1"],
            "pasos_desarrollo": ["s1", "s2"]
        }))
        .unwrap();
        assert_eq!(
            out,
            "**Resumen de la conversación:**\n\nR\n\n**Puntos importantes:**\n1. p1\n\n**Pasos de desarrollo:**\n1. s1\n2. s2\n"
        );
    }

    #[test]
    fn test_summary_without_lists() {
        let out = normalize_finalize_response(&json!({ "resumen_conversacion": "Solo resumen" })).unwrap();
        assert_eq!(out, "**Resumen de la conversación:**\n\nSolo resumen");
    }

    #[test]
    fn test_unknown_object_becomes_json() {
        let out = normalize_finalize_response(&json!({ "status": "ok" })).unwrap();
        assert_eq!(out, r#"{"status":"ok"}"#);
    }

    #[test]
    fn test_status_only_rewrites_http_errors() {
        let err = status_only(
            ClientError::Http {
                status: 500,
                message: Some("Internal Server Error".into()),
            },
            "Chat Service Error",
        );
        assert_eq!(err.to_string(), "Chat Service Error: 500");
    }
}
