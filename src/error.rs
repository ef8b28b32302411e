//! Error types shared by every layer of the client.
//!
//! Errors are classified by who surfaces them:
//! - Validation: use-case guards, shown verbatim next to the field
//! - Remote: HTTP status or transport failures from the service adapters
//! - Normalization: the chat finalize payload carried an `error`
//! - Packaging: the checklist ZIP could not be produced
//! - Unexpected: everything else, logged and replaced by a generic message

use thiserror::Error;

use crate::wizard::packaging::PackagingError;

/// Message shown when an error has no user-facing text of its own.
pub const GENERIC_ERROR_MESSAGE: &str = "Ocurrió un error inesperado. Por favor intenta de nuevo.";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Validation(String),

    /// Non-2xx response. `message` is taken from the body's `detail` or
    /// `message` field when present.
    #[error("{}", http_error_message(.status, .message))]
    Http { status: u16, message: Option<String> },

    #[error("Error de red: {0}")]
    Network(String),

    #[error("{0}")]
    Decode(String),

    /// The finalize endpoint answered with `{ "error": ... }`.
    #[error("{0}")]
    Finalize(String),

    #[error(transparent)]
    Packaging(#[from] PackagingError),

    #[error("{0}")]
    NotFound(String),

    #[error("Error de configuración: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(String),

    /// Shared state could not be reached (poisoned lock).
    #[error("Error interno: {0}")]
    Internal(String),
}

fn http_error_message(status: &u16, message: &Option<String>) -> String {
    match message {
        Some(m) => m.clone(),
        None => format!("HTTP Error: {}", status),
    }
}

impl ClientError {
    pub fn validation(message: impl Into<String>) -> Self {
        ClientError::Validation(message.into())
    }

    /// Replace the generic `HTTP Error: {status}` text with an adapter-specific
    /// fallback. Messages that came from the response body are kept.
    pub fn with_http_fallback(self, fallback: &str) -> Self {
        match self {
            ClientError::Http {
                status,
                message: None,
            } => ClientError::Http {
                status,
                message: Some(fallback.to_string()),
            },
            other => other,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Validation(_) => ErrorKind::Validation,
            ClientError::Http { .. } | ClientError::Network(_) | ClientError::Decode(_) => {
                ErrorKind::Remote
            }
            ClientError::Finalize(_) => ErrorKind::Normalization,
            ClientError::Packaging(_) => ErrorKind::Packaging,
            ClientError::NotFound(_) => ErrorKind::Remote,
            ClientError::Config(_) | ClientError::Io(_) | ClientError::Internal(_) => {
                ErrorKind::Unexpected
            }
        }
    }

    /// Spanish text a view can show without further processing.
    pub fn user_message(&self) -> String {
        match self.kind() {
            ErrorKind::Unexpected => GENERIC_ERROR_MESSAGE.to_string(),
            _ => self.to_string(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(format!("Respuesta inválida del servidor: {}", err))
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(format!("Respuesta inválida del servidor: {}", err))
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Io(err.to_string())
    }
}

/// Serializable error representation for views.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub message: String,
    pub kind: ErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Validation,
    Remote,
    Normalization,
    Packaging,
    Unexpected,
}

impl From<&ClientError> for ErrorPayload {
    fn from(err: &ClientError) -> Self {
        let kind = err.kind();
        if kind == ErrorKind::Unexpected {
            log::error!("Unexpected client error: {}", err);
        }
        let status = match err {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        };
        ErrorPayload {
            message: err.user_message(),
            kind,
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_message_prefers_body_text() {
        let err = ClientError::Http {
            status: 400,
            message: Some("El email ya existe".to_string()),
        };
        assert_eq!(err.to_string(), "El email ya existe");
    }

    #[test]
    fn test_http_message_falls_back_to_status() {
        let err = ClientError::Http {
            status: 502,
            message: None,
        };
        assert_eq!(err.to_string(), "HTTP Error: 502");
        assert_eq!(
            err.with_http_fallback("Error en el registro").to_string(),
            "Error en el registro"
        );
    }

    #[test]
    fn test_fallback_keeps_body_message() {
        let err = ClientError::Http {
            status: 422,
            message: Some("detalle".to_string()),
        };
        assert_eq!(
            err.with_http_fallback("Error en el registro").to_string(),
            "detalle"
        );
    }

    #[test]
    fn test_payload_hides_unexpected_details() {
        let err = ClientError::Io("disk full".to_string());
        let payload = ErrorPayload::from(&err);
        assert_eq!(payload.kind, ErrorKind::Unexpected);
        assert_eq!(payload.message, GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn test_payload_keeps_validation_text() {
        let err = ClientError::validation("El NIT es requerido");
        let payload = ErrorPayload::from(&err);
        assert_eq!(payload.kind, ErrorKind::Validation);
        assert_eq!(payload.message, "El NIT es requerido");
        assert!(payload.status.is_none());
    }
}
