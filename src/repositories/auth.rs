//! Maps auth service envelopes into `User`.
//!
//! The server's login and register responses are loosely shaped: fields may
//! sit at the top level or under `user`, ids may be numbers or strings. Each
//! field falls back to the caller's input or a fixed placeholder.

use async_trait::async_trait;
use serde_json::Value;

use super::AuthRepository;
use crate::error::ClientError;
use crate::services::{AuthService, LoginPayload};
use crate::types::{EmpresaResumen, RegisterData, User, UserRol};

const LOGIN_SECTOR: &str = "Tecnología";
const REGISTER_SECTOR: &str = "Sin sector";

/// Non-empty string, or a number rendered as text.
fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn user_field(response: &Value, key: &str) -> Option<String> {
    text(response.get("user").and_then(|u| u.get(key)))
}

fn top_field(response: &Value, key: &str) -> Option<String> {
    text(response.get(key))
}

pub fn user_from_login(response: &Value, email: &str) -> User {
    let empresa_nit =
        user_field(response, "empresa_nit").or_else(|| top_field(response, "empresa_nit"));
    User {
        id: user_field(response, "id")
            .or_else(|| top_field(response, "id"))
            .unwrap_or_else(|| "0".to_string()),
        email: user_field(response, "email")
            .or_else(|| top_field(response, "email"))
            .unwrap_or_else(|| email.to_string()),
        nombre: user_field(response, "name")
            .or_else(|| user_field(response, "nombre_completo"))
            .or_else(|| top_field(response, "nombre_completo"))
            .unwrap_or_else(|| "Usuario".to_string()),
        rol: UserRol::Usuario,
        empresa: EmpresaResumen {
            razon_social: empresa_nit.clone().unwrap_or_else(|| "Empresa".to_string()),
            nit: empresa_nit.unwrap_or_else(|| "000000000".to_string()),
            sector: LOGIN_SECTOR.to_string(),
        },
    }
}

pub fn user_from_register(response: &Value, data: &RegisterData) -> User {
    User {
        id: top_field(response, "id").unwrap_or_else(|| "0".to_string()),
        email: top_field(response, "email").unwrap_or_else(|| data.email.clone()),
        nombre: top_field(response, "nombre_completo")
            .unwrap_or_else(|| data.nombre_completo.clone()),
        rol: UserRol::Usuario,
        empresa: EmpresaResumen {
            razon_social: data.empresa_nit.clone(),
            nit: data.empresa_nit.clone(),
            sector: REGISTER_SECTOR.to_string(),
        },
    }
}

pub struct HttpAuthRepository {
    service: AuthService,
}

impl HttpAuthRepository {
    pub fn new(service: AuthService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl AuthRepository for HttpAuthRepository {
    async fn login(&self, email: &str, password: &str) -> Result<User, ClientError> {
        let payload = LoginPayload {
            username: email.to_string(),
            password: password.to_string(),
            grant_type: None,
        };
        let response = self.service.login(&payload).await?;
        log::debug!("Login envelope received for {}", email);
        Ok(user_from_login(&response, email))
    }

    /// Sessions are not persisted client-side, so there is nothing to revoke.
    async fn logout(&self) -> Result<(), ClientError> {
        Ok(())
    }

    async fn register(&self, data: &RegisterData) -> Result<User, ClientError> {
        let response = self.service.register(data).await?;
        Ok(user_from_register(&response, data))
    }

    async fn get_current_user(&self) -> Result<Option<User>, ClientError> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_login_reads_nested_user() {
        let response = json!({
            "access_token": "t",
            "user": { "id": 17, "email": "ana@acme.co", "name": "Ana", "empresa_nit": "900123456" }
        });
        let user = user_from_login(&response, "typed@acme.co");
        assert_eq!(user.id, "17");
        assert_eq!(user.email, "ana@acme.co");
        assert_eq!(user.nombre, "Ana");
        assert_eq!(user.empresa.nit, "900123456");
        assert_eq!(user.empresa.razon_social, "900123456");
        assert_eq!(user.empresa.sector, "Tecnología");
    }

    #[test]
    fn test_login_falls_back_to_placeholders() {
        let user = user_from_login(&json!({ "access_token": "t" }), "typed@acme.co");
        assert_eq!(user.id, "0");
        assert_eq!(user.email, "typed@acme.co");
        assert_eq!(user.nombre, "Usuario");
        assert_eq!(user.empresa.razon_social, "Empresa");
        assert_eq!(user.empresa.nit, "000000000");
        assert_eq!(user.rol, UserRol::Usuario);
    }

    #[test]
    fn test_register_uses_form_data_for_company() {
        let data = RegisterData {
            email: "ana@acme.co".into(),
            nombre_completo: "Ana Pérez".into(),
            empresa_nit: "900123456".into(),
            is_active: true,
            password: "secreto".into(),
        };
        let user = user_from_register(&json!({ "id": "u-1" }), &data);
        assert_eq!(user.id, "u-1");
        assert_eq!(user.nombre, "Ana Pérez");
        assert_eq!(user.empresa.nit, "900123456");
        assert_eq!(user.empresa.sector, "Sin sector");
    }
}
