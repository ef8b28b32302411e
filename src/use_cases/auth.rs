use super::validation::{require, require_email};
use crate::error::ClientError;
use crate::repositories::AuthRepository;
use crate::types::{RegisterData, User};

pub const MIN_PASSWORD_LEN: usize = 6;

pub async fn login(repo: &dyn AuthRepository, email: &str, password: &str) -> Result<User, ClientError> {
    if email.is_empty() || password.is_empty() {
        return Err(ClientError::validation("Email y contraseña son requeridos"));
    }
    repo.login(email, password).await
}

pub async fn logout(repo: &dyn AuthRepository) -> Result<(), ClientError> {
    repo.logout().await
}

pub async fn get_current_user(repo: &dyn AuthRepository) -> Result<Option<User>, ClientError> {
    repo.get_current_user().await
}

/// Checks run in form order; the first failing field wins.
pub fn validate_register(data: &RegisterData) -> Result<(), ClientError> {
    require(&data.email, "El email es requerido")?;
    require_email(&data.email, "El formato del email es inválido")?;
    require(&data.password, "La contraseña es requerida")?;
    if data.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ClientError::validation(
            "La contraseña debe tener al menos 6 caracteres",
        ));
    }
    require(&data.nombre_completo, "El nombre es requerido")?;
    require(&data.empresa_nit, "El NIT de la empresa es requerido")?;
    Ok(())
}

pub async fn register(repo: &dyn AuthRepository, data: &RegisterData) -> Result<User, ClientError> {
    validate_register(data)?;
    repo.register(data).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> RegisterData {
        RegisterData {
            email: "ana@acme.co".into(),
            nombre_completo: "Ana Pérez".into(),
            empresa_nit: "900123456".into(),
            is_active: true,
            password: "secreto".into(),
        }
    }

    fn message(data: RegisterData) -> String {
        validate_register(&data).unwrap_err().to_string()
    }

    #[test]
    fn test_register_valid() {
        assert!(validate_register(&data()).is_ok());
    }

    #[test]
    fn test_register_messages_in_order() {
        assert_eq!(
            message(RegisterData { email: " ".into(), ..data() }),
            "El email es requerido"
        );
        assert_eq!(
            message(RegisterData { email: "ana@acme".into(), ..data() }),
            "El formato del email es inválido"
        );
        assert_eq!(
            message(RegisterData { password: "".into(), ..data() }),
            "La contraseña es requerida"
        );
        assert_eq!(
            message(RegisterData { password: "abc12".into(), ..data() }),
            "La contraseña debe tener al menos 6 caracteres"
        );
        assert_eq!(
            message(RegisterData { nombre_completo: "".into(), ..data() }),
            "El nombre es requerido"
        );
        assert_eq!(
            message(RegisterData { empresa_nit: "".into(), ..data() }),
            "El NIT de la empresa es requerido"
        );
    }
}
