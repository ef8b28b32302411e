use super::validation::{require, require_email};
use crate::error::ClientError;
use crate::repositories::CompanyRepository;
use crate::types::{CompanyProfile, CreateCompanyData, CreatedCompany};

pub fn validate_create(data: &CreateCompanyData) -> Result<(), ClientError> {
    require(&data.razon_social, "La razón social es requerida")?;
    require(&data.nit, "El NIT es requerido")?;
    require(&data.correo_contacto, "El correo de contacto es requerido")?;
    require_email(&data.correo_contacto, "El formato del correo es inválido")?;
    require(&data.pais, "El país es requerido")?;
    Ok(())
}

pub async fn create_company(
    repo: &dyn CompanyRepository,
    data: &CreateCompanyData,
) -> Result<CreatedCompany, ClientError> {
    validate_create(data)?;
    repo.create_company(data).await
}

pub async fn update_company(repo: &dyn CompanyRepository, profile: &CompanyProfile) -> Result<(), ClientError> {
    repo.update_company(profile).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> CreateCompanyData {
        CreateCompanyData {
            razon_social: "Constructora Andina SAS".into(),
            nit: "900123456".into(),
            correo_contacto: "contacto@andina.co".into(),
            pais: "Colombia".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_requires_fields() {
        assert!(validate_create(&data()).is_ok());
        let cases = [
            (CreateCompanyData { razon_social: "".into(), ..data() }, "La razón social es requerida"),
            (CreateCompanyData { nit: " ".into(), ..data() }, "El NIT es requerido"),
            (
                CreateCompanyData { correo_contacto: "".into(), ..data() },
                "El correo de contacto es requerido",
            ),
            (
                CreateCompanyData { correo_contacto: "contacto".into(), ..data() },
                "El formato del correo es inválido",
            ),
            (CreateCompanyData { pais: "".into(), ..data() }, "El país es requerido"),
        ];
        for (input, expected) in cases {
            assert_eq!(validate_create(&input).unwrap_err().to_string(), expected);
        }
    }
}
