use async_trait::async_trait;
use serde_json::Value;

use super::CompanyRepository;
use crate::error::ClientError;
use crate::services::{CompanyService, UpdateCompanyPayload};
use crate::types::{CompanyProfile, CreateCompanyData, CreatedCompany};

const PAIS: &str = "Colombia";

fn id_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn created_from_response(response: &Value, data: &CreateCompanyData) -> CreatedCompany {
    CreatedCompany {
        id: id_text(response.get("id")).unwrap_or_else(|| "0".to_string()),
        nit: id_text(response.get("nit")).unwrap_or_else(|| data.nit.clone()),
    }
}

/// Profile edits travel in a reduced shape; the city is carried in `ciiu1`
/// until the backend grows a proper field for it.
pub fn update_payload(profile: &CompanyProfile) -> UpdateCompanyPayload {
    UpdateCompanyPayload {
        razon_social: profile.nombre_legal.clone(),
        ciiu1: profile.ciudad.clone(),
        pais: PAIS.to_string(),
        nit: profile.nit.clone(),
    }
}

pub struct HttpCompanyRepository {
    service: CompanyService,
}

impl HttpCompanyRepository {
    pub fn new(service: CompanyService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl CompanyRepository for HttpCompanyRepository {
    async fn create_company(&self, data: &CreateCompanyData) -> Result<CreatedCompany, ClientError> {
        let response = self.service.create_company(data).await?;
        Ok(created_from_response(&response, data))
    }

    async fn update_company(&self, profile: &CompanyProfile) -> Result<(), ClientError> {
        self.service.update_company(&update_payload(profile)).await
    }
}
