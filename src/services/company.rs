//! Company API adapter.

use std::time::Duration;

use serde::Serialize;

use crate::error::ClientError;
use crate::http::{HttpClient, RequestConfig};
use crate::types::CreateCompanyData;

pub const EMPRESAS_PATH: &str = "/api/v1/empresas/";

const EMPTY_COMPANY_RESPONSE: &str = "El servidor no devolvió datos válidos de la empresa";

/// Reduced shape sent when the profile is edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateCompanyPayload {
    pub razon_social: String,
    pub ciiu1: String,
    pub pais: String,
    pub nit: String,
}

#[derive(Debug, Clone)]
pub struct CompanyService {
    http: HttpClient,
    update_latency: Duration,
}

impl CompanyService {
    pub fn new(http: HttpClient, update_latency: Duration) -> Self {
        Self {
            http,
            update_latency,
        }
    }

    pub async fn create_company(
        &self,
        payload: &CreateCompanyData,
    ) -> Result<serde_json::Value, ClientError> {
        log::info!("Creating company {} ({})", payload.razon_social, payload.nit);
        let data: serde_json::Value = self
            .http
            .post(EMPRESAS_PATH, payload, RequestConfig::default())
            .await
            .map_err(|e| match e {
                ClientError::Decode(_) => ClientError::Decode(EMPTY_COMPANY_RESPONSE.to_string()),
                other => other.with_http_fallback("Error al crear empresa"),
            })?;

        if data.is_null() {
            return Err(ClientError::Decode(EMPTY_COMPANY_RESPONSE.to_string()));
        }
        Ok(data)
    }

    /// No update endpoint exists yet; the call is simulated with a fixed
    /// latency and always succeeds.
    pub async fn update_company(&self, payload: &UpdateCompanyPayload) -> Result<(), ClientError> {
        tokio::time::sleep(self.update_latency).await;
        log::info!("Company update accepted (simulated): {:?}", payload);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_update_waits_simulated_latency() {
        let service = CompanyService::new(
            HttpClient::new("http://localhost:1"),
            Duration::from_millis(800),
        );
        let payload = UpdateCompanyPayload {
            razon_social: "Constructora Andina SAS".into(),
            ciiu1: "Bogotá".into(),
            pais: "Colombia".into(),
            nit: "900123456".into(),
        };

        let started = tokio::time::Instant::now();
        service.update_company(&payload).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(800));
    }
}
