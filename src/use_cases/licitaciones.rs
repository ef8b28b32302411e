use crate::error::ClientError;
use crate::repositories::LicitacionRepository;
use crate::types::Licitacion;

const ID_REQUERIDO: &str = "El ID de la licitación es requerido";

/// Blank fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub search_query: Option<String>,
    pub sector: Option<String>,
    pub region: Option<String>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

pub async fn get_licitaciones(repo: &dyn LicitacionRepository) -> Result<Vec<Licitacion>, ClientError> {
    repo.get_all().await
}

pub async fn get_licitacion_by_id(
    repo: &dyn LicitacionRepository,
    id: &str,
) -> Result<Option<Licitacion>, ClientError> {
    if id.trim().is_empty() {
        return Err(ClientError::validation(ID_REQUERIDO));
    }
    repo.get_by_id(id).await
}

/// Text search goes through the repository; sector and region narrow the
/// result in memory.
pub async fn filter_licitaciones(
    repo: &dyn LicitacionRepository,
    criteria: &FilterCriteria,
) -> Result<Vec<Licitacion>, ClientError> {
    let mut results = match non_blank(&criteria.search_query) {
        Some(query) => repo.search(query).await?,
        None => repo.get_all().await?,
    };

    if let Some(sector) = non_blank(&criteria.sector) {
        results.retain(|l| l.sector == sector);
    }
    if let Some(region) = non_blank(&criteria.region) {
        results.retain(|l| l.region == region);
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MappedLicitacionRepository;
    use crate::services::MockLicitacionService;
    use std::sync::Arc;
    use std::time::Duration;

    fn repo() -> MappedLicitacionRepository {
        MappedLicitacionRepository::new(Arc::new(MockLicitacionService::new(Duration::ZERO)))
    }

    #[tokio::test]
    async fn test_blank_id_is_rejected() {
        let err = get_licitacion_by_id(&repo(), "  ").await.unwrap_err();
        assert_eq!(err.to_string(), "El ID de la licitación es requerido");
    }

    #[tokio::test]
    async fn test_filter_combines_search_and_region() {
        let criteria = FilterCriteria {
            search_query: Some("tecnología".into()),
            sector: None,
            region: Some("Bogotá D.C.".into()),
        };
        let found = filter_licitaciones(&repo(), &criteria).await.unwrap();
        let ids: Vec<&str> = found.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["LIC-002", "LIC-005", "LIC-006"]);
    }

    #[tokio::test]
    async fn test_filter_without_criteria_returns_all() {
        let criteria = FilterCriteria {
            search_query: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(filter_licitaciones(&repo(), &criteria).await.unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_filter_by_sector_only() {
        let criteria = FilterCriteria {
            sector: Some("Infraestructura".into()),
            ..Default::default()
        };
        let found = filter_licitaciones(&repo(), &criteria).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "LIC-004");
    }
}
