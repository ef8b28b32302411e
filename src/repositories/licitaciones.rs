//! Tender repository over a `LicitacionService`.
//!
//! The service speaks the matching-engine envelope; this layer turns each
//! item into a `Licitacion`, filling amounts, contract type and summary from
//! a detail table until the backend serves them.

use std::sync::Arc;

use async_trait::async_trait;

use super::LicitacionRepository;
use crate::error::ClientError;
use crate::services::{LicitacionItemDto, LicitacionService};
use crate::types::{Licitacion, LicitacionEstado};

/// Checklist size assumed for every tender.
pub const DOCUMENTOS_TOTAL: u32 = 10;

const LEGACY_FIRST_ID: &str = "1";
const FIRST_ID: &str = "LIC-001";

struct Detalle {
    resumen: &'static str,
    monto_min: u64,
    monto_max: u64,
    tipo_contrato: &'static str,
}

fn detalle(id: &str) -> Option<Detalle> {
    let d = match id {
        "LIC-001" => Detalle {
            resumen: "Construcción y dotación completa de un centro de salud de primer nivel de atención en la localidad de Usaquén. Incluye obras civiles, instalaciones eléctricas, hidráulicas, redes de datos y equipamiento médico básico. Área aproximada de construcción: 1,200 m².",
            monto_min: 2_500_000_000,
            monto_max: 3_200_000_000,
            tipo_contrato: "Licitación Pública",
        },
        "LIC-002" => Detalle {
            resumen: "Consultoría especializada para el diseño e implementación de un plan de transformación digital institucional. Incluye diagnóstico de madurez digital, arquitectura empresarial, diseño de servicios digitales y capacitación del personal. Duración estimada: 12 meses.",
            monto_min: 800_000_000,
            monto_max: 1_200_000_000,
            tipo_contrato: "Concurso de Méritos",
        },
        "LIC-003" => Detalle {
            resumen: "Suministro de equipos médicos de alta tecnología incluyendo monitores de signos vitales, electrocardiógrafos, ecógrafos y equipos de laboratorio clínico. Se requiere instalación, capacitación y garantía mínima de 3 años.",
            monto_min: 1_500_000_000,
            monto_max: 2_000_000_000,
            tipo_contrato: "Licitación Pública",
        },
        "LIC-004" => Detalle {
            resumen: "Mantenimiento preventivo y correctivo de la red vial terciaria en el departamento del Valle del Cauca. Incluye bacheo, reparcheo, limpieza de obras de arte, señalización vertical y horizontal. Longitud aproximada: 250 km.",
            monto_min: 5_000_000_000,
            monto_max: 6_500_000_000,
            tipo_contrato: "Licitación Pública",
        },
        "LIC-005" => Detalle {
            resumen: "Desarrollo de un sistema de gestión documental electrónica para el Ministerio de Educación. Debe incluir digitalización de archivos históricos, motor de búsqueda avanzado, flujos de trabajo automatizados y módulo de firma electrónica. Compatible con GD01.",
            monto_min: 1_200_000_000,
            monto_max: 1_800_000_000,
            tipo_contrato: "Selección Abreviada",
        },
        "LIC-006" => Detalle {
            resumen: "Auditoría integral de seguridad informática de la infraestructura tecnológica del Banco de la República. Incluye pentesting, análisis de vulnerabilidades, revisión de políticas de seguridad y plan de mejoramiento. Se requiere certificación ISO 27001.",
            monto_min: 600_000_000,
            monto_max: 900_000_000,
            tipo_contrato: "Concurso de Méritos",
        },
        _ => return None,
    };
    Some(d)
}

/// Simulated progress: LIC-005 and LIC-006 are drafts.
fn documentos_completados(id: &str) -> u32 {
    match id {
        "LIC-005" => 5,
        "LIC-006" => 8,
        _ => 0,
    }
}

/// `0.95` renders as `95`, `0.875` as `87.5`.
fn score_percent(score: f64) -> String {
    let pct = (score * 100.0 * 100.0).round() / 100.0;
    format!("{}", pct)
}

pub fn map_dto(dto: &LicitacionItemDto) -> Licitacion {
    let (resumen, monto_min, monto_max, tipo_contrato) = match detalle(&dto.id) {
        Some(d) => (d.resumen.to_string(), d.monto_min, d.monto_max, d.tipo_contrato),
        None => (
            format!(
                "Oportunidad de {} con un {}% de coincidencia con tu perfil empresarial.",
                dto.sector.to_lowercase(),
                score_percent(dto.match_info.score)
            ),
            100_000_000,
            500_000_000,
            "Licitación Pública",
        ),
    };

    Licitacion {
        id: dto.id.clone(),
        nombre: dto.titulo.clone(),
        entidad: dto.entidad_contratante.clone(),
        monto_min,
        monto_max,
        fecha_cierre: dto.fecha_cierre.clone(),
        estado: if dto.es_nueva {
            LicitacionEstado::Nueva
        } else {
            LicitacionEstado::EnProgreso
        },
        sector: dto.sector.clone(),
        region: dto.ubicacion.clone(),
        tipo_contrato: tipo_contrato.to_string(),
        resumen,
        documentos_total: DOCUMENTOS_TOTAL,
        documentos_completados: documentos_completados(&dto.id).min(DOCUMENTOS_TOTAL),
    }
}

pub struct MappedLicitacionRepository {
    service: Arc<dyn LicitacionService>,
}

impl MappedLicitacionRepository {
    pub fn new(service: Arc<dyn LicitacionService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl LicitacionRepository for MappedLicitacionRepository {
    async fn get_all(&self) -> Result<Vec<Licitacion>, ClientError> {
        let response = self.service.get_licitaciones().await?;
        log::debug!(
            "Tender service returned {} matches for {}",
            response.total_matches,
            response.usuario_id
        );
        Ok(response.licitaciones.iter().map(map_dto).collect())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Licitacion>, ClientError> {
        let search_id = if id == LEGACY_FIRST_ID { FIRST_ID } else { id };
        let all = self.get_all().await?;
        Ok(all.into_iter().find(|l| l.id == search_id))
    }

    async fn filter_by_sector(&self, sector: &str) -> Result<Vec<Licitacion>, ClientError> {
        let all = self.get_all().await?;
        if sector.is_empty() {
            return Ok(all);
        }
        Ok(all.into_iter().filter(|l| l.sector == sector).collect())
    }

    async fn filter_by_region(&self, region: &str) -> Result<Vec<Licitacion>, ClientError> {
        let all = self.get_all().await?;
        if region.is_empty() {
            return Ok(all);
        }
        Ok(all.into_iter().filter(|l| l.region == region).collect())
    }

    async fn search(&self, query: &str) -> Result<Vec<Licitacion>, ClientError> {
        let all = self.get_all().await?;
        if query.is_empty() {
            return Ok(all);
        }
        let needle = query.to_lowercase();
        Ok(all
            .into_iter()
            .filter(|l| {
                l.nombre.to_lowercase().contains(&needle)
                    || l.entidad.to_lowercase().contains(&needle)
                    || l.sector.to_lowercase().contains(&needle)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::licitaciones::mock_response;
    use crate::services::MockLicitacionService;
    use std::time::Duration;

    fn repo() -> MappedLicitacionRepository {
        MappedLicitacionRepository::new(Arc::new(MockLicitacionService::new(Duration::ZERO)))
    }

    #[tokio::test]
    async fn test_get_all_maps_every_item() {
        let all = repo().get_all().await.unwrap();
        assert_eq!(all.len(), 6);
        assert!(all.iter().all(|l| l.documentos_total == 10));
        assert!(all
            .iter()
            .all(|l| l.documentos_completados <= l.documentos_total));
        assert!(all.iter().all(|l| l.monto_min <= l.monto_max));
    }

    #[tokio::test]
    async fn test_get_by_id_accepts_legacy_alias() {
        let lic = repo().get_by_id("1").await.unwrap().unwrap();
        assert_eq!(lic.id, "LIC-001");
        assert_eq!(lic.monto_min, 2_500_000_000);
        assert_eq!(lic.tipo_contrato, "Licitación Pública");
        assert!(repo().get_by_id("LIC-999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_drafts_come_from_completion_table() {
        let all = repo().get_all().await.unwrap();
        let drafts: Vec<&str> = all
            .iter()
            .filter(|l| l.is_draft())
            .map(|l| l.id.as_str())
            .collect();
        assert_eq!(drafts, vec!["LIC-005", "LIC-006"]);
        let lic5 = all.iter().find(|l| l.id == "LIC-005").unwrap();
        assert_eq!(lic5.estado, LicitacionEstado::EnProgreso);
        assert_eq!(lic5.documentos_completados, 5);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let found = repo().search("dian").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "LIC-002");

        let by_sector = repo().search("TECNOLOGÍA").await.unwrap();
        assert_eq!(by_sector.len(), 3);

        assert_eq!(repo().search("").await.unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_filters_match_exactly() {
        assert_eq!(repo().filter_by_sector("Salud").await.unwrap().len(), 1);
        assert_eq!(repo().filter_by_sector("salud").await.unwrap().len(), 0);
        assert_eq!(repo().filter_by_region("Bogotá D.C.").await.unwrap().len(), 4);
        assert_eq!(repo().filter_by_region("").await.unwrap().len(), 6);
    }

    #[test]
    fn test_unknown_id_uses_synthesized_details() {
        let mut dto = mock_response().licitaciones.remove(0);
        dto.id = "LIC-777".into();
        dto.sector = "Salud".into();
        let lic = map_dto(&dto);
        assert_eq!(
            lic.resumen,
            "Oportunidad de salud con un 95% de coincidencia con tu perfil empresarial."
        );
        assert_eq!((lic.monto_min, lic.monto_max), (100_000_000, 500_000_000));
        assert_eq!(lic.tipo_contrato, "Licitación Pública");
        assert_eq!(lic.documentos_completados, 0);
    }
}
