//! Tender API adapter.
//!
//! The live backend serves `GET /licitaciones` on the generic API origin.
//! Until it is wired, `MockLicitacionService` answers with a fixed envelope
//! after a simulated latency.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ClientError;
use crate::http::{HttpClient, RequestConfig};

pub const LICITACIONES_PATH: &str = "/licitaciones";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicitacionMatchDto {
    /// 0..1
    pub score: f64,
    pub texto: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicitacionItemDto {
    pub id: String,
    pub titulo: String,
    pub entidad_contratante: String,
    pub sector: String,
    pub estado_etiqueta: String,
    #[serde(rename = "match")]
    pub match_info: LicitacionMatchDto,
    pub ubicacion: String,
    pub fecha_cierre: String,
    #[serde(default)]
    pub fecha_cierre_texto: String,
    pub es_nueva: bool,
    #[serde(default)]
    pub region_codigo: String,
    #[serde(default)]
    pub url_detalle: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicitacionFiltrosDto {
    pub busqueda: String,
    pub sector: String,
    pub region: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicitacionResponseDto {
    pub usuario_id: String,
    pub total_matches: u32,
    #[serde(default)]
    pub filtros: LicitacionFiltrosDto,
    pub licitaciones: Vec<LicitacionItemDto>,
}

#[async_trait]
pub trait LicitacionService: Send + Sync {
    async fn get_licitaciones(&self) -> Result<LicitacionResponseDto, ClientError>;
}

/// Live backend through the generic HTTP primitive.
#[derive(Debug, Clone)]
pub struct HttpLicitacionService {
    http: HttpClient,
}

impl HttpLicitacionService {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl LicitacionService for HttpLicitacionService {
    async fn get_licitaciones(&self) -> Result<LicitacionResponseDto, ClientError> {
        self.http
            .get(LICITACIONES_PATH, RequestConfig::default())
            .await
    }
}

/// Fixed six-tender envelope served after `latency`.
#[derive(Debug, Clone)]
pub struct MockLicitacionService {
    latency: Duration,
}

impl MockLicitacionService {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl LicitacionService for MockLicitacionService {
    async fn get_licitaciones(&self) -> Result<LicitacionResponseDto, ClientError> {
        tokio::time::sleep(self.latency).await;
        Ok(mock_response())
    }
}

#[allow(clippy::too_many_arguments)]
fn item(
    id: &str,
    titulo: &str,
    entidad: &str,
    sector: &str,
    score: f64,
    ubicacion: &str,
    fecha_cierre: &str,
    fecha_cierre_texto: &str,
    es_nueva: bool,
    region_codigo: &str,
) -> LicitacionItemDto {
    LicitacionItemDto {
        id: id.to_string(),
        titulo: titulo.to_string(),
        entidad_contratante: entidad.to_string(),
        sector: sector.to_string(),
        estado_etiqueta: if es_nueva { "Nueva" } else { "En progreso" }.to_string(),
        match_info: LicitacionMatchDto {
            score,
            texto: format!("{}% Match", (score * 100.0).round() as u32),
        },
        ubicacion: ubicacion.to_string(),
        fecha_cierre: fecha_cierre.to_string(),
        fecha_cierre_texto: fecha_cierre_texto.to_string(),
        es_nueva,
        region_codigo: region_codigo.to_string(),
        url_detalle: format!("/licitaciones/{}", id),
    }
}

pub fn mock_response() -> LicitacionResponseDto {
    let licitaciones = vec![
        item(
            "LIC-001",
            "Construcción de Centro de Salud Municipal",
            "Alcaldía de Bogotá",
            "Construcción",
            0.95,
            "Bogotá D.C.",
            "2026-02-14",
            "Cierra 14 de feb",
            true,
            "CO-DC",
        ),
        item(
            "LIC-002",
            "Consultoría en Transformación Digital",
            "DIAN",
            "Tecnología",
            0.95,
            "Bogotá D.C.",
            "2026-02-24",
            "Cierra 24 de feb",
            true,
            "CO-DC",
        ),
        item(
            "LIC-003",
            "Suministro de Equipos Médicos",
            "Hospital San Juan de Dios",
            "Salud",
            0.88,
            "Medellín",
            "2026-03-10",
            "Cierra 10 de mar",
            true,
            "CO-ANT",
        ),
        item(
            "LIC-004",
            "Mantenimiento de Infraestructura Vial",
            "Invías",
            "Infraestructura",
            0.92,
            "Cali",
            "2026-02-28",
            "Cierra 28 de feb",
            true,
            "CO-VAC",
        ),
        item(
            "LIC-005",
            "Desarrollo de Sistema de Gestión Documental",
            "Ministerio de Educación",
            "Tecnología",
            0.90,
            "Bogotá D.C.",
            "2026-03-15",
            "Cierra 15 de mar",
            false,
            "CO-DC",
        ),
        item(
            "LIC-006",
            "Auditoría de Seguridad Informática",
            "Banco de la República",
            "Tecnología",
            0.87,
            "Bogotá D.C.",
            "2026-03-20",
            "Cierra 20 de mar",
            false,
            "CO-DC",
        ),
    ];

    LicitacionResponseDto {
        usuario_id: "empresa-123".to_string(),
        total_matches: licitaciones.len() as u32,
        filtros: LicitacionFiltrosDto {
            busqueda: String::new(),
            sector: "todos".to_string(),
            region: "todas".to_string(),
        },
        licitaciones,
    }
}
