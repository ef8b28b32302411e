//! Domain entities shared by repositories, use-cases and views.
//!
//! Field names follow the JSON the views already consume: camelCase for
//! tender, user and preference records, snake_case for documents and the
//! status aggregate.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// =============================================================================
// Users & companies
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRol {
    Admin,
    Usuario,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmpresaResumen {
    pub razon_social: String,
    pub nit: String,
    pub sector: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub nombre: String,
    pub rol: UserRol,
    pub empresa: EmpresaResumen,
}

/// Registration form as sent to the auth service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterData {
    pub email: String,
    pub nombre_completo: String,
    pub empresa_nit: String,
    pub is_active: bool,
    pub password: String,
}

/// Company profile as edited during onboarding and in settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    pub nombre_legal: String,
    pub nit: String,
    pub sector: String,
    pub tamano: String,
    pub ciudad: String,
}

/// Full company record for the create call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCompanyData {
    pub razon_social: String,
    pub ciiu1: String,
    pub ciiu2: String,
    pub ciiu3: String,
    pub ciiu4: String,
    pub pais: String,
    pub departamento: String,
    pub municipio: String,
    pub direccion_legal: String,
    pub correo_contacto: String,
    pub fecha_constitucion: String,
    pub anios_existencia: u32,
    pub tamano_empresarial: String,
    pub nit: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedCompany {
    pub id: String,
    pub nit: String,
}

/// Tender preferences. Held locally, never sent to a server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub monto_min: Option<u64>,
    pub monto_max: Option<u64>,
    #[serde(default)]
    pub sectores: Vec<String>,
    #[serde(default)]
    pub tipos_contrato: Vec<String>,
    #[serde(default)]
    pub tipos_entidad: Vec<String>,
    #[serde(default)]
    pub regiones: Vec<String>,
}

// =============================================================================
// Tenders
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LicitacionEstado {
    Nueva,
    EnProgreso,
    CasiCierra,
}

impl LicitacionEstado {
    pub fn label(&self) -> &'static str {
        match self {
            LicitacionEstado::Nueva => "Nueva",
            LicitacionEstado::EnProgreso => "En progreso",
            LicitacionEstado::CasiCierra => "Cierra pronto",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Licitacion {
    pub id: String,
    pub nombre: String,
    pub entidad: String,
    pub monto_min: u64,
    pub monto_max: u64,
    /// ISO date (YYYY-MM-DD).
    pub fecha_cierre: String,
    pub estado: LicitacionEstado,
    pub sector: String,
    pub region: String,
    pub tipo_contrato: String,
    pub resumen: String,
    pub documentos_total: u32,
    pub documentos_completados: u32,
}

impl Licitacion {
    /// A tender with at least one uploaded document is a draft.
    pub fn is_draft(&self) -> bool {
        self.documentos_completados > 0
    }

    pub fn progress_percent(&self) -> u32 {
        if self.documentos_total == 0 {
            return 0;
        }
        ((self.documentos_completados as f64 / self.documentos_total as f64) * 100.0).round()
            as u32
    }
}

// =============================================================================
// Documents
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentoCategoria {
    Juridico,
    Fiscal,
    Oferta,
    Tecnico,
    Financiero,
    #[serde(other)]
    Otro,
}

impl DocumentoCategoria {
    /// Human label, also used as the folder name inside checklist packages.
    pub fn label(&self) -> &'static str {
        match self {
            DocumentoCategoria::Juridico => "Jurídico",
            DocumentoCategoria::Fiscal => "Fiscal",
            DocumentoCategoria::Oferta => "Oferta",
            DocumentoCategoria::Tecnico => "Técnico",
            DocumentoCategoria::Financiero => "Financiero",
            DocumentoCategoria::Otro => "Otros",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentoEstado {
    Aprobado,
    Pendiente,
    Vencido,
    Rechazado,
    Cargado,
    RequiereAccion,
}

impl DocumentoEstado {
    pub const ALL: [DocumentoEstado; 6] = [
        DocumentoEstado::Aprobado,
        DocumentoEstado::Pendiente,
        DocumentoEstado::Vencido,
        DocumentoEstado::Rechazado,
        DocumentoEstado::Cargado,
        DocumentoEstado::RequiereAccion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentoEstado::Aprobado => "aprobado",
            DocumentoEstado::Pendiente => "pendiente",
            DocumentoEstado::Vencido => "vencido",
            DocumentoEstado::Rechazado => "rechazado",
            DocumentoEstado::Cargado => "cargado",
            DocumentoEstado::RequiereAccion => "requiere_accion",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DocumentoEstado::Aprobado => "Aprobado",
            DocumentoEstado::Pendiente => "Pendiente",
            DocumentoEstado::Vencido => "Vencido",
            DocumentoEstado::Rechazado => "Rechazado",
            DocumentoEstado::Cargado => "Cargado",
            DocumentoEstado::RequiereAccion => "Requiere acción",
        }
    }
}

impl fmt::Display for DocumentoEstado {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for estado strings outside the permitted set. Carries the raw input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Estado inválido: {0}")]
pub struct EstadoInvalido(pub String);

impl FromStr for DocumentoEstado {
    type Err = EstadoInvalido;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocumentoEstado::ALL
            .iter()
            .copied()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| EstadoInvalido(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Documento {
    pub id: String,
    pub nombre: String,
    pub categoria: DocumentoCategoria,
    pub estado: DocumentoEstado,
    #[serde(default)]
    pub observaciones: Option<String>,
    #[serde(default)]
    pub fecha_carga: Option<String>,
}

/// Aggregate counts over a tender's documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumenEstado {
    pub total_documentos: u32,
    pub aprobados: u32,
    pub pendientes: u32,
    pub requiere_accion: u32,
    pub vencidos: u32,
}

impl ResumenEstado {
    /// Tally the aggregate from the current document list. `rechazado` and
    /// `cargado` count toward the total only.
    pub fn from_documentos(documentos: &[Documento]) -> Self {
        let count = |estado: DocumentoEstado| {
            documentos.iter().filter(|d| d.estado == estado).count() as u32
        };
        ResumenEstado {
            total_documentos: documentos.len() as u32,
            aprobados: count(DocumentoEstado::Aprobado),
            pendientes: count(DocumentoEstado::Pendiente),
            requiere_accion: count(DocumentoEstado::RequiereAccion),
            vencidos: count(DocumentoEstado::Vencido),
        }
    }

    /// `round(aprobados / total * 100)`, 0 for an empty checklist.
    pub fn progress_percent(&self) -> u32 {
        if self.total_documentos == 0 {
            return 0;
        }
        ((self.aprobados as f64 / self.total_documentos as f64) * 100.0).round() as u32
    }
}

// =============================================================================
// Notifications & chat
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificacionTipo {
    Critico,
    Importante,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notificacion {
    pub id: String,
    pub tipo: NotificacionTipo,
    pub titulo: String,
    pub descripcion: String,
    pub fecha: String,
    pub leida: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MensajeRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mensaje {
    pub id: String,
    pub role: MensajeRole,
    pub content: String,
}

impl Mensaje {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role: MensajeRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role: MensajeRole::Assistant,
            content: content.into(),
        }
    }
}
