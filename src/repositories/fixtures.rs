//! Seed data for the in-memory repositories and the filter catalogs.

use crate::types::{
    Documento, DocumentoCategoria, DocumentoEstado, Notificacion, NotificacionTipo,
    ResumenEstado,
};

pub const SECTORES: &[&str] = &[
    "Construcción",
    "Tecnología",
    "Servicios",
    "Infraestructura",
    "Salud",
    "Educación",
    "Transporte",
];

pub const REGIONES: &[&str] = &[
    "Bogotá D.C.",
    "Antioquia",
    "Valle del Cauca",
    "Atlántico",
    "Santander",
    "Nacional",
];

pub const TIPOS_CONTRATO: &[&str] = &[
    "Obra pública",
    "Suministro",
    "Consultoría",
    "Prestación de servicios",
    "Mantenimiento",
    "Interventoría",
];

pub const TIPOS_ENTIDAD: &[&str] = &[
    "Alcaldía",
    "Gobernación",
    "Ministerio",
    "Entidad descentralizada",
    "Universidad pública",
    "Hospital público",
];

/// Aggregate served for every tender by the in-memory document repository.
/// It describes the full twelve-document checklist, of which only six are
/// seeded.
pub const RESUMEN_ESTADO: ResumenEstado = ResumenEstado {
    total_documentos: 12,
    aprobados: 3,
    pendientes: 4,
    requiere_accion: 1,
    vencidos: 1,
};

fn documento(
    id: &str,
    nombre: &str,
    categoria: DocumentoCategoria,
    estado: DocumentoEstado,
    observaciones: Option<&str>,
    fecha_carga: Option<&str>,
) -> Documento {
    Documento {
        id: id.to_string(),
        nombre: nombre.to_string(),
        categoria,
        estado,
        observaciones: observaciones.map(str::to_string),
        fecha_carga: fecha_carga.map(str::to_string),
    }
}

pub fn documentos() -> Vec<Documento> {
    use DocumentoCategoria::*;
    use DocumentoEstado::*;

    vec![
        documento(
            "1",
            "Registro Único de Proponentes (RUP)",
            Juridico,
            Aprobado,
            Some("Documento válido hasta diciembre 2024"),
            Some("2023-11-15"),
        ),
        documento(
            "2",
            "Certificado de Existencia y Representación Legal",
            Juridico,
            Vencido,
            Some("La fecha de expedición supera los 30 días permitidos"),
            None,
        ),
        documento(
            "3",
            "Estados Financieros 2023",
            Financiero,
            RequiereAccion,
            Some("Falta firma del contador"),
            Some("2023-11-20"),
        ),
        documento(
            "4",
            "Garantía de Seriedad de la Oferta",
            Financiero,
            Pendiente,
            None,
            None,
        ),
        documento(
            "5",
            "Certificado de Experiencia 1",
            Tecnico,
            Aprobado,
            None,
            Some("2023-11-10"),
        ),
        documento(
            "6",
            "Certificado de Experiencia 2",
            Tecnico,
            Aprobado,
            None,
            Some("2023-11-10"),
        ),
    ]
}

fn notificacion(
    id: &str,
    tipo: NotificacionTipo,
    titulo: &str,
    descripcion: &str,
    fecha: &str,
    leida: bool,
) -> Notificacion {
    Notificacion {
        id: id.to_string(),
        tipo,
        titulo: titulo.to_string(),
        descripcion: descripcion.to_string(),
        fecha: fecha.to_string(),
        leida,
    }
}

pub fn notificaciones() -> Vec<Notificacion> {
    vec![
        notificacion(
            "1",
            NotificacionTipo::Critico,
            "Documento vencido",
            "El Certificado de Existencia en la licitación \"Construcción Centro de Salud\" ha vencido",
            "2024-01-28",
            false,
        ),
        notificacion(
            "2",
            NotificacionTipo::Critico,
            "Cierre próximo",
            "La licitación \"Mantenimiento Vial\" cierra en 3 días",
            "2024-01-28",
            false,
        ),
        notificacion(
            "3",
            NotificacionTipo::Importante,
            "Cambio en pliego",
            "Se modificaron requisitos técnicos en \"Suministro Equipos de Cómputo\"",
            "2024-01-27",
            true,
        ),
        notificacion(
            "4",
            NotificacionTipo::Info,
            "Nueva licitación compatible",
            "Encontramos una nueva oportunidad que coincide con tu perfil",
            "2024-01-26",
            true,
        ),
    ]
}
