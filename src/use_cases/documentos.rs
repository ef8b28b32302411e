use crate::error::ClientError;
use crate::repositories::DocumentoRepository;
use crate::types::{Documento, DocumentoEstado, ResumenEstado};

pub async fn get_documentos(repo: &dyn DocumentoRepository) -> Result<Vec<Documento>, ClientError> {
    repo.get_all().await
}

pub async fn get_documentos_by_licitacion(
    repo: &dyn DocumentoRepository,
    licitacion_id: &str,
) -> Result<Vec<Documento>, ClientError> {
    if licitacion_id.trim().is_empty() {
        return Err(ClientError::validation("El ID de la licitación es requerido"));
    }
    repo.get_by_licitacion_id(licitacion_id).await
}

pub async fn get_resumen_estado(
    repo: &dyn DocumentoRepository,
    licitacion_id: &str,
) -> Result<ResumenEstado, ClientError> {
    repo.get_resumen_estado(licitacion_id).await
}

/// `estado` is the wire string (`"aprobado"`, `"requiere_accion"`, ...).
pub async fn update_documento_estado(
    repo: &dyn DocumentoRepository,
    id: &str,
    estado: &str,
) -> Result<Documento, ClientError> {
    if id.trim().is_empty() {
        return Err(ClientError::validation("El ID del documento es requerido"));
    }
    let estado: DocumentoEstado = estado
        .parse()
        .map_err(|e: crate::types::EstadoInvalido| ClientError::validation(e.to_string()))?;
    repo.update_estado(id, estado).await
}
