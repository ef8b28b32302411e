use async_trait::async_trait;
use parking_lot::RwLock;

use super::{fixtures, DocumentoRepository};
use crate::error::ClientError;
use crate::types::{Documento, DocumentoEstado, ResumenEstado};

/// Document checklist held in memory. Every tender shares the same list and
/// aggregate until documents are linked to tenders server-side.
pub struct InMemoryDocumentoRepository {
    documentos: RwLock<Vec<Documento>>,
    resumen: ResumenEstado,
}

impl InMemoryDocumentoRepository {
    pub fn new(documentos: Vec<Documento>, resumen: ResumenEstado) -> Self {
        Self {
            documentos: RwLock::new(documentos),
            resumen,
        }
    }

    pub fn seeded() -> Self {
        Self::new(fixtures::documentos(), fixtures::RESUMEN_ESTADO)
    }
}

#[async_trait]
impl DocumentoRepository for InMemoryDocumentoRepository {
    async fn get_all(&self) -> Result<Vec<Documento>, ClientError> {
        Ok(self.documentos.read().clone())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Documento>, ClientError> {
        Ok(self.documentos.read().iter().find(|d| d.id == id).cloned())
    }

    async fn get_by_licitacion_id(&self, licitacion_id: &str) -> Result<Vec<Documento>, ClientError> {
        log::debug!("Loading checklist for tender {}", licitacion_id);
        Ok(self.documentos.read().clone())
    }

    async fn get_resumen_estado(&self, _licitacion_id: &str) -> Result<ResumenEstado, ClientError> {
        Ok(self.resumen)
    }

    async fn update_estado(&self, id: &str, estado: DocumentoEstado) -> Result<Documento, ClientError> {
        let mut documentos = self.documentos.write();
        let documento = documentos
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| ClientError::NotFound(format!("Documento no encontrado: {}", id)))?;
        documento.estado = estado;
        log::info!("Documento {} -> {}", id, estado);
        Ok(documento.clone())
    }
}
