//! Repository contracts and their implementations.
//!
//! Use-cases only see the traits below. Each trait has one implementation:
//! the tender repository maps service DTOs into entities, documents and
//! notifications are held in memory, and auth/company/chat wrap their HTTP
//! service adapters.

use async_trait::async_trait;

use crate::error::ClientError;
use crate::types::{
    CompanyProfile, CreateCompanyData, CreatedCompany, Documento, DocumentoEstado, Licitacion,
    Notificacion, RegisterData, ResumenEstado, User,
};

pub mod auth;
pub mod chat;
pub mod company;
pub mod documentos;
pub mod fixtures;
pub mod licitaciones;
pub mod notificaciones;

pub use auth::HttpAuthRepository;
pub use chat::HttpChatRepository;
pub use company::HttpCompanyRepository;
pub use documentos::InMemoryDocumentoRepository;
pub use licitaciones::MappedLicitacionRepository;
pub use notificaciones::InMemoryNotificacionRepository;

#[async_trait]
pub trait LicitacionRepository: Send + Sync {
    async fn get_all(&self) -> Result<Vec<Licitacion>, ClientError>;
    /// `"1"` is accepted as an alias of `"LIC-001"`.
    async fn get_by_id(&self, id: &str) -> Result<Option<Licitacion>, ClientError>;
    /// Exact sector match; an empty sector returns everything.
    async fn filter_by_sector(&self, sector: &str) -> Result<Vec<Licitacion>, ClientError>;
    async fn filter_by_region(&self, region: &str) -> Result<Vec<Licitacion>, ClientError>;
    /// Case-insensitive substring over nombre, entidad and sector.
    async fn search(&self, query: &str) -> Result<Vec<Licitacion>, ClientError>;
}

#[async_trait]
pub trait DocumentoRepository: Send + Sync {
    async fn get_all(&self) -> Result<Vec<Documento>, ClientError>;
    async fn get_by_id(&self, id: &str) -> Result<Option<Documento>, ClientError>;
    async fn get_by_licitacion_id(&self, licitacion_id: &str) -> Result<Vec<Documento>, ClientError>;
    async fn get_resumen_estado(&self, licitacion_id: &str) -> Result<ResumenEstado, ClientError>;
    /// Unknown ids are `ClientError::NotFound`.
    async fn update_estado(&self, id: &str, estado: DocumentoEstado) -> Result<Documento, ClientError>;
}

#[async_trait]
pub trait NotificacionRepository: Send + Sync {
    async fn get_all(&self) -> Result<Vec<Notificacion>, ClientError>;
    async fn get_by_id(&self, id: &str) -> Result<Option<Notificacion>, ClientError>;
    async fn get_unread(&self) -> Result<Vec<Notificacion>, ClientError>;
    async fn mark_as_read(&self, id: &str) -> Result<Option<Notificacion>, ClientError>;
    async fn mark_all_as_read(&self) -> Result<(), ClientError>;
}

#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<User, ClientError>;
    async fn logout(&self) -> Result<(), ClientError>;
    async fn register(&self, data: &RegisterData) -> Result<User, ClientError>;
    async fn get_current_user(&self) -> Result<Option<User>, ClientError>;
}

#[async_trait]
pub trait CompanyRepository: Send + Sync {
    async fn create_company(&self, data: &CreateCompanyData) -> Result<CreatedCompany, ClientError>;
    async fn update_company(&self, profile: &CompanyProfile) -> Result<(), ClientError>;
}

#[async_trait]
pub trait ChatRepository: Send + Sync {
    async fn send_message(&self, text: &str) -> Result<String, ClientError>;
    async fn finalize_conversation(&self, user_id: Option<&str>) -> Result<String, ClientError>;
}
