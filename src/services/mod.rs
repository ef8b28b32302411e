//! Service adapters, one per remote API.
//!
//! Each adapter owns its origin (through an `HttpClient`) and the exact
//! payload shapes that remote expects. Nothing above the repository layer
//! sees these shapes.

pub mod auth;
pub mod chat;
pub mod company;
pub mod licitaciones;

pub use auth::{AuthService, LoginPayload};
pub use chat::{normalize_finalize_response, ChatService};
pub use company::{CompanyService, UpdateCompanyPayload};
pub use licitaciones::{
    HttpLicitacionService, LicitacionItemDto, LicitacionResponseDto, LicitacionService,
    MockLicitacionService,
};
