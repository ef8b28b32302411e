//! Application operations.
//!
//! Each use-case validates its input, then delegates to one repository.
//! Validation failures carry the Spanish text shown next to the form field.

pub mod auth;
pub mod chat;
pub mod company;
pub mod documentos;
pub mod licitaciones;
pub mod notificaciones;
pub mod validation;

pub use licitaciones::FilterCriteria;
