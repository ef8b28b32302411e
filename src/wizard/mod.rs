//! Per-tender document checklist.
//!
//! The checklist is paged five documents per step. Uploading a file marks
//! its document approved, recomputes the aggregate and, when the whole step
//! is approved, schedules a move to the next step. The terminal "next"
//! builds the ZIP package instead of advancing.
//!
//! `ChecklistWizard` is plain state with synchronous transitions.
//! `WizardController` shares it behind a mutex and runs the auto-advance
//! delay on tokio.

pub mod packaging;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::NaiveDate;
use serde::Serialize;
use tokio::time::Instant;

use crate::error::ClientError;
use crate::types::{Documento, DocumentoEstado, Licitacion, ResumenEstado};
use packaging::{build_package, Package, UploadedFile};

pub const DOCUMENTS_PER_STEP: usize = 5;
pub const AUTO_ADVANCE_DELAY: Duration = Duration::from_millis(500);
pub const SAVED_NOTICE: &str = "Guardado hace un momento";
pub const SAVED_NOTICE_TTL: Duration = Duration::from_secs(3);

/// File picker filter. Other extensions are accepted with a warning.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "jpg", "jpeg", "png"];

/// Where a proposed bid sits against the tender's benchmark range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceStatus {
    Below,
    Within,
    Above,
}

/// Digits of free-form input as an amount; `None` when there are none or
/// they add up to zero.
pub fn parse_amount(input: &str) -> Option<u64> {
    let digits: String = input.chars().filter(char::is_ascii_digit).collect();
    match digits.parse::<u64>() {
        Ok(0) | Err(_) => None,
        Ok(value) => Some(value),
    }
}

pub fn price_status(amount: u64, monto_min: u64, monto_max: u64) -> PriceStatus {
    if amount < monto_min {
        PriceStatus::Below
    } else if amount > monto_max {
        PriceStatus::Above
    } else {
        PriceStatus::Within
    }
}

#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub documento: Documento,
    /// Step that scheduled an auto-advance, if this upload completed it.
    pub advance_from: Option<usize>,
}

#[derive(Debug)]
pub enum NextOutcome {
    Advanced(usize),
    Packaged(Package),
}

#[derive(Debug, Clone)]
pub struct ChecklistWizard {
    licitacion: Licitacion,
    documentos: Vec<Documento>,
    current_step: usize,
    uploaded_files: HashMap<String, UploadedFile>,
    resumen_estado: ResumenEstado,
    saved_at: Option<Instant>,
    pending_advance: Option<usize>,
}

impl ChecklistWizard {
    /// `resumen_estado` is the aggregate as loaded; it is recomputed from
    /// the documents on the first change.
    pub fn new(licitacion: Licitacion, documentos: Vec<Documento>, resumen_estado: ResumenEstado) -> Self {
        Self {
            licitacion,
            documentos,
            current_step: 0,
            uploaded_files: HashMap::new(),
            resumen_estado,
            saved_at: None,
            pending_advance: None,
        }
    }

    pub fn licitacion(&self) -> &Licitacion {
        &self.licitacion
    }

    pub fn documentos(&self) -> &[Documento] {
        &self.documentos
    }

    pub fn resumen_estado(&self) -> ResumenEstado {
        self.resumen_estado
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn total_steps(&self) -> usize {
        self.documentos.len().div_ceil(DOCUMENTS_PER_STEP)
    }

    pub fn is_last_step(&self) -> bool {
        self.current_step + 1 >= self.total_steps()
    }

    pub fn pending_advance(&self) -> Option<usize> {
        self.pending_advance
    }

    pub fn current_documents(&self) -> &[Documento] {
        let start = (self.current_step * DOCUMENTS_PER_STEP).min(self.documentos.len());
        let end = (start + DOCUMENTS_PER_STEP).min(self.documentos.len());
        &self.documentos[start..end]
    }

    pub fn uploaded_file(&self, doc_id: &str) -> Option<&UploadedFile> {
        self.uploaded_files.get(doc_id)
    }

    /// Documents that are approved or uploaded, whatever their step.
    pub fn uploaded_documents(&self) -> Vec<&Documento> {
        self.documentos
            .iter()
            .filter(|d| matches!(d.estado, DocumentoEstado::Aprobado | DocumentoEstado::Cargado))
            .collect()
    }

    pub fn progress_percent(&self) -> u32 {
        self.resumen_estado.progress_percent()
    }

    /// Share of approved or uploaded documents, shown on the summary page.
    pub fn completion_score(&self) -> u32 {
        if self.documentos.is_empty() {
            return 0;
        }
        let done = self.uploaded_documents().len() as f64;
        ((done / self.documentos.len() as f64) * 100.0).round() as u32
    }

    pub fn price_status(&self, proposed: &str) -> Option<PriceStatus> {
        parse_amount(proposed)
            .map(|amount| price_status(amount, self.licitacion.monto_min, self.licitacion.monto_max))
    }

    /// The saved notice while it is still fresh.
    pub fn saved_message(&self, now: Instant) -> Option<&'static str> {
        match self.saved_at {
            Some(at) if now.saturating_duration_since(at) < SAVED_NOTICE_TTL => Some(SAVED_NOTICE),
            _ => None,
        }
    }

    pub fn upload(&mut self, doc_id: &str, file: UploadedFile) -> Result<UploadOutcome, ClientError> {
        let index = self
            .documentos
            .iter()
            .position(|d| d.id == doc_id)
            .ok_or_else(|| ClientError::NotFound(format!("Documento no encontrado: {}", doc_id)))?;

        match file.extension() {
            Some(ext) if ACCEPTED_EXTENSIONS.contains(&ext.as_str()) => {}
            _ => log::warn!(
                "Upload {} for document {} has an unexpected file type",
                file.name,
                doc_id
            ),
        }

        self.uploaded_files.insert(doc_id.to_string(), file);
        self.documentos[index].estado = DocumentoEstado::Aprobado;
        self.resumen_estado = ResumenEstado::from_documentos(&self.documentos);

        let step_complete = self
            .current_documents()
            .iter()
            .all(|d| d.estado == DocumentoEstado::Aprobado);
        let advance_from = if step_complete && !self.is_last_step() {
            self.pending_advance = Some(self.current_step);
            Some(self.current_step)
        } else {
            None
        };

        self.saved_at = Some(Instant::now());

        Ok(UploadOutcome {
            documento: self.documentos[index].clone(),
            advance_from,
        })
    }

    /// Apply an auto-advance scheduled from `from_step`. Ignored when the
    /// user has navigated away from that step since.
    pub fn apply_scheduled_advance(&mut self, from_step: usize) -> bool {
        if self.pending_advance != Some(from_step) {
            return false;
        }
        self.pending_advance = None;
        if self.current_step != from_step || self.is_last_step() {
            return false;
        }
        self.current_step += 1;
        log::debug!("Checklist auto-advanced to step {}", self.current_step);
        true
    }

    pub fn back(&mut self) -> usize {
        self.current_step = self.current_step.saturating_sub(1);
        self.current_step
    }

    /// Advance, or package on the terminal step. Packaging failures leave
    /// the wizard untouched.
    pub fn next(&mut self, today: NaiveDate) -> Result<NextOutcome, ClientError> {
        if self.is_last_step() {
            return Ok(NextOutcome::Packaged(self.package(today)?));
        }
        self.current_step += 1;
        Ok(NextOutcome::Advanced(self.current_step))
    }

    pub fn package(&self, today: NaiveDate) -> Result<Package, ClientError> {
        let package = build_package(
            &self.licitacion.nombre,
            &self.documentos,
            &self.uploaded_files,
            today,
        )?;
        log::info!(
            "Packaged {} documents for {}",
            package.entries.len(),
            self.licitacion.id
        );
        Ok(package)
    }
}

/// Shared handle over a `ChecklistWizard`. The lock is never held across an
/// await point.
#[derive(Debug, Clone)]
pub struct WizardController {
    inner: Arc<Mutex<ChecklistWizard>>,
}

impl WizardController {
    pub fn new(wizard: ChecklistWizard) -> Self {
        Self {
            inner: Arc::new(Mutex::new(wizard)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, ChecklistWizard>, ClientError> {
        self.inner
            .lock()
            .map_err(|_| ClientError::Internal("Lock poisoned".to_string()))
    }

    /// Read-only access to the current state.
    pub fn with<R>(&self, f: impl FnOnce(&ChecklistWizard) -> R) -> Result<R, ClientError> {
        Ok(f(&*self.lock()?))
    }

    /// Must be called inside a tokio runtime when the upload may complete a
    /// step.
    pub fn upload(&self, doc_id: &str, file: UploadedFile) -> Result<UploadOutcome, ClientError> {
        let outcome = self.lock()?.upload(doc_id, file)?;
        if let Some(step) = outcome.advance_from {
            let inner = Arc::clone(&self.inner);
            tokio::spawn(async move {
                tokio::time::sleep(AUTO_ADVANCE_DELAY).await;
                if let Ok(mut wizard) = inner.lock() {
                    wizard.apply_scheduled_advance(step);
                }
            });
        }
        Ok(outcome)
    }

    pub fn back(&self) -> Result<usize, ClientError> {
        Ok(self.lock()?.back())
    }

    pub fn next(&self, today: NaiveDate) -> Result<NextOutcome, ClientError> {
        self.lock()?.next(today)
    }
}
