//! Application context: the composition root.
//!
//! Builds the HTTP clients, services and repositories from `Config`, and
//! fronts the use-cases with a keyed read cache. Mutations invalidate the
//! cached reads they affect.

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use serde::Serialize;

use crate::chat_session::ChatSession;
use crate::config::{Backend, Config};
use crate::error::ClientError;
use crate::format::parse_fecha;
use crate::http::HttpClient;
use crate::query_cache::{QueryCache, QueryKey};
use crate::repositories::{
    AuthRepository, ChatRepository, CompanyRepository, DocumentoRepository, HttpAuthRepository,
    HttpChatRepository, HttpCompanyRepository, InMemoryDocumentoRepository,
    InMemoryNotificacionRepository, LicitacionRepository, MappedLicitacionRepository,
    NotificacionRepository,
};
use crate::services::{
    AuthService, ChatService, CompanyService, HttpLicitacionService, LicitacionService,
    MockLicitacionService,
};
use crate::types::{
    CompanyProfile, CreateCompanyData, CreatedCompany, Documento, Licitacion, LicitacionEstado,
    Notificacion, Preferences, RegisterData, ResumenEstado, User,
};
use crate::use_cases::{self, FilterCriteria};
use crate::wizard::{ChecklistWizard, WizardController};

/// Days before closing at which a tender is flagged as closing soon.
pub const CASI_CIERRA_DIAS: i64 = 7;

/// Reported estado for a tender on `today`: anything still open that closes
/// within a week is `casi_cierra`.
pub fn estado_por_fecha(licitacion: &Licitacion, today: NaiveDate) -> LicitacionEstado {
    match parse_fecha(&licitacion.fecha_cierre) {
        Some(cierre) => {
            let dias = (cierre - today).num_days();
            if (0..=CASI_CIERRA_DIAS).contains(&dias) {
                LicitacionEstado::CasiCierra
            } else {
                licitacion.estado
            }
        }
        None => licitacion.estado,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub nuevas: usize,
    pub en_progreso: usize,
    pub por_cerrar: usize,
}

/// Tenders with no uploaded documents yet.
pub fn new_opportunities(licitaciones: &[Licitacion]) -> Vec<Licitacion> {
    licitaciones.iter().filter(|l| !l.is_draft()).cloned().collect()
}

/// Tenders with at least one uploaded document.
pub fn drafts(licitaciones: &[Licitacion]) -> Vec<Licitacion> {
    licitaciones.iter().filter(|l| l.is_draft()).cloned().collect()
}

/// Counts over the new opportunities, by their estado on `today`.
pub fn dashboard_stats(licitaciones: &[Licitacion], today: NaiveDate) -> DashboardStats {
    let mut stats = DashboardStats::default();
    for l in licitaciones.iter().filter(|l| !l.is_draft()) {
        match estado_por_fecha(l, today) {
            LicitacionEstado::Nueva => stats.nuevas += 1,
            LicitacionEstado::EnProgreso => stats.en_progreso += 1,
            LicitacionEstado::CasiCierra => stats.por_cerrar += 1,
        }
    }
    stats
}

pub fn validate_preferences(preferences: &Preferences) -> Result<(), ClientError> {
    if let (Some(min), Some(max)) = (preferences.monto_min, preferences.monto_max) {
        if min > max {
            return Err(ClientError::validation(
                "El monto mínimo no puede ser mayor al monto máximo",
            ));
        }
    }
    Ok(())
}

/// Repository set the context runs on. Tests swap in their own.
pub struct Repositories {
    pub licitaciones: Arc<dyn LicitacionRepository>,
    pub documentos: Arc<dyn DocumentoRepository>,
    pub notificaciones: Arc<dyn NotificacionRepository>,
    pub auth: Arc<dyn AuthRepository>,
    pub company: Arc<dyn CompanyRepository>,
    pub chat: Arc<dyn ChatRepository>,
}

impl Repositories {
    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        config.validate()?;

        let client = reqwest::Client::new();
        let api = HttpClient::with_client(client.clone(), config.api_base_url.clone());
        let auth_origin = HttpClient::with_client(client.clone(), config.auth_base_url.clone());
        let chat_origin = HttpClient::with_client(client, config.chat_base_url.clone());

        let tender_service: Arc<dyn LicitacionService> = match config.backend {
            Backend::Mock => Arc::new(MockLicitacionService::new(config.simulated_latency())),
            Backend::Live => Arc::new(HttpLicitacionService::new(api)),
        };
        log::info!(
            "Tender backend: {:?} (auth {}, chat {})",
            config.backend,
            config.auth_base_url,
            config.chat_base_url
        );

        Ok(Self {
            licitaciones: Arc::new(MappedLicitacionRepository::new(tender_service)),
            documentos: Arc::new(InMemoryDocumentoRepository::seeded()),
            notificaciones: Arc::new(InMemoryNotificacionRepository::seeded()),
            auth: Arc::new(HttpAuthRepository::new(AuthService::new(auth_origin.clone()))),
            company: Arc::new(HttpCompanyRepository::new(CompanyService::new(
                auth_origin,
                config.simulated_latency(),
            ))),
            chat: Arc::new(HttpChatRepository::new(ChatService::new(
                chat_origin,
                config.chat_user_id.clone(),
            ))),
        })
    }
}

pub struct AppContext {
    config: Config,
    cache: QueryCache,
    repos: Repositories,
    preferences: Mutex<Preferences>,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self, ClientError> {
        let repos = Repositories::from_config(&config)?;
        Ok(Self::with_repositories(config, repos))
    }

    pub fn with_repositories(config: Config, repos: Repositories) -> Self {
        Self {
            config,
            cache: QueryCache::new(),
            repos,
            preferences: Mutex::new(Preferences::default()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn chat_session(&self) -> ChatSession {
        ChatSession::new(Arc::clone(&self.repos.chat), self.config.chat_user_id.clone())
    }

    // =========================================================================
    // Session
    // =========================================================================

    pub async fn login(&self, email: &str, password: &str) -> Result<User, ClientError> {
        let user = use_cases::auth::login(self.repos.auth.as_ref(), email, password).await?;
        self.cache.set(QueryKey::current_user(), &user);
        Ok(user)
    }

    pub async fn register(&self, data: &RegisterData) -> Result<User, ClientError> {
        let user = use_cases::auth::register(self.repos.auth.as_ref(), data).await?;
        self.cache.set(QueryKey::current_user(), &user);
        Ok(user)
    }

    pub async fn logout(&self) -> Result<(), ClientError> {
        use_cases::auth::logout(self.repos.auth.as_ref()).await?;
        self.cache.clear();
        log::info!("Session closed, cache cleared");
        Ok(())
    }

    pub async fn current_user(&self) -> Result<Option<User>, ClientError> {
        if let Some(user) = self.cache.get::<User>(&QueryKey::current_user()) {
            return Ok(Some(user));
        }
        let user = use_cases::auth::get_current_user(self.repos.auth.as_ref()).await?;
        if let Some(user) = &user {
            self.cache.set(QueryKey::current_user(), user);
        }
        Ok(user)
    }

    pub async fn create_company(&self, data: &CreateCompanyData) -> Result<CreatedCompany, ClientError> {
        use_cases::company::create_company(self.repos.company.as_ref(), data).await
    }

    pub async fn update_company(&self, profile: &CompanyProfile) -> Result<(), ClientError> {
        use_cases::company::update_company(self.repos.company.as_ref(), profile).await
    }

    // =========================================================================
    // Preferences (local only)
    // =========================================================================

    pub fn preferences(&self) -> Preferences {
        self.preferences
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    pub fn update_preferences(&self, preferences: Preferences) -> Result<(), ClientError> {
        validate_preferences(&preferences)?;
        let mut guard = self
            .preferences
            .lock()
            .map_err(|_| ClientError::Internal("Lock poisoned".to_string()))?;
        *guard = preferences;
        Ok(())
    }

    // =========================================================================
    // Tenders
    // =========================================================================

    pub async fn licitaciones(&self) -> Result<Vec<Licitacion>, ClientError> {
        let key = QueryKey::licitaciones();
        if let Some(cached) = self.cache.get(&key) {
            return Ok(cached);
        }
        let all = use_cases::licitaciones::get_licitaciones(self.repos.licitaciones.as_ref()).await?;
        self.cache.set(key, &all);
        Ok(all)
    }

    pub async fn licitacion(&self, id: &str) -> Result<Option<Licitacion>, ClientError> {
        let key = QueryKey::licitacion(id);
        if let Some(cached) = self.cache.get::<Licitacion>(&key) {
            return Ok(Some(cached));
        }
        let found =
            use_cases::licitaciones::get_licitacion_by_id(self.repos.licitaciones.as_ref(), id).await?;
        if let Some(licitacion) = &found {
            self.cache.set(key, licitacion);
        }
        Ok(found)
    }

    pub async fn filter_licitaciones(&self, criteria: &FilterCriteria) -> Result<Vec<Licitacion>, ClientError> {
        let key = QueryKey::licitaciones_filter(
            criteria.search_query.as_deref().unwrap_or_default(),
            criteria.sector.as_deref().unwrap_or_default(),
            criteria.region.as_deref().unwrap_or_default(),
        );
        if let Some(cached) = self.cache.get(&key) {
            return Ok(cached);
        }
        let found =
            use_cases::licitaciones::filter_licitaciones(self.repos.licitaciones.as_ref(), criteria)
                .await?;
        self.cache.set(key, &found);
        Ok(found)
    }

    pub async fn new_opportunities(&self) -> Result<Vec<Licitacion>, ClientError> {
        Ok(new_opportunities(&self.licitaciones().await?))
    }

    pub async fn drafts(&self) -> Result<Vec<Licitacion>, ClientError> {
        Ok(drafts(&self.licitaciones().await?))
    }

    pub async fn dashboard_stats(&self, today: NaiveDate) -> Result<DashboardStats, ClientError> {
        Ok(dashboard_stats(&self.licitaciones().await?, today))
    }

    // =========================================================================
    // Documents
    // =========================================================================

    pub async fn documentos(&self) -> Result<Vec<Documento>, ClientError> {
        let key = QueryKey::documentos();
        if let Some(cached) = self.cache.get(&key) {
            return Ok(cached);
        }
        let all = use_cases::documentos::get_documentos(self.repos.documentos.as_ref()).await?;
        self.cache.set(key, &all);
        Ok(all)
    }

    pub async fn documentos_by_licitacion(&self, licitacion_id: &str) -> Result<Vec<Documento>, ClientError> {
        let key = QueryKey::documentos_licitacion(licitacion_id);
        if let Some(cached) = self.cache.get(&key) {
            return Ok(cached);
        }
        let docs = use_cases::documentos::get_documentos_by_licitacion(
            self.repos.documentos.as_ref(),
            licitacion_id,
        )
        .await?;
        self.cache.set(key, &docs);
        Ok(docs)
    }

    pub async fn resumen_estado(&self, licitacion_id: &str) -> Result<ResumenEstado, ClientError> {
        let key = QueryKey::resumen_estado(licitacion_id);
        if let Some(cached) = self.cache.get(&key) {
            return Ok(cached);
        }
        let resumen =
            use_cases::documentos::get_resumen_estado(self.repos.documentos.as_ref(), licitacion_id)
                .await?;
        self.cache.set(key, &resumen);
        Ok(resumen)
    }

    pub async fn update_documento_estado(&self, id: &str, estado: &str) -> Result<Documento, ClientError> {
        let doc =
            use_cases::documentos::update_documento_estado(self.repos.documentos.as_ref(), id, estado)
                .await?;
        self.cache.invalidate(&QueryKey::documentos());
        Ok(doc)
    }

    /// Load a tender with its checklist into a fresh wizard.
    pub async fn open_wizard(&self, licitacion_id: &str) -> Result<WizardController, ClientError> {
        let licitacion = self
            .licitacion(licitacion_id)
            .await?
            .ok_or_else(|| ClientError::NotFound("Licitación no encontrada".to_string()))?;
        let documentos = self.documentos_by_licitacion(licitacion_id).await?;
        let resumen = self.resumen_estado(licitacion_id).await?;
        Ok(WizardController::new(ChecklistWizard::new(
            licitacion, documentos, resumen,
        )))
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    pub async fn notificaciones(&self) -> Result<Vec<Notificacion>, ClientError> {
        let key = QueryKey::notificaciones();
        if let Some(cached) = self.cache.get(&key) {
            return Ok(cached);
        }
        let all =
            use_cases::notificaciones::get_notificaciones(self.repos.notificaciones.as_ref()).await?;
        self.cache.set(key, &all);
        Ok(all)
    }

    pub async fn unread_notificaciones(&self) -> Result<Vec<Notificacion>, ClientError> {
        use_cases::notificaciones::get_unread(self.repos.notificaciones.as_ref()).await
    }

    pub async fn mark_notificacion_as_read(&self, id: &str) -> Result<Option<Notificacion>, ClientError> {
        let updated =
            use_cases::notificaciones::mark_as_read(self.repos.notificaciones.as_ref(), id).await?;
        self.cache.invalidate(&QueryKey::notificaciones());
        Ok(updated)
    }

    pub async fn mark_all_notificaciones_as_read(&self) -> Result<(), ClientError> {
        use_cases::notificaciones::mark_all_as_read(self.repos.notificaciones.as_ref()).await?;
        self.cache.invalidate(&QueryKey::notificaciones());
        Ok(())
    }

    // =========================================================================
    // Chat
    // =========================================================================

    pub async fn send_chat_message(&self, text: &str) -> Result<String, ClientError> {
        use_cases::chat::send_message(self.repos.chat.as_ref(), text).await
    }

    pub async fn finalize_chat(&self) -> Result<String, ClientError> {
        use_cases::chat::finalize_conversation(
            self.repos.chat.as_ref(),
            Some(&self.config.chat_user_id),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DocumentoEstado;
    use std::time::Duration;

    fn lic(id: &str, fecha: &str, completados: u32, estado: LicitacionEstado) -> Licitacion {
        Licitacion {
            id: id.into(),
            nombre: id.into(),
            entidad: "E".into(),
            monto_min: 1,
            monto_max: 2,
            fecha_cierre: fecha.into(),
            estado,
            sector: "S".into(),
            region: "R".into(),
            tipo_contrato: "T".into(),
            resumen: String::new(),
            documentos_total: 10,
            documentos_completados: completados,
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn context() -> AppContext {
        let config = Config {
            simulated_latency_ms: 0,
            ..Config::default()
        };
        AppContext::new(config).unwrap()
    }

    #[test]
    fn test_estado_por_fecha_flags_closing_week() {
        let l = lic("A", "2026-02-14", 0, LicitacionEstado::Nueva);
        assert_eq!(estado_por_fecha(&l, d(2026, 2, 7)), LicitacionEstado::CasiCierra);
        assert_eq!(estado_por_fecha(&l, d(2026, 2, 14)), LicitacionEstado::CasiCierra);
        assert_eq!(estado_por_fecha(&l, d(2026, 2, 6)), LicitacionEstado::Nueva);
        assert_eq!(estado_por_fecha(&l, d(2026, 2, 15)), LicitacionEstado::Nueva);
    }

    #[test]
    fn test_dashboard_views_split_on_progress() {
        let all = vec![
            lic("A", "2026-02-14", 0, LicitacionEstado::Nueva),
            lic("B", "2026-05-01", 0, LicitacionEstado::Nueva),
            lic("C", "2026-05-01", 3, LicitacionEstado::EnProgreso),
        ];
        assert_eq!(new_opportunities(&all).len(), 2);
        assert_eq!(drafts(&all).len(), 1);
        let stats = dashboard_stats(&all, d(2026, 2, 10));
        assert_eq!(
            stats,
            DashboardStats {
                nuevas: 1,
                en_progreso: 0,
                por_cerrar: 1
            }
        );
    }

    #[test]
    fn test_preferences_range_validation() {
        let ctx = context();
        let bad = Preferences {
            monto_min: Some(500),
            monto_max: Some(100),
            ..Default::default()
        };
        let err = ctx.update_preferences(bad).unwrap_err();
        assert_eq!(
            err.to_string(),
            "El monto mínimo no puede ser mayor al monto máximo"
        );

        let good = Preferences {
            monto_min: Some(100),
            sectores: vec!["Salud".into()],
            ..Default::default()
        };
        ctx.update_preferences(good.clone()).unwrap();
        assert_eq!(ctx.preferences(), good);
    }

    #[tokio::test]
    async fn test_reads_are_cached() {
        let ctx = context();
        let all = ctx.licitaciones().await.unwrap();
        assert_eq!(all.len(), 6);
        assert!(ctx.cache().contains(&QueryKey::licitaciones()));
        assert_eq!(ctx.drafts().await.unwrap().len(), 2);
        assert_eq!(ctx.new_opportunities().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_document_update_invalidates_document_reads() {
        let ctx = context();
        ctx.documentos_by_licitacion("LIC-001").await.unwrap();
        ctx.resumen_estado("LIC-001").await.unwrap();
        assert!(ctx.cache().contains(&QueryKey::documentos_licitacion("LIC-001")));

        let doc = ctx.update_documento_estado("4", "cargado").await.unwrap();
        assert_eq!(doc.estado, DocumentoEstado::Cargado);
        assert!(!ctx.cache().contains(&QueryKey::documentos_licitacion("LIC-001")));
        assert!(!ctx.cache().contains(&QueryKey::resumen_estado("LIC-001")));

        let reloaded = ctx.documentos_by_licitacion("LIC-001").await.unwrap();
        assert_eq!(
            reloaded.iter().find(|d| d.id == "4").unwrap().estado,
            DocumentoEstado::Cargado
        );
    }

    #[tokio::test]
    async fn test_notification_mutations_invalidate() {
        let ctx = context();
        assert_eq!(ctx.notificaciones().await.unwrap().len(), 4);
        ctx.mark_all_notificaciones_as_read().await.unwrap();
        assert!(!ctx.cache().contains(&QueryKey::notificaciones()));
        assert!(ctx.unread_notificaciones().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_open_wizard_loads_checklist() {
        let ctx = context();
        let wizard = ctx.open_wizard("1").await.unwrap();
        let (id, docs, total) = wizard
            .with(|w| (w.licitacion().id.clone(), w.documentos().len(), w.total_steps()))
            .unwrap();
        assert_eq!(id, "LIC-001");
        assert_eq!(docs, 6);
        assert_eq!(total, 2);

        let err = ctx.open_wizard("LIC-404").await.unwrap_err();
        assert_eq!(err.to_string(), "Licitación no encontrada");
    }

    #[tokio::test]
    async fn test_logout_clears_cache() {
        let ctx = context();
        ctx.licitaciones().await.unwrap();
        ctx.logout().await.unwrap();
        assert!(ctx.cache().is_empty());
        assert!(ctx.current_user().await.unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_mock_backend_applies_configured_latency() {
        let config = Config {
            simulated_latency_ms: 800,
            ..Config::default()
        };
        let ctx = AppContext::new(config).unwrap();
        let started = tokio::time::Instant::now();
        ctx.licitaciones().await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(800));
    }
}
