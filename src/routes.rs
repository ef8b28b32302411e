//! Navigable screens and their paths.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Index,
    Login,
    Register,
    Onboarding,
    Dashboard,
    Licitacion(String),
    ResumenFinal(String),
    Borradores,
    Configuracion,
    Ayuda,
    NotFound(String),
}

impl Route {
    /// Query strings and fragments are ignored; a trailing slash is
    /// tolerated.
    pub fn parse(path: &str) -> Route {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Route::Index,
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["onboarding"] => Route::Onboarding,
            ["dashboard"] => Route::Dashboard,
            ["licitacion", id] => Route::Licitacion(id.to_string()),
            ["licitacion", id, "resumen"] => Route::ResumenFinal(id.to_string()),
            ["borradores"] => Route::Borradores,
            ["configuracion"] => Route::Configuracion,
            ["ayuda"] => Route::Ayuda,
            _ => Route::NotFound(path.to_string()),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Index => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Onboarding => "/onboarding".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::Licitacion(id) => format!("/licitacion/{}", id),
            Route::ResumenFinal(id) => format!("/licitacion/{}/resumen", id),
            Route::Borradores => "/borradores".to_string(),
            Route::Configuracion => "/configuracion".to_string(),
            Route::Ayuda => "/ayuda".to_string(),
            Route::NotFound(path) => path.clone(),
        }
    }

    /// Screens rendered inside the signed-in layout.
    pub fn requires_session(&self) -> bool {
        matches!(
            self,
            Route::Dashboard
                | Route::Licitacion(_)
                | Route::ResumenFinal(_)
                | Route::Borradores
                | Route::Configuracion
                | Route::Ayuda
        )
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
