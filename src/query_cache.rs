//! Keyed read cache shared by the application context.
//!
//! Keys are ordered string segments (`["licitacion", "LIC-001"]`).
//! Invalidation works on prefixes, so dropping `["documentos"]` also drops
//! every per-tender document list.

use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        QueryKey(segments.into_iter().map(Into::into).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }

    pub fn licitaciones() -> Self {
        Self::new(["licitaciones"])
    }

    pub fn licitacion(id: &str) -> Self {
        Self::new(["licitacion", id])
    }

    pub fn licitaciones_filter(search: &str, sector: &str, region: &str) -> Self {
        Self::new(["licitaciones", "filter", search, sector, region])
    }

    pub fn documentos() -> Self {
        Self::new(["documentos"])
    }

    pub fn documentos_licitacion(id: &str) -> Self {
        Self::new(["documentos", "licitacion", id])
    }

    pub fn resumen_estado(id: &str) -> Self {
        Self::new(["documentos", "resumen", id])
    }

    pub fn notificaciones() -> Self {
        Self::new(["notificaciones"])
    }

    pub fn current_user() -> Self {
        Self::new(["currentUser"])
    }
}

#[derive(Debug, Default)]
pub struct QueryCache {
    entries: DashMap<QueryKey, Value>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cached value that no longer deserializes into `T` is treated as a
    /// miss.
    pub fn get<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        let entry = self.entries.get(key)?;
        match serde_json::from_value(entry.value().clone()) {
            Ok(value) => Some(value),
            Err(e) => {
                log::debug!("Cache entry {:?} has an unexpected shape: {}", key.segments(), e);
                None
            }
        }
    }

    pub fn set<T: Serialize>(&self, key: QueryKey, value: &T) {
        match serde_json::to_value(value) {
            Ok(json) => {
                self.entries.insert(key, json);
            }
            Err(e) => log::warn!("Skipping cache write for {:?}: {}", key.segments(), e),
        }
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Drop every entry whose key starts with `prefix`. Returns how many
    /// were removed.
    pub fn invalidate(&self, prefix: &QueryKey) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.starts_with(prefix));
        let removed = before - self.entries.len();
        log::debug!("Invalidated {} cache entries under {:?}", removed, prefix.segments());
        removed
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
