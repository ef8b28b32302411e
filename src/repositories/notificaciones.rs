use async_trait::async_trait;
use parking_lot::RwLock;

use super::{fixtures, NotificacionRepository};
use crate::error::ClientError;
use crate::types::Notificacion;

pub struct InMemoryNotificacionRepository {
    notificaciones: RwLock<Vec<Notificacion>>,
}

impl InMemoryNotificacionRepository {
    pub fn new(notificaciones: Vec<Notificacion>) -> Self {
        Self {
            notificaciones: RwLock::new(notificaciones),
        }
    }

    pub fn seeded() -> Self {
        Self::new(fixtures::notificaciones())
    }
}

#[async_trait]
impl NotificacionRepository for InMemoryNotificacionRepository {
    async fn get_all(&self) -> Result<Vec<Notificacion>, ClientError> {
        Ok(self.notificaciones.read().clone())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Notificacion>, ClientError> {
        Ok(self.notificaciones.read().iter().find(|n| n.id == id).cloned())
    }

    async fn get_unread(&self) -> Result<Vec<Notificacion>, ClientError> {
        Ok(self
            .notificaciones
            .read()
            .iter()
            .filter(|n| !n.leida)
            .cloned()
            .collect())
    }

    /// Unknown ids yield `None` rather than an error.
    async fn mark_as_read(&self, id: &str) -> Result<Option<Notificacion>, ClientError> {
        let mut notificaciones = self.notificaciones.write();
        Ok(notificaciones.iter_mut().find(|n| n.id == id).map(|n| {
            n.leida = true;
            n.clone()
        }))
    }

    async fn mark_all_as_read(&self) -> Result<(), ClientError> {
        for n in self.notificaciones.write().iter_mut() {
            n.leida = true;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unread_and_mark_as_read() {
        let repo = InMemoryNotificacionRepository::seeded();
        assert_eq!(repo.get_unread().await.unwrap().len(), 2);

        let marked = repo.mark_as_read("1").await.unwrap().unwrap();
        assert!(marked.leida);
        assert_eq!(repo.get_unread().await.unwrap().len(), 1);

        assert!(repo.mark_as_read("42").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_mark_all_is_idempotent() {
        let repo = InMemoryNotificacionRepository::seeded();
        repo.mark_all_as_read().await.unwrap();
        let once = repo.get_all().await.unwrap();
        repo.mark_all_as_read().await.unwrap();
        let twice = repo.get_all().await.unwrap();
        assert_eq!(once, twice);
        assert!(repo.get_unread().await.unwrap().is_empty());
    }
}
