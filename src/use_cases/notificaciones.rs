use crate::error::ClientError;
use crate::repositories::NotificacionRepository;
use crate::types::Notificacion;

pub async fn get_notificaciones(repo: &dyn NotificacionRepository) -> Result<Vec<Notificacion>, ClientError> {
    repo.get_all().await
}

pub async fn get_unread(repo: &dyn NotificacionRepository) -> Result<Vec<Notificacion>, ClientError> {
    repo.get_unread().await
}

pub async fn mark_as_read(
    repo: &dyn NotificacionRepository,
    id: &str,
) -> Result<Option<Notificacion>, ClientError> {
    repo.mark_as_read(id).await
}

pub async fn mark_all_as_read(repo: &dyn NotificacionRepository) -> Result<(), ClientError> {
    repo.mark_all_as_read().await
}
