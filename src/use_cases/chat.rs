use crate::error::ClientError;
use crate::repositories::ChatRepository;

pub async fn send_message(repo: &dyn ChatRepository, text: &str) -> Result<String, ClientError> {
    repo.send_message(text).await
}

pub async fn finalize_conversation(
    repo: &dyn ChatRepository,
    user_id: Option<&str>,
) -> Result<String, ClientError> {
    repo.finalize_conversation(user_id).await
}
