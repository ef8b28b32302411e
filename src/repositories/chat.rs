use async_trait::async_trait;

use super::ChatRepository;
use crate::error::ClientError;
use crate::services::ChatService;

pub struct HttpChatRepository {
    service: ChatService,
}

impl HttpChatRepository {
    pub fn new(service: ChatService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl ChatRepository for HttpChatRepository {
    async fn send_message(&self, text: &str) -> Result<String, ClientError> {
        self.service.send_message(text).await
    }

    async fn finalize_conversation(&self, user_id: Option<&str>) -> Result<String, ClientError> {
        self.service.finalize_conversation(user_id).await
    }
}
