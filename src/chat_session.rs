//! Conversation state for the assistant panel.
//!
//! The transcript opens with a greeting. Every exchange appends the user's
//! message followed by the assistant reply, or a canned apology when the
//! remote call fails. Only one send or finalize is in flight at a time.

use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;

use crate::repositories::ChatRepository;
use crate::types::Mensaje;

pub const GREETING: &str = "¡Hola! 👋 Soy tu asistente de licitaciones. Estoy aquí para guiarte en el proceso de preparación de ofertas. ¿En qué puedo ayudarte hoy?";
pub const SEND_ERROR_REPLY: &str =
    "Lo siento, tuve problemas para conectar con el servidor. Por favor intenta de nuevo.";
pub const FINALIZE_ERROR_REPLY: &str =
    "Lo siento, tuve problemas para finalizar la conversación. Por favor intenta de nuevo.";
pub const FINALIZE_COMMAND: &str = "finalizar";
const FINALIZE_LABEL: &str = "Finalizar";

pub const SUGGESTED_QUESTIONS: &[&str] = &[
    "¿Cómo funciona el proceso de licitación?",
    "¿Qué documentos necesito primero?",
    "¿Qué es la Garantía de Seriedad?",
    "¿Por dónde empiezo con esta licitación?",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatSessionError {
    #[error("Ya hay un mensaje en curso")]
    Busy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input; nothing was appended.
    Ignored,
    /// Assistant reply to a regular message.
    Sent(Mensaje),
    /// Assistant reply to a finalize request.
    Finalized(Mensaje),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flight {
    Send,
    Finalize,
}

#[derive(Debug)]
struct ChatState {
    messages: Vec<Mensaje>,
    in_flight: Option<Flight>,
}

/// Clears the in-flight marker even when the request future is dropped.
struct FlightGuard<'a> {
    state: &'a Mutex<ChatState>,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.state.lock().in_flight = None;
    }
}

pub struct ChatSession {
    repo: Arc<dyn ChatRepository>,
    user_id: String,
    state: Mutex<ChatState>,
}

impl ChatSession {
    pub fn new(repo: Arc<dyn ChatRepository>, user_id: impl Into<String>) -> Self {
        Self {
            repo,
            user_id: user_id.into(),
            state: Mutex::new(ChatState {
                messages: vec![Mensaje::assistant(GREETING)],
                in_flight: None,
            }),
        }
    }

    pub fn messages(&self) -> Vec<Mensaje> {
        self.state.lock().messages.clone()
    }

    pub fn is_sending(&self) -> bool {
        self.state.lock().in_flight == Some(Flight::Send)
    }

    pub fn is_finalizing(&self) -> bool {
        self.state.lock().in_flight == Some(Flight::Finalize)
    }

    /// Claim the session for one request and append the user's message.
    fn begin(&self, flight: Flight, user_text: &str) -> Result<FlightGuard<'_>, ChatSessionError> {
        let mut state = self.state.lock();
        if state.in_flight.is_some() {
            return Err(ChatSessionError::Busy);
        }
        state.in_flight = Some(flight);
        state.messages.push(Mensaje::user(user_text));
        Ok(FlightGuard { state: &self.state })
    }

    fn push_reply(&self, content: String) -> Mensaje {
        let reply = Mensaje::assistant(content);
        self.state.lock().messages.push(reply.clone());
        reply
    }

    /// Route typed input: blank is ignored, `finalizar` (any case) closes
    /// the conversation, anything else is sent.
    pub async fn submit(&self, input: &str) -> Result<SubmitOutcome, ChatSessionError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(SubmitOutcome::Ignored);
        }
        if trimmed.to_lowercase() == FINALIZE_COMMAND {
            return self.finalize().await.map(SubmitOutcome::Finalized);
        }
        self.send(input).await.map(SubmitOutcome::Sent)
    }

    pub async fn send(&self, text: &str) -> Result<Mensaje, ChatSessionError> {
        let _guard = self.begin(Flight::Send, text)?;
        let content = match self.repo.send_message(text).await {
            Ok(reply) => reply,
            Err(e) => {
                log::warn!("Chat send failed: {}", e);
                SEND_ERROR_REPLY.to_string()
            }
        };
        Ok(self.push_reply(content))
    }

    pub async fn finalize(&self) -> Result<Mensaje, ChatSessionError> {
        let _guard = self.begin(Flight::Finalize, FINALIZE_LABEL)?;
        let content = match self.repo.finalize_conversation(Some(&self.user_id)).await {
            Ok(summary) => summary,
            Err(e) => {
                log::warn!("Chat finalize failed: {}", e);
                FINALIZE_ERROR_REPLY.to_string()
            }
        };
        Ok(self.push_reply(content))
    }
}
