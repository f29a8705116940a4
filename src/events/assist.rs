use crate::assist::{AssistError, AssistRequest, Assistant};
use crate::state::{AssistKind, State};
use log::*;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Specify different assist event types.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Chat(AssistRequest),
    Cleanup(AssistRequest),
}

impl Event {
    pub fn kind(&self) -> AssistKind {
        match self {
            Event::Chat(_) => AssistKind::Chat,
            Event::Cleanup(_) => AssistKind::Cleanup,
        }
    }
}

/// Specify struct for answering assist events into state.
///
pub struct Handler<'a> {
    state: &'a Arc<Mutex<State>>,
    assistant: Result<Assistant, String>,
}

impl<'a> Handler<'a> {
    /// Return new instance with reference to state. An assistant that failed
    /// to initialize answers every event with its error.
    ///
    pub fn new(state: &'a Arc<Mutex<State>>, assistant: Result<Assistant, AssistError>) -> Self {
        if let Err(e) = &assistant {
            warn!("Assistant disabled: {}", e);
        }
        Handler {
            state,
            assistant: assistant.map_err(|e| e.to_string()),
        }
    }

    /// Handle assist events by type.
    ///
    pub async fn handle(&mut self, event: Event) {
        debug!("Processing assist event '{:?}'...", event.kind());
        let kind = event.kind();
        let request = match event {
            Event::Chat(request) | Event::Cleanup(request) => request,
        };
        let result = match &self.assistant {
            Ok(assistant) => assistant.ask(&request).await,
            Err(message) => Err(AssistError::ServiceUnavailable(message.clone())),
        };
        if let Err(e) = &result {
            error!("Assistant request failed: {}", e);
        }
        let mut state = self.state.lock().await;
        state.set_assist_result(kind, result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AssistSettings;
    use httpmock::MockServer;
    use serde_json::json;

    #[tokio::test]
    async fn unavailable_service_reply_reaches_state() {
        let state = Arc::new(Mutex::new(State::default()));
        let mut handler = Handler::new(&state, Assistant::new(&AssistSettings::default()));
        handler
            .handle(Event::Chat(Assistant::chat_request(vec![], "hi")))
            .await;
        let state = state.lock().await;
        let reply = state.assist().reply.clone().unwrap_or_default();
        assert!(reply.contains("unavailable"));
        assert!(state.assist().pending.is_none());
    }

    #[tokio::test]
    async fn cleanup_reply_becomes_proposal() {
        let server = MockServer::start();
        server
            .mock_async(|when, then| {
                when.method("POST").path("/chat/completions");
                then.status(200).json_body(json!({
                    "choices": [{ "message": { "role": "assistant", "content": "- Buy milk\n- Call mom" } }]
                }));
            })
            .await;
        let settings = AssistSettings {
            url: Some(server.base_url()),
            ..AssistSettings::default()
        };
        let state = Arc::new(Mutex::new(State::default()));
        let mut handler = Handler::new(&state, Assistant::new(&settings));
        handler
            .handle(Event::Cleanup(Assistant::cleanup_request(vec!["buy milk".to_string()])))
            .await;
        let state = state.lock().await;
        assert_eq!(
            state.assist().proposal,
            Some(vec!["Buy milk".to_string(), "Call mom".to_string()])
        );
    }
}
