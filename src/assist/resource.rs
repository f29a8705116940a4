use serde::{Deserialize, Serialize};

/// Defines a request to the assistant: a system prompt, the current task
/// lines as context and the user's message.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssistRequest {
    pub system_prompt: String,
    pub context_lines: Vec<String>,
    pub user_message: String,
}

/// Defines the assistant's answer.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssistReply {
    pub reply: String,
}

/// Defines a chat message on the wire.
///
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: &str) -> Self {
        ChatMessage {
            role: "system".to_string(),
            content: content.to_string(),
        }
    }

    pub fn user(content: &str) -> Self {
        ChatMessage {
            role: "user".to_string(),
            content: content.to_string(),
        }
    }
}

/// Body of a chat-completions request.
///
#[derive(Clone, Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
}

/// Body of a chat-completions response, reduced to the fields in use.
///
#[derive(Clone, Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
}
