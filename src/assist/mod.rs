//! Text-assist service.
//!
//! The assistant is a black box that takes a system prompt, the current task
//! lines and a user message and answers with text. Replies and errors are
//! shown verbatim; nothing here retries.

mod client;
mod error;
mod resource;

pub use error::AssistError;
pub use resource::*;

use crate::config::AssistSettings;
use client::Client;
use log::*;
use std::time::Duration;

/// Prompt used for free-form questions about the task list.
///
pub const CHAT_PROMPT: &str = "You are a concise assistant inside a notepad to-do app. \
The user's current tasks are listed below, one per line. Answer the user's message briefly.";

/// Prompt used to request a tidied task list.
///
pub const CLEANUP_PROMPT: &str = "You tidy to-do lists. Rewrite the tasks below: merge duplicates, \
fix spelling, split compound tasks and drop empty ones. Reply with the new tasks only, one per line, \
without numbering or commentary.";

const CLEANUP_MESSAGE: &str = "Clean up my task list.";

/// Responsible for asynchronous interaction with the assist endpoint.
///
pub struct Assistant {
    client: Client,
    model: String,
}

impl Assistant {
    /// Returns a new instance for the configured endpoint, or
    /// `ServiceUnavailable` when no endpoint is configured.
    ///
    pub fn new(settings: &AssistSettings) -> Result<Assistant, AssistError> {
        let url = settings
            .url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| AssistError::ServiceUnavailable("no assist.url configured".to_string()))?;
        debug!("Initializing assistant for {} with model {}...", url, settings.model);
        Ok(Assistant {
            client: Client::new(url, settings.api_key.as_deref(), Duration::from_secs(settings.timeout_secs))?,
            model: settings.model.clone(),
        })
    }

    /// Build a request for a free-form question.
    ///
    pub fn chat_request(context_lines: Vec<String>, message: &str) -> AssistRequest {
        AssistRequest {
            system_prompt: CHAT_PROMPT.to_string(),
            context_lines,
            user_message: message.to_string(),
        }
    }

    /// Build a request for a cleanup proposal.
    ///
    pub fn cleanup_request(context_lines: Vec<String>) -> AssistRequest {
        AssistRequest {
            system_prompt: CLEANUP_PROMPT.to_string(),
            context_lines,
            user_message: CLEANUP_MESSAGE.to_string(),
        }
    }

    /// Send the request and return the first message of the reply.
    ///
    pub async fn ask(&self, request: &AssistRequest) -> Result<AssistReply, AssistError> {
        debug!(
            "Asking assistant with {} context line(s)...",
            request.context_lines.len()
        );
        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(&system_message(request)),
                ChatMessage::user(&request.user_message),
            ],
            stream: false,
        };
        let response = self.client.complete(&body).await?;
        let reply = response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(AssistError::EmptyReply)?;
        Ok(AssistReply { reply })
    }
}

fn system_message(request: &AssistRequest) -> String {
    if request.context_lines.is_empty() {
        return format!("{}\n\n(no tasks)", request.system_prompt);
    }
    format!(
        "{}\n\n{}",
        request.system_prompt,
        request.context_lines.join("\n")
    )
}
