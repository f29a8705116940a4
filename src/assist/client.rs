//! HTTP client for chat-completions requests.
//!
//! This module provides a low-level HTTP client wrapper for an
//! OpenAI-compatible `/chat/completions` endpoint, handling authentication
//! and response parsing.

use super::{AssistError, ChatRequest, ChatResponse};
use log::*;
use std::time::Duration;

/// Makes requests to the completions endpoint and conforms the response.
///
pub struct Client {
    pub(crate) api_key: Option<String>,
    pub(crate) base_url: String,
    http_client: reqwest::Client,
}

impl Client {
    /// Returns a new instance for the given base URL and optional key.
    ///
    pub fn new(base_url: &str, api_key: Option<&str>, timeout: Duration) -> Result<Self, AssistError> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Client {
            api_key: api_key.map(str::to_owned),
            base_url: base_url.trim_end_matches('/').to_owned(),
            http_client,
        })
    }

    /// Send a chat request and return the parsed response or error.
    ///
    pub async fn complete(&self, body: &ChatRequest) -> Result<ChatResponse, AssistError> {
        let url = format!("{}/chat/completions", self.base_url);
        let mut request = self.http_client.post(&url).json(body);
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        let response = request.send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                AssistError::ServiceUnavailable(e.to_string())
            } else {
                AssistError::HttpRequest(e)
            }
        })?;
        let status = response.status();

        // Check status before trying to deserialize
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("Unable to read response"));
            error!("Assistant request failed with status {}: {}", status, message);
            return Err(AssistError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await?;
        match serde_json::from_slice::<ChatResponse>(&bytes) {
            Ok(parsed) => Ok(parsed),
            Err(e) => {
                error!(
                    "Failed to deserialize assistant response: {}. Response body: {}",
                    e,
                    String::from_utf8_lossy(&bytes)
                );
                Err(e.into())
            }
        }
    }
}
