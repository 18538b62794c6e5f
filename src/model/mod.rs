pub mod types;

use log::{debug, info, warn};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};

use crate::config::Config;
use crate::error::{Error, Result};
use types::{ChatRequest, ChatResponse};

// A single-shot client for an OpenAI-compatible chat-completions endpoint
pub struct ChatClient {
    endpoint: String,
    api_key: String,
    client: Client,
}

impl ChatClient {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            client: Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.endpoint.clone(), config.api_key.clone())
    }

    /// POST the request once and return the raw body of a 200 response.
    pub async fn send(&self, request: &ChatRequest) -> Result<Vec<u8>> {
        info!(
            "Sending request to {} with max_tokens: {}",
            self.endpoint, request.max_tokens
        );
        debug!("Messages: {:?}", request.messages);

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(Error::Network)?;

        let status = response.status();
        info!("Received status {}", status);

        // Anything but a plain 200 is treated as a failure, including other 2xx codes
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_else(|e| {
                warn!("Failed to read body of {} response: {}", status, e);
                String::new()
            });
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await.map_err(Error::Read)?;
        debug!("Response body: {}", String::from_utf8_lossy(&body));
        Ok(body.to_vec())
    }
}

/// Content of the first choice, exactly as returned.
pub fn parse_response(body: &[u8]) -> Result<String> {
    let response: ChatResponse = serde_json::from_slice(body)?;

    let content = response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or(Error::EmptyResponse)?;

    info!("Response length: {} characters", content.len());
    Ok(content)
}
