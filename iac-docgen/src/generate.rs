#![doc = "Generation client for the CLI: implements the core `Generator` trait against an OpenAI-compatible chat completions API."]
//
//! # Generation Client (CLI <-> Core)
//!
//! This module provides the bridge between the CLI workflow and the generation
//! abstraction in [`iac_docgen_core::contract`]. It wires the [`Generator`] trait
//! to a real HTTP backend and provides the [`OpenAiClient`] used by the CLI.
//!
//! ## Client Usage
//!
//! - Build a [`GenerationConfig`] (see `load_config`) and pass it to [`OpenAiClient::new`].
//! - One `POST {base_url}/chat/completions` per folder, no retries, no streaming.
//! - Transport, status and decoding failures are mapped onto [`GenerationError`].

use async_trait::async_trait;
use iac_docgen_core::config::GenerationConfig;
use iac_docgen_core::contract::{GenerationRequest, Generator, Message};
use iac_docgen_core::error::GenerationError;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<&'a Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

pub struct OpenAiClient {
    http: Client,
    config: GenerationConfig,
}

impl OpenAiClient {
    pub fn new(config: GenerationConfig) -> Result<Self, GenerationError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                tracing::error!(error = ?e, "Failed to build HTTP client");
                GenerationError::Transport(e.to_string())
            })?;
        tracing::info!(
            model = %config.model,
            base_url = %config.base_url,
            "Initialized OpenAiClient"
        );
        Ok(OpenAiClient { http, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl Generator for OpenAiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let url = self.endpoint();
        let body = ChatRequest {
            model: &self.config.model,
            messages: request.messages().to_vec(),
            temperature: self.config.temperature,
        };
        tracing::info!(
            folder = %request.folder_name,
            model = %self.config.model,
            url = %url,
            "[GENERATE] Sending generation request"
        );

        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = ?e, folder = %request.folder_name, "[GENERATE] Request failed");
                GenerationError::Transport(e.to_string())
            })?;

        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            tracing::warn!(folder = %request.folder_name, "[GENERATE] Rate limited by generation service");
            return Err(GenerationError::RateLimited);
        }
        if !status.is_success() {
            let text = resp
                .text()
                .await
                .unwrap_or_else(|_| String::from("<Failed to decode response body>"));
            tracing::error!(
                status = %status,
                folder = %request.folder_name,
                "[GENERATE] Generation service returned error. Response body: {text}"
            );
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: ChatResponse = resp.json().await.map_err(|e| {
            tracing::error!(error = ?e, folder = %request.folder_name, "[GENERATE] Failed to parse response JSON");
            GenerationError::Decode(e.to_string())
        })?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(GenerationError::EmptyResponse)?;

        tracing::info!(
            folder = %request.folder_name,
            bytes = content.len(),
            "[GENERATE] Received generation response"
        );
        Ok(content)
    }
}
