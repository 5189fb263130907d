use std::time::Duration;

use async_trait::async_trait;
use common::config::ContentConfig;
use common::error::{truncate_body, ERROR_BODY_LIMIT};
use common::Error;
use reqwest::Client;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::types::{GenerateContentRequest, GenerateContentResponse};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const SERVICE: &str = "Gemini";

/// Turns a compiled request into generated text. One round trip, no retry.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(&self, request: &str) -> Result<String, Error>;
}

pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(config: &ContentConfig) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("failed to build Gemini HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.api_key.trim().to_string(),
            model: config.model.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", GEMINI_API_BASE, self.model)
    }

    fn extract_text(body: &GenerateContentResponse) -> Result<String, Error> {
        if let Some(reason) = body.block_reason() {
            return Err(Error::upstream(SERVICE, format!("prompt blocked: {reason}")));
        }
        body.text()
            .map(|t| t.trim().to_string())
            .ok_or_else(|| Error::upstream(SERVICE, "response contained no text"))
    }
}

fn status_message(status: u16, body: &str) -> String {
    format!(
        "HTTP status {}: {}",
        status,
        truncate_body(body, ERROR_BODY_LIMIT)
    )
}

#[async_trait]
impl ContentGenerator for GeminiClient {
    #[instrument(skip(self, request), fields(request_id = %Uuid::new_v4(), model = %self.model))]
    async fn generate(&self, request: &str) -> Result<String, Error> {
        if self.api_key.is_empty() {
            return Err(Error::ConfigMissing("GEMINI_API_KEY is not set".into()));
        }

        let payload = GenerateContentRequest::from_text(request);
        debug!("Sending generateContent request ({} chars)", request.chars().count());

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::upstream(SERVICE, "request timed out")
                } else {
                    Error::upstream(SERVICE, e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::upstream(
                SERVICE,
                status_message(status.as_u16(), &body),
            ));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| Error::upstream(SERVICE, format!("JSON parse error: {e}")))?;
        Self::extract_text(&body)
    }
}
