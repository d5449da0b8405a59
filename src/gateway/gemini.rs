use crate::config::GatewayConfig;
use crate::error::MealMateError;
use crate::gateway::CompletionClient;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};

/// Client for the Google generative language `generateContent` endpoint.
///
/// Construction fails fast when no API key can be resolved, so a
/// misconfigured deployment surfaces at startup rather than mid-request.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    temperature: f32,
    max_output_tokens: u32,
    base_url: String,
}

impl GeminiClient {
    /// Create a new Gemini client from configuration.
    ///
    /// # Errors
    /// Returns `MealMateError::MissingApiKey` if no key is present in the
    /// config or the GEMINI_API_KEY / GOOGLE_API_KEY environment variables.
    pub fn new(config: &GatewayConfig) -> Result<Self, MealMateError> {
        Self::with_resolved_key(config, config.resolve_api_key())
    }

    fn with_resolved_key(
        config: &GatewayConfig,
        api_key: Option<String>,
    ) -> Result<Self, MealMateError> {
        let api_key = api_key.ok_or(MealMateError::MissingApiKey)?;

        Ok(GeminiClient {
            client: Client::new(),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }

    async fn generate(&self, parts: Value) -> Result<String, MealMateError> {
        let response = self
            .client
            .post(self.endpoint())
            .json(&json!({
                "contents": [{
                    "role": "user",
                    "parts": parts
                }],
                "generationConfig": {
                    "temperature": self.temperature,
                    "maxOutputTokens": self.max_output_tokens
                }
            }))
            .send()
            .await
            .map_err(|e| MealMateError::ServiceUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(MealMateError::ServiceUnavailable(format!(
                "Gemini API returned {status}"
            )));
        }

        let response_body: Value = response
            .json()
            .await
            .map_err(|e| MealMateError::ServiceUnavailable(e.to_string()))?;
        debug!("Gemini response: {:?}", response_body);

        let text = response_body["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| {
                MealMateError::ServiceUnavailable(
                    "Failed to extract text from Gemini response".to_string(),
                )
            })?
            .to_string();

        Ok(text)
    }
}

#[async_trait]
impl CompletionClient for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String, MealMateError> {
        self.generate(json!([{ "text": prompt }])).await
    }

    async fn complete_with_image(
        &self,
        prompt: &str,
        image_bytes: &[u8],
        mime_type: &str,
    ) -> Result<String, MealMateError> {
        let base64_image = STANDARD.encode(image_bytes);
        self.generate(json!([
            {
                "inline_data": {
                    "data": base64_image,
                    "mime_type": mime_type
                }
            },
            { "text": prompt }
        ]))
        .await
    }
}
